use std::collections::HashSet;
use std::hash::Hash;

/// One-shot visibility subscriptions.
///
/// A key is observed until its first "became visible" event, which is
/// delivered exactly once; the subscription is then dropped and the key can
/// never be observed again.
#[derive(Debug, Clone)]
pub struct VisibilityRegistry<K: Eq + Hash + Clone> {
    observing: HashSet<K>,
    delivered: HashSet<K>,
}

impl<K: Eq + Hash + Clone> Default for VisibilityRegistry<K> {
    fn default() -> Self {
        Self {
            observing: HashSet::new(),
            delivered: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> VisibilityRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest. False when already observed or already delivered.
    pub fn observe(&mut self, key: K) -> bool {
        if self.delivered.contains(&key) {
            return false;
        }
        self.observing.insert(key)
    }

    /// Report that `key` entered the viewport. True only for the first report of an observed key.
    pub fn became_visible(&mut self, key: &K) -> bool {
        if self.observing.remove(key) {
            self.delivered.insert(key.clone());
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub fn is_observing(&self, key: &K) -> bool {
        self.observing.contains(key)
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.observing.len()
    }

    pub fn clear(&mut self) {
        self.observing.clear();
        self.delivered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_exactly_once() {
        let mut registry = VisibilityRegistry::new();
        assert!(registry.observe("a"));
        assert!(!registry.observe("a"));
        assert!(registry.became_visible(&"a"));
        assert!(!registry.became_visible(&"a"));
        assert!(!registry.observe("a"));
        assert_eq!(registry.pending(), 0);
    }

    #[test]
    fn unobserved_keys_are_ignored() {
        let mut registry: VisibilityRegistry<String> = VisibilityRegistry::new();
        assert!(!registry.became_visible(&"ghost".to_string()));
        registry.observe("b".to_string());
        assert!(registry.is_observing(&"b".to_string()));
        registry.clear();
        assert!(registry.observe("b".to_string()));
    }
}
