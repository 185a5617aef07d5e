use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static FOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"drive\.google\.com/drive/folders/([a-zA-Z0-9_-]+)",
        r"/folders/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid folder pattern"))
    .collect()
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static NON_SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid slug pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("valid phone pattern"));

/// Pull a folder id out of a shared Drive link, or accept a bare id longer than 20 chars
pub fn extract_folder_id(link: &str) -> Option<String> {
    let link = link.trim();
    for pattern in FOLDER_PATTERNS.iter() {
        if let Some(id) = pattern.captures(link).and_then(|c| c.get(1)) {
            return Some(id.as_str().to_string());
        }
    }
    if link.len() > 20 && !link.contains('/') {
        return Some(link.to_string());
    }
    None
}

/// Lowercase, whitespace runs to '-', drop anything outside [a-z0-9-]
pub fn create_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&lowered, "-");
    NON_SLUG_RE.replace_all(&dashed, "").into_owned()
}

pub fn thumbnail_url(file_id: &str, width: u32) -> String {
    format!("https://drive.google.com/thumbnail?id={}&sz=w{}", file_id, width)
}

pub fn folder_link(folder_id: &str) -> String {
    format!("https://drive.google.com/drive/u/0/folders/{}", folder_id)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone.trim())
}

/// Field-level problems with a submission's contact details; empty when valid
pub fn contact_field_errors(name: &str, email: &str, phone: &str) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    if name.trim().is_empty() {
        errors.insert("clientName".to_string(), "Name is required".to_string());
    }
    if email.trim().is_empty() {
        errors.insert("clientEmail".to_string(), "Email is required".to_string());
    } else if !is_valid_email(email) {
        errors.insert("clientEmail".to_string(), "Please enter a valid email address".to_string());
    }
    if phone.trim().is_empty() {
        errors.insert("clientPhone".to_string(), "Phone is required".to_string());
    } else if !is_valid_phone(phone) {
        errors.insert("clientPhone".to_string(), "Please enter a valid phone number".to_string());
    }
    errors
}
