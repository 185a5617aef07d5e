// handlers/elevated/admin/mod.rs - Admin dashboard handlers

pub mod clients;     // /api/clients[/:id], /api/clients/:id/galleries
pub mod contacts;    // /api/contacts[/:id]
pub mod galleries;   // /api/galleries[/:id]
pub mod stats;       // GET /api/dashboard-stats
pub mod submissions; // GET /api/submissions/:email

pub use clients::{client_delete, client_galleries_put, client_put, clients_get, clients_post};
pub use contacts::{contact_delete, contacts_get};
pub use galleries::{galleries_get, galleries_post, gallery_delete, gallery_get};
pub use stats::dashboard_stats_get;
pub use submissions::submissions_get;

use serde::Deserialize;

use crate::database::PageQuery;
use crate::handlers::query_number;

/// `?page&limit&search` for admin lists
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn into_query(self, default_limit: u64) -> PageQuery {
        PageQuery::new(query_number(&self.page), query_number(&self.limit), self.search, default_limit)
    }
}
