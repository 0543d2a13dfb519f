//! Shared handler state.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};

/// State injected into every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub auth_service: Arc<AuthService>,
    /// Prefix for returned short URLs, without trailing slash.
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        auth_service: Arc<AuthService>,
        public_base_url: &str,
    ) -> Self {
        Self {
            link_service,
            auth_service,
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }

    /// Public URL under which `key` is served.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
