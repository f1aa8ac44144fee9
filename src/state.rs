//! Application state
//!
//! Store handles shared by every request handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServiceSettings;
use crate::repository::memory::{
    InMemoryAccessTokenStore, InMemoryApplicationStore, InMemoryCategoryStore,
    InMemoryEventRegistry, InMemoryFaqStore,
};
use crate::repository::postgres::{
    PgAccessTokenStore, PgApplicationStore, PgCategoryStore, PgEventRegistry, PgFaqStore,
};
use crate::repository::{
    AccessTokenStore, ApplicationStore, CategoryStore, EventRegistry, FaqStore,
};

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRegistry>,
    pub applications: Arc<dyn ApplicationStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub faqs: Arc<dyn FaqStore>,
    pub tokens: Arc<dyn AccessTokenStore>,
    pub settings: ServiceSettings,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, settings: ServiceSettings) -> Self {
        Self {
            events: Arc::new(PgEventRegistry::new(pool.clone())),
            applications: Arc::new(PgApplicationStore::new(pool.clone())),
            categories: Arc::new(PgCategoryStore::new(pool.clone())),
            faqs: Arc::new(PgFaqStore::new(pool.clone())),
            tokens: Arc::new(PgAccessTokenStore::new(pool)),
            settings,
        }
    }

    /// State backed by in-memory stores; tokens are seeded through `tokens`
    pub fn in_memory(tokens: Arc<InMemoryAccessTokenStore>, settings: ServiceSettings) -> Self {
        Self {
            events: Arc::new(InMemoryEventRegistry::new()),
            applications: Arc::new(InMemoryApplicationStore::new()),
            categories: Arc::new(InMemoryCategoryStore::new()),
            faqs: Arc::new(InMemoryFaqStore::new()),
            tokens,
            settings,
        }
    }
}
