//! Repository module
//!
//! Store traits for events, volunteer applications, categories, FAQs and
//! access tokens, with a PostgreSQL backend and an in-memory backend.

mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ApplicationFilter, ApplicationStatus, Category, CategoryDraft, Event, EventChanges,
    EventFilter, Faq, FaqDraft, FaqFilter, Page, PageRequest, Role, VolunteerApplication,
};

pub use error::{RepositoryError, RepositoryResult};

/// Outcome of a conditional roster insert
#[derive(Debug, Clone, PartialEq)]
pub enum RosterInsert {
    /// User was added; carries the updated event
    Added(Event),
    /// User was already on the roster; nothing changed
    AlreadyPresent(Event),
    /// Roster is at capacity; nothing changed
    Full(Event),
    NotFound,
}

/// Outcome of an event update
#[derive(Debug, Clone, PartialEq)]
pub enum EventUpdate {
    Updated(Event),
    /// New capacity is below the current roster size
    RosterTooLarge { current: usize },
    NotFound,
}

/// Authoritative event state, including the roster.
///
/// Roster mutations are single atomic set operations on the stored event,
/// never read-modify-write of the whole record.
#[async_trait]
pub trait EventRegistry: Send + Sync {
    async fn create(&self, event: Event) -> RepositoryResult<Event>;

    async fn get_by_id(&self, event_id: Uuid) -> RepositoryResult<Option<Event>>;

    async fn get_by_slug(&self, slug: &str) -> RepositoryResult<Option<Event>>;

    /// Newest first
    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepositoryResult<Page<Event>>;

    /// Apply a partial update, refusing capacities below the roster size
    async fn update(&self, event_id: Uuid, changes: EventChanges) -> RepositoryResult<EventUpdate>;

    async fn delete(&self, event_id: Uuid) -> RepositoryResult<Option<Event>>;

    /// Insert `user_id` only if absent and the roster is below capacity
    async fn add_to_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<RosterInsert>;

    /// Remove `user_id`; idempotent when absent. `None` if the event is gone.
    async fn remove_from_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<Option<Event>>;
}

/// Persistence for volunteer applications. No business rules beyond the
/// unique (event, user) key.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Fails with `UniqueViolation` when (event, user) already has a record
    async fn create(&self, application: VolunteerApplication) -> RepositoryResult<VolunteerApplication>;

    async fn find_by_id(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>>;

    async fn find_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepositoryResult<Option<VolunteerApplication>>;

    /// Newest first
    async fn list_by_event(&self, event_id: Uuid) -> RepositoryResult<Vec<VolunteerApplication>>;

    /// Newest first
    async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<VolunteerApplication>>;

    /// Compare-and-set on the status. `None` if missing or `expected` no longer holds.
    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> RepositoryResult<Option<VolunteerApplication>>;

    async fn delete(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>>;

    async fn delete_by_event(&self, event_id: Uuid) -> RepositoryResult<u64>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create(&self, category: Category) -> RepositoryResult<Category>;

    async fn get_by_id(&self, category_id: Uuid) -> RepositoryResult<Option<Category>>;

    /// Ordered by name
    async fn list(&self, search: Option<&str>, page: PageRequest) -> RepositoryResult<Page<Category>>;

    async fn update(&self, category_id: Uuid, draft: CategoryDraft) -> RepositoryResult<Option<Category>>;

    async fn delete(&self, category_id: Uuid) -> RepositoryResult<Option<Category>>;
}

#[async_trait]
pub trait FaqStore: Send + Sync {
    async fn create(&self, faq: Faq) -> RepositoryResult<Faq>;

    async fn get_by_id(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>>;

    /// Newest first
    async fn list(&self, filter: &FaqFilter, page: PageRequest) -> RepositoryResult<Page<Faq>>;

    async fn update(&self, faq_id: Uuid, draft: FaqDraft) -> RepositoryResult<Option<Faq>>;

    async fn delete(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>>;
}

/// Stored access token, issued out of band
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub subject_id: Uuid,
    pub role: Role,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| expires > now)
    }
}

#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    /// Look up by hex SHA-256 of the bearer token
    async fn find_by_hash(&self, token_hash: &str) -> RepositoryResult<Option<AccessToken>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_access_token_usability() {
        let now = Utc::now();
        let token = AccessToken {
            subject_id: Uuid::new_v4(),
            role: Role::Member,
            is_active: true,
            expires_at: None,
        };
        assert!(token.is_usable_at(now));

        let expired = AccessToken {
            expires_at: Some(now - Duration::minutes(1)),
            ..token.clone()
        };
        assert!(!expired.is_usable_at(now));

        let disabled = AccessToken {
            is_active: false,
            ..token
        };
        assert!(!disabled.is_usable_at(now));
    }
}
