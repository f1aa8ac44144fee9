//! In-memory stores
//!
//! Same contracts as the PostgreSQL stores, kept behind a mutex per store.
//! Used by tests and for running the API without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{
    slugify, ApplicationFilter, ApplicationStatus, Category, CategoryDraft, Event, EventChanges,
    EventFilter, Faq, FaqDraft, FaqFilter, Page, PageRequest, VolunteerApplication,
};

use super::{
    AccessToken, AccessTokenStore, ApplicationStore, CategoryStore, EventRegistry, EventUpdate,
    FaqStore, RepositoryError, RepositoryResult, RosterInsert,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =========================================================================
// Events
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryEventRegistry {
    events: Mutex<HashMap<Uuid, Event>>,
}

impl InMemoryEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_taken(events: &HashMap<Uuid, Event>, slug: &str, except: Option<Uuid>) -> bool {
    events
        .values()
        .any(|e| e.slug == slug && Some(e.id) != except)
}

#[async_trait]
impl EventRegistry for InMemoryEventRegistry {
    async fn create(&self, event: Event) -> RepositoryResult<Event> {
        let mut events = lock(&self.events);
        if slug_taken(&events, &event.slug, None) {
            return Err(RepositoryError::UniqueViolation("events_slug_key".to_string()));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, event_id: Uuid) -> RepositoryResult<Option<Event>> {
        Ok(lock(&self.events).get(&event_id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> RepositoryResult<Option<Event>> {
        Ok(lock(&self.events).values().find(|e| e.slug == slug).cloned())
    }

    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepositoryResult<Page<Event>> {
        let mut matching: Vec<Event> = lock(&self.events)
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn update(&self, event_id: Uuid, changes: EventChanges) -> RepositoryResult<EventUpdate> {
        let mut events = lock(&self.events);

        if let Some(name) = &changes.name {
            if slug_taken(&events, &slugify(name), Some(event_id)) {
                return Err(RepositoryError::UniqueViolation("events_slug_key".to_string()));
            }
        }

        let Some(event) = events.get_mut(&event_id) else {
            return Ok(EventUpdate::NotFound);
        };

        if let Some(required) = changes.required_volunteers {
            if event.roster_size() > usize::try_from(required).unwrap_or(0) {
                return Ok(EventUpdate::RosterTooLarge {
                    current: event.roster_size(),
                });
            }
        }

        changes.apply_to(event);
        Ok(EventUpdate::Updated(event.clone()))
    }

    async fn delete(&self, event_id: Uuid) -> RepositoryResult<Option<Event>> {
        Ok(lock(&self.events).remove(&event_id))
    }

    async fn add_to_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<RosterInsert> {
        let mut events = lock(&self.events);
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(RosterInsert::NotFound);
        };

        if event.has_volunteer(user_id) {
            return Ok(RosterInsert::AlreadyPresent(event.clone()));
        }
        if event.is_full() {
            return Ok(RosterInsert::Full(event.clone()));
        }

        event.current_volunteers.push(user_id);
        event.updated_at = Utc::now();
        Ok(RosterInsert::Added(event.clone()))
    }

    async fn remove_from_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<Option<Event>> {
        let mut events = lock(&self.events);
        let Some(event) = events.get_mut(&event_id) else {
            return Ok(None);
        };

        event.current_volunteers.retain(|id| *id != user_id);
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }
}

// =========================================================================
// Volunteer applications
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryApplicationStore {
    applications: Mutex<HashMap<Uuid, VolunteerApplication>>,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut items: Vec<VolunteerApplication>) -> Vec<VolunteerApplication> {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn create(&self, application: VolunteerApplication) -> RepositoryResult<VolunteerApplication> {
        let mut applications = lock(&self.applications);
        let duplicate = applications
            .values()
            .any(|a| a.event_id == application.event_id && a.user_id == application.user_id);
        if duplicate {
            return Err(RepositoryError::UniqueViolation(
                "event_volunteers_event_user_key".to_string(),
            ));
        }
        applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_by_id(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>> {
        Ok(lock(&self.applications).get(&application_id).cloned())
    }

    async fn find_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepositoryResult<Option<VolunteerApplication>> {
        Ok(lock(&self.applications)
            .values()
            .find(|a| a.event_id == event_id && a.user_id == user_id)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepositoryResult<Vec<VolunteerApplication>> {
        let items = lock(&self.applications)
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(items))
    }

    async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<VolunteerApplication>> {
        let items = lock(&self.applications)
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        let items = Self::newest_first(items);

        let total = items.len() as u64;
        Ok(Page::new(page.slice(&items), total, page))
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> RepositoryResult<Option<VolunteerApplication>> {
        let mut applications = lock(&self.applications);
        match applications.get_mut(&application_id) {
            Some(application) if application.status == expected => {
                application.status = status;
                application.updated_at = Utc::now();
                Ok(Some(application.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>> {
        Ok(lock(&self.applications).remove(&application_id))
    }

    async fn delete_by_event(&self, event_id: Uuid) -> RepositoryResult<u64> {
        let mut applications = lock(&self.applications);
        let before = applications.len();
        applications.retain(|_, a| a.event_id != event_id);
        Ok((before - applications.len()) as u64)
    }
}

// =========================================================================
// Categories
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    categories: Mutex<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn create(&self, category: Category) -> RepositoryResult<Category> {
        lock(&self.categories).insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_by_id(&self, category_id: Uuid) -> RepositoryResult<Option<Category>> {
        Ok(lock(&self.categories).get(&category_id).cloned())
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> RepositoryResult<Page<Category>> {
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<Category> = lock(&self.categories)
            .values()
            .filter(|c| {
                needle
                    .as_deref()
                    .map_or(true, |n| c.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let total = matching.len() as u64;
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn update(&self, category_id: Uuid, draft: CategoryDraft) -> RepositoryResult<Option<Category>> {
        let mut categories = lock(&self.categories);
        let Some(category) = categories.get_mut(&category_id) else {
            return Ok(None);
        };
        category.name = draft.name;
        category.description = draft.description;
        category.image = draft.image;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, category_id: Uuid) -> RepositoryResult<Option<Category>> {
        Ok(lock(&self.categories).remove(&category_id))
    }
}

// =========================================================================
// FAQs
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryFaqStore {
    faqs: Mutex<HashMap<Uuid, Faq>>,
}

impl InMemoryFaqStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FaqStore for InMemoryFaqStore {
    async fn create(&self, faq: Faq) -> RepositoryResult<Faq> {
        lock(&self.faqs).insert(faq.id, faq.clone());
        Ok(faq)
    }

    async fn get_by_id(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>> {
        Ok(lock(&self.faqs).get(&faq_id).cloned())
    }

    async fn list(&self, filter: &FaqFilter, page: PageRequest) -> RepositoryResult<Page<Faq>> {
        let mut matching: Vec<Faq> = lock(&self.faqs)
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        Ok(Page::new(page.slice(&matching), total, page))
    }

    async fn update(&self, faq_id: Uuid, draft: FaqDraft) -> RepositoryResult<Option<Faq>> {
        let mut faqs = lock(&self.faqs);
        let Some(faq) = faqs.get_mut(&faq_id) else {
            return Ok(None);
        };
        faq.question = draft.question;
        faq.answer = draft.answer;
        faq.faq_type = draft.faq_type;
        faq.is_publish = draft.is_publish;
        faq.updated_at = Utc::now();
        Ok(Some(faq.clone()))
    }

    async fn delete(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>> {
        Ok(lock(&self.faqs).remove(&faq_id))
    }
}

// =========================================================================
// Access tokens
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryAccessTokenStore {
    tokens: Mutex<HashMap<String, AccessToken>>,
}

impl InMemoryAccessTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw bearer token
    pub fn insert(&self, raw_token: &str, token: AccessToken) {
        let hash = hex::encode(Sha256::digest(raw_token.as_bytes()));
        lock(&self.tokens).insert(hash, token);
    }
}

#[async_trait]
impl AccessTokenStore for InMemoryAccessTokenStore {
    async fn find_by_hash(&self, token_hash: &str) -> RepositoryResult<Option<AccessToken>> {
        Ok(lock(&self.tokens).get(token_hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::draft;
    use crate::domain::ApplicationPayload;

    fn payload() -> ApplicationPayload {
        ApplicationPayload {
            motivation: "Happy to help out on the day".to_string(),
            experience: None,
            skills: vec!["logistics".to_string()],
            portfolio_url: None,
        }
    }

    #[tokio::test]
    async fn test_add_to_roster_respects_capacity_and_membership() {
        let registry = InMemoryEventRegistry::new();
        let event = registry
            .create(draft("Food Drive", 1).into_event(Uuid::new_v4()))
            .await
            .unwrap();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(matches!(
            registry.add_to_roster(event.id, a).await.unwrap(),
            RosterInsert::Added(e) if e.current_volunteers == vec![a]
        ));
        assert!(matches!(
            registry.add_to_roster(event.id, a).await.unwrap(),
            RosterInsert::AlreadyPresent(_)
        ));
        assert!(matches!(
            registry.add_to_roster(event.id, b).await.unwrap(),
            RosterInsert::Full(_)
        ));
        assert_eq!(
            registry.add_to_roster(Uuid::new_v4(), b).await.unwrap(),
            RosterInsert::NotFound
        );
    }

    #[tokio::test]
    async fn test_remove_from_roster_is_idempotent() {
        let registry = InMemoryEventRegistry::new();
        let event = registry
            .create(draft("Food Drive", 2).into_event(Uuid::new_v4()))
            .await
            .unwrap();
        let user = Uuid::new_v4();
        registry.add_to_roster(event.id, user).await.unwrap();

        let after = registry.remove_from_roster(event.id, user).await.unwrap().unwrap();
        assert!(after.current_volunteers.is_empty());
        let again = registry.remove_from_roster(event.id, user).await.unwrap().unwrap();
        assert!(again.current_volunteers.is_empty());
        assert!(registry.remove_from_roster(Uuid::new_v4(), user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let registry = InMemoryEventRegistry::new();
        registry
            .create(draft("Same Name", 1).into_event(Uuid::new_v4()))
            .await
            .unwrap();
        let err = registry
            .create(draft("Same Name", 1).into_event(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_refuses_capacity_below_roster() {
        let registry = InMemoryEventRegistry::new();
        let event = registry
            .create(draft("Shrinking", 2).into_event(Uuid::new_v4()))
            .await
            .unwrap();
        registry.add_to_roster(event.id, Uuid::new_v4()).await.unwrap();
        registry.add_to_roster(event.id, Uuid::new_v4()).await.unwrap();

        let changes = EventChanges {
            required_volunteers: Some(1),
            ..Default::default()
        };
        assert_eq!(
            registry.update(event.id, changes).await.unwrap(),
            EventUpdate::RosterTooLarge { current: 2 }
        );
    }

    #[tokio::test]
    async fn test_application_unique_per_event_and_user() {
        let store = InMemoryApplicationStore::new();
        let (event_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        store
            .create(VolunteerApplication::submit(event_id, user_id, payload()))
            .await
            .unwrap();
        let err = store
            .create(VolunteerApplication::submit(event_id, user_id, payload()))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        store
            .create(VolunteerApplication::submit(Uuid::new_v4(), user_id, payload()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_status_compare_and_set() {
        let store = InMemoryApplicationStore::new();
        let application = store
            .create(VolunteerApplication::submit(Uuid::new_v4(), Uuid::new_v4(), payload()))
            .await
            .unwrap();

        let updated = store
            .update_status(application.id, ApplicationStatus::Pending, ApplicationStatus::Accepted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);

        let stale = store
            .update_status(application.id, ApplicationStatus::Pending, ApplicationStatus::Rejected)
            .await
            .unwrap();
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_event() {
        let store = InMemoryApplicationStore::new();
        let event_id = Uuid::new_v4();
        for _ in 0..3 {
            store
                .create(VolunteerApplication::submit(event_id, Uuid::new_v4(), payload()))
                .await
                .unwrap();
        }
        store
            .create(VolunteerApplication::submit(Uuid::new_v4(), Uuid::new_v4(), payload()))
            .await
            .unwrap();

        assert_eq!(store.delete_by_event(event_id).await.unwrap(), 3);
        let page = store
            .list(ApplicationFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_event_search_treats_wildcards_literally() {
        let registry = InMemoryEventRegistry::new();
        registry
            .create(draft("River Clean Up", 2).into_event(Uuid::new_v4()))
            .await
            .unwrap();
        registry
            .create(draft("100% Recycled Fair", 2).into_event(Uuid::new_v4()))
            .await
            .unwrap();

        let search = |s: &str| EventFilter {
            search: Some(s.to_string()),
            ..EventFilter::default()
        };
        let page = registry.list(&search("%"), PageRequest::default()).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].name, "100% Recycled Fair");

        let page = registry.list(&search("_"), PageRequest::default()).await.unwrap();
        assert_eq!(page.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_faq_crud_and_filter() {
        use crate::domain::FaqType;

        let store = InMemoryFaqStore::new();
        let member = store
            .create(
                FaqDraft {
                    question: "How do I apply?".to_string(),
                    answer: "Press apply on the event page.".to_string(),
                    faq_type: FaqType::Member,
                    is_publish: true,
                }
                .into_faq(),
            )
            .await
            .unwrap();
        store
            .create(
                FaqDraft {
                    question: "How do I publish an event?".to_string(),
                    answer: "Set isPublish when creating it.".to_string(),
                    faq_type: FaqType::Organizer,
                    is_publish: false,
                }
                .into_faq(),
            )
            .await
            .unwrap();

        let all = store.list(&FaqFilter::default(), PageRequest::default()).await.unwrap();
        assert_eq!(all.pagination.total, 2);

        let members = FaqFilter {
            faq_type: Some(FaqType::Member),
            ..FaqFilter::default()
        };
        let page = store.list(&members, PageRequest::default()).await.unwrap();
        assert_eq!(page.items, vec![member.clone()]);

        let updated = store
            .update(
                member.id,
                FaqDraft {
                    question: "How do I volunteer?".to_string(),
                    answer: member.answer.clone(),
                    faq_type: FaqType::Member,
                    is_publish: false,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.question, "How do I volunteer?");
        assert!(!updated.is_publish);

        assert_eq!(store.delete(member.id).await.unwrap().map(|f| f.id), Some(member.id));
        assert!(store.get_by_id(member.id).await.unwrap().is_none());
        assert!(store.delete(member.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_lookup_by_hash() {
        let store = InMemoryAccessTokenStore::new();
        let subject = Uuid::new_v4();
        store.insert(
            "secret-token",
            AccessToken {
                subject_id: subject,
                role: crate::domain::Role::Admin,
                is_active: true,
                expires_at: None,
            },
        );

        let hash = hex::encode(Sha256::digest(b"secret-token"));
        let found = store.find_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(found.subject_id, subject);
        assert!(store.find_by_hash("deadbeef").await.unwrap().is_none());
    }
}
