//! Event Handler
//!
//! Organizer-facing event management and public browsing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Capability, DomainError, Event, EventChanges, EventDraft, EventFilter, OperationContext, Page,
    PageRequest,
};
use crate::error::AppError;
use crate::repository::{ApplicationStore, CategoryStore, EventRegistry, EventUpdate, RepositoryError};
use crate::state::AppState;

use super::authorize;
use super::registration_handler::ensure_owner;

pub struct EventHandler {
    events: Arc<dyn EventRegistry>,
    applications: Arc<dyn ApplicationStore>,
    categories: Arc<dyn CategoryStore>,
}

impl EventHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            events: state.events.clone(),
            applications: state.applications.clone(),
            categories: state.categories.clone(),
        }
    }

    /// Create an event owned by the caller
    pub async fn create(&self, draft: EventDraft, context: &OperationContext) -> Result<Event, AppError> {
        authorize(context, Capability::ManageEvents)?;
        draft.validate()?;
        self.ensure_category(draft.category).await?;

        let event = draft.into_event(context.caller.id());
        let slug = event.slug.clone();
        let created = self
            .events
            .create(event)
            .await
            .map_err(|e| slug_conflict(e, &slug))?;

        tracing::info!(
            event_id = %created.id,
            created_by = %created.created_by,
            required_volunteers = created.required_volunteers,
            "Event created"
        );

        Ok(created)
    }

    pub async fn list(&self, filter: &EventFilter, page: PageRequest) -> Result<Page<Event>, AppError> {
        Ok(self.events.list(filter, page).await?)
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Event, AppError> {
        self.events
            .get_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()).into())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Event, AppError> {
        self.events
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(slug.to_string()).into())
    }

    /// Partial update; the roster itself is never touched here
    pub async fn update(
        &self,
        event_id: Uuid,
        changes: EventChanges,
        context: &OperationContext,
    ) -> Result<Event, AppError> {
        authorize(context, Capability::ManageEvents)?;

        let event = self.get(event_id).await?;
        ensure_owner(&event, context)?;
        changes.validate_against(&event)?;
        if let Some(category) = changes.category {
            self.ensure_category(category).await?;
        }

        let requested = changes.required_volunteers;
        let slug = changes.name.as_deref().map(crate::domain::slugify).unwrap_or_default();

        match self
            .events
            .update(event_id, changes)
            .await
            .map_err(|e| slug_conflict(e, &slug))?
        {
            EventUpdate::Updated(event) => Ok(event),
            EventUpdate::RosterTooLarge { current } => Err(DomainError::CapacityBelowRoster {
                requested: requested.unwrap_or(event.required_volunteers),
                current,
            }
            .into()),
            EventUpdate::NotFound => Err(DomainError::EventNotFound(event_id.to_string()).into()),
        }
    }

    /// Delete an event together with its applications
    pub async fn delete(&self, event_id: Uuid, context: &OperationContext) -> Result<Event, AppError> {
        authorize(context, Capability::ManageEvents)?;

        let event = self.get(event_id).await?;
        ensure_owner(&event, context)?;

        let removed = self.applications.delete_by_event(event_id).await?;
        let deleted = self
            .events
            .delete(event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()))?;

        tracing::info!(
            event_id = %event_id,
            applications_removed = removed,
            "Event deleted"
        );

        Ok(deleted)
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<(), AppError> {
        if self.categories.get_by_id(category_id).await?.is_none() {
            return Err(DomainError::validation(format!("category {} does not exist", category_id)).into());
        }
        Ok(())
    }
}

fn slug_conflict(err: RepositoryError, slug: &str) -> AppError {
    if err.is_unique_violation() {
        DomainError::SlugTaken(slug.to_string()).into()
    } else {
        err.into()
    }
}
