//! Volunteer Registration Handler
//!
//! Records volunteer applications while keeping two invariants:
//! an event roster never exceeds `required_volunteers`, and a user holds at
//! most one application per event. The roster insert is the authoritative
//! step; the reads before it only produce friendlier errors.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    ApplicationFilter, ApplicationStatus, Capability, DomainError, Event, OperationContext, Page,
    PageRequest, StatusPolicy, VolunteerApplication,
};
use crate::error::AppError;
use crate::repository::{ApplicationStore, EventRegistry, RosterInsert};
use crate::state::AppState;

use super::{authorize, RegisterVolunteerCommand, UpdateStatusCommand};

/// Handler for the event-volunteer workflow
pub struct RegistrationHandler {
    events: Arc<dyn EventRegistry>,
    applications: Arc<dyn ApplicationStore>,
    policy: StatusPolicy,
}

impl RegistrationHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            events: state.events.clone(),
            applications: state.applications.clone(),
            policy: state.settings.status_policy,
        }
    }

    // =========================================================================
    // register
    // =========================================================================

    /// Apply to an event. Returns the created `pending` application.
    pub async fn register(
        &self,
        command: RegisterVolunteerCommand,
        context: &OperationContext,
    ) -> Result<VolunteerApplication, AppError> {
        authorize(context, Capability::ApplyAsVolunteer)?;
        if command.user_id != context.caller.id() {
            return Err(AppError::forbidden("Cannot apply on behalf of another user"));
        }

        command.payload.validate()?;

        let RegisterVolunteerCommand {
            event_id,
            user_id,
            payload,
        } = command;

        let event = self.load_event(event_id).await?;

        if event.is_full() {
            return Err(capacity_exceeded(&event).into());
        }

        if self
            .applications
            .find_by_event_and_user(event_id, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateRegistration { event_id }.into());
        }

        match self.events.add_to_roster(event_id, user_id).await? {
            RosterInsert::Added(_) => {}
            RosterInsert::AlreadyPresent(_) => {
                return Err(DomainError::DuplicateRegistration { event_id }.into());
            }
            RosterInsert::Full(event) => return Err(capacity_exceeded(&event).into()),
            RosterInsert::NotFound => {
                return Err(DomainError::EventNotFound(event_id.to_string()).into());
            }
        }

        let application = VolunteerApplication::submit(event_id, user_id, payload);
        let created = match self.applications.create(application).await {
            Ok(created) => created,
            Err(err) => {
                // Undo the seat taken above before reporting
                self.release_seat(event_id, user_id).await;
                if err.is_unique_violation() {
                    return Err(DomainError::DuplicateRegistration { event_id }.into());
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            event_id = %event_id,
            user_id = %user_id,
            application_id = %created.id,
            correlation_id = ?context.correlation_id,
            "Volunteer registered"
        );

        Ok(created)
    }

    // =========================================================================
    // unregister
    // =========================================================================

    /// Delete an application and free its roster seat. Returns the deleted record.
    pub async fn unregister(
        &self,
        application_id: Uuid,
        context: &OperationContext,
    ) -> Result<VolunteerApplication, AppError> {
        authorize(context, Capability::DeleteApplication)?;

        let application = self.load_application(application_id).await?;

        if self
            .events
            .remove_from_roster(application.event_id, application.user_id)
            .await?
            .is_none()
        {
            tracing::warn!(
                event_id = %application.event_id,
                application_id = %application_id,
                "Event already gone while removing volunteer"
            );
        }

        let deleted = self
            .applications
            .delete(application_id)
            .await?
            .ok_or_else(|| DomainError::ApplicationNotFound(application_id.to_string()))?;

        tracing::info!(
            event_id = %deleted.event_id,
            user_id = %deleted.user_id,
            application_id = %application_id,
            "Volunteer application deleted"
        );

        Ok(deleted)
    }

    // =========================================================================
    // update_status
    // =========================================================================

    /// Review an application. Roster membership is not affected.
    pub async fn update_status(
        &self,
        command: UpdateStatusCommand,
        context: &OperationContext,
    ) -> Result<VolunteerApplication, AppError> {
        authorize(context, Capability::ReviewApplications)?;

        let status: ApplicationStatus = command.status.parse()?;
        let application = self.load_application(command.application_id).await?;

        let event = self.load_event(application.event_id).await?;
        ensure_owner(&event, context)?;

        self.policy.check(application.status, status)?;

        match self
            .applications
            .update_status(application.id, application.status, status)
            .await?
        {
            Some(updated) => {
                tracing::info!(
                    application_id = %updated.id,
                    from = %application.status,
                    to = %updated.status,
                    "Volunteer application reviewed"
                );
                Ok(updated)
            }
            None => {
                // Either deleted or re-reviewed since we read it
                self.load_application(application.id).await?;
                Err(DomainError::StatusConflict(application.id).into())
            }
        }
    }

    // =========================================================================
    // queries
    // =========================================================================

    /// Applications for one event, newest first
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        context: &OperationContext,
    ) -> Result<Vec<VolunteerApplication>, AppError> {
        authorize(context, Capability::ReviewApplications)?;

        let event = self.load_event(event_id).await?;
        ensure_owner(&event, context)?;

        Ok(self.applications.list_by_event(event_id).await?)
    }

    /// All applications, optionally filtered, newest first
    pub async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
        context: &OperationContext,
    ) -> Result<Page<VolunteerApplication>, AppError> {
        authorize(context, Capability::ListAllApplications)?;

        Ok(self.applications.list(filter, page).await?)
    }

    async fn load_event(&self, event_id: Uuid) -> Result<Event, AppError> {
        self.events
            .get_by_id(event_id)
            .await?
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()).into())
    }

    async fn load_application(&self, application_id: Uuid) -> Result<VolunteerApplication, AppError> {
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| DomainError::ApplicationNotFound(application_id.to_string()).into())
    }

    async fn release_seat(&self, event_id: Uuid, user_id: Uuid) {
        if let Err(e) = self.events.remove_from_roster(event_id, user_id).await {
            tracing::error!(
                event_id = %event_id,
                user_id = %user_id,
                "Failed to release roster seat after rejected application: {}",
                e
            );
        }
    }
}

fn capacity_exceeded(event: &Event) -> DomainError {
    DomainError::CapacityExceeded {
        current: event.roster_size(),
        required: event.required_volunteers,
    }
}

pub(crate) fn ensure_owner(event: &Event, context: &OperationContext) -> Result<(), AppError> {
    if context.caller.owns_or_admin(event.created_by) {
        Ok(())
    } else {
        Err(AppError::forbidden("Event belongs to another organizer"))
    }
}
