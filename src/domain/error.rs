//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;
use uuid::Uuid;

use super::ApplicationStatus;

/// Domain-specific errors
///
/// These errors represent business rule violations and domain invariant failures.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or missing input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Event does not exist
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// Volunteer application does not exist
    #[error("Event volunteer not found: {0}")]
    ApplicationNotFound(String),

    /// Category does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// FAQ entry does not exist
    #[error("FAQ not found: {0}")]
    FaqNotFound(String),

    /// Roster already holds `required` volunteers
    #[error("Event is full: {current} of {required} volunteers registered")]
    CapacityExceeded { current: usize, required: i32 },

    /// User already applied to this event
    #[error("You are already registered for event {event_id}")]
    DuplicateRegistration { event_id: Uuid },

    /// Status change not allowed by the active lifecycle policy
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Capacity update would leave the roster over capacity
    #[error("Cannot set required volunteers to {requested}: {current} already registered")]
    CapacityBelowRoster { requested: i32, current: usize },

    /// Another event already uses this slug
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    /// Status changed between read and write
    #[error("Status of event volunteer {0} was changed concurrently")]
    StatusConflict(Uuid),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exceeded_error() {
        let err = DomainError::CapacityExceeded {
            current: 3,
            required: 3,
        };

        assert_eq!(
            err.to_string(),
            "Event is full: 3 of 3 volunteers registered"
        );
    }

    #[test]
    fn test_duplicate_registration_error() {
        let event_id = Uuid::new_v4();
        let err = DomainError::DuplicateRegistration { event_id };

        assert!(err.to_string().contains(&event_id.to_string()));
    }

    #[test]
    fn test_validation_helper() {
        assert_eq!(
            DomainError::validation("skills must contain at least 1 item"),
            DomainError::Validation("skills must contain at least 1 item".to_string())
        );
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = DomainError::InvalidTransition {
            from: ApplicationStatus::Accepted,
            to: ApplicationStatus::Rejected,
        };

        assert_eq!(err.to_string(), "Cannot change status from accepted to rejected");
    }
}
