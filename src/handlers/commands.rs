//! Command definitions
//!
//! Commands represent intentions to change the system state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ApplicationPayload;

// =========================================================================
// RegisterVolunteerCommand
// =========================================================================

/// Command to apply as a volunteer for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterVolunteerCommand {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub payload: ApplicationPayload,
}

impl RegisterVolunteerCommand {
    pub fn new(event_id: Uuid, user_id: Uuid, payload: ApplicationPayload) -> Self {
        Self {
            event_id,
            user_id,
            payload,
        }
    }
}

// =========================================================================
// UpdateStatusCommand
// =========================================================================

/// Command to review an application. `status` is raw client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusCommand {
    pub application_id: Uuid,
    pub status: String,
}

impl UpdateStatusCommand {
    pub fn new(application_id: Uuid, status: impl Into<String>) -> Self {
        Self {
            application_id,
            status: status.into(),
        }
    }
}
