//! Operation Context
//!
//! Contains metadata about the current request for authorization and tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Caller, Capability};

/// Context for an authenticated operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Resolved caller identity
    pub caller: Caller,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    pub fn new(caller: Caller) -> Self {
        Self {
            caller,
            correlation_id: None,
        }
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.caller.can(capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let user_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();

        let context = OperationContext::new(Caller::Member(user_id))
            .with_correlation_id(correlation_id);

        assert_eq!(context.caller.id(), user_id);
        assert_eq!(context.correlation_id, Some(correlation_id));
        assert!(context.can(Capability::ApplyAsVolunteer));
    }
}
