//! Command Handlers module
//!
//! Handlers orchestrate business operations over the stores and enforce
//! caller capabilities.

mod category_handler;
mod commands;
mod event_handler;
mod faq_handler;
mod registration_handler;


pub use category_handler::CategoryHandler;
pub use commands::*;
pub use event_handler::EventHandler;
pub use faq_handler::FaqHandler;
pub use registration_handler::RegistrationHandler;

use crate::domain::{Capability, OperationContext};
use crate::error::AppError;

/// Fail with 403 unless the caller holds `capability`
pub(crate) fn authorize(context: &OperationContext, capability: Capability) -> Result<(), AppError> {
    if context.can(capability) {
        return Ok(());
    }
    Err(AppError::forbidden(format!(
        "{} is not allowed to perform {:?}",
        context.caller.role(),
        capability
    )))
}
