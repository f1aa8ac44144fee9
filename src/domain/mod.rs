//! Domain module
//!
//! Core domain types and business rules.

pub mod application;
pub mod caller;
pub mod category;
pub mod context;
pub mod error;
pub mod event;
pub mod faq;
pub mod pagination;

pub use application::{
    ApplicationFilter, ApplicationPayload, ApplicationStatus, StatusPolicy, VolunteerApplication,
};
pub use caller::{Caller, Capability, Role};
pub use category::{Category, CategoryDraft};
pub use context::OperationContext;
pub use error::DomainError;
pub use event::{slugify, Event, EventChanges, EventDraft, EventFilter, Location};
pub use faq::{Faq, FaqDraft, FaqFilter, FaqType};
pub use pagination::{Page, PageRequest, Pagination};
