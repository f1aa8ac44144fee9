//! FAQ Handler
//!
//! Anyone may read FAQs; only admins write them.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Capability, DomainError, Faq, FaqDraft, FaqFilter, OperationContext, Page, PageRequest};
use crate::error::AppError;
use crate::repository::FaqStore;
use crate::state::AppState;

use super::authorize;

pub struct FaqHandler {
    faqs: Arc<dyn FaqStore>,
}

impl FaqHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            faqs: state.faqs.clone(),
        }
    }

    pub async fn create(&self, draft: FaqDraft, context: &OperationContext) -> Result<Faq, AppError> {
        authorize(context, Capability::ManageFaqs)?;
        draft.validate()?;

        let faq = self.faqs.create(draft.into_faq()).await?;
        tracing::info!(faq_id = %faq.id, faq_type = %faq.faq_type, "FAQ created");

        Ok(faq)
    }

    pub async fn list(&self, filter: &FaqFilter, page: PageRequest) -> Result<Page<Faq>, AppError> {
        Ok(self.faqs.list(filter, page).await?)
    }

    pub async fn get(&self, faq_id: Uuid) -> Result<Faq, AppError> {
        self.faqs
            .get_by_id(faq_id)
            .await?
            .ok_or_else(|| DomainError::FaqNotFound(faq_id.to_string()).into())
    }

    pub async fn update(
        &self,
        faq_id: Uuid,
        draft: FaqDraft,
        context: &OperationContext,
    ) -> Result<Faq, AppError> {
        authorize(context, Capability::ManageFaqs)?;
        draft.validate()?;

        self.faqs
            .update(faq_id, draft)
            .await?
            .ok_or_else(|| DomainError::FaqNotFound(faq_id.to_string()).into())
    }

    pub async fn delete(&self, faq_id: Uuid, context: &OperationContext) -> Result<Faq, AppError> {
        authorize(context, Capability::ManageFaqs)?;

        self.faqs
            .delete(faq_id)
            .await?
            .ok_or_else(|| DomainError::FaqNotFound(faq_id.to_string()).into())
    }
}
