//! Category Handler

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Capability, Category, CategoryDraft, DomainError, OperationContext, Page, PageRequest};
use crate::error::AppError;
use crate::repository::CategoryStore;
use crate::state::AppState;

use super::authorize;

pub struct CategoryHandler {
    categories: Arc<dyn CategoryStore>,
}

impl CategoryHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            categories: state.categories.clone(),
        }
    }

    pub async fn create(&self, draft: CategoryDraft, context: &OperationContext) -> Result<Category, AppError> {
        authorize(context, Capability::ManageCategories)?;
        draft.validate()?;

        Ok(self.categories.create(draft.into_category()).await?)
    }

    pub async fn list(&self, search: Option<&str>, page: PageRequest) -> Result<Page<Category>, AppError> {
        Ok(self.categories.list(search, page).await?)
    }

    pub async fn get(&self, category_id: Uuid) -> Result<Category, AppError> {
        self.categories
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()).into())
    }

    pub async fn update(
        &self,
        category_id: Uuid,
        draft: CategoryDraft,
        context: &OperationContext,
    ) -> Result<Category, AppError> {
        authorize(context, Capability::ManageCategories)?;
        draft.validate()?;

        self.categories
            .update(category_id, draft)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()).into())
    }

    pub async fn delete(&self, category_id: Uuid, context: &OperationContext) -> Result<Category, AppError> {
        authorize(context, Capability::ManageCategories)?;

        self.categories
            .delete(category_id)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()).into())
    }
}
