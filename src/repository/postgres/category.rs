//! PostgreSQL category store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::contains_pattern;
use crate::domain::{Category, CategoryDraft, Page, PageRequest};
use crate::repository::{CategoryStore, RepositoryResult};

type CategoryRow = (Uuid, String, String, String, DateTime<Utc>, DateTime<Utc>);

fn to_category(row: CategoryRow) -> Category {
    let (id, name, description, image, created_at, updated_at) = row;
    Category {
        id,
        name,
        description,
        image,
        created_at,
        updated_at,
    }
}

#[derive(Debug, Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn create(&self, category: Category) -> RepositoryResult<Category> {
        let row: CategoryRow = sqlx::query_as(
            r#"
            INSERT INTO categories (id, name, description, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, image, created_at, updated_at
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.created_at)
        .bind(category.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(to_category(row))
    }

    async fn get_by_id(&self, category_id: Uuid) -> RepositoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            "SELECT id, name, description, image, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_category))
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> RepositoryResult<Page<Category>> {
        let search = contains_pattern(search);
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM categories WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, image, created_at, updated_at
            FROM categories
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows.into_iter().map(to_category).collect();
        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn update(&self, category_id: Uuid, draft: CategoryDraft) -> RepositoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categories
            SET name = $2, description = $3, image = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, image, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_category))
    }

    async fn delete(&self, category_id: Uuid) -> RepositoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            DELETE FROM categories WHERE id = $1
            RETURNING id, name, description, image, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_category))
    }
}
