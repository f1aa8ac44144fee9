//! PostgreSQL FAQ store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::contains_pattern;
use crate::domain::{Faq, FaqDraft, FaqFilter, Page, PageRequest};
use crate::repository::{FaqStore, RepositoryError, RepositoryResult};

const FAQ_COLUMNS: &str = "id, question, answer, faq_type, is_publish, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct FaqRow {
    id: Uuid,
    question: String,
    answer: String,
    faq_type: String,
    is_publish: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FaqRow> for Faq {
    type Error = RepositoryError;

    fn try_from(row: FaqRow) -> Result<Self, Self::Error> {
        let faq_type = row
            .faq_type
            .parse()
            .map_err(|_| RepositoryError::InvalidRow(format!("faq type '{}'", row.faq_type)))?;

        Ok(Faq {
            id: row.id,
            question: row.question,
            answer: row.answer,
            faq_type,
            is_publish: row.is_publish,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert(row: Option<FaqRow>) -> RepositoryResult<Option<Faq>> {
    row.map(Faq::try_from).transpose()
}

#[derive(Debug, Clone)]
pub struct PgFaqStore {
    pool: PgPool,
}

impl PgFaqStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FaqStore for PgFaqStore {
    async fn create(&self, faq: Faq) -> RepositoryResult<Faq> {
        let row: FaqRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO faqs ({})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FAQ_COLUMNS, FAQ_COLUMNS
        ))
        .bind(faq.id)
        .bind(&faq.question)
        .bind(&faq.answer)
        .bind(faq.faq_type.as_str())
        .bind(faq.is_publish)
        .bind(faq.created_at)
        .bind(faq.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_by_id(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>> {
        let row: Option<FaqRow> =
            sqlx::query_as(&format!("SELECT {} FROM faqs WHERE id = $1", FAQ_COLUMNS))
                .bind(faq_id)
                .fetch_optional(&self.pool)
                .await?;

        convert(row)
    }

    async fn list(&self, filter: &FaqFilter, page: PageRequest) -> RepositoryResult<Page<Faq>> {
        const WHERE: &str = r#"
            WHERE ($1::text IS NULL OR question ILIKE $1 OR answer ILIKE $1)
              AND ($2::text IS NULL OR faq_type = $2)
              AND ($3::boolean IS NULL OR is_publish = $3)
        "#;
        let search = contains_pattern(filter.search.as_deref());
        let faq_type = filter.faq_type.map(|t| t.as_str());

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM faqs {}", WHERE))
            .bind(&search)
            .bind(faq_type)
            .bind(filter.is_publish)
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<FaqRow> = sqlx::query_as(&format!(
            "SELECT {} FROM faqs {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
            FAQ_COLUMNS, WHERE
        ))
        .bind(&search)
        .bind(faq_type)
        .bind(filter.is_publish)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(Faq::try_from)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn update(&self, faq_id: Uuid, draft: FaqDraft) -> RepositoryResult<Option<Faq>> {
        let row: Option<FaqRow> = sqlx::query_as(&format!(
            r#"
            UPDATE faqs
            SET question = $2, answer = $3, faq_type = $4, is_publish = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FAQ_COLUMNS
        ))
        .bind(faq_id)
        .bind(&draft.question)
        .bind(&draft.answer)
        .bind(draft.faq_type.as_str())
        .bind(draft.is_publish)
        .fetch_optional(&self.pool)
        .await?;

        convert(row)
    }

    async fn delete(&self, faq_id: Uuid) -> RepositoryResult<Option<Faq>> {
        let row: Option<FaqRow> = sqlx::query_as(&format!(
            "DELETE FROM faqs WHERE id = $1 RETURNING {}",
            FAQ_COLUMNS
        ))
        .bind(faq_id)
        .fetch_optional(&self.pool)
        .await?;

        convert(row)
    }
}
