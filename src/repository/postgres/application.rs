//! PostgreSQL volunteer application store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{ApplicationFilter, ApplicationStatus, Page, PageRequest, VolunteerApplication};
use crate::repository::{ApplicationStore, RepositoryError, RepositoryResult};

const APPLICATION_COLUMNS: &str = r#"
    id, event_id, user_id, status, motivation, experience, skills,
    portfolio_url, is_verified, created_at, updated_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    status: String,
    motivation: String,
    experience: Option<String>,
    skills: Vec<String>,
    portfolio_url: Option<String>,
    is_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for VolunteerApplication {
    type Error = RepositoryError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| RepositoryError::InvalidRow(e.to_string()))?;

        Ok(VolunteerApplication {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            status,
            motivation: row.motivation,
            experience: row.experience,
            skills: row.skills,
            portfolio_url: row.portfolio_url,
            is_verified: row.is_verified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert_all(rows: Vec<ApplicationRow>) -> RepositoryResult<Vec<VolunteerApplication>> {
    rows.into_iter().map(VolunteerApplication::try_from).collect()
}

/// Application store backed by the `event_volunteers` table
#[derive(Debug, Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn create(&self, application: VolunteerApplication) -> RepositoryResult<VolunteerApplication> {
        let row: ApplicationRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO event_volunteers (
                id, event_id, user_id, status, motivation, experience, skills,
                portfolio_url, is_verified, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application.id)
        .bind(application.event_id)
        .bind(application.user_id)
        .bind(application.status.as_str())
        .bind(&application.motivation)
        .bind(&application.experience)
        .bind(&application.skills)
        .bind(&application.portfolio_url)
        .bind(application.is_verified)
        .bind(application.created_at)
        .bind(application.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM event_volunteers WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    async fn find_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> RepositoryResult<Option<VolunteerApplication>> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM event_volunteers WHERE event_id = $1 AND user_id = $2",
            APPLICATION_COLUMNS
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    async fn list_by_event(&self, event_id: Uuid) -> RepositoryResult<Vec<VolunteerApplication>> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM event_volunteers WHERE event_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn list(
        &self,
        filter: ApplicationFilter,
        page: PageRequest,
    ) -> RepositoryResult<Page<VolunteerApplication>> {
        const WHERE: &str = r#"
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
        "#;

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM event_volunteers {}", WHERE))
                .bind(filter.event_id)
                .bind(filter.user_id)
                .fetch_one(&self.pool)
                .await?;

        let rows: Vec<ApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM event_volunteers {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            APPLICATION_COLUMNS, WHERE
        ))
        .bind(filter.event_id)
        .bind(filter.user_id)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(convert_all(rows)?, total.max(0) as u64, page))
    }

    async fn update_status(
        &self,
        application_id: Uuid,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> RepositoryResult<Option<VolunteerApplication>> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE event_volunteers
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .bind(expected.as_str())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    async fn delete(&self, application_id: Uuid) -> RepositoryResult<Option<VolunteerApplication>> {
        let row: Option<ApplicationRow> = sqlx::query_as(&format!(
            "DELETE FROM event_volunteers WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VolunteerApplication::try_from).transpose()
    }

    async fn delete_by_event(&self, event_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM event_volunteers WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
