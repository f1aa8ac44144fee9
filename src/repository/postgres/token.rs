//! PostgreSQL access token lookup

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Role;
use crate::repository::{AccessToken, AccessTokenStore, RepositoryError, RepositoryResult};

#[derive(Debug, Clone)]
pub struct PgAccessTokenStore {
    pool: PgPool,
}

impl PgAccessTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenStore for PgAccessTokenStore {
    async fn find_by_hash(&self, token_hash: &str) -> RepositoryResult<Option<AccessToken>> {
        let record: Option<(Uuid, String, bool, Option<DateTime<Utc>>)> = sqlx::query_as(
            r#"
            SELECT subject_id, role, is_active, expires_at
            FROM access_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        let Some((subject_id, role, is_active, expires_at)) = record else {
            return Ok(None);
        };

        let role = role.parse::<Role>().map_err(RepositoryError::InvalidRow)?;

        Ok(Some(AccessToken {
            subject_id,
            role,
            is_active,
            expires_at,
        }))
    }
}
