//! Database module
//!
//! Connectivity and schema checks. Migrations live in `migrations/`.

use sqlx::PgPool;

/// Tables the server cannot run without
const REQUIRED_TABLES: &[&str] = &[
    "access_tokens",
    "categories",
    "events",
    "event_volunteers",
    "faqs",
];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for &table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    // The roster capacity guard is a table constraint; refuse to start without it
    let has_capacity_check: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM pg_constraint
            WHERE conname = 'roster_within_capacity'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !has_capacity_check {
        tracing::error!("Constraint 'roster_within_capacity' is missing on events");
        return Ok(false);
    }

    tracing::info!("Database schema verified");
    Ok(true)
}
