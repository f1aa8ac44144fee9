//! PostgreSQL event registry
//!
//! The roster is a `UUID[]` column. Inserts go through a single conditional
//! `UPDATE` so the capacity check and the write are one statement; the
//! `roster_within_capacity` check constraint backs it up.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{slugify, Event, EventChanges, EventFilter, Location, Page, PageRequest};
use super::contains_pattern;
use crate::repository::{
    EventRegistry, EventUpdate, RepositoryError, RepositoryResult, RosterInsert,
};

const EVENT_COLUMNS: &str = r#"
    id, name, slug, description, start_date, end_date, image, category,
    is_online, is_publish, is_featured, location_region, location_address,
    required_volunteers, current_volunteers, requirements, benefits, tags,
    created_by, created_at, updated_at
"#;

const MAX_ROSTER_RETRIES: u32 = 3;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    image: String,
    category: Uuid,
    is_online: bool,
    is_publish: bool,
    is_featured: bool,
    location_region: i64,
    location_address: String,
    required_volunteers: i32,
    current_volunteers: Vec<Uuid>,
    requirements: String,
    benefits: Option<String>,
    tags: Vec<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            image: row.image,
            category: row.category,
            is_online: row.is_online,
            is_publish: row.is_publish,
            is_featured: row.is_featured,
            location: Location {
                region: row.location_region,
                address: row.location_address,
            },
            required_volunteers: row.required_volunteers,
            current_volunteers: row.current_volunteers,
            requirements: row.requirements,
            benefits: row.benefits,
            tags: row.tags,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Event registry backed by the `events` table
#[derive(Debug, Clone)]
pub struct PgEventRegistry {
    pool: PgPool,
}

impl PgEventRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Single attempt at the conditional insert
    async fn try_add_to_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            r#"
            UPDATE events
            SET current_volunteers = array_append(current_volunteers, $2),
                updated_at = NOW()
            WHERE id = $1
              AND NOT ($2 = ANY(current_volunteers))
              AND cardinality(current_volunteers) < required_volunteers
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }
}

#[async_trait]
impl EventRegistry for PgEventRegistry {
    async fn create(&self, event: Event) -> RepositoryResult<Event> {
        let row: EventRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO events (
                id, name, slug, description, start_date, end_date, image, category,
                is_online, is_publish, is_featured, location_region, location_address,
                required_volunteers, current_volunteers, requirements, benefits, tags,
                created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.image)
        .bind(event.category)
        .bind(event.is_online)
        .bind(event.is_publish)
        .bind(event.is_featured)
        .bind(event.location.region)
        .bind(&event.location.address)
        .bind(event.required_volunteers)
        .bind(&event.current_volunteers)
        .bind(&event.requirements)
        .bind(&event.benefits)
        .bind(&event.tags)
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, event_id: Uuid) -> RepositoryResult<Option<Event>> {
        let row: Option<EventRow> =
            sqlx::query_as(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
                .bind(event_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Event::from))
    }

    async fn get_by_slug(&self, slug: &str) -> RepositoryResult<Option<Event>> {
        let row: Option<EventRow> =
            sqlx::query_as(&format!("SELECT {} FROM events WHERE slug = $1", EVENT_COLUMNS))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Event::from))
    }

    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepositoryResult<Page<Event>> {
        let search = contains_pattern(filter.search.as_deref());
        const WHERE: &str = r#"
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::uuid IS NULL OR category = $2)
              AND ($3::boolean IS NULL OR is_online = $3)
              AND ($4::boolean IS NULL OR is_publish = $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM events {}", WHERE))
            .bind(&search)
            .bind(filter.category)
            .bind(filter.is_online)
            .bind(filter.is_publish)
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {} FROM events {} ORDER BY created_at DESC LIMIT $5 OFFSET $6",
            EVENT_COLUMNS, WHERE
        ))
        .bind(&search)
        .bind(filter.category)
        .bind(filter.is_online)
        .bind(filter.is_publish)
        .bind(i64::from(page.limit))
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let items = rows.into_iter().map(Event::from).collect();
        Ok(Page::new(items, total.max(0) as u64, page))
    }

    async fn update(&self, event_id: Uuid, changes: EventChanges) -> RepositoryResult<EventUpdate> {
        let slug = changes.name.as_deref().map(slugify);
        let (region, address) = match changes.location {
            Some(location) => (Some(location.region), Some(location.address)),
            None => (None, None),
        };

        let row: Option<EventRow> = sqlx::query_as(&format!(
            r#"
            UPDATE events SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                image = COALESCE($7, image),
                category = COALESCE($8, category),
                is_online = COALESCE($9, is_online),
                is_publish = COALESCE($10, is_publish),
                is_featured = COALESCE($11, is_featured),
                location_region = COALESCE($12, location_region),
                location_address = COALESCE($13, location_address),
                required_volunteers = COALESCE($14, required_volunteers),
                requirements = COALESCE($15, requirements),
                benefits = COALESCE($16, benefits),
                tags = COALESCE($17, tags),
                updated_at = NOW()
            WHERE id = $1
              AND cardinality(current_volunteers) <= COALESCE($14, required_volunteers)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(changes.name)
        .bind(slug)
        .bind(changes.description)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.image)
        .bind(changes.category)
        .bind(changes.is_online)
        .bind(changes.is_publish)
        .bind(changes.is_featured)
        .bind(region)
        .bind(address)
        .bind(changes.required_volunteers)
        .bind(changes.requirements)
        .bind(changes.benefits)
        .bind(changes.tags)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(EventUpdate::Updated(row.into()));
        }

        // No row matched: either gone, or the capacity guard refused it
        Ok(match self.get_by_id(event_id).await? {
            Some(event) => EventUpdate::RosterTooLarge {
                current: event.roster_size(),
            },
            None => EventUpdate::NotFound,
        })
    }

    async fn delete(&self, event_id: Uuid) -> RepositoryResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            "DELETE FROM events WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    async fn add_to_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<RosterInsert> {
        for attempt in 0..MAX_ROSTER_RETRIES {
            if let Some(event) = self.try_add_to_roster(event_id, user_id).await? {
                return Ok(RosterInsert::Added(event));
            }

            // The update matched nothing; find out why
            let Some(event) = self.get_by_id(event_id).await? else {
                return Ok(RosterInsert::NotFound);
            };
            if event.has_volunteer(user_id) {
                return Ok(RosterInsert::AlreadyPresent(event));
            }
            if event.is_full() {
                return Ok(RosterInsert::Full(event));
            }

            // A concurrent removal freed a seat between the two statements
            tracing::warn!(
                event_id = %event_id,
                user_id = %user_id,
                "Roster changed during insert, retrying (attempt {}/{})",
                attempt + 1,
                MAX_ROSTER_RETRIES
            );
            tokio::time::sleep(Duration::from_millis(10 * (attempt as u64 + 1))).await;
        }

        Err(RepositoryError::MaxRetriesExceeded)
    }

    async fn remove_from_roster(&self, event_id: Uuid, user_id: Uuid) -> RepositoryResult<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(&format!(
            r#"
            UPDATE events
            SET current_volunteers = array_remove(current_volunteers, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }
}
