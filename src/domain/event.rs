//! Event
//!
//! Volunteer events, their capacity and roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

const MAX_NAME_LEN: usize = 100;
const MIN_DESCRIPTION_LEN: usize = 20;
const MAX_TAG_LEN: usize = 30;

/// Where an event takes place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub region: i64,
    pub address: String,
}

/// Event record including its volunteer roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub image: String,
    pub category: Uuid,
    pub is_online: bool,
    pub is_publish: bool,
    pub is_featured: bool,
    pub location: Location,
    pub required_volunteers: i32,
    pub current_volunteers: Vec<Uuid>,
    pub requirements: String,
    pub benefits: Option<String>,
    pub tags: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn roster_size(&self) -> usize {
        self.current_volunteers.len()
    }

    pub fn is_full(&self) -> bool {
        self.roster_size() >= capacity(self.required_volunteers)
    }

    pub fn has_volunteer(&self, user_id: Uuid) -> bool {
        self.current_volunteers.contains(&user_id)
    }
}

fn capacity(required: i32) -> usize {
    usize::try_from(required).unwrap_or(0)
}

/// Derive a slug from an event name
pub fn slugify(name: &str) -> String {
    name.split(' ').collect::<Vec<_>>().join("-").to_lowercase()
}

// =========================================================================
// EventDraft
// =========================================================================

/// Organizer input for a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub image: String,
    pub category: Uuid,
    pub is_online: bool,
    pub is_publish: bool,
    pub is_featured: bool,
    pub location: Location,
    pub required_volunteers: i32,
    pub requirements: String,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_description(&self.description)?;
        validate_dates(self.start_date, self.end_date)?;
        require("image", &self.image)?;
        require("location.address", &self.location.address)?;
        validate_required_volunteers(self.required_volunteers)?;
        require("requirements", &self.requirements)?;
        validate_tags(&self.tags)
    }

    /// Turn a validated draft into an event with an empty roster
    pub fn into_event(self, created_by: Uuid) -> Event {
        let now = Utc::now();
        let slug = match self.slug {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => slugify(&self.name),
        };

        Event {
            id: Uuid::new_v4(),
            name: self.name,
            slug,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            image: self.image,
            category: self.category,
            is_online: self.is_online,
            is_publish: self.is_publish,
            is_featured: self.is_featured,
            location: self.location,
            required_volunteers: self.required_volunteers,
            current_volunteers: Vec::new(),
            requirements: self.requirements,
            benefits: self.benefits,
            tags: self.tags,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

// =========================================================================
// EventChanges
// =========================================================================

/// Partial update of an event. The roster is never part of an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub category: Option<Uuid>,
    pub is_online: Option<bool>,
    pub is_publish: Option<bool>,
    pub is_featured: Option<bool>,
    pub location: Option<Location>,
    pub required_volunteers: Option<i32>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EventChanges {
    /// Validate the fields present, against the event they will be applied to
    pub fn validate_against(&self, event: &Event) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_dates(
            self.start_date.unwrap_or(event.start_date),
            self.end_date.unwrap_or(event.end_date),
        )?;
        if let Some(image) = &self.image {
            require("image", image)?;
        }
        if let Some(location) = &self.location {
            require("location.address", &location.address)?;
        }
        if let Some(required) = self.required_volunteers {
            validate_required_volunteers(required)?;
            if event.roster_size() > capacity(required) {
                return Err(DomainError::CapacityBelowRoster {
                    requested: required,
                    current: event.roster_size(),
                });
            }
        }
        if let Some(requirements) = &self.requirements {
            require("requirements", requirements)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }

    /// Apply to an event in place. Slug follows the name.
    pub fn apply_to(self, event: &mut Event) {
        if let Some(name) = self.name {
            event.slug = slugify(&name);
            event.name = name;
        }
        if let Some(v) = self.description {
            event.description = v;
        }
        if let Some(v) = self.start_date {
            event.start_date = v;
        }
        if let Some(v) = self.end_date {
            event.end_date = v;
        }
        if let Some(v) = self.image {
            event.image = v;
        }
        if let Some(v) = self.category {
            event.category = v;
        }
        if let Some(v) = self.is_online {
            event.is_online = v;
        }
        if let Some(v) = self.is_publish {
            event.is_publish = v;
        }
        if let Some(v) = self.is_featured {
            event.is_featured = v;
        }
        if let Some(v) = self.location {
            event.location = v;
        }
        if let Some(v) = self.required_volunteers {
            event.required_volunteers = v;
        }
        if let Some(v) = self.requirements {
            event.requirements = v;
        }
        if self.benefits.is_some() {
            event.benefits = self.benefits;
        }
        if let Some(v) = self.tags {
            event.tags = v;
        }
        event.updated_at = Utc::now();
    }
}

/// Filters for browsing events
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<Uuid>,
    pub is_online: Option<bool>,
    pub is_publish: Option<bool>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(search) = &self.search {
            if !event.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        self.category.map_or(true, |c| c == event.category)
            && self.is_online.map_or(true, |v| v == event.is_online)
            && self.is_publish.map_or(true, |v| v == event.is_publish)
    }
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    require("name", name)?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Event name must not be more than {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(DomainError::validation(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

fn validate_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::validation("endDate must not be before startDate"));
    }
    Ok(())
}

fn validate_required_volunteers(required: i32) -> Result<(), DomainError> {
    if required < 1 {
        return Err(DomainError::validation("Minimum number of volunteers is 1"));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), DomainError> {
    if tags.iter().any(|t| t.chars().count() > MAX_TAG_LEN) {
        return Err(DomainError::validation(format!(
            "tags must be at most {} characters each",
            MAX_TAG_LEN
        )));
    }
    Ok(())
}
