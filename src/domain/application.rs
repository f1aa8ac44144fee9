//! Volunteer Application
//!
//! A single user's request to volunteer for an event, its payload validation
//! and the review status lifecycle.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

const MIN_MOTIVATION_LEN: usize = 10;
const MAX_EXPERIENCE_LEN: usize = 500;

// =========================================================================
// ApplicationStatus
// =========================================================================

/// Review status of a volunteer application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Terminal under the strict lifecycle
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "status must be one of pending, accepted, rejected (got '{}')",
                other
            ))),
        }
    }
}

// =========================================================================
// StatusPolicy
// =========================================================================

/// Which status transitions `update_status` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any status may be written over any other
    #[default]
    Permissive,
    /// Only `pending -> accepted` and `pending -> rejected`
    Strict,
}

impl StatusPolicy {
    pub fn allows(&self, from: ApplicationStatus, to: ApplicationStatus) -> bool {
        match self {
            StatusPolicy::Permissive => true,
            StatusPolicy::Strict => !from.is_terminal() && to.is_terminal(),
        }
    }

    pub fn check(&self, from: ApplicationStatus, to: ApplicationStatus) -> Result<(), DomainError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { from, to })
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(StatusPolicy::Permissive),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(format!("unknown status policy '{}'", other)),
        }
    }
}

// =========================================================================
// ApplicationPayload
// =========================================================================

/// Applicant-supplied part of an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*(:\d{1,5})?([/?#]\S*)?$")
            .expect("portfolio url pattern is valid")
    })
}

impl ApplicationPayload {
    /// Check field-level rules
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.motivation.chars().count() < MIN_MOTIVATION_LEN {
            return Err(DomainError::validation(format!(
                "motivation must be at least {} characters",
                MIN_MOTIVATION_LEN
            )));
        }

        if let Some(experience) = &self.experience {
            if experience.chars().count() > MAX_EXPERIENCE_LEN {
                return Err(DomainError::validation(format!(
                    "experience must be at most {} characters",
                    MAX_EXPERIENCE_LEN
                )));
            }
        }

        if self.skills.is_empty() {
            return Err(DomainError::validation("skills must contain at least 1 item"));
        }
        if self.skills.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::validation("skills must not contain blank entries"));
        }

        if let Some(url) = &self.portfolio_url {
            if !url_pattern().is_match(url) {
                return Err(DomainError::validation("portfolioUrl must be a valid URL"));
            }
        }

        Ok(())
    }
}

// =========================================================================
// VolunteerApplication
// =========================================================================

/// Persisted application record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerApplication {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: ApplicationStatus,
    pub motivation: String,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub portfolio_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerApplication {
    /// Build a fresh `pending` application
    pub fn submit(event_id: Uuid, user_id: Uuid, payload: ApplicationPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status: ApplicationStatus::Pending,
            motivation: payload.motivation,
            experience: payload.experience,
            skills: payload.skills,
            portfolio_url: payload.portfolio_url,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Optional filters for listing applications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub event_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &VolunteerApplication) -> bool {
        self.event_id.map_or(true, |id| id == application.event_id)
            && self.user_id.map_or(true, |id| id == application.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ApplicationPayload {
        ApplicationPayload {
            motivation: "I love helping at beach cleanups".to_string(),
            experience: Some("Two seasons with the coastal trust".to_string()),
            skills: vec!["first aid".to_string()],
            portfolio_url: Some("https://example.org/me".to_string()),
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(valid_payload().validate().is_ok());
    }

    #[test]
    fn test_short_motivation_rejected() {
        let payload = ApplicationPayload {
            motivation: "too short".to_string(),
            ..valid_payload()
        };
        assert!(matches!(payload.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_motivation_length_counts_whitespace() {
        let payload = ApplicationPayload {
            motivation: "        ok".to_string(),
            ..valid_payload()
        };
        assert!(payload.validate().is_ok());

        let payload = ApplicationPayload {
            motivation: "   ok   ".to_string(),
            ..valid_payload()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_empty_skills_rejected() {
        let payload = ApplicationPayload {
            skills: vec![],
            ..valid_payload()
        };
        let err = payload.validate().unwrap_err();
        assert!(err.to_string().contains("skills"));

        let payload = ApplicationPayload {
            skills: vec!["  ".to_string()],
            ..valid_payload()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_experience_length_limit() {
        let payload = ApplicationPayload {
            experience: Some("x".repeat(501)),
            ..valid_payload()
        };
        assert!(payload.validate().is_err());

        let payload = ApplicationPayload {
            experience: Some("x".repeat(500)),
            ..valid_payload()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_portfolio_url_format() {
        for url in ["https://example.org", "http://localhost:8080/a?b=c", "https://my-site.dev/#work"] {
            let payload = ApplicationPayload {
                portfolio_url: Some(url.to_string()),
                ..valid_payload()
            };
            assert!(payload.validate().is_ok(), "{} should be accepted", url);
        }

        for url in ["example.org", "ftp://example.org", "https://", "https://exa mple.org"] {
            let payload = ApplicationPayload {
                portfolio_url: Some(url.to_string()),
                ..valid_payload()
            };
            assert!(payload.validate().is_err(), "{} should be rejected", url);
        }

        let payload = ApplicationPayload {
            portfolio_url: None,
            ..valid_payload()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("accepted".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Accepted);
        assert!("approved".parse::<ApplicationStatus>().is_err());
        assert_eq!(ApplicationStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_permissive_policy_allows_everything() {
        let policy = StatusPolicy::Permissive;
        assert!(policy.allows(ApplicationStatus::Accepted, ApplicationStatus::Rejected));
        assert!(policy.allows(ApplicationStatus::Rejected, ApplicationStatus::Pending));
    }

    #[test]
    fn test_strict_policy_transition_table() {
        let policy = StatusPolicy::Strict;
        assert!(policy.check(ApplicationStatus::Pending, ApplicationStatus::Accepted).is_ok());
        assert!(policy.check(ApplicationStatus::Pending, ApplicationStatus::Rejected).is_ok());
        assert!(policy.check(ApplicationStatus::Accepted, ApplicationStatus::Rejected).is_err());
        assert!(policy.check(ApplicationStatus::Rejected, ApplicationStatus::Pending).is_err());
        assert!(policy.check(ApplicationStatus::Pending, ApplicationStatus::Pending).is_err());
    }

    #[test]
    fn test_submit_starts_pending() {
        let application = VolunteerApplication::submit(Uuid::new_v4(), Uuid::new_v4(), valid_payload());
        assert_eq!(application.status, ApplicationStatus::Pending);
        assert!(!application.is_verified);
    }

    #[test]
    fn test_filter_matches() {
        let application = VolunteerApplication::submit(Uuid::new_v4(), Uuid::new_v4(), valid_payload());
        assert!(ApplicationFilter::default().matches(&application));
        assert!(ApplicationFilter {
            event_id: Some(application.event_id),
            user_id: None
        }
        .matches(&application));
        assert!(!ApplicationFilter {
            event_id: None,
            user_id: Some(Uuid::new_v4())
        }
        .matches(&application));
    }
}
