//! FAQ
//!
//! Frequently asked questions, published separately for members and
//! organizers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainError;

/// Audience an FAQ entry is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqType {
    Member,
    Organizer,
}

impl FaqType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqType::Member => "member",
            FaqType::Organizer => "organizer",
        }
    }
}

impl fmt::Display for FaqType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaqType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(FaqType::Member),
            "organizer" => Ok(FaqType::Organizer),
            other => Err(DomainError::validation(format!(
                "type must be one of member, organizer (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(rename = "type")]
    pub faq_type: FaqType,
    pub is_publish: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing an FAQ entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqDraft {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(rename = "type")]
    pub faq_type: FaqType,
    pub is_publish: bool,
}

impl FaqDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [("question", &self.question), ("answer", &self.answer)] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }

    pub fn into_faq(self) -> Faq {
        let now = Utc::now();
        Faq {
            id: Uuid::new_v4(),
            question: self.question,
            answer: self.answer,
            faq_type: self.faq_type,
            is_publish: self.is_publish,
            created_at: now,
            updated_at: now,
        }
    }
}

/// List filter; `search` matches question or answer, case-insensitively
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqFilter {
    pub search: Option<String>,
    pub faq_type: Option<FaqType>,
    pub is_publish: Option<bool>,
}

impl FaqFilter {
    pub fn matches(&self, faq: &Faq) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !faq.question.to_lowercase().contains(&needle)
                && !faq.answer.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        self.faq_type.map_or(true, |t| t == faq.faq_type)
            && self.is_publish.map_or(true, |p| p == faq.is_publish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> FaqDraft {
        FaqDraft {
            question: "How do I apply?".to_string(),
            answer: "Open an event and press apply.".to_string(),
            faq_type: FaqType::Member,
            is_publish: true,
        }
    }

    #[test]
    fn test_faq_draft_requires_question_and_answer() {
        assert!(draft().validate().is_ok());

        let blank_answer = FaqDraft {
            answer: "  ".to_string(),
            ..draft()
        };
        assert_eq!(
            blank_answer.validate().unwrap_err(),
            DomainError::validation("answer is required")
        );
    }

    #[test]
    fn test_faq_type_wire_format() {
        let faq = draft().into_faq();
        let json = serde_json::to_value(&faq).unwrap();
        assert_eq!(json["type"], "member");
        assert_eq!(json["isPublish"], true);

        let parsed: FaqDraft = serde_json::from_value(serde_json::json!({
            "question": "q",
            "answer": "a",
            "type": "organizer",
            "isPublish": false
        }))
        .unwrap();
        assert_eq!(parsed.faq_type, FaqType::Organizer);

        assert!(serde_json::from_value::<FaqDraft>(serde_json::json!({
            "question": "q",
            "answer": "a",
            "type": "guest",
            "isPublish": false
        }))
        .is_err());
        assert!("guest".parse::<FaqType>().is_err());
    }

    #[test]
    fn test_filter_matches_question_or_answer() {
        let faq = draft().into_faq();

        let by_answer = FaqFilter {
            search: Some("PRESS APPLY".to_string()),
            ..FaqFilter::default()
        };
        assert!(by_answer.matches(&faq));

        let wrong_type = FaqFilter {
            faq_type: Some(FaqType::Organizer),
            ..FaqFilter::default()
        };
        assert!(!wrong_type.matches(&faq));

        let unpublished = FaqFilter {
            is_publish: Some(false),
            ..FaqFilter::default()
        };
        assert!(!unpublished.matches(&faq));
    }
}
