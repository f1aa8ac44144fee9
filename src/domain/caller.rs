//! Caller identity
//!
//! Who is making a request and what they are allowed to do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role stored alongside an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ApplyAsVolunteer,
    ReviewApplications,
    ListAllApplications,
    DeleteApplication,
    ManageEvents,
    ManageCategories,
    ManageFaqs,
}

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Caller {
    Member(Uuid),
    Organizer(Uuid),
    Admin(Uuid),
}

impl Caller {
    pub fn new(role: Role, id: Uuid) -> Self {
        match role {
            Role::Member => Caller::Member(id),
            Role::Organizer => Caller::Organizer(id),
            Role::Admin => Caller::Admin(id),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Caller::Member(id) | Caller::Organizer(id) | Caller::Admin(id) => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Caller::Member(_) => Role::Member,
            Caller::Organizer(_) => Role::Organizer,
            Caller::Admin(_) => Role::Admin,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;

        match self {
            Caller::Member(_) => matches!(capability, ApplyAsVolunteer),
            Caller::Organizer(_) => matches!(capability, ReviewApplications | ManageEvents),
            Caller::Admin(_) => !matches!(capability, ApplyAsVolunteer),
        }
    }

    /// Whether the caller may act on an event owned by `owner`.
    /// Admins act on every event; organizers only on their own.
    pub fn owns_or_admin(&self, owner: Uuid) -> bool {
        match self {
            Caller::Admin(_) => true,
            Caller::Organizer(id) => *id == owner,
            Caller::Member(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_capabilities() {
        let caller = Caller::Member(Uuid::new_v4());
        assert!(caller.can(Capability::ApplyAsVolunteer));
        assert!(!caller.can(Capability::ReviewApplications));
        assert!(!caller.can(Capability::DeleteApplication));
        assert!(!caller.can(Capability::ManageEvents));
        assert!(!caller.can(Capability::ManageFaqs));
    }

    #[test]
    fn test_organizer_capabilities() {
        let caller = Caller::Organizer(Uuid::new_v4());
        assert!(caller.can(Capability::ReviewApplications));
        assert!(caller.can(Capability::ManageEvents));
        assert!(!caller.can(Capability::ListAllApplications));
        assert!(!caller.can(Capability::DeleteApplication));
        assert!(!caller.can(Capability::ApplyAsVolunteer));
        assert!(!caller.can(Capability::ManageFaqs));
    }

    #[test]
    fn test_admin_capabilities() {
        let caller = Caller::Admin(Uuid::new_v4());
        assert!(caller.can(Capability::ListAllApplications));
        assert!(caller.can(Capability::DeleteApplication));
        assert!(caller.can(Capability::ManageCategories));
        assert!(caller.can(Capability::ManageFaqs));
        assert!(!caller.can(Capability::ApplyAsVolunteer));
    }

    #[test]
    fn test_ownership() {
        let organizer_id = Uuid::new_v4();
        let organizer = Caller::Organizer(organizer_id);

        assert!(organizer.owns_or_admin(organizer_id));
        assert!(!organizer.owns_or_admin(Uuid::new_v4()));
        assert!(Caller::Admin(Uuid::new_v4()).owns_or_admin(organizer_id));
        assert!(!Caller::Member(organizer_id).owns_or_admin(organizer_id));
    }

    #[test]
    fn test_role_round_trip_through_caller() {
        let id = Uuid::new_v4();
        let caller = Caller::new("organizer".parse().unwrap(), id);
        assert_eq!(caller, Caller::Organizer(id));
        assert_eq!(caller.role(), Role::Organizer);
        assert_eq!(caller.id(), id);
        assert!("guest".parse::<Role>().is_err());
    }
}
