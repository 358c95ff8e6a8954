//! Actor roles and the injected authorization capability.
//!
//! Role lookup is deliberately infallible at this seam: a provider that
//! cannot reach its backing store answers with an empty role set (and logs
//! why), so authorization degrades to "no access" instead of erroring into
//! core logic.

use async_trait::async_trait;

/// Roles recognized by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    LabStaff,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::LabStaff => "LabStaff",
            Self::Student => "Student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Self::Admin),
            "LabStaff" => Some(Self::LabStaff),
            "Student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// The set of roles held by one actor
#[derive(Debug, Clone, Default)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self(names.into_iter().filter_map(Role::parse).collect())
    }

    pub fn has(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has(*r))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(Role::as_str).collect()
    }
}

/// An authenticated actor as seen by the core: identity plus role set.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    pub roles: RoleSet,
}

impl Actor {
    pub fn new(id: i64, name: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            id,
            name: name.into(),
            roles,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.has(Role::Admin)
    }

    /// Approval authority: may approve/cancel bookings on behalf of others
    /// and see every booking.
    pub fn has_approval_authority(&self) -> bool {
        self.roles.has_any(&[Role::Admin, Role::LabStaff])
    }

    pub fn can_manage_equipment(&self) -> bool {
        self.has_approval_authority()
    }
}

/// Role lookup seam.
///
/// Implementations must not fail: any backend error maps to an empty set.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn roles_for(&self, user_id: i64) -> RoleSet;
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_names_are_dropped() {
        let set = RoleSet::from_names(["Admin", "SuperUser", "Student"]);
        assert!(set.has(Role::Admin));
        assert!(set.has(Role::Student));
        assert!(!set.has(Role::LabStaff));
        assert_eq!(set.names(), vec!["Admin", "Student"]);
    }

    #[test]
    fn staff_have_approval_authority() {
        let staff = Actor::new(1, "Dana", RoleSet::from_names(["LabStaff"]));
        let student = Actor::new(2, "Sam", RoleSet::from_names(["Student"]));
        let nobody = Actor::new(3, "Ghost", RoleSet::empty());
        assert!(staff.has_approval_authority());
        assert!(!student.has_approval_authority());
        assert!(!nobody.has_approval_authority());
        assert!(!staff.is_admin());
    }

    #[test]
    fn empty_role_set_denies_everything() {
        let actor = Actor::new(9, "Anon", RoleSet::empty());
        assert!(!actor.is_admin());
        assert!(!actor.has_approval_authority());
        assert!(!actor.can_manage_equipment());
    }
}
