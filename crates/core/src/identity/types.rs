//! Identity snapshot types populated by upstream authentication.

use serde::{Deserialize, Serialize};

/// Authenticated subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An authorization grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Role {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Tenant or scope the user acts within.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
}

impl Domain {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Composite identity snapshot.
///
/// Roles keep the order the authentication layer granted them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user: User,
    pub roles: Vec<Role>,
    pub domain: Domain,
}

impl UserInfo {
    pub fn new(user: User, domain: Domain) -> Self {
        Self {
            user,
            roles: Vec::new(),
            domain,
        }
    }

    /// Add a role grant.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Whether any granted role has the given type.
    pub fn has_role(&self, kind: &str) -> bool {
        self.roles.iter().any(|r| r.kind == kind)
    }
}
