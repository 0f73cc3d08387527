//! Permission and resource-kind primitives.
//!
//! # Purpose
//! Strongly typed forms of the `permission` and `resource` fields the broker
//! plugin sends with resource and topic checks.
//!
//! # Key invariants
//! - Wire names are lowercase and match the plugin exactly (`configure`,
//!   `write`, `read`, `exchange`, `queue`, `topic`).
//! - Parsing is strict; unknown values are errors, which request handlers
//!   turn into a deny decision.
//!
//! # Examples
//! ```rust
//! use warren_authz::{Permission, ResourceKind};
//!
//! let permission: Permission = "write".parse().expect("permission");
//! assert_eq!(permission, Permission::Write);
//! assert_eq!(ResourceKind::Exchange.as_str(), "exchange");
//! ```
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

/// Operation class requested on a broker resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Configure,
    Write,
    Read,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Configure => "configure",
            Permission::Write => "write",
            Permission::Read => "read",
        }
    }

    /// Parse a wire permission string.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPermission`] for anything other than
    ///   `configure`, `write` or `read`.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        value.parse()
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "configure" => Ok(Permission::Configure),
            "write" => Ok(Permission::Write),
            "read" => Ok(Permission::Read),
            _ => Err(AuthzError::InvalidPermission(value.to_string())),
        }
    }
}

/// Broker object type a permission check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Exchange,
    Queue,
    Topic,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Exchange => "exchange",
            ResourceKind::Queue => "queue",
            ResourceKind::Topic => "topic",
        }
    }

    /// Parse a wire resource string.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidResource`] for unknown resource kinds.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        value.parse()
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "exchange" => Ok(ResourceKind::Exchange),
            "queue" => Ok(ResourceKind::Queue),
            "topic" => Ok(ResourceKind::Topic),
            _ => Err(AuthzError::InvalidResource(value.to_string())),
        }
    }
}
