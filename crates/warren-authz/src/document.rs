//! Serializable policy document.
//!
//! # Purpose
//! The on-disk shape of a policy: four rule lists, one per request kind.
//! Documents are plain data; [`crate::StaticPolicy::compile`] validates them
//! and builds the evaluator.
//!
//! # Key invariants
//! - Every rule carries an [`Effect`]; `allow` is the default.
//! - Name-like fields (`username`, `vhost`, `resource`, `name`, `ip`) are
//!   [`crate::wildcard_match`] globs.
//! - Unknown keys are rejected so typos do not silently widen access.
//!
//! # Examples
//! ```rust
//! use warren_authz::{Effect, PolicyDocument};
//!
//! let doc = PolicyDocument::default();
//! assert!(doc.users.is_empty());
//! assert_eq!(Effect::default(), Effect::Allow);
//! ```
use crate::{Permission, RoutingKeySpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default)]
    pub users: Vec<UserRule>,
    #[serde(default)]
    pub vhosts: Vec<VhostRule>,
    #[serde(default)]
    pub resources: Vec<ResourceRule>,
    #[serde(default)]
    pub topics: Vec<TopicRule>,
}

/// Credential rule for `/auth/user`.
///
/// `password` is a template: `{username}` expands to the request username.
/// Allow rules must set it; a deny rule without one matches any password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserRule {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub allow_empty_password: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub effect: Effect,
}

impl std::fmt::Debug for UserRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRule")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("allow_empty_password", &self.allow_empty_password)
            .field("tags", &self.tags)
            .field("effect", &self.effect)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VhostRule {
    pub username: String,
    #[serde(default = "any_pattern")]
    pub vhost: String,
    /// Glob over the client address; rules with an `ip` never match requests
    /// that do not report one.
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceRule {
    pub username: String,
    #[serde(default = "any_pattern")]
    pub vhost: String,
    #[serde(default = "any_pattern")]
    pub resource: String,
    #[serde(default = "any_pattern")]
    pub name: String,
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub effect: Effect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicRule {
    pub username: String,
    #[serde(default = "any_pattern")]
    pub vhost: String,
    #[serde(default = "any_pattern")]
    pub resource: String,
    #[serde(default = "any_pattern")]
    pub name: String,
    pub permissions: Vec<Permission>,
    pub routing_key: RoutingKeySpec,
    #[serde(default)]
    pub effect: Effect,
}

fn any_pattern() -> String {
    "*".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
users:
  - username: guest
    effect: deny
  - username: "*"
    password: "{username}"
    tags: [management]
vhosts:
  - username: "*"
resources:
  - username: "*"
    name: "amq.*"
    permissions: [write]
topics:
  - username: "*"
    permissions: [read, write]
    routing_key:
      regex: 'a\..*'
"#;

    #[test]
    fn parses_yaml_with_defaults() {
        let doc: PolicyDocument = serde_yaml::from_str(SAMPLE).expect("parse policy");
        assert_eq!(doc.users.len(), 2);
        assert_eq!(doc.users[0].effect, Effect::Deny);
        assert_eq!(doc.users[0].password, None);
        assert_eq!(doc.users[1].tags, vec!["management".to_string()]);
        assert_eq!(doc.vhosts[0].vhost, "*");
        assert_eq!(doc.vhosts[0].ip, None);
        assert_eq!(doc.resources[0].resource, "*");
        assert_eq!(doc.resources[0].permissions, vec![Permission::Write]);
        assert_eq!(doc.topics[0].routing_key, RoutingKeySpec::regex(r"a\..*"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let yaml = "users:\n  - username: a\n    pasword: b\n";
        let err = serde_yaml::from_str::<PolicyDocument>(yaml).expect_err("typo should fail");
        assert!(err.to_string().contains("pasword"));
    }

    #[test]
    fn rejects_unknown_routing_key_kind() {
        let yaml = "topics:\n  - username: a\n    permissions: [read]\n    routing_key:\n      glob: \"a.*\"\n";
        let err = serde_yaml::from_str::<PolicyDocument>(yaml).expect_err("unknown kind");
        assert!(err.to_string().contains("glob"));
    }

    #[test]
    fn rejects_unknown_permission() {
        let yaml = "resources:\n  - username: a\n    permissions: [delete]\n";
        assert!(serde_yaml::from_str::<PolicyDocument>(yaml).is_err());
    }

    #[test]
    fn user_rule_debug_redacts_password() {
        let rule = UserRule {
            username: "svc".to_string(),
            password: Some("hunter2".to_string()),
            allow_empty_password: false,
            tags: Vec::new(),
            effect: Effect::Allow,
        };
        let rendered = format!("{rule:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
