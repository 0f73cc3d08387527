//! Compiled, read-only policy evaluator.
//!
//! # Purpose
//! Turns a [`PolicyDocument`] into a [`StaticPolicy`] that answers the four
//! plugin decisions.
//!
//! # How it fits
//! The service compiles one policy at start-up and shares it behind an `Arc`;
//! handlers call the [`PolicyEvaluator`] methods directly.
//!
//! # Key invariants
//! - Deny rules override allow rules; no matching allow rule means deny.
//! - Empty usernames and vhosts are always denied.
//! - A topic check is allowed only if the resource check for the same fields
//!   is allowed as well.
//! - Evaluation never mutates the policy and never fails.
//!
//! # Common pitfalls
//! - Rule order does not matter: a matching deny rule wins wherever it
//!   appears in its list.
use crate::{
    AuthzError, AuthzResult, Decision, Effect, PolicyDocument, PolicyEvaluator,
    ResourcePermissionRequest, ResourceRule, RoutingKeyPattern, TopicPermissionRequest, TopicRule,
    UserAuthRequest, UserRule, Variables, VhostAccessRequest, VhostRule, wildcard_match,
};
use std::collections::BTreeSet;

trait Rule {
    fn effect(&self) -> Effect;
}

impl Rule for VhostRule {
    fn effect(&self) -> Effect {
        self.effect
    }
}

impl Rule for ResourceRule {
    fn effect(&self) -> Effect {
        self.effect
    }
}

#[derive(Debug, Clone)]
struct CompiledTopicRule {
    rule: TopicRule,
    routing_key: RoutingKeyPattern,
}

impl Rule for CompiledTopicRule {
    fn effect(&self) -> Effect {
        self.rule.effect
    }
}

/// Deny-overrides combination over the rules that apply to a request.
fn resolve<'a, R: Rule + 'a>(
    rules: impl IntoIterator<Item = &'a R>,
    applies: impl Fn(&R) -> bool,
) -> bool {
    let mut allowed = false;
    for rule in rules {
        if !applies(rule) {
            continue;
        }
        match rule.effect() {
            Effect::Deny => return false,
            Effect::Allow => allowed = true,
        }
    }
    allowed
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}

/// Rule counts per section, for start-up logs and health output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicySummary {
    pub users: usize,
    pub vhosts: usize,
    pub resources: usize,
    pub topics: usize,
}

#[derive(Debug, Clone)]
pub struct StaticPolicy {
    users: Vec<UserRule>,
    vhosts: Vec<VhostRule>,
    resources: Vec<ResourceRule>,
    topics: Vec<CompiledTopicRule>,
}

impl StaticPolicy {
    /// Validate a document and compile its routing-key patterns.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidRule`] for an allow user rule without a
    ///   password, an empty username pattern, an empty permission list, or a
    ///   topic rule whose `routing_key` does not set exactly one kind.
    /// - [`AuthzError::InvalidRoutingKeyPattern`] for a regex that does not
    ///   compile.
    pub fn compile(document: PolicyDocument) -> AuthzResult<Self> {
        for (index, rule) in document.users.iter().enumerate() {
            if rule.username.is_empty() {
                return Err(invalid("users", index, "username pattern must not be empty"));
            }
            if rule.effect == Effect::Allow && rule.password.is_none() {
                return Err(invalid("users", index, "allow rules require a password"));
            }
        }
        for (index, rule) in document.vhosts.iter().enumerate() {
            if rule.username.is_empty() {
                return Err(invalid("vhosts", index, "username pattern must not be empty"));
            }
        }
        for (index, rule) in document.resources.iter().enumerate() {
            if rule.username.is_empty() {
                return Err(invalid("resources", index, "username pattern must not be empty"));
            }
            if rule.permissions.is_empty() {
                return Err(invalid("resources", index, "permissions must not be empty"));
            }
        }

        let mut topics = Vec::with_capacity(document.topics.len());
        for (index, rule) in document.topics.into_iter().enumerate() {
            if rule.username.is_empty() {
                return Err(invalid("topics", index, "username pattern must not be empty"));
            }
            if rule.permissions.is_empty() {
                return Err(invalid("topics", index, "permissions must not be empty"));
            }
            if !rule.routing_key.is_well_formed() {
                return Err(invalid(
                    "topics",
                    index,
                    "routing_key must set exactly one of topic or regex",
                ));
            }
            let routing_key = RoutingKeyPattern::compile(&rule.routing_key)?;
            topics.push(CompiledTopicRule { rule, routing_key });
        }

        Ok(Self {
            users: document.users,
            vhosts: document.vhosts,
            resources: document.resources,
            topics,
        })
    }

    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            users: self.users.len(),
            vhosts: self.vhosts.len(),
            resources: self.resources.len(),
            topics: self.topics.len(),
        }
    }

    fn user_rule_applies(rule: &UserRule, request: &UserAuthRequest) -> bool {
        if !wildcard_match(&rule.username, &request.username) {
            return false;
        }
        if rule.effect == Effect::Allow
            && request.password.is_empty()
            && !rule.allow_empty_password
        {
            return false;
        }
        let Some(template) = &rule.password else {
            return true;
        };
        let vars = Variables::new(&request.username, "", None);
        match vars.expand(template) {
            Some(expected) => constant_time_eq(expected.as_bytes(), request.password.as_bytes()),
            None => false,
        }
    }
}

fn invalid(section: &'static str, index: usize, reason: &str) -> AuthzError {
    AuthzError::InvalidRule {
        section,
        index,
        reason: reason.to_string(),
    }
}

impl PolicyEvaluator for StaticPolicy {
    fn authenticate_user(&self, request: &UserAuthRequest) -> Decision {
        if request.username.is_empty() {
            return Decision::Deny;
        }

        let mut tags = BTreeSet::new();
        let mut allowed = false;
        for rule in &self.users {
            if !Self::user_rule_applies(rule, request) {
                continue;
            }
            match rule.effect {
                Effect::Deny => {
                    tracing::debug!(
                        username = %request.username,
                        pattern = %rule.username,
                        "user matched deny rule"
                    );
                    return Decision::Deny;
                }
                Effect::Allow => {
                    allowed = true;
                    tags.extend(rule.tags.iter().cloned());
                }
            }
        }

        if allowed {
            Decision::Allow(tags)
        } else {
            Decision::Deny
        }
    }

    fn check_vhost(&self, request: &VhostAccessRequest) -> Decision {
        if request.username.is_empty() || request.vhost.is_empty() {
            return Decision::Deny;
        }
        let allowed = resolve(&self.vhosts, |rule| {
            wildcard_match(&rule.username, &request.username)
                && wildcard_match(&rule.vhost, &request.vhost)
                && match (&rule.ip, &request.ip) {
                    (None, _) => true,
                    (Some(pattern), Some(ip)) => wildcard_match(pattern, ip),
                    (Some(_), None) => false,
                }
        });
        if allowed { Decision::allow() } else { Decision::Deny }
    }

    fn check_resource(&self, request: &ResourcePermissionRequest) -> Decision {
        // The default exchange is named "", so only username and vhost must be
        // non-empty.
        if request.username.is_empty() || request.vhost.is_empty() {
            return Decision::Deny;
        }
        let allowed = resolve(&self.resources, |rule| {
            wildcard_match(&rule.username, &request.username)
                && wildcard_match(&rule.vhost, &request.vhost)
                && wildcard_match(&rule.resource, request.resource.as_str())
                && wildcard_match(&rule.name, &request.name)
                && rule.permissions.contains(&request.permission)
        });
        if allowed { Decision::allow() } else { Decision::Deny }
    }

    fn check_topic(&self, request: &TopicPermissionRequest) -> Decision {
        if !self.check_resource(&request.resource).is_allowed() {
            return Decision::Deny;
        }
        let resource = &request.resource;
        let vars = Variables::new(
            &resource.username,
            &resource.vhost,
            request.client_id.as_deref(),
        );
        let allowed = resolve(&self.topics, |compiled| {
            let rule = &compiled.rule;
            wildcard_match(&rule.username, &resource.username)
                && wildcard_match(&rule.vhost, &resource.vhost)
                && wildcard_match(&rule.resource, resource.resource.as_str())
                && wildcard_match(&rule.name, &resource.name)
                && rule.permissions.contains(&resource.permission)
                && compiled.routing_key.matches(&request.routing_key, &vars)
        });
        if allowed { Decision::allow() } else { Decision::Deny }
    }
}
