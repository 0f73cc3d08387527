//! Decision model for a RabbitMQ HTTP auth backend.
//!
//! # Purpose
//! Everything needed to answer the `rabbitmq_auth_backend_http` plugin's
//! user, vhost, resource and topic checks, without any HTTP:
//! typed requests, the allow/deny [`Decision`], the YAML-friendly
//! [`PolicyDocument`], and the compiled [`StaticPolicy`] evaluator.
//!
//! # How it fits
//! The auth backend service parses plugin form fields into requests, asks a
//! [`PolicyEvaluator`] for a decision and writes [`Decision::render`] back.
//!
//! # Key invariants
//! - Decisions fail closed: missing matches, empty principals and
//!   unparseable input all end in [`Decision::Deny`].
//! - Evaluation is pure; a compiled policy is immutable and shareable.
//!
//! # Examples
//! ```rust
//! use warren_authz::{
//!     Decision, PolicyDocument, PolicyEvaluator, StaticPolicy, UserAuthRequest, UserRule,
//! };
//!
//! let mut doc = PolicyDocument::default();
//! doc.users.push(UserRule {
//!     username: "*".to_string(),
//!     password: Some("{username}".to_string()),
//!     allow_empty_password: false,
//!     tags: vec!["management".to_string()],
//!     effect: Default::default(),
//! });
//! let policy = StaticPolicy::compile(doc).expect("valid policy");
//! let decision = policy.authenticate_user(&UserAuthRequest::new("svc", "svc"));
//! assert_eq!(decision.render(), "allow management");
//! assert_eq!(
//!     policy.authenticate_user(&UserAuthRequest::new("svc", "nope")),
//!     Decision::Deny
//! );
//! ```
//!
//! # Common pitfalls
//! - Allow user rules without a `password` are rejected at compile time.
//! - Topic checks also require the matching resource permission.

mod decision;
mod document;
mod errors;
mod evaluator;
mod matcher;
mod permission;
mod policy;
mod request;

pub use decision::Decision;
pub use document::{Effect, PolicyDocument, ResourceRule, TopicRule, UserRule, VhostRule};
pub use errors::{AuthzError, AuthzResult};
pub use evaluator::PolicyEvaluator;
pub use matcher::{
    RoutingKeyPattern, RoutingKeySpec, Variables, has_variables, topic_match, wildcard_match,
};
pub use permission::{Permission, ResourceKind};
pub use policy::{PolicySummary, StaticPolicy};
pub use request::{
    AuthRequest, RequestKind, ResourcePermissionRequest, TopicPermissionRequest, UserAuthRequest,
    VhostAccessRequest,
};
