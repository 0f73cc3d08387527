//! Typed decision requests.
//!
//! # Purpose
//! One struct per plugin call, plus [`AuthRequest`] to carry any of them with
//! an explicit [`RequestKind`] marker.
//!
//! # Key invariants
//! - Requests are built only once every required field is present and
//!   parseable; transports deny without building one otherwise.
//! - `Debug` for [`UserAuthRequest`] never prints the password.
use crate::{Permission, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    User,
    Vhost,
    Resource,
    Topic,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::User => "user",
            RequestKind::Vhost => "vhost",
            RequestKind::Resource => "resource",
            RequestKind::Topic => "topic",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct UserAuthRequest {
    pub username: String,
    pub password: String,
}

impl UserAuthRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for UserAuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostAccessRequest {
    pub username: String,
    pub vhost: String,
    /// Client address as reported by the broker, when present.
    pub ip: Option<String>,
}

impl VhostAccessRequest {
    pub fn new(username: impl Into<String>, vhost: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            vhost: vhost.into(),
            ip: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePermissionRequest {
    pub username: String,
    pub vhost: String,
    pub resource: ResourceKind,
    pub name: String,
    pub permission: Permission,
}

impl ResourcePermissionRequest {
    pub fn new(
        username: impl Into<String>,
        vhost: impl Into<String>,
        resource: ResourceKind,
        name: impl Into<String>,
        permission: Permission,
    ) -> Self {
        Self {
            username: username.into(),
            vhost: vhost.into(),
            resource,
            name: name.into(),
            permission,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPermissionRequest {
    pub resource: ResourcePermissionRequest,
    pub routing_key: String,
    /// MQTT client id, sent by the plugin as `variable_map.client_id`.
    pub client_id: Option<String>,
}

impl TopicPermissionRequest {
    pub fn new(resource: ResourcePermissionRequest, routing_key: impl Into<String>) -> Self {
        Self {
            resource,
            routing_key: routing_key.into(),
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    User(UserAuthRequest),
    Vhost(VhostAccessRequest),
    Resource(ResourcePermissionRequest),
    Topic(TopicPermissionRequest),
}

impl AuthRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            AuthRequest::User(_) => RequestKind::User,
            AuthRequest::Vhost(_) => RequestKind::Vhost,
            AuthRequest::Resource(_) => RequestKind::Resource,
            AuthRequest::Topic(_) => RequestKind::Topic,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            AuthRequest::User(request) => &request.username,
            AuthRequest::Vhost(request) => &request.username,
            AuthRequest::Resource(request) => &request.username,
            AuthRequest::Topic(request) => &request.resource.username,
        }
    }
}
