//! Plugin request fields.
//!
//! # Purpose
//! Mirrors the form fields `rabbitmq_auth_backend_http` sends, identically for
//! query strings (GET) and url-encoded bodies (POST). Every field is optional
//! at the extraction layer so a missing field becomes a deny instead of a
//! 4xx rejection.
//!
//! # Key invariants
//! - Field names are part of the wire contract and must not be renamed.
//! - Unknown fields (for example `tags` on newer broker versions) are ignored.
//! - `UserParams` has no `Debug` impl; it holds a password.
use serde::Deserialize;
use thiserror::Error;
use utoipa::IntoParams;
use warren_authz::{
    Permission, ResourceKind, ResourcePermissionRequest, TopicPermissionRequest, UserAuthRequest,
    VhostAccessRequest,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing field {0}")]
    Missing(&'static str),
    #[error("invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ParamError> {
    value.ok_or(ParamError::Missing(field))
}

#[derive(Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserParams {
    /// Broker username.
    pub username: Option<String>,
    /// Password presented by the client.
    pub password: Option<String>,
}

impl UserParams {
    pub fn into_request(self) -> Result<UserAuthRequest, ParamError> {
        Ok(UserAuthRequest::new(
            required(self.username, "username")?,
            required(self.password, "password")?,
        ))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VhostParams {
    pub username: Option<String>,
    pub vhost: Option<String>,
    /// Client address, when the broker reports one.
    pub ip: Option<String>,
}

impl VhostParams {
    pub fn into_request(self) -> Result<VhostAccessRequest, ParamError> {
        let request = VhostAccessRequest::new(
            required(self.username, "username")?,
            required(self.vhost, "vhost")?,
        );
        Ok(match self.ip {
            Some(ip) => request.with_ip(ip),
            None => request,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceParams {
    pub username: Option<String>,
    pub vhost: Option<String>,
    /// `exchange`, `queue` or `topic`.
    pub resource: Option<String>,
    /// Resource name, e.g. `amq.topic`.
    pub name: Option<String>,
    /// `configure`, `write` or `read`.
    pub permission: Option<String>,
}

impl ResourceParams {
    pub fn into_request(self) -> Result<ResourcePermissionRequest, ParamError> {
        let resource = required(self.resource, "resource")?;
        let resource = ResourceKind::parse(&resource).map_err(|_| ParamError::Invalid {
            field: "resource",
            value: resource,
        })?;
        let permission = required(self.permission, "permission")?;
        let permission = Permission::parse(&permission).map_err(|_| ParamError::Invalid {
            field: "permission",
            value: permission,
        })?;
        Ok(ResourcePermissionRequest::new(
            required(self.username, "username")?,
            required(self.vhost, "vhost")?,
            resource,
            required(self.name, "name")?,
            permission,
        ))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicParams {
    pub username: Option<String>,
    pub vhost: Option<String>,
    pub resource: Option<String>,
    pub name: Option<String>,
    pub permission: Option<String>,
    /// Routing key being published or bound.
    pub routing_key: Option<String>,
    /// MQTT client id.
    #[serde(rename = "variable_map.client_id")]
    pub client_id: Option<String>,
}

impl TopicParams {
    pub fn into_request(self) -> Result<TopicPermissionRequest, ParamError> {
        let routing_key = required(self.routing_key, "routing_key")?;
        let resource = ResourceParams {
            username: self.username,
            vhost: self.vhost,
            resource: self.resource,
            name: self.name,
            permission: self.permission,
        }
        .into_request()?;
        let request = TopicPermissionRequest::new(resource, routing_key);
        Ok(match self.client_id {
            Some(client_id) => request.with_client_id(client_id),
            None => request,
        })
    }
}
