//! Decision handlers for `/auth/user`, `/auth/vhost`, `/auth/resource` and
//! `/auth/topic`.
//!
//! # Purpose and responsibility
//! Extract plugin fields, build a typed request, ask the policy evaluator, and
//! write the decision as plain text.
//!
//! # Key invariants and assumptions
//! - Every outcome is `200 text/plain` with `allow...` or `deny`; malformed or
//!   incomplete requests are denied, never rejected with 4xx/5xx.
//! - GET reads the query string and POST reads the url-encoded body through
//!   the same `Form` extractor, so both methods decide identically.
//!
//! # Security considerations
//! - Passwords are never logged.
use crate::api::params::{ParamError, ResourceParams, TopicParams, UserParams, VhostParams};
use crate::app::AppState;
use crate::observability;
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use warren_authz::{AuthRequest, Decision, RequestKind};

fn respond<P>(
    state: &AppState,
    kind: RequestKind,
    form: Result<Form<P>, FormRejection>,
    build: impl FnOnce(P) -> Result<AuthRequest, ParamError>,
) -> String {
    let decision = match form {
        Err(rejection) => {
            tracing::warn!(%kind, error = %rejection, "malformed auth request");
            Decision::Deny
        }
        Ok(Form(params)) => match build(params) {
            Err(err) => {
                tracing::info!(%kind, error = %err, "incomplete auth request");
                Decision::Deny
            }
            Ok(request) => {
                let decision = state.evaluator.decide(&request);
                tracing::info!(
                    %kind,
                    username = %request.username(),
                    decision = decision.label(),
                    "auth decision"
                );
                decision
            }
        },
    };
    observability::record_decision(kind, &decision);
    decision.render()
}

#[utoipa::path(
    method(get, post),
    path = "/auth/user",
    tag = "auth",
    params(UserParams),
    responses(
        (status = 200, description = "`allow`, `allow <tags>` or `deny`", body = String, content_type = "text/plain")
    )
)]
/// Authenticate a client connection.
pub(crate) async fn user(
    State(state): State<AppState>,
    form: Result<Form<UserParams>, FormRejection>,
) -> String {
    respond(&state, RequestKind::User, form, |params| {
        params.into_request().map(AuthRequest::User)
    })
}

#[utoipa::path(
    method(get, post),
    path = "/auth/vhost",
    tag = "auth",
    params(VhostParams),
    responses(
        (status = 200, description = "`allow` or `deny`", body = String, content_type = "text/plain")
    )
)]
/// Check access to a virtual host.
pub(crate) async fn vhost(
    State(state): State<AppState>,
    form: Result<Form<VhostParams>, FormRejection>,
) -> String {
    respond(&state, RequestKind::Vhost, form, |params| {
        params.into_request().map(AuthRequest::Vhost)
    })
}

#[utoipa::path(
    method(get, post),
    path = "/auth/resource",
    tag = "auth",
    params(ResourceParams),
    responses(
        (status = 200, description = "`allow` or `deny`", body = String, content_type = "text/plain")
    )
)]
/// Check a configure/write/read permission on an exchange or queue.
pub(crate) async fn resource(
    State(state): State<AppState>,
    form: Result<Form<ResourceParams>, FormRejection>,
) -> String {
    respond(&state, RequestKind::Resource, form, |params| {
        params.into_request().map(AuthRequest::Resource)
    })
}

#[utoipa::path(
    method(get, post),
    path = "/auth/topic",
    tag = "auth",
    params(TopicParams),
    responses(
        (status = 200, description = "`allow` or `deny`", body = String, content_type = "text/plain")
    )
)]
/// Check a topic permission for a specific routing key.
pub(crate) async fn topic(
    State(state): State<AppState>,
    form: Result<Form<TopicParams>, FormRejection>,
) -> String {
    respond(&state, RequestKind::Topic, form, |params| {
        params.into_request().map(AuthRequest::Topic)
    })
}
