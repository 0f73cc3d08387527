//! OpenAPI schema aggregation for the auth backend API.
use crate::api::{auth, system, types::HealthStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "warren-authbackend",
        version = "v1",
        description = "RabbitMQ HTTP auth backend decision API"
    ),
    paths(
        auth::user,
        auth::vhost,
        auth::resource,
        auth::topic,
        system::health,
    ),
    components(schemas(HealthStatus)),
    tags(
        (name = "auth", description = "Decisions for rabbitmq_auth_backend_http"),
        (name = "system", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;
