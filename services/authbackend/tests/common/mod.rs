#![allow(dead_code)]

use authbackend::app::{AppState, build_router};
use axum::body::Body;
use axum::http::Request;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub type TestApp = axum::routing::RouterIntoService<Body, ()>;

pub fn app_with_policy(yaml: &str) -> TestApp {
    let policy = authbackend::policy::parse_policy(yaml).expect("policy");
    build_router(AppState::new(policy)).into_service()
}

pub fn default_app() -> TestApp {
    app_with_policy(authbackend::policy::DEFAULT_POLICY_YAML)
}

/// Random alphanumeric string, as long as the broker may send.
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn random_length() -> usize {
    (rand::thread_rng().gen_range(1..(3800 - 23)) / 2).max(1)
}

pub fn get_request(path: &str, params: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("{path}?{}", encode(params)))
        .body(Body::empty())
        .expect("request")
}

pub fn post_form(path: &str, params: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(encode(params)))
        .expect("request")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn encode(params: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(params).expect("encode params")
}
