//! RabbitMQ HTTP auth backend service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, configuration, policy loading and
//! observability for use by the binary and tests.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
pub mod policy;
