//! Auth backend HTTP API module.
//!
//! # Purpose
//! Route handlers for the four plugin endpoints plus operational endpoints.
pub mod auth;
pub mod openapi;
pub mod params;
pub mod system;
pub mod types;
