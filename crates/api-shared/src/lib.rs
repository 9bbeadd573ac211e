//! # API Shared
//!
//! Shared wire types and utilities for the patient records APIs.
//!
//! Contains:
//! - Response bodies (`wire` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`, `records-core` and the `records` CLI for common functionality.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
