//! Server-side components of the tracking number service.
//!
//! ## Submodules
//!
//! - [`config`] - CLI and environment configuration.
//! - [`service`] - HTTP handlers, shared state and error mapping.
//! - [`telemetry`] - Structured logging initialization.

pub mod config;
pub mod service;
pub mod telemetry;
