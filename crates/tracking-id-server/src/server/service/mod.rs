//! HTTP service implementation.
//!
//! ## Structure
//!
//! - [`handler`] - routes, shared state and request handling.
//! - [`response`] - JSON response bodies.
//! - [`error`] - error-to-status mapping.

pub mod error;
pub mod handler;
pub mod response;
