//! HTTP API layer for gazette.
//!
//! This crate provides the request-handling surface of the application:
//!
//! - **Endpoints**: listing, detail, post/comment/follow/auth handlers
//! - **Extractors**: authentication with redirect-to-login rejection
//! - **Middleware**: token resolution, application state
//! - **Response**: page-context views returned in place of rendered templates
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{not_found, router};
