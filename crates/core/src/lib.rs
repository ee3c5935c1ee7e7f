//! Core business logic for gazette.

pub mod services;

pub use services::*;
