//! Common utilities and shared types for gazette.
//!
//! This crate provides foundational components used across all gazette crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: Page arithmetic via [`PageMeta`] and [`Paginated`]
//! - **Page cache**: In-process TTL cache via [`PageCache`]
//! - **Storage**: File storage backend for uploaded post images
//!
//! # Example
//!
//! ```no_run
//! use gazette_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod id;
pub mod pagination;
pub mod storage;

pub use cache::PageCache;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{PageMeta, Paginated, resolve_page, total_pages};
pub use storage::{LocalStorage, NoOpStorage, StorageBackend, StoredFile};
