//! # Quillpad
//!
//! HTTP service for blog tags: filtered listing plus authenticated
//! create, update and delete, backed by SQLite.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use db::DbState;
pub use error::{ApiResult, AppError};
