// ABOUTME: Tag management for organizing blog articles
// ABOUTME: Provides types, validation, list queries and the storage layer for tags

pub mod query;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export main types
pub use query::{Page, SortDirection, SortField, TagListParams, TagQuery, TagQueryError};
pub use storage::{TagStorage, TagTransaction};
pub use types::{Tag, TagCreateInput, TagUpdateInput};
pub use validation::{validate_create, validate_update, FieldErrors, ValidationErrors};
