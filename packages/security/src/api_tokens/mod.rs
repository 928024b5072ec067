// ABOUTME: API token management module
// ABOUTME: Token generation, storage, and verification

pub mod storage;
pub mod types;

pub use storage::TokenStorage;
pub use types::{ApiToken, TokenGeneration};
