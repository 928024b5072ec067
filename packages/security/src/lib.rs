// ABOUTME: Authentication backing store for Quillpad
// ABOUTME: Issues, verifies and revokes hashed API tokens

pub mod api_tokens;

// Re-export main types for convenience
pub use api_tokens::{ApiToken, TokenGeneration, TokenStorage};
