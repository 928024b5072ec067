// ABOUTME: Type definitions for API token authentication
// ABOUTME: Structures for token generation and listing

use chrono::{DateTime, Utc};
use serde::Serialize;

/// API token as listed to operators. The hash never leaves storage.
#[derive(Debug, Clone, Serialize)]
pub struct ApiToken {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Token generation result - includes plaintext token for display
/// This is the ONLY time the plaintext token is available
#[derive(Debug, Clone)]
pub struct TokenGeneration {
    pub token: String, // Plaintext token - show once to user
    pub id: String,
    pub name: String,
}
