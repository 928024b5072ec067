// ABOUTME: Tag type definitions
// ABOUTME: Structures for tags used to label blog articles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagCreateInput {
    pub name: String,
}

/// Validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagUpdateInput {
    pub name: Option<String>,
}
