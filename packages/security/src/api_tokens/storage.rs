// ABOUTME: Storage operations for API tokens
// ABOUTME: Token generation, hashing, verification, and database operations

use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

use crate::api_tokens::types::{ApiToken, TokenGeneration};
use quillpad_storage::{format_timestamp, parse_timestamp, StorageError};

pub struct TokenStorage {
    pool: SqlitePool,
}

impl TokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a token against a stored hash using constant-time comparison
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        let computed_hash = Self::hash_token(token);
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a new API token
    pub async fn create_token(&self, name: &str) -> Result<TokenGeneration, StorageError> {
        let id = Uuid::new_v4().to_string();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let now = quillpad_storage::now();

        debug!("Creating API token: {} (name: {})", id, name);

        sqlx::query(
            "INSERT INTO api_tokens (id, token_hash, name, created_at, is_active)
             VALUES (?, ?, ?, ?, 1)",
        )
        .bind(&id)
        .bind(&token_hash)
        .bind(name)
        .bind(format_timestamp(&now))
        .execute(&self.pool)
        .await?;

        Ok(TokenGeneration {
            token,
            id,
            name: name.to_string(),
        })
    }

    /// Verify a token and return the token record if valid and active
    pub async fn verify_token(&self, token: &str) -> Result<Option<ApiToken>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(
            "SELECT id, token_hash, name, created_at, last_used_at, is_active
             FROM api_tokens
             WHERE token_hash = ? AND is_active = 1",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let stored_hash: String = row.try_get("token_hash")?;

                // Double-check with constant-time comparison
                if Self::verify_token_hash(token, &stored_hash) {
                    Ok(Some(row_to_token(&row)?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Record that a token was just used
    pub async fn update_last_used(&self, id: &str) -> Result<(), StorageError> {
        let now = quillpad_storage::now();

        sqlx::query("UPDATE api_tokens SET last_used_at = ? WHERE id = ? AND is_active = 1")
            .bind(format_timestamp(&now))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all tokens (without hashes)
    pub async fn list_tokens(&self) -> Result<Vec<ApiToken>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, name, created_at, last_used_at, is_active
             FROM api_tokens
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_token).collect()
    }

    /// Revoke a token. Returns false when no such token exists.
    pub async fn revoke_token(&self, id: &str) -> Result<bool, StorageError> {
        debug!("Revoking API token: {}", id);

        let result = sqlx::query("UPDATE api_tokens SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_token(row: &sqlx::sqlite::SqliteRow) -> Result<ApiToken, StorageError> {
    let created_at: String = row.try_get("created_at")?;
    let last_used_at: Option<String> = row.try_get("last_used_at")?;

    Ok(ApiToken {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: parse_timestamp(&created_at)?,
        last_used_at: last_used_at.as_deref().map(parse_timestamp).transpose()?,
        is_active: row.try_get::<i64, _>("is_active")? != 0,
    })
}
