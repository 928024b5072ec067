// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: List/get are public; create/update/delete need a Principal and own their transaction

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use quillpad_storage::StorageError;
use quillpad_tags::{validate_create, validate_update, TagListParams, TagQuery, TagTransaction};
use serde_json::Value;
use tracing::{info, warn};

use super::response::{unwrap_envelope, TagListResponse, TagResponse};
use crate::auth::Principal;
use crate::db::DbState;
use crate::error::{ApiResult, AppError};

/// Key the tag payload is wrapped under in request bodies
const TAG_ENVELOPE: &str = "tag";

/// List tags with optional filtering, sorting and pagination
pub async fn list_tags(
    State(db): State<DbState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<TagListResponse>> {
    let Query(pairs) = pairs.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let params = TagListParams::from_pairs(pairs);
    let query = TagQuery::from_params(&params)?;

    info!("Listing tags ({:?})", query);

    let (tags, total) = db.tag_storage.list_tags(&query).await?;
    Ok(Json(TagListResponse { tags, total }))
}

/// Get a single tag by ID
pub async fn get_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<String>,
) -> ApiResult<Json<TagResponse>> {
    info!("Getting tag: {}", tag_id);

    match db.tag_storage.get_tag(&tag_id).await? {
        Some(tag) => Ok(Json(TagResponse { tag })),
        None => Err(AppError::tag_not_found(&tag_id)),
    }
}

/// Create a new tag
pub async fn create_tag(
    State(db): State<DbState>,
    principal: Principal,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<TagResponse>> {
    let fields = unwrap_envelope(payload, TAG_ENVELOPE)?;
    let input = validate_create(&fields)?;

    info!(token_id = %principal.token_id, "Creating tag: {} (by {})", input.name, principal.name);

    let mut tx = db.tag_storage.begin().await?;
    match tx.create_tag(input).await {
        Ok(tag) => {
            tx.commit().await?;
            Ok(Json(TagResponse { tag }))
        }
        Err(e) => Err(abort(tx, e).await),
    }
}

/// Update the editable attributes of an existing tag
pub async fn update_tag(
    State(db): State<DbState>,
    principal: Principal,
    Path(tag_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<TagResponse>> {
    let fields = unwrap_envelope(payload, TAG_ENVELOPE)?;
    let input = validate_update(&fields)?;

    info!(token_id = %principal.token_id, "Updating tag: {} (by {})", tag_id, principal.name);

    let mut tx = db.tag_storage.begin().await?;
    match tx.update_tag(&tag_id, input).await {
        Ok(Some(tag)) => {
            tx.commit().await?;
            Ok(Json(TagResponse { tag }))
        }
        Ok(None) => {
            rollback(tx).await;
            Err(AppError::tag_not_found(&tag_id))
        }
        Err(e) => Err(abort(tx, e).await),
    }
}

/// Delete an existing tag
pub async fn delete_tag(
    State(db): State<DbState>,
    principal: Principal,
    Path(tag_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!(token_id = %principal.token_id, "Deleting tag: {} (by {})", tag_id, principal.name);

    let mut tx = db.tag_storage.begin().await?;
    match tx.delete_tag(&tag_id).await {
        Ok(true) => {
            tx.commit().await?;
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => {
            rollback(tx).await;
            Err(AppError::tag_not_found(&tag_id))
        }
        Err(e) => Err(abort(tx, e).await),
    }
}

/// Roll back after a failed write and classify the failure
async fn abort(tx: TagTransaction, err: StorageError) -> AppError {
    rollback(tx).await;
    err.into()
}

async fn rollback(tx: TagTransaction) {
    if let Err(e) = tx.rollback().await {
        warn!(error = %e, "Failed to roll back tag transaction");
    }
}
