use axum::{routing::get, Router};

use crate::db::DbState;

pub mod health;
pub mod response;
pub mod tags_handlers;

/// Creates the tags API router
pub fn create_tags_router() -> Router<DbState> {
    Router::new()
        .route(
            "/tags/",
            get(tags_handlers::list_tags).post(tags_handlers::create_tag),
        )
        .route(
            "/tags",
            get(tags_handlers::list_tags).post(tags_handlers::create_tag),
        )
        .route(
            "/tags/{tag_id}",
            get(tags_handlers::get_tag)
                .put(tags_handlers::update_tag)
                .delete(tags_handlers::delete_tag),
        )
}

/// Creates the application router with all routes bound to `db`
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(create_tags_router())
        .with_state(db)
}
