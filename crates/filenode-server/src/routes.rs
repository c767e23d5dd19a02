//! Route table: one HTTP endpoint per `FileNode` operation, plus the
//! middleware stack.

use crate::{handlers, middleware as fn_middleware, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.cors_enabled {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/v1/blocks/{cid}", get(handlers::get_block))
        .route(
            "/v1/spaces/{space_id}/files/{file_id}/blocks",
            post(handlers::add_blocks),
        )
        .route(
            "/v1/spaces/{space_id}/files/{file_id}/bind",
            post(handlers::bind_blocks),
        )
        .route("/v1/spaces/{space_id}/check", post(handlers::check_blocks))
        .route("/v1/spaces/{space_id}/files", delete(handlers::delete_files))
        .route("/v1/spaces/{space_id}", get(handlers::space_info))
        .route(
            "/v1/spaces/{space_id}/files/{file_id}",
            get(handlers::file_info),
        )
        .layer(axum_middleware::from_fn(fn_middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(fn_middleware::logging_middleware))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            fn_middleware::auth_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}
