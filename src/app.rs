use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::request_tracing_middleware,
    modules::{
        auth::routes::auth_routes, cart::routes::cart_routes, catalog::routes::catalog_routes,
        certificates::routes::certificate_routes, progress::routes::progress_routes,
        reviews::routes::review_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(cart_routes())
        .merge(progress_routes())
        .merge(certificate_routes())
        .merge(review_routes())
        .layer(middleware::from_fn(request_tracing_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
