use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{course_reviews, delete_review, upsert_review};
use crate::app_state::AppState;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(upsert_review).put(upsert_review))
        .route("/reviews/{review_id}", delete(delete_review))
        .route("/courses/{course_id}/reviews", get(course_reviews))
}
