use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{add_to_cart, checkout, enroll_direct, remove_from_cart, view_cart};
use crate::app_state::AppState;

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/students/cart", get(view_cart))
        .route(
            "/students/cart/{course_id}",
            post(add_to_cart).delete(remove_from_cart),
        )
        .route("/students/{course_id}/enroll", post(enroll_direct))
        .route("/checkout", post(checkout))
}
