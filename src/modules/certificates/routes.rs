use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{generate_certificate, verify_certificate};
use crate::app_state::AppState;

pub fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/student/courses/{course_id}/certificate",
            post(generate_certificate),
        )
        .route("/certificates/{hash}", get(verify_certificate))
}
