use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{course_progress, mark_class_complete, mark_class_incomplete, my_courses};
use crate::app_state::AppState;

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/students/courses", get(my_courses))
        .route(
            "/students/classes/{class_id}/complete",
            post(mark_class_complete).delete(mark_class_incomplete),
        )
        .route(
            "/students/courses/{course_id}/progress",
            get(course_progress),
        )
}
