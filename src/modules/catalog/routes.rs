use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_class, add_module, course_content, create_category, create_course, delete_course,
    get_course, list_categories, list_courses, update_course,
};
use crate::app_state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{course_id}/content", get(course_content))
        .route("/courses/{course_id}/modules", post(add_module))
        .route("/modules/{module_id}/classes", post(add_class))
}
