use axum::{
    extract::{Path, State},
    Json,
};
use secrecy::ExposeSecret;
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{EnrollmentDetail, ProgressUpdate};
use crate::db::repositories::{CatalogRepository, EnrollmentRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

pub async fn my_courses(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<Vec<EnrollmentDetail>>> {
    identity.require_student()?;
    let enrollments = EnrollmentRepository::list_for_student(&state.db, identity.id).await?;
    Ok(Json(enrollments))
}

pub async fn mark_class_complete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(class_id): Path<Uuid>,
) -> AppResult<Json<ProgressUpdate>> {
    set_completion(&state, identity.id, class_id, true).await
}

pub async fn mark_class_incomplete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(class_id): Path<Uuid>,
) -> AppResult<Json<ProgressUpdate>> {
    set_completion(&state, identity.id, class_id, false).await
}

pub async fn course_progress(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ProgressUpdate>> {
    identity.require_student()?;

    let progress = EnrollmentRepository::get_progress(&state.db, identity.id, course_id)
        .await?
        .ok_or_else(|| AppError::Precondition("not enrolled in this course".into()))?;

    Ok(Json(progress))
}

async fn set_completion(
    state: &AppState,
    student_id: Uuid,
    class_id: Uuid,
    completed: bool,
) -> AppResult<Json<ProgressUpdate>> {
    let course_id = CatalogRepository::course_id_for_class(&state.db, class_id)
        .await?
        .ok_or_else(|| AppError::NotFound("class not found".into()))?;

    if !EnrollmentRepository::exists(&state.db, student_id, course_id).await? {
        return Err(AppError::Precondition("not enrolled in this course".into()));
    }

    let update = EnrollmentRepository::set_completion(
        &state.db,
        student_id,
        course_id,
        class_id,
        completed,
        state.env.auth.certificate_secret.expose_secret(),
    )
    .await?;

    if completed && update.progress == 100 {
        info!(%student_id, %course_id, "course completed");
    }

    Ok(Json(update))
}
