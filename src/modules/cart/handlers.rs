use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{CartView, CheckoutOutcome, Enrollment};
use crate::db::repositories::{CartRepository, CatalogRepository, EnrollmentRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

pub async fn add_to_cart(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<CartView>)> {
    identity.require_student()?;

    CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    // No self-repurchase: a course the student already owns cannot go back
    // into the cart.
    if EnrollmentRepository::exists(&state.db, identity.id, course_id).await? {
        return Err(AppError::Conflict("already enrolled in this course".into()));
    }

    CartRepository::add_line(&state.db, identity.id, course_id).await?;

    let lines = CartRepository::list_lines(&state.db, identity.id).await?;
    Ok((StatusCode::CREATED, Json(CartView::new(lines))))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    identity.require_student()?;
    CartRepository::remove_line(&state.db, identity.id, course_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn view_cart(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<CartView>> {
    identity.require_student()?;
    let lines = CartRepository::list_lines(&state.db, identity.id).await?;
    Ok(Json(CartView::new(lines)))
}

pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> AppResult<Json<CheckoutOutcome>> {
    identity.require_student()?;

    let lines = CartRepository::course_ids(&state.db, identity.id).await?;
    if lines.is_empty() {
        return Err(AppError::Precondition("cart is empty".into()));
    }

    let enrollments_created = EnrollmentRepository::checkout(&state.db, identity.id).await?;
    info!(
        student_id = %identity.id,
        enrollments_created,
        "checkout completed"
    );

    Ok(Json(CheckoutOutcome {
        enrollments_created,
    }))
}

/// Bypass-cart path: enroll in a single course directly.
pub async fn enroll_direct(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<Enrollment>)> {
    identity.require_student()?;

    CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    let enrollment = EnrollmentRepository::create(&state.db, identity.id, course_id).await?;

    // The course is owned now; a stale cart line for it serves no purpose.
    CartRepository::remove_line(&state.db, identity.id, course_id).await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}
