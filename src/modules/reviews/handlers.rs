use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{NewReview, Review, ReviewPage};
use crate::db::repositories::{CatalogRepository, EnrollmentRepository, ReviewRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Normalize pagination inputs to a 1-based page and a bounded page size.
fn normalize_pagination(pagination: &Pagination) -> (u32, u32) {
    let page = pagination.page.unwrap_or(1).max(1);
    let per_page = pagination
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

pub async fn upsert_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<NewReview>,
) -> AppResult<Json<Review>> {
    identity.require_student()?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    CatalogRepository::get_course(&state.db, payload.course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    // Reviews are enrollment-gated.
    if !EnrollmentRepository::exists(&state.db, identity.id, payload.course_id).await? {
        return Err(AppError::Precondition("not enrolled in this course".into()));
    }

    let review = ReviewRepository::upsert(
        &state.db,
        identity.id,
        payload.course_id,
        payload.rating,
        payload.comment.as_deref(),
    )
    .await?;

    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let review = ReviewRepository::get(&state.db, review_id)
        .await?
        .ok_or_else(|| AppError::NotFound("review not found".into()))?;

    if !identity.can_delete_review(review.student_id) {
        return Err(AppError::Authorization(
            "only the review's author or an admin can delete it".into(),
        ));
    }

    ReviewRepository::delete(&state.db, review.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn course_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ReviewPage>> {
    CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    let (page, per_page) = normalize_pagination(&pagination);
    let offset = i64::from(page - 1) * i64::from(per_page);

    let reviews =
        ReviewRepository::list_for_course(&state.db, course_id, offset, i64::from(per_page))
            .await?;
    let (total, average_rating) = ReviewRepository::course_aggregates(&state.db, course_id).await?;

    Ok(Json(ReviewPage {
        reviews,
        total,
        average_rating,
        page,
        per_page,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_first_page() {
        let (page, per_page) = normalize_pagination(&Pagination {
            page: None,
            per_page: None,
        });
        assert_eq!((page, per_page), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let (page, per_page) = normalize_pagination(&Pagination {
            page: Some(0),
            per_page: Some(10_000),
        });
        assert_eq!((page, per_page), (1, MAX_PER_PAGE));
    }
}
