use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    Category, Course, CourseClass, CourseContent, CourseListItem, CourseModule, NewCategory,
    NewClass, NewCourse, NewModule, UpdateCourse,
};
use crate::db::repositories::{CartRepository, CatalogRepository, EnrollmentRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{CurrentUser, Identity, MaybeUser};

// Categories

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = CatalogRepository::list_categories(&state.db).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    identity.require_admin()?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = CatalogRepository::create_category(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// Courses

#[derive(Debug, Deserialize)]
pub struct CourseFilter {
    pub category: Option<Uuid>,
}

pub async fn list_courses(
    State(state): State<AppState>,
    MaybeUser(identity): MaybeUser,
    Query(filter): Query<CourseFilter>,
) -> AppResult<Json<Vec<CourseListItem>>> {
    let mut items = CatalogRepository::list_courses(&state.db, filter.category).await?;

    // Guests get the plain catalog; identified callers additionally see
    // whether each course is already in their cart or library.
    if let Some(identity) = identity {
        let in_cart = CartRepository::course_ids(&state.db, identity.id).await?;
        let enrolled = EnrollmentRepository::enrolled_course_ids(&state.db, identity.id).await?;
        for item in &mut items {
            item.in_cart = in_cart.contains(&item.id);
            item.enrolled = enrolled.contains(&item.id);
        }
    }

    Ok(Json(items))
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub in_cart: bool,
    pub enrolled: bool,
}

pub async fn get_course(
    State(state): State<AppState>,
    MaybeUser(identity): MaybeUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<CourseDetail>> {
    let course = CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    let (in_cart, enrolled) = match identity {
        Some(identity) => (
            CartRepository::course_ids(&state.db, identity.id)
                .await?
                .contains(&course_id),
            EnrollmentRepository::exists(&state.db, identity.id, course_id).await?,
        ),
        None => (false, false),
    };

    Ok(Json(CourseDetail {
        course,
        in_cart,
        enrolled,
    }))
}

pub async fn course_content(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<CourseContent>> {
    let course = CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;
    let modules = CatalogRepository::course_content(&state.db, course_id).await?;
    Ok(Json(CourseContent { course, modules }))
}

pub async fn create_course(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(payload): Json<NewCourse>,
) -> AppResult<(StatusCode, Json<Course>)> {
    identity.require_instructor()?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    CatalogRepository::get_category(&state.db, payload.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("category not found".into()))?;

    let course = CatalogRepository::create_course(&state.db, identity.id, &payload).await?;
    info!(course_id = %course.id, instructor_id = %identity.id, "created course");

    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<UpdateCourse>,
) -> AppResult<Json<Course>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let course = fetch_managed_course(&state, &identity, course_id).await?;
    let updated = CatalogRepository::update_course(&state.db, course.id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete_course(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let course = fetch_managed_course(&state, &identity, course_id).await?;

    // A course with enrollments stays: students keep access to what they
    // bought.
    let enrollments = CatalogRepository::enrollment_count(&state.db, course.id).await?;
    if enrollments > 0 {
        return Err(AppError::Conflict(
            "course has active enrollments and cannot be deleted".into(),
        ));
    }

    CatalogRepository::delete_course(&state.db, course.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Modules and classes

pub async fn add_module(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<NewModule>,
) -> AppResult<(StatusCode, Json<CourseModule>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let course = fetch_managed_course(&state, &identity, course_id).await?;
    let module = CatalogRepository::create_module(&state.db, course.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

pub async fn add_class(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<NewClass>,
) -> AppResult<(StatusCode, Json<CourseClass>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let module = CatalogRepository::get_module(&state.db, module_id)
        .await?
        .ok_or_else(|| AppError::NotFound("module not found".into()))?;
    fetch_managed_course(&state, &identity, module.course_id).await?;

    let class = CatalogRepository::create_class(&state.db, module.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

async fn fetch_managed_course(
    state: &AppState,
    identity: &Identity,
    course_id: Uuid,
) -> AppResult<Course> {
    let course = CatalogRepository::get_course(&state.db, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("course not found".into()))?;

    if !identity.can_manage_course(course.instructor_id) {
        return Err(AppError::Authorization(
            "only the owning instructor or an admin can modify this course".into(),
        ));
    }

    Ok(course)
}
