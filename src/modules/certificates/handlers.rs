use axum::{
    extract::{Path, State},
    Json,
};
use secrecy::ExposeSecret;
use tracing::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Certificate, CertificateView};
use crate::db::repositories::{CertificateRepository, EnrollmentRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

pub async fn generate_certificate(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<Certificate>> {
    identity.require_student()?;

    let enrollment = EnrollmentRepository::find(&state.db, identity.id, course_id)
        .await?
        .ok_or_else(|| AppError::Precondition("not enrolled in this course".into()))?;

    if enrollment.progress < 100 {
        return Err(AppError::Precondition("course is not complete".into()));
    }

    let certificate = CertificateRepository::issue(
        &state.db,
        &enrollment,
        state.env.auth.certificate_secret.expose_secret(),
    )
    .await?;
    info!(student_id = %identity.id, %course_id, "certificate issued");

    Ok(Json(certificate))
}

/// Public verification: anyone holding the identifier can confirm the
/// completion without authenticating.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> AppResult<Json<CertificateView>> {
    let view = CertificateRepository::lookup(&state.db, &hash)
        .await?
        .ok_or_else(|| AppError::NotFound("certificate not found".into()))?;
    Ok(Json(view))
}
