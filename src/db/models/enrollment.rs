use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub progress: i32,
    pub enrolled_at: OffsetDateTime,
}

/// Enrollment joined with course metadata and the certificate hash, if one
/// has been issued for it.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct EnrollmentDetail {
    pub course_id: Uuid,
    pub course_title: String,
    pub progress: i32,
    pub enrolled_at: OffsetDateTime,
    pub certificate_hash: Option<String>,
}

/// Result of a completion-state change: the recomputed progress and, when
/// the change pushed the course to 100%, the freshly issued certificate.
#[derive(Debug, Serialize)]
pub struct ProgressUpdate {
    pub course_id: Uuid,
    pub progress: i32,
    pub completed_classes: i64,
    pub total_classes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_hash: Option<String>,
}
