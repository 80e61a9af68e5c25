use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Certificate {
    pub id: Uuid,
    pub hash: String,
    pub enrollment_id: Uuid,
    pub issued_at: OffsetDateTime,
}

/// Denormalized certificate data for public verification: everything
/// needed to render the certificate without further lookups or auth.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CertificateView {
    pub hash: String,
    pub student_name: String,
    pub course_title: String,
    pub issued_at: OffsetDateTime,
}
