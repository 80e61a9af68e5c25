use sha2::{Digest, Sha256};
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{Certificate, CertificateView, Enrollment};

/// Certificate identifiers are a SHA-256 over the enrollment pair, the
/// issuance instant and a server-side secret: globally unique, stable once
/// issued, and not derivable from public data. The unique index on
/// certificates.hash backstops the collision-free assumption.
pub fn certificate_hash(
    student_id: Uuid,
    course_id: Uuid,
    issued_at_nanos: i128,
    secret: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(student_id.as_bytes());
    hasher.update(course_id.as_bytes());
    hasher.update(issued_at_nanos.to_be_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub struct CertificateRepository;

impl CertificateRepository {
    pub async fn find_for_enrollment(
        pool: &PgPool,
        enrollment_id: Uuid,
    ) -> DbResult<Option<Certificate>> {
        let certificate = sqlx::query_as::<_, Certificate>(
            "SELECT id, hash, enrollment_id, issued_at FROM certificates WHERE enrollment_id = $1",
        )
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await?;
        Ok(certificate)
    }

    /// Mint a certificate inside an already-open transaction. Callers are
    /// responsible for having checked that none exists yet.
    pub async fn issue_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        enrollment: &Enrollment,
        secret: &str,
    ) -> DbResult<Certificate> {
        let issued_at = OffsetDateTime::now_utc();
        let hash = certificate_hash(
            enrollment.student_id,
            enrollment.course_id,
            issued_at.unix_timestamp_nanos(),
            secret,
        );

        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (hash, enrollment_id, issued_at)
            VALUES ($1, $2, $3)
            RETURNING id, hash, enrollment_id, issued_at
            "#,
        )
        .bind(&hash)
        .bind(enrollment.id)
        .bind(issued_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(certificate)
    }

    /// Idempotent issuance: returns the existing certificate when one was
    /// already minted for this enrollment, including under a concurrent
    /// double-issue race (the unique constraint fails the loser, which then
    /// reads the winner's row).
    pub async fn issue(
        pool: &PgPool,
        enrollment: &Enrollment,
        secret: &str,
    ) -> DbResult<Certificate> {
        if let Some(existing) = Self::find_for_enrollment(pool, enrollment.id).await? {
            return Ok(existing);
        }

        let mut tx = pool.begin().await?;
        match Self::issue_in_tx(&mut tx, enrollment, secret).await {
            Ok(certificate) => {
                tx.commit().await?;
                Ok(certificate)
            }
            Err(DatabaseError::Duplicate) => {
                tx.rollback().await?;
                Self::find_for_enrollment(pool, enrollment.id)
                    .await?
                    .ok_or(DatabaseError::NotFound)
            }
            Err(err) => Err(err),
        }
    }

    /// Public verification lookup: no auth, denormalized for rendering.
    pub async fn lookup(pool: &PgPool, hash: &str) -> DbResult<Option<CertificateView>> {
        let view = sqlx::query_as::<_, CertificateView>(
            r#"
            SELECT cert.hash, u.name AS student_name, c.title AS course_title, cert.issued_at
            FROM certificates cert
            JOIN enrollments e ON e.id = cert.enrollment_id
            JOIN users u ON u.id = e.student_id
            JOIN courses c ON c.id = e.course_id
            WHERE cert.hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(pool)
        .await?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_64_lowercase_hex_chars() {
        let hash = certificate_hash(Uuid::new_v4(), Uuid::new_v4(), 1_700_000_000, "secret");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_is_deterministic_for_identical_inputs() {
        let student = Uuid::new_v4();
        let course = Uuid::new_v4();
        let a = certificate_hash(student, course, 42, "secret");
        let b = certificate_hash(student, course, 42, "secret");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_changes_with_any_input() {
        let student = Uuid::new_v4();
        let course = Uuid::new_v4();
        let base = certificate_hash(student, course, 42, "secret");
        assert_ne!(base, certificate_hash(Uuid::new_v4(), course, 42, "secret"));
        assert_ne!(base, certificate_hash(student, Uuid::new_v4(), 42, "secret"));
        assert_ne!(base, certificate_hash(student, course, 43, "secret"));
        assert_ne!(base, certificate_hash(student, course, 42, "other"));
    }
}
