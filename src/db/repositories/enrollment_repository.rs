use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::error::{DatabaseError, DbResult};
use crate::db::models::{Enrollment, EnrollmentDetail, ProgressUpdate};
use crate::db::repositories::certificate_repository::CertificateRepository;

/// Progress over the flattened lesson list. A course with no lessons is a
/// defined edge case: progress stays 0, there is no division.
pub fn compute_progress(completed: i64, total: i64) -> i32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as i32
}

pub struct EnrollmentRepository;

impl EnrollmentRepository {
    pub async fn find(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;
        Ok(enrollment)
    }

    pub async fn exists(pool: &PgPool, student_id: Uuid, course_id: Uuid) -> DbResult<bool> {
        Ok(Self::find(pool, student_id, course_id).await?.is_some())
    }

    /// Direct enrollment. A duplicate pair surfaces as Duplicate via the
    /// unique constraint, never as a second row.
    pub async fn create(pool: &PgPool, student_id: Uuid, course_id: Uuid) -> DbResult<Enrollment> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (student_id, course_id, progress)
            VALUES ($1, $2, 0)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(pool)
        .await?;
        Ok(enrollment)
    }

    pub async fn list_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> DbResult<Vec<EnrollmentDetail>> {
        let enrollments = sqlx::query_as::<_, EnrollmentDetail>(
            r#"
            SELECT e.course_id, c.title AS course_title, e.progress, e.enrolled_at,
                   cert.hash AS certificate_hash
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            LEFT JOIN certificates cert ON cert.enrollment_id = e.id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(enrollments)
    }

    pub async fn enrolled_course_ids(pool: &PgPool, student_id: Uuid) -> DbResult<Vec<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT course_id FROM enrollments WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(pool)
                .await?;
        Ok(ids)
    }

    /// Convert every cart line into an enrollment and clear the cart, in one
    /// transaction. Lines whose course is already enrolled are skipped, the
    /// rest enroll, and the cart always empties on success. Returns the
    /// number of enrollments actually created.
    pub async fn checkout(pool: &PgPool, student_id: Uuid) -> DbResult<u64> {
        let mut tx = pool.begin().await?;

        let course_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT course_id FROM cart_lines WHERE student_id = $1 FOR UPDATE",
        )
        .bind(student_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut created = 0;
        for course_id in &course_ids {
            let result = sqlx::query(
                r#"
                INSERT INTO enrollments (student_id, course_id, progress)
                VALUES ($1, $2, 0)
                ON CONFLICT (student_id, course_id) DO NOTHING
                "#,
            )
            .bind(student_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected();
        }

        sqlx::query("DELETE FROM cart_lines WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Flip a class completion marker and recompute the enrollment's
    /// progress, issuing a certificate when the course just reached 100%.
    /// Runs in one transaction so the caller completing the last lesson
    /// receives the certificate hash in the same response. Unmarking after
    /// issuance lowers progress but never revokes the certificate: issuance
    /// is a historical fact.
    pub async fn set_completion(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
        class_id: Uuid,
        completed: bool,
        certificate_secret: &str,
    ) -> DbResult<ProgressUpdate> {
        let mut tx = pool.begin().await?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2 FOR UPDATE",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        if completed {
            // Idempotent: re-marking a completed class is a no-op.
            sqlx::query(
                r#"
                INSERT INTO class_completions (student_id, class_id)
                VALUES ($1, $2)
                ON CONFLICT (student_id, class_id) DO NOTHING
                "#,
            )
            .bind(student_id)
            .bind(class_id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query("DELETE FROM class_completions WHERE student_id = $1 AND class_id = $2")
                .bind(student_id)
                .bind(class_id)
                .execute(&mut *tx)
                .await?;
        }

        let (completed_classes, total_classes) =
            Self::completion_counts(&mut tx, student_id, course_id).await?;
        let progress = compute_progress(completed_classes, total_classes);

        sqlx::query("UPDATE enrollments SET progress = $1 WHERE id = $2")
            .bind(progress)
            .bind(enrollment.id)
            .execute(&mut *tx)
            .await?;

        let existing_hash: Option<String> =
            sqlx::query_scalar("SELECT hash FROM certificates WHERE enrollment_id = $1")
                .bind(enrollment.id)
                .fetch_optional(&mut *tx)
                .await?;

        let certificate_hash = match existing_hash {
            Some(hash) => Some(hash),
            None if progress == 100 => {
                let certificate =
                    CertificateRepository::issue_in_tx(&mut tx, &enrollment, certificate_secret)
                        .await?;
                Some(certificate.hash)
            }
            None => None,
        };

        tx.commit().await?;

        Ok(ProgressUpdate {
            course_id,
            progress,
            completed_classes,
            total_classes,
            certificate_hash,
        })
    }

    pub async fn get_progress(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<Option<ProgressUpdate>> {
        let Some(enrollment) = Self::find(pool, student_id, course_id).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let (completed_classes, total_classes) =
            Self::completion_counts(&mut tx, student_id, course_id).await?;
        tx.commit().await?;

        let certificate_hash = CertificateRepository::find_for_enrollment(pool, enrollment.id)
            .await?
            .map(|c| c.hash);

        Ok(Some(ProgressUpdate {
            course_id,
            progress: enrollment.progress,
            completed_classes,
            total_classes,
            certificate_hash,
        }))
    }

    async fn completion_counts(
        tx: &mut Transaction<'_, Postgres>,
        student_id: Uuid,
        course_id: Uuid,
    ) -> DbResult<(i64, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM classes c
            JOIN course_modules m ON m.id = c.module_id
            WHERE m.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_one(&mut **tx)
        .await?;

        let completed: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM class_completions cc
            JOIN classes c ON c.id = cc.class_id
            JOIN course_modules m ON m.id = c.module_id
            WHERE cc.student_id = $1 AND m.course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok((completed, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_lesson_course_reports_zero_progress() {
        assert_eq!(compute_progress(0, 0), 0);
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_exactly_100() {
        let total = 7;
        let mut last = 0;
        for completed in 0..=total {
            let progress = compute_progress(completed, total);
            assert!(progress >= last, "progress regressed at step {completed}");
            last = progress;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn progress_rounds_to_nearest_integer() {
        assert_eq!(compute_progress(1, 3), 33);
        assert_eq!(compute_progress(2, 3), 67);
        assert_eq!(compute_progress(1, 8), 13);
    }

    #[test]
    fn full_completion_is_exactly_100_for_any_size() {
        for total in 1..=25 {
            assert_eq!(compute_progress(total, total), 100);
        }
    }
}
