use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{Review, ReviewDetail};

pub struct ReviewRepository;

impl ReviewRepository {
    /// One review per (student, course): a resubmission replaces the prior
    /// rating and comment in place.
    pub async fn upsert(
        pool: &PgPool,
        student_id: Uuid,
        course_id: Uuid,
        rating: i16,
        comment: Option<&str>,
    ) -> DbResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (student_id, course_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, course_id)
            DO UPDATE SET rating = EXCLUDED.rating,
                          comment = EXCLUDED.comment,
                          updated_at = now()
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(pool)
        .await?;
        Ok(review)
    }

    pub async fn get(pool: &PgPool, review_id: Uuid) -> DbResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(review_id)
            .fetch_optional(pool)
            .await?;
        Ok(review)
    }

    pub async fn delete(pool: &PgPool, review_id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn list_for_course(
        pool: &PgPool,
        course_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<ReviewDetail>> {
        let reviews = sqlx::query_as::<_, ReviewDetail>(
            r#"
            SELECT r.id, r.student_id, u.name AS student_name, r.rating, r.comment, r.updated_at
            FROM reviews r
            JOIN users u ON u.id = r.student_id
            WHERE r.course_id = $1
            ORDER BY r.updated_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(course_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(reviews)
    }

    /// Aggregates recomputed from the full review set at read time.
    pub async fn course_aggregates(
        pool: &PgPool,
        course_id: Uuid,
    ) -> DbResult<(i64, Option<f64>)> {
        let row: (i64, Option<f64>) = sqlx::query_as(
            "SELECT COUNT(*), AVG(rating)::float8 FROM reviews WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}
