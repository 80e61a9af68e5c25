use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::CartLineDetail;

pub struct CartRepository;

impl CartRepository {
    /// Idempotent: adding a course already in the cart is a no-op.
    pub async fn add_line(pool: &PgPool, student_id: Uuid, course_id: Uuid) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_lines (student_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (student_id, course_id) DO NOTHING
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Idempotent: removing an absent line succeeds.
    pub async fn remove_line(pool: &PgPool, student_id: Uuid, course_id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_lines WHERE student_id = $1 AND course_id = $2")
            .bind(student_id)
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Lines joined with live course title and price.
    pub async fn list_lines(pool: &PgPool, student_id: Uuid) -> DbResult<Vec<CartLineDetail>> {
        let lines = sqlx::query_as::<_, CartLineDetail>(
            r#"
            SELECT cl.course_id, c.title, c.price_cents, cl.added_at
            FROM cart_lines cl
            JOIN courses c ON c.id = cl.course_id
            WHERE cl.student_id = $1
            ORDER BY cl.added_at
            "#,
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(lines)
    }

    pub async fn course_ids(pool: &PgPool, student_id: Uuid) -> DbResult<Vec<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT course_id FROM cart_lines WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(pool)
                .await?;
        Ok(ids)
    }
}
