use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

// Uniqueness constraints are the primary race defense: a concurrent
// duplicate insert must surface as Duplicate, not as an opaque 500.
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DatabaseError::Duplicate,
            other => DatabaseError::Sqlx(other),
        }
    }
}

pub type DbResult<T> = Result<T, DatabaseError>;
