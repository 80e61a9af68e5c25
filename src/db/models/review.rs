use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewReview {
    pub course_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ReviewDetail {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub updated_at: OffsetDateTime,
}

/// One page of reviews plus aggregates recomputed at read time.
#[derive(Debug, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewDetail>,
    pub total: i64,
    pub average_rating: Option<f64>,
    pub page: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i16) -> NewReview {
        NewReview {
            course_id: Uuid::new_v4(),
            rating,
            comment: None,
        }
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        assert!(review(0).validate().is_err());
        assert!(review(6).validate().is_err());
        for r in 1..=5 {
            assert!(review(r).validate().is_ok());
        }
    }
}
