use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Course row joined with instructor and category names, plus per-caller
/// flags resolved when the request carries a valid credential.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CourseListItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: i64,
    pub category_name: String,
    pub instructor_name: String,
    #[sqlx(default)]
    pub in_cart: bool,
    #[sqlx(default)]
    pub enrolled: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCourse {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Uuid,
    #[validate(range(min = 0))]
    pub price_cents: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
}

/// Ordered content unit inside a course. `order_index` is unique within
/// the parent course and listing is always ascending.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CourseModule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub order_index: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewModule {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0))]
    pub order_index: i32,
}

/// A single lesson. Video and material references are optional.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CourseClass {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub order_index: i32,
    pub video_url: Option<String>,
    pub material_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewClass {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0))]
    pub order_index: i32,
    pub video_url: Option<String>,
    pub material_url: Option<String>,
}

/// Full course content tree, modules and classes in display order.
#[derive(Debug, Serialize)]
pub struct CourseContent {
    pub course: Course,
    pub modules: Vec<ModuleContent>,
}

#[derive(Debug, Serialize)]
pub struct ModuleContent {
    #[serde(flatten)]
    pub module: CourseModule,
    pub classes: Vec<CourseClass>,
}
