use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::DbResult;
use crate::db::models::{
    Category, Course, CourseClass, CourseListItem, CourseModule, ModuleContent, NewCategory,
    NewClass, NewCourse, NewModule, UpdateCourse,
};

pub struct CatalogRepository;

impl CatalogRepository {
    // Categories

    pub async fn list_categories(pool: &PgPool) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(pool)
                .await?;
        Ok(categories)
    }

    pub async fn create_category(pool: &PgPool, new_category: &NewCategory) -> DbResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&new_category.name)
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    pub async fn get_category(pool: &PgPool, category_id: Uuid) -> DbResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
                .bind(category_id)
                .fetch_optional(pool)
                .await?;
        Ok(category)
    }

    // Courses

    pub async fn get_course(pool: &PgPool, course_id: Uuid) -> DbResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(pool)
            .await?;
        Ok(course)
    }

    pub async fn list_courses(
        pool: &PgPool,
        category_id: Option<Uuid>,
    ) -> DbResult<Vec<CourseListItem>> {
        let items = sqlx::query_as::<_, CourseListItem>(
            r#"
            SELECT c.id, c.title, c.description, c.image_url, c.price_cents,
                   cat.name AS category_name, u.name AS instructor_name
            FROM courses c
            JOIN categories cat ON cat.id = c.category_id
            JOIN users u ON u.id = c.instructor_id
            WHERE $1::uuid IS NULL OR c.category_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(category_id)
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn create_course(
        pool: &PgPool,
        instructor_id: Uuid,
        new_course: &NewCourse,
    ) -> DbResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (instructor_id, category_id, title, description, image_url, price_cents)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(instructor_id)
        .bind(new_course.category_id)
        .bind(&new_course.title)
        .bind(&new_course.description)
        .bind(&new_course.image_url)
        .bind(new_course.price_cents)
        .fetch_one(pool)
        .await?;
        Ok(course)
    }

    pub async fn update_course(
        pool: &PgPool,
        course_id: Uuid,
        update: &UpdateCourse,
    ) -> DbResult<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_url = COALESCE($3, image_url),
                category_id = COALESCE($4, category_id),
                price_cents = COALESCE($5, price_cents),
                updated_at = now()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(update.category_id)
        .bind(update.price_cents)
        .bind(course_id)
        .fetch_one(pool)
        .await?;
        Ok(course)
    }

    pub async fn delete_course(pool: &PgPool, course_id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn enrollment_count(pool: &PgPool, course_id: Uuid) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
                .bind(course_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    // Modules and classes

    pub async fn create_module(
        pool: &PgPool,
        course_id: Uuid,
        new_module: &NewModule,
    ) -> DbResult<CourseModule> {
        let module = sqlx::query_as::<_, CourseModule>(
            r#"
            INSERT INTO course_modules (course_id, title, order_index)
            VALUES ($1, $2, $3)
            RETURNING id, course_id, title, order_index
            "#,
        )
        .bind(course_id)
        .bind(&new_module.title)
        .bind(new_module.order_index)
        .fetch_one(pool)
        .await?;
        Ok(module)
    }

    pub async fn get_module(pool: &PgPool, module_id: Uuid) -> DbResult<Option<CourseModule>> {
        let module = sqlx::query_as::<_, CourseModule>(
            "SELECT id, course_id, title, order_index FROM course_modules WHERE id = $1",
        )
        .bind(module_id)
        .fetch_optional(pool)
        .await?;
        Ok(module)
    }

    pub async fn create_class(
        pool: &PgPool,
        module_id: Uuid,
        new_class: &NewClass,
    ) -> DbResult<CourseClass> {
        let class = sqlx::query_as::<_, CourseClass>(
            r#"
            INSERT INTO classes (module_id, title, order_index, video_url, material_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, module_id, title, order_index, video_url, material_url
            "#,
        )
        .bind(module_id)
        .bind(&new_class.title)
        .bind(new_class.order_index)
        .bind(&new_class.video_url)
        .bind(&new_class.material_url)
        .fetch_one(pool)
        .await?;
        Ok(class)
    }

    /// Resolve the course a class belongs to, through its parent module.
    pub async fn course_id_for_class(pool: &PgPool, class_id: Uuid) -> DbResult<Option<Uuid>> {
        let course_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT m.course_id
            FROM classes c
            JOIN course_modules m ON m.id = c.module_id
            WHERE c.id = $1
            "#,
        )
        .bind(class_id)
        .fetch_optional(pool)
        .await?;
        Ok(course_id)
    }

    /// Modules with their classes, both ordered ascending by order_index.
    pub async fn course_content(pool: &PgPool, course_id: Uuid) -> DbResult<Vec<ModuleContent>> {
        let modules = sqlx::query_as::<_, CourseModule>(
            r#"
            SELECT id, course_id, title, order_index
            FROM course_modules
            WHERE course_id = $1
            ORDER BY order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        let classes = sqlx::query_as::<_, CourseClass>(
            r#"
            SELECT c.id, c.module_id, c.title, c.order_index, c.video_url, c.material_url
            FROM classes c
            JOIN course_modules m ON m.id = c.module_id
            WHERE m.course_id = $1
            ORDER BY c.order_index
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        let content = modules
            .into_iter()
            .map(|module| {
                let classes = classes
                    .iter()
                    .filter(|c| c.module_id == module.id)
                    .cloned()
                    .collect();
                ModuleContent { module, classes }
            })
            .collect();

        Ok(content)
    }
}
