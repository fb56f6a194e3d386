use sqlx::PgExecutor;

use crate::model::{Course, NewCourse};

/// Repository for the course catalog
pub struct CoursesRepo;

impl CoursesRepo {
    #[tracing::instrument(name = "Fetch all courses", skip(executor))]
    pub async fn fetch_all<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Vec<Course>> {
        sqlx::query_as::<_, Course>("select * from courses order by id")
            .fetch_all(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch a course by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: i32,
    ) -> sqlx::Result<Option<Course>> {
        sqlx::query_as::<_, Course>("select * from courses where id=$1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Insert course", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_course: &NewCourse,
    ) -> sqlx::Result<Course> {
        sqlx::query_as::<_, Course>(
            "insert into courses(title, description, price, image_url, duration, instructor, start_date, end_date, day_of_week, start_time, time_zone)
            values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            returning *",
        )
        .bind(&new_course.title)
        .bind(&new_course.description)
        .bind(new_course.price)
        .bind(&new_course.image_url)
        .bind(&new_course.duration)
        .bind(&new_course.instructor)
        .bind(&new_course.start_date)
        .bind(&new_course.end_date)
        .bind(&new_course.day_of_week)
        .bind(&new_course.start_time)
        .bind(&new_course.time_zone)
        .fetch_one(executor)
        .await
    }
}
