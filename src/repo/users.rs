use sqlx::PgExecutor;

use crate::model::{NewUser, User, UserUpdate};

/// Repository for the local copy of identity-provider users
pub struct UsersRepo;

impl UsersRepo {
    /// Insert a user, returning the existing record if the external id is already known
    #[tracing::instrument("Insert a new user record", skip(executor))]
    pub async fn insert<'conn>(
        executor: impl PgExecutor<'conn>,
        new_user: &NewUser,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            "insert into users(external_id, email, first_name, last_name, profile_image_url, role)
            values ($1, $2, $3, $4, $5, $6)
            on conflict (external_id) do update set external_id = excluded.external_id
            returning *",
        )
        .bind(&new_user.external_id)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.profile_image_url)
        .bind(new_user.role)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument("Fetch a user by external id", skip(executor))]
    pub async fn fetch_by_external_id<'conn>(
        executor: impl PgExecutor<'conn>,
        external_id: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("select * from users where external_id=$1")
            .bind(external_id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument("Update a user record", skip(executor))]
    pub async fn update<'conn>(
        executor: impl PgExecutor<'conn>,
        external_id: &str,
        update: &UserUpdate,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "update users set
                email = coalesce($2, email),
                first_name = coalesce($3, first_name),
                last_name = coalesce($4, last_name),
                profile_image_url = coalesce($5, profile_image_url)
            where external_id=$1
            returning *",
        )
        .bind(external_id)
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.profile_image_url)
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument("Delete a user record", skip(executor))]
    pub async fn delete<'conn>(
        executor: impl PgExecutor<'conn>,
        external_id: &str,
    ) -> sqlx::Result<bool> {
        let result = sqlx::query("delete from users where external_id=$1")
            .bind(external_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument("Fetch all users", skip(executor))]
    pub async fn fetch_all<'conn>(executor: impl PgExecutor<'conn>) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>("select * from users order by created_at desc, id desc")
            .fetch_all(executor)
            .await
    }

    #[tracing::instrument("Count users", skip(executor))]
    pub async fn count<'conn>(executor: impl PgExecutor<'conn>) -> sqlx::Result<i64> {
        let (count,) = sqlx::query_as::<_, (i64,)>("select count(*) from users")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
