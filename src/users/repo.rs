use sqlx::PgPool;

use super::repo_types::{NewUser, User};

pub async fn list_users(db: &PgPool) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, first_name, last_name, subscribed_at
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, first_name, last_name, subscribed_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Find a user by email.
pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, first_name, last_name, subscribed_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await
}

/// Lowest id wins; stable as long as that row is not deleted.
pub async fn find_first(db: &PgPool) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, first_name, last_name, subscribed_at
        FROM users
        ORDER BY id
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, new: &NewUser) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, password, first_name, last_name, subscribed_at
        "#,
    )
    .bind(&new.email)
    .bind(&new.password)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .fetch_one(db)
    .await
}
