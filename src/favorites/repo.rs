use sqlx::PgPool;

use super::repo_types::{FavoriteJoinRow, FavoriteRow, FavoriteTarget};

/// Column names must match the fields of `FavoriteJoinRow`.
const LIST_BY_USER_SQL: &str = r#"
    SELECT f.id, f.user_id,
           p.id AS planet_id, p.name AS planet_name, p.climate AS planet_climate,
           p.terrain AS planet_terrain, p.population AS planet_population,
           c.id AS character_id, c.name AS character_name, c.species AS character_species,
           c.homeworld AS character_homeworld, c.description AS character_description
    FROM favorites f
    LEFT JOIN planets p ON p.id = f.planet_id
    LEFT JOIN characters c ON c.id = f.character_id
    WHERE f.user_id = $1
    ORDER BY f.id
"#;

pub async fn list_by_user(db: &PgPool, user_id: i32) -> sqlx::Result<Vec<FavoriteJoinRow>> {
    sqlx::query_as::<_, FavoriteJoinRow>(LIST_BY_USER_SQL)
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn find(
    db: &PgPool,
    user_id: i32,
    target: FavoriteTarget,
) -> sqlx::Result<Option<FavoriteRow>> {
    let (planet_id, character_id) = target.columns();
    sqlx::query_as::<_, FavoriteRow>(
        r#"
        SELECT id, user_id, planet_id, character_id
        FROM favorites
        WHERE user_id = $1
          AND planet_id IS NOT DISTINCT FROM $2
          AND character_id IS NOT DISTINCT FROM $3
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(planet_id) // Option<i32> → NULL allowed
    .bind(character_id)
    .fetch_optional(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    user_id: i32,
    target: FavoriteTarget,
) -> sqlx::Result<FavoriteRow> {
    let (planet_id, character_id) = target.columns();
    sqlx::query_as::<_, FavoriteRow>(
        r#"
        INSERT INTO favorites (user_id, planet_id, character_id)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, planet_id, character_id
        "#,
    )
    .bind(user_id)
    .bind(planet_id)
    .bind(character_id)
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites")
        .fetch_one(db)
        .await
}
