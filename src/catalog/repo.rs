use sqlx::PgPool;

use super::repo_types::{Character, NewCharacter, NewPlanet, Planet};

pub async fn list_characters(db: &PgPool) -> sqlx::Result<Vec<Character>> {
    sqlx::query_as::<_, Character>(
        r#"
        SELECT id, name, species, homeworld, description
        FROM characters
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn get_character(db: &PgPool, id: i32) -> sqlx::Result<Option<Character>> {
    sqlx::query_as::<_, Character>(
        r#"
        SELECT id, name, species, homeworld, description
        FROM characters
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert or refresh a character keyed by name.
pub async fn upsert_character(db: &PgPool, new: &NewCharacter) -> sqlx::Result<Character> {
    sqlx::query_as::<_, Character>(
        r#"
        INSERT INTO characters (name, species, homeworld, description)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (name) DO UPDATE
            SET species = EXCLUDED.species,
                homeworld = EXCLUDED.homeworld,
                description = EXCLUDED.description
        RETURNING id, name, species, homeworld, description
        "#,
    )
    .bind(&new.name)
    .bind(&new.species)
    .bind(&new.homeworld)
    .bind(&new.description)
    .fetch_one(db)
    .await
}

pub async fn list_planets(db: &PgPool) -> sqlx::Result<Vec<Planet>> {
    sqlx::query_as::<_, Planet>(
        r#"
        SELECT id, name, climate, terrain, population
        FROM planets
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn get_planet(db: &PgPool, id: i32) -> sqlx::Result<Option<Planet>> {
    sqlx::query_as::<_, Planet>(
        r#"
        SELECT id, name, climate, terrain, population
        FROM planets
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert or refresh a planet keyed by name.
pub async fn upsert_planet(db: &PgPool, new: &NewPlanet) -> sqlx::Result<Planet> {
    sqlx::query_as::<_, Planet>(
        r#"
        INSERT INTO planets (name, climate, terrain, population)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (name) DO UPDATE
            SET climate = EXCLUDED.climate,
                terrain = EXCLUDED.terrain,
                population = EXCLUDED.population
        RETURNING id, name, climate, terrain, population
        "#,
    )
    .bind(&new.name)
    .bind(&new.climate)
    .bind(&new.terrain)
    .bind(&new.population)
    .fetch_one(db)
    .await
}
