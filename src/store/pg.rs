use async_trait::async_trait;
use sqlx::PgPool;

use super::{ConflictKind, Store, StoreError, StoreResult};
use crate::catalog::repo as catalog_repo;
use crate::catalog::repo_types::{Character, NewCharacter, NewPlanet, Planet};
use crate::favorites::repo as favorites_repo;
use crate::favorites::repo_types::{Favorite, FavoriteDetails, FavoriteRow, FavoriteTarget};
use crate::users::repo as users_repo;
use crate::users::repo_types::{NewUser, User};

// SQLSTATE class 23: integrity constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn classify(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        let kind = match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => Some(ConflictKind::Duplicate),
            Some(FOREIGN_KEY_VIOLATION) => Some(ConflictKind::MissingReference),
            Some(CHECK_VIOLATION) => Some(ConflictKind::Check),
            _ => None,
        };
        if let Some(kind) = kind {
            return StoreError::conflict(kind, db_err.message());
        }
    }
    StoreError::Db(e)
}

fn to_favorite(row: FavoriteRow) -> StoreResult<Favorite> {
    Favorite::try_from(row).map_err(|r| {
        StoreError::Corrupt(format!(
            "favorite {} has planet_id={:?} character_id={:?}",
            r.id, r.planet_id, r.character_id
        ))
    })
}

#[async_trait]
impl Store for PgStore {
    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        catalog_repo::list_characters(&self.db).await.map_err(classify)
    }

    async fn get_character(&self, id: i32) -> StoreResult<Option<Character>> {
        catalog_repo::get_character(&self.db, id).await.map_err(classify)
    }

    async fn upsert_character(&self, new: NewCharacter) -> StoreResult<Character> {
        catalog_repo::upsert_character(&self.db, &new)
            .await
            .map_err(classify)
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        catalog_repo::list_planets(&self.db).await.map_err(classify)
    }

    async fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>> {
        catalog_repo::get_planet(&self.db, id).await.map_err(classify)
    }

    async fn upsert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        catalog_repo::upsert_planet(&self.db, &new)
            .await
            .map_err(classify)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        users_repo::list_users(&self.db).await.map_err(classify)
    }

    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        users_repo::find_by_id(&self.db, id).await.map_err(classify)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        users_repo::find_by_email(&self.db, email)
            .await
            .map_err(classify)
    }

    async fn first_user(&self) -> StoreResult<Option<User>> {
        users_repo::find_first(&self.db).await.map_err(classify)
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        users_repo::create(&self.db, &new).await.map_err(classify)
    }

    async fn list_favorites(&self, user_id: i32) -> StoreResult<Vec<FavoriteDetails>> {
        let rows = favorites_repo::list_by_user(&self.db, user_id)
            .await
            .map_err(classify)?;
        Ok(rows.into_iter().map(FavoriteDetails::from).collect())
    }

    async fn find_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Option<Favorite>> {
        favorites_repo::find(&self.db, user_id, target)
            .await
            .map_err(classify)?
            .map(to_favorite)
            .transpose()
    }

    async fn insert_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Favorite> {
        let row = favorites_repo::insert(&self.db, user_id, target)
            .await
            .map_err(classify)?;
        to_favorite(row)
    }

    async fn delete_favorite(&self, id: i32) -> StoreResult<bool> {
        favorites_repo::delete(&self.db, id).await.map_err(classify)
    }

    async fn count_favorites(&self) -> StoreResult<i64> {
        favorites_repo::count(&self.db).await.map_err(classify)
    }
}
