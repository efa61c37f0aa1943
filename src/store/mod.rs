//! Persistence seam shared by the HTTP handlers and the seed process.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::repo_types::{Character, NewCharacter, NewPlanet, Planet};
use crate::favorites::repo_types::{Favorite, FavoriteDetails, FavoriteTarget};
use crate::users::repo_types::{NewUser, User};

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Which integrity rule a rejected write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Duplicate,
    MissingReference,
    Check,
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique, foreign-key or check constraint rejected the write.
    /// `detail` is backend text and stays out of client responses.
    #[error("{kind:?} conflict: {detail}")]
    Conflict { kind: ConflictKind, detail: String },
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        StoreError::Conflict {
            kind,
            detail: detail.into(),
        }
    }

    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        match self {
            StoreError::Conflict { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Lists are ordered by id, which is insertion order.
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_characters(&self) -> StoreResult<Vec<Character>>;
    async fn get_character(&self, id: i32) -> StoreResult<Option<Character>>;
    /// Insert or update the character with the same name.
    async fn upsert_character(&self, new: NewCharacter) -> StoreResult<Character>;

    async fn list_planets(&self) -> StoreResult<Vec<Planet>>;
    async fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>>;
    /// Insert or update the planet with the same name.
    async fn upsert_planet(&self, new: NewPlanet) -> StoreResult<Planet>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: i32) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// First user by insertion order, the implicit actor when no identity is given.
    async fn first_user(&self) -> StoreResult<Option<User>>;
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;

    async fn list_favorites(&self, user_id: i32) -> StoreResult<Vec<FavoriteDetails>>;
    async fn find_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Option<Favorite>>;
    async fn insert_favorite(&self, user_id: i32, target: FavoriteTarget)
        -> StoreResult<Favorite>;
    /// Returns `false` when no row had that id.
    async fn delete_favorite(&self, id: i32) -> StoreResult<bool>;
    async fn count_favorites(&self) -> StoreResult<i64>;
}
