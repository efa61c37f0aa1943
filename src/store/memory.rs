use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{ConflictKind, Store, StoreError, StoreResult};
use crate::catalog::repo_types::{Character, NewCharacter, NewPlanet, Planet};
use crate::favorites::repo_types::{Favorite, FavoriteDetails, FavoriteTarget};
use crate::users::repo_types::{NewUser, User};

/// Process-local store with the same constraints as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    characters: BTreeMap<i32, Character>,
    planets: BTreeMap<i32, Planet>,
    favorites: BTreeMap<i32, Favorite>,
    seq: Sequences,
}

// Ids are never reused, like SERIAL columns.
#[derive(Default)]
struct Sequences {
    users: i32,
    characters: i32,
    planets: i32,
    favorites: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave a half-written row behind.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tables {
    fn details(&self, fav: &Favorite) -> FavoriteDetails {
        let (planet, character) = match fav.target {
            FavoriteTarget::Planet(id) => (self.planets.get(&id).cloned(), None),
            FavoriteTarget::Character(id) => (None, self.characters.get(&id).cloned()),
        };
        FavoriteDetails {
            id: fav.id,
            user_id: fav.user_id,
            planet,
            character,
        }
    }

    fn target_exists(&self, target: FavoriteTarget) -> bool {
        match target {
            FavoriteTarget::Planet(id) => self.planets.contains_key(&id),
            FavoriteTarget::Character(id) => self.characters.contains_key(&id),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        Ok(self.lock().characters.values().cloned().collect())
    }

    async fn get_character(&self, id: i32) -> StoreResult<Option<Character>> {
        Ok(self.lock().characters.get(&id).cloned())
    }

    async fn upsert_character(&self, new: NewCharacter) -> StoreResult<Character> {
        let mut t = self.lock();
        let existing = t
            .characters
            .values()
            .find(|c| c.name == new.name)
            .map(|c| c.id);
        let id = match existing {
            Some(id) => id,
            None => next(&mut t.seq.characters),
        };
        let character = new.into_character(id);
        t.characters.insert(id, character.clone());
        Ok(character)
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.lock().planets.values().cloned().collect())
    }

    async fn get_planet(&self, id: i32) -> StoreResult<Option<Planet>> {
        Ok(self.lock().planets.get(&id).cloned())
    }

    async fn upsert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        let mut t = self.lock();
        let existing = t
            .planets
            .values()
            .find(|p| p.name == new.name)
            .map(|p| p.id);
        let id = match existing {
            Some(id) => id,
            None => next(&mut t.seq.planets),
        };
        let planet = new.into_planet(id);
        t.planets.insert(id, planet.clone());
        Ok(planet)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn get_user(&self, id: i32) -> StoreResult<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn first_user(&self) -> StoreResult<Option<User>> {
        Ok(self.lock().users.values().next().cloned())
    }

    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.lock();
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::conflict(
                ConflictKind::Duplicate,
                format!("email {} already registered", new.email),
            ));
        }
        let id = next(&mut t.seq.users);
        let user = new.into_user(id, OffsetDateTime::now_utc());
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_favorites(&self, user_id: i32) -> StoreResult<Vec<FavoriteDetails>> {
        let t = self.lock();
        Ok(t.favorites
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| t.details(f))
            .collect())
    }

    async fn find_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Option<Favorite>> {
        Ok(self
            .lock()
            .favorites
            .values()
            .find(|f| f.user_id == user_id && f.target == target)
            .copied())
    }

    async fn insert_favorite(
        &self,
        user_id: i32,
        target: FavoriteTarget,
    ) -> StoreResult<Favorite> {
        let mut t = self.lock();
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::conflict(
                ConflictKind::MissingReference,
                format!("user {user_id}"),
            ));
        }
        if !t.target_exists(target) {
            return Err(StoreError::conflict(
                ConflictKind::MissingReference,
                format!("{target:?}"),
            ));
        }
        if t
            .favorites
            .values()
            .any(|f| f.user_id == user_id && f.target == target)
        {
            return Err(StoreError::conflict(
                ConflictKind::Duplicate,
                format!("favorite {target:?} for user {user_id}"),
            ));
        }
        let id = next(&mut t.seq.favorites);
        let favorite = Favorite {
            id,
            user_id,
            target,
        };
        t.favorites.insert(id, favorite);
        Ok(favorite)
    }

    async fn delete_favorite(&self, id: i32) -> StoreResult<bool> {
        Ok(self.lock().favorites.remove(&id).is_some())
    }

    async fn count_favorites(&self) -> StoreResult<i64> {
        Ok(self.lock().favorites.len() as i64)
    }
}
