use serde::Serialize;
use sqlx::FromRow;

use crate::catalog::repo_types::{Character, Planet};

/// What a favorite points at. Exactly one target per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteTarget {
    Planet(i32),
    Character(i32),
}

impl FavoriteTarget {
    /// `(planet_id, character_id)` as stored in the favorites table.
    pub fn columns(self) -> (Option<i32>, Option<i32>) {
        match self {
            FavoriteTarget::Planet(id) => (Some(id), None),
            FavoriteTarget::Character(id) => (None, Some(id)),
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            FavoriteTarget::Planet(_) => "planet",
            FavoriteTarget::Character(_) => "character",
        }
    }

    pub fn from_columns(planet_id: Option<i32>, character_id: Option<i32>) -> Option<Self> {
        match (planet_id, character_id) {
            (Some(id), None) => Some(FavoriteTarget::Planet(id)),
            (None, Some(id)) => Some(FavoriteTarget::Character(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub target: FavoriteTarget,
}

#[derive(Debug, FromRow)]
pub struct FavoriteRow {
    pub id: i32,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub character_id: Option<i32>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = FavoriteRow;

    fn try_from(r: FavoriteRow) -> Result<Self, Self::Error> {
        match FavoriteTarget::from_columns(r.planet_id, r.character_id) {
            Some(target) => Ok(Favorite {
                id: r.id,
                user_id: r.user_id,
                target,
            }),
            None => Err(r),
        }
    }
}

/// A favorite with its target resolved, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteDetails {
    pub id: i32,
    pub user_id: i32,
    pub planet: Option<Planet>,
    pub character: Option<Character>,
}

/// Favorites LEFT JOINed with both target tables.
#[derive(Debug, FromRow)]
pub struct FavoriteJoinRow {
    pub id: i32,
    pub user_id: i32,
    pub planet_id: Option<i32>,
    pub planet_name: Option<String>,
    pub planet_climate: Option<String>,
    pub planet_terrain: Option<String>,
    pub planet_population: Option<String>,
    pub character_id: Option<i32>,
    pub character_name: Option<String>,
    pub character_species: Option<String>,
    pub character_homeworld: Option<String>,
    pub character_description: Option<String>,
}

impl From<FavoriteJoinRow> for FavoriteDetails {
    fn from(r: FavoriteJoinRow) -> Self {
        let planet = match (r.planet_id, r.planet_name) {
            (Some(id), Some(name)) => Some(Planet {
                id,
                name,
                climate: r.planet_climate,
                terrain: r.planet_terrain,
                population: r.planet_population,
            }),
            _ => None,
        };
        let character = match (r.character_id, r.character_name) {
            (Some(id), Some(name)) => Some(Character {
                id,
                name,
                species: r.character_species,
                homeworld: r.character_homeworld,
                description: r.character_description,
            }),
            _ => None,
        };
        Self {
            id: r.id,
            user_id: r.user_id,
            planet,
            character,
        }
    }
}
