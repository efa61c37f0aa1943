use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Character record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: Option<String>,
    #[serde(rename = "planeta_natal")]
    pub homeworld: Option<String>, // free text, not a planet FK
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

/// Planet record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "clima")]
    pub climate: Option<String>,
    #[serde(rename = "terreno")]
    pub terrain: Option<String>,
    #[serde(rename = "poblacion")]
    pub population: Option<String>,
}

/// Character fields keyed by `name` for upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacter {
    pub name: String,
    pub species: Option<String>,
    pub homeworld: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlanet {
    pub name: String,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub population: Option<String>,
}

impl NewCharacter {
    pub fn into_character(self, id: i32) -> Character {
        Character {
            id,
            name: self.name,
            species: self.species,
            homeworld: self.homeworld,
            description: self.description,
        }
    }
}

impl NewPlanet {
    pub fn into_planet(self, id: i32) -> Planet {
        Planet {
            id,
            name: self.name,
            climate: self.climate,
            terrain: self.terrain,
            population: self.population,
        }
    }
}
