use axum::{extract::State, routing::get, Json, Router};
use tracing::{instrument, warn};

use super::repo_types::{Character, Planet};
use crate::{error::ApiError, extract::Path, state::AppState};

pub fn people_routes() -> Router<AppState> {
    Router::new()
        .route("/people", get(list_characters))
        .route("/people/:id", get(get_character))
}

pub fn planet_routes() -> Router<AppState> {
    Router::new()
        .route("/planets", get(list_planets))
        .route("/planets/:id", get(get_planet))
}

#[instrument(skip(state))]
pub async fn list_characters(
    State(state): State<AppState>,
) -> Result<Json<Vec<Character>>, ApiError> {
    Ok(Json(state.store.list_characters().await?))
}

#[instrument(skip(state))]
pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Character>, ApiError> {
    match state.store.get_character(id).await? {
        Some(character) => Ok(Json(character)),
        None => {
            warn!(id, "character not found");
            Err(ApiError::not_found("Character not found"))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_planets(State(state): State<AppState>) -> Result<Json<Vec<Planet>>, ApiError> {
    Ok(Json(state.store.list_planets().await?))
}

#[instrument(skip(state))]
pub async fn get_planet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Planet>, ApiError> {
    match state.store.get_planet(id).await? {
        Some(planet) => Ok(Json(planet)),
        None => {
            warn!(id, "planet not found");
            Err(ApiError::not_found("Planet not found"))
        }
    }
}
