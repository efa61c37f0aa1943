use tracing::{info, warn};

use super::repo_types::{FavoriteDetails, FavoriteTarget};
use crate::{
    error::ApiError,
    state::AppState,
    store::{ConflictKind, StoreError},
    users::repo_types::User,
};

const FAVORITE_EXISTS: &str = "Favorite already exists";

pub async fn list_favorites(st: &AppState, user: &User) -> Result<Vec<FavoriteDetails>, ApiError> {
    Ok(st.store.list_favorites(user.id).await?)
}

/// Link `user` to `target`, failing with 404 when the target does not exist.
pub async fn add_favorite(
    st: &AppState,
    user: &User,
    target: FavoriteTarget,
) -> Result<FavoriteDetails, ApiError> {
    let (planet, character) = match target {
        FavoriteTarget::Planet(id) => {
            let planet = st.store.get_planet(id).await?.ok_or_else(|| {
                warn!(planet_id = id, "favorite target missing");
                ApiError::not_found("Planet not found")
            })?;
            (Some(planet), None)
        }
        FavoriteTarget::Character(id) => {
            let character = st.store.get_character(id).await?.ok_or_else(|| {
                warn!(character_id = id, "favorite target missing");
                ApiError::not_found("Character not found")
            })?;
            (None, Some(character))
        }
    };

    if st.store.find_favorite(user.id, target).await?.is_some() {
        warn!(user_id = user.id, ?target, "favorite already exists");
        return Err(ApiError::Conflict(FAVORITE_EXISTS.into()));
    }

    // A concurrent add can still win between the lookup and the insert.
    let favorite = st
        .store
        .insert_favorite(user.id, target)
        .await
        .map_err(insert_error)?;
    info!(favorite_id = favorite.id, user_id = user.id, ?target, "favorite added");

    Ok(FavoriteDetails {
        id: favorite.id,
        user_id: favorite.user_id,
        planet,
        character,
    })
}

fn insert_error(e: StoreError) -> ApiError {
    match e.conflict_kind() {
        Some(ConflictKind::Duplicate) => {
            warn!(error = %e, "favorite inserted concurrently");
            ApiError::Conflict(FAVORITE_EXISTS.into())
        }
        _ => ApiError::from(e),
    }
}

pub async fn remove_favorite(
    st: &AppState,
    user: &User,
    target: FavoriteTarget,
) -> Result<(), ApiError> {
    let not_found = || {
        warn!(user_id = user.id, ?target, "favorite not found");
        ApiError::not_found("Favorite not found")
    };

    let favorite = st
        .store
        .find_favorite(user.id, target)
        .await?
        .ok_or_else(not_found)?;

    // Someone else may have deleted it between the lookup and here.
    if !st.store.delete_favorite(favorite.id).await? {
        return Err(not_found());
    }

    info!(favorite_id = favorite.id, user_id = user.id, ?target, "favorite removed");
    Ok(())
}
