use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::MessageResponse,
    repo_types::{FavoriteDetails, FavoriteTarget},
    services,
};
use crate::{
    error::ApiError,
    extract::Path,
    state::AppState,
    users::{extractors::CurrentUser, repo_types::User},
};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/users/favorites", get(list_favorites))
        .route(
            "/favorite/planet/:id",
            post(add_favorite_planet).delete(delete_favorite_planet),
        )
        .route(
            "/favorite/people/:id",
            post(add_favorite_character).delete(delete_favorite_character),
        )
}

#[instrument(skip(state, user))]
pub async fn list_favorites(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FavoriteDetails>>, ApiError> {
    Ok(Json(services::list_favorites(&state, &user).await?))
}

#[instrument(skip(state, user))]
pub async fn add_favorite_planet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<(StatusCode, Json<FavoriteDetails>), ApiError> {
    create(&state, &user, FavoriteTarget::Planet(id)).await
}

#[instrument(skip(state, user))]
pub async fn add_favorite_character(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<(StatusCode, Json<FavoriteDetails>), ApiError> {
    create(&state, &user, FavoriteTarget::Character(id)).await
}

#[instrument(skip(state, user))]
pub async fn delete_favorite_planet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    remove(&state, &user, FavoriteTarget::Planet(id)).await
}

#[instrument(skip(state, user))]
pub async fn delete_favorite_character(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    remove(&state, &user, FavoriteTarget::Character(id)).await
}

async fn create(
    state: &AppState,
    user: &User,
    target: FavoriteTarget,
) -> Result<(StatusCode, Json<FavoriteDetails>), ApiError> {
    let favorite = services::add_favorite(state, user, target).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

async fn remove(
    state: &AppState,
    user: &User,
    target: FavoriteTarget,
) -> Result<Json<MessageResponse>, ApiError> {
    services::remove_favorite(state, user, target).await?;
    Ok(Json(MessageResponse {
        msg: format!("Favorite {} deleted", target.kind()),
    }))
}
