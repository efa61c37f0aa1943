use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use super::repo_types::User;
use crate::{error::ApiError, state::AppState};

/// Header naming the acting user explicitly.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of.
///
/// Taken from the `X-User-Id` header when present, otherwise the first user
/// in the store.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
            return match state.store.first_user().await? {
                Some(user) => Ok(CurrentUser(user)),
                None => {
                    warn!("no users in the database");
                    Err(ApiError::not_found("No users in the database"))
                }
            };
        };

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .ok_or_else(|| ApiError::BadRequest("Invalid X-User-Id header".into()))?;

        match state.store.get_user(user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(user_id, "unknown user in header");
                Err(ApiError::not_found("User not found"))
            }
        }
    }
}
