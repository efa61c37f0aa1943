use std::net::SocketAddr;

use axum::{extract::Request, routing::get, Router};
use tower_http::{cors::CorsLayer, normalize_path::NormalizePath, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{catalog, favorites, users};

/// The router behind trailing-slash trimming, so `/people/` routes like `/people`.
pub type App = NormalizePath<Router>;

pub fn build_app(state: AppState) -> App {
    NormalizePath::trim_trailing_slash(build_router(state))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(catalog::router())
        .merge(users::router())
        .merge(favorites::router())
        .route("/health", get(|| async { "ok" }))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: App, addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = addr.parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        axum::ServiceExt::<Request>::into_make_service(app),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repo_types::{NewCharacter, NewPlanet};
    use crate::users::repo_types::NewUser;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(state: &AppState, method: Method, uri: &str) -> (StatusCode, Value) {
        call_as(state, method, uri, None).await
    }

    async fn call_as(
        state: &AppState,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(id) = user_id {
            req = req.header("X-User-Id", id);
        }
        let res = build_app(state.clone())
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    async fn add_user(state: &AppState, email: &str) -> i32 {
        state
            .store
            .insert_user(NewUser {
                email: email.into(),
                password: "1234".into(),
                first_name: "Luke".into(),
                last_name: "Skywalker".into(),
            })
            .await
            .unwrap()
            .id
    }

    async fn add_planet(state: &AppState, name: &str) -> i32 {
        state
            .store
            .upsert_planet(NewPlanet {
                name: name.into(),
                climate: Some("arid".into()),
                terrain: Some("desert".into()),
                population: Some("200000".into()),
            })
            .await
            .unwrap()
            .id
    }

    async fn add_character(state: &AppState, name: &str) -> i32 {
        state
            .store
            .upsert_character(NewCharacter {
                name: name.into(),
                species: Some("Human".into()),
                homeworld: Some("Tatooine".into()),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn health() {
        let state = AppState::fake();
        let (status, body) = call(&state, Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("ok"));
    }

    #[tokio::test]
    async fn get_by_id_echoes_requested_id() {
        let state = AppState::fake();
        for name in ["Tatooine", "Alderaan", "Yavin IV"] {
            add_planet(&state, name).await;
        }
        for name in ["Luke Skywalker", "C-3PO"] {
            add_character(&state, name).await;
        }

        for id in 1..=3 {
            let (status, body) = call(&state, Method::GET, &format!("/planets/{id}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["id"], id);
        }
        for id in 1..=2 {
            let (status, body) = call(&state, Method::GET, &format!("/people/{id}")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["id"], id);
        }
    }

    #[tokio::test]
    async fn missing_ids_are_404_with_message() {
        let state = AppState::fake();

        let (status, body) = call(&state, Method::GET, "/planets/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Planet not found"}));

        let (status, body) = call(&state, Method::GET, "/people/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Character not found"}));
    }

    #[tokio::test]
    async fn lists_are_in_insertion_order() {
        let state = AppState::fake();
        add_character(&state, "Luke Skywalker").await;
        add_character(&state, "Darth Vader").await;
        add_user(&state, "a@rebels.org").await;
        add_user(&state, "b@rebels.org").await;

        let (status, body) = call(&state, Method::GET, "/people").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["nombre"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Luke Skywalker", "Darth Vader"]);

        let (status, body) = call(&state, Method::GET, "/users").await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0]["email"], "a@rebels.org");
        assert!(users[0].get("password").is_none());

        let (status, body) = call(&state, Method::GET, "/planets").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn favorite_planet_lifecycle() {
        let state = AppState::fake();

        let (status, body) = call(&state, Method::GET, "/users/favorites").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No users in the database"}));

        add_user(&state, "luke@rebels.org").await;
        for name in ["Alderaan", "Yavin IV", "Hoth", "Tatooine"] {
            add_planet(&state, name).await;
        }

        let (status, body) = call(&state, Method::POST, "/favorite/planet/4").await;
        assert_eq!(status, StatusCode::CREATED);
        let expected = json!({
            "id": 1,
            "user_id": 1,
            "planet": {
                "id": 4,
                "nombre": "Tatooine",
                "clima": "arid",
                "terreno": "desert",
                "poblacion": "200000"
            },
            "character": null
        });
        assert_eq!(body, expected);

        let (status, body) = call(&state, Method::GET, "/users/favorites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([expected]));

        let (status, body) = call(&state, Method::DELETE, "/favorite/planet/4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "Favorite planet deleted"}));

        let (status, body) = call(&state, Method::DELETE, "/favorite/planet/4").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Favorite not found"}));
    }

    #[tokio::test]
    async fn favorite_character_lifecycle() {
        let state = AppState::fake();
        add_user(&state, "leia@rebels.org").await;
        let id = add_character(&state, "Han Solo").await;

        let (status, body) =
            call(&state, Method::POST, &format!("/favorite/people/{id}")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["character"]["nombre"], "Han Solo");
        assert!(body["planet"].is_null());

        let (status, body) =
            call(&state, Method::DELETE, &format!("/favorite/people/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "Favorite character deleted"}));

        let (status, body) = call(&state, Method::GET, "/users/favorites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn favorite_for_missing_target_creates_nothing() {
        let state = AppState::fake();
        add_user(&state, "luke@rebels.org").await;

        let (status, body) = call(&state, Method::POST, "/favorite/planet/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Planet not found"}));

        let (status, body) = call(&state, Method::POST, "/favorite/people/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Character not found"}));

        assert_eq!(state.store.count_favorites().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_favorite_is_409() {
        let state = AppState::fake();
        add_user(&state, "luke@rebels.org").await;
        let id = add_planet(&state, "Hoth").await;

        let uri = format!("/favorite/planet/{id}");
        let (status, _) = call(&state, Method::POST, &uri).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&state, Method::POST, &uri).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({"error": "Favorite already exists"}));
        assert_eq!(state.store.count_favorites().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn user_header_selects_acting_user() {
        let state = AppState::fake();
        add_user(&state, "luke@rebels.org").await;
        let leia = add_user(&state, "leia@rebels.org").await;
        let hoth = add_planet(&state, "Hoth").await;

        let leia_header = leia.to_string();
        let (status, body) = call_as(
            &state,
            Method::POST,
            &format!("/favorite/planet/{hoth}"),
            Some(&leia_header),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user_id"], leia);

        // The first user still has no favorites.
        let (_, body) = call(&state, Method::GET, "/users/favorites").await;
        assert_eq!(body, json!([]));

        let (_, body) =
            call_as(&state, Method::GET, "/users/favorites", Some(&leia_header)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_or_unknown_user_header() {
        let state = AppState::fake();
        add_user(&state, "luke@rebels.org").await;

        let (status, body) =
            call_as(&state, Method::GET, "/users/favorites", Some("abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid X-User-Id header"}));

        let (status, body) =
            call_as(&state, Method::GET, "/users/favorites", Some("42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "User not found"}));
    }

    #[tokio::test]
    async fn favorite_writes_without_users_are_404() {
        let state = AppState::fake();
        add_planet(&state, "Hoth").await;

        let (status, body) = call(&state, Method::POST, "/favorite/planet/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No users in the database"}));

        let (status, body) = call(&state, Method::DELETE, "/favorite/planet/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No users in the database"}));
    }

    #[tokio::test]
    async fn trailing_slash_routes_like_bare_path() {
        let state = AppState::fake();
        add_character(&state, "Luke Skywalker").await;
        add_user(&state, "luke@rebels.org").await;

        let (status, body) = call(&state, Method::GET, "/people/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = call(&state, Method::GET, "/people/1/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (status, body) = call(&state, Method::GET, "/users/favorites/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let state = AppState::fake();
        let (status, body) = call(&state, Method::GET, "/starships").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not found"}));
    }

    #[tokio::test]
    async fn non_integer_ids_are_json_400() {
        let state = AppState::fake();
        for uri in ["/people/abc", "/planets/abc", "/people/99999999999"] {
            let (status, body) = call(&state, Method::GET, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}: {body}");
        }
    }

    #[tokio::test]
    async fn bad_favorite_id_is_400_before_user_lookup() {
        let state = AppState::fake();

        let (status, body) = call(&state, Method::POST, "/favorite/planet/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_ne!(body["error"], "No users in the database");

        let (status, body) = call(&state, Method::DELETE, "/favorite/people/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
