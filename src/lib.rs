pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    http::{header, request::Parts, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public, route_not_found};
use crate::middleware::{optional_auth, require_auth};
pub use crate::state::AppState;

/// Build the full HTTP application around `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(optional_auth_routes(state.clone()))
        .merge(protected_routes(state.clone()))
        .fallback(route_not_found)
        // Global middleware
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, health, songs};

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/songs/:id/play", post(songs::play))
}

fn optional_auth_routes(state: AppState) -> Router<AppState> {
    use handlers::public::{playlists, songs};

    Router::new()
        .route("/api/songs", get(songs::list))
        .route("/api/songs/search", get(songs::search))
        .route("/api/songs/:id", get(songs::show))
        .route("/api/playlists/:id", get(playlists::show))
        .route_layer(from_fn_with_state(state, optional_auth))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{playlists, profile, songs, users};

    Router::new()
        // Account
        .route("/api/auth/profile", get(profile::show).put(profile::update))
        // Catalogue writes
        .route("/api/songs", post(songs::create))
        .route("/api/songs/:id", put(songs::update).delete(songs::delete))
        // Playlists
        .route("/api/playlists", get(playlists::list).post(playlists::create))
        .route("/api/playlists/:id", put(playlists::update).delete(playlists::delete))
        .route("/api/playlists/:id/songs", post(playlists::add_song))
        .route("/api/playlists/:id/songs/:song_id", delete(playlists::remove_song))
        // Likes
        .route("/api/users/like/:song_id", post(users::toggle_like))
        .route("/api/users/liked-songs", get(users::liked_songs))
        .route_layer(from_fn_with_state(state, require_auth))
}

/// Local development origins and the configured frontend, with credentials
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let frontend_url = config.server.frontend_url.clone();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin_allowed(origin, frontend_url.as_deref())
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

fn origin_allowed(origin: &HeaderValue, frontend_url: Option<&str>) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    origin.starts_with("http://localhost:") || frontend_url.is_some_and(|url| url == origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::database::Database;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let config = AppConfig::for_tests();
        let db = Database::connect(&config.database).await.unwrap();
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_days);
        app(AppState::new(config, db, tokens).unwrap())
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn cors_origins() {
        let local = HeaderValue::from_static("http://localhost:5173");
        let prod = HeaderValue::from_static("https://flux.example.com");

        assert!(origin_allowed(&local, None));
        assert!(!origin_allowed(&prod, None));
        assert!(origin_allowed(&prod, Some("https://flux.example.com")));
        assert!(!origin_allowed(&HeaderValue::from_static("https://localhost.evil"), None));
    }

    #[tokio::test]
    async fn unknown_route_is_enveloped_404() {
        let response = test_app()
            .await
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Route not found");
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let response = test_app()
            .await
            .oneshot(Request::builder().uri("/api/playlists").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Not authorized. Please login to access this resource.");
    }

    #[tokio::test]
    async fn optional_route_ignores_garbage_token() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/api/songs")
                    .header("Authorization", "Bearer garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["results"], 0);
    }
}
