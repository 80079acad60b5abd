//! REST API endpoints.
//!
//! Axum router exposing team management and win-rate queries under `/api`.

pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::engine::EngineError;
use crate::service::ServiceError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidMatchCount(String),

    #[error("{0}")]
    NoValidMatches(String),

    #[error("{0}")]
    EmptyTeam(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::InvalidMatchCount(_) => StatusCode::BAD_REQUEST,
            ApiError::NoValidMatches(_) | ApiError::EmptyTeam(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidMatchCount(_) => "INVALID_MATCH_COUNT",
            ApiError::NoValidMatches(_) => "NO_VALID_MATCHES",
            ApiError::EmptyTeam(_) => "EMPTY_TEAM",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::InvalidMatchCount(_) => ApiError::InvalidMatchCount(message),
            ServiceError::PlayerNotFound(_) | ServiceError::TeamNotFound(_) => ApiError::NotFound(message),
            ServiceError::Engine(EngineError::NoValidMatches { .. }) => ApiError::NoValidMatches(message),
            ServiceError::Engine(EngineError::EmptyTeam) => ApiError::EmptyTeam(message),
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal(message)
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Build the application router.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/teams", post(routes::teams::create_team))
        .route("/teams/:id/players", post(routes::teams::add_player))
        .route("/teams/:id/winrate", get(routes::teams::team_winrate))
        .route("/players", get(routes::players::search_players))
        .route("/players/:id/winrate", get(routes::players::player_winrate));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::from(Any)
    } else {
        match origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!(origin, "Invalid CORS origin, allowing any");
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, TeamId};
    use crate::riot::RiotError;

    #[test]
    fn test_service_error_mapping() {
        let cases = vec![
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (
                ServiceError::InvalidMatchCount("x".into()),
                StatusCode::BAD_REQUEST,
                "INVALID_MATCH_COUNT",
            ),
            (ServiceError::PlayerNotFound(PlayerId(1)), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::TeamNotFound(TeamId(1)), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                ServiceError::Engine(EngineError::NoValidMatches { fetched: 0 }),
                StatusCode::INTERNAL_SERVER_ERROR,
                "NO_VALID_MATCHES",
            ),
            (
                ServiceError::Engine(EngineError::EmptyTeam),
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMPTY_TEAM",
            ),
            (
                ServiceError::MatchIds(RiotError::InvalidApiKey),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (service_error, status, code) in cases {
            let api_error = ApiError::from(service_error);
            assert_eq!(api_error.status(), status);
            assert_eq!(api_error.code(), code);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let resp = ApiError::NotFound("Team not found: 3".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Not found: Team not found: 3");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (_dir, app) = test_support::test_app(crate::riot::mock::MockMatchApi::new());
        let (status, _) = test_support::get_json(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
