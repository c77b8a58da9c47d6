//! HTTP API for the tournament administration server.
//!
//! Built with Axum and Tower. Every inbound request passes two layers before
//! its handler:
//!
//! 1. [`request_id`]: correlation ID generation and HTTP metrics
//! 2. [`middleware`]: credential decoding and the capability check; absence
//!    of a credential never rejects a request by itself; the capability map
//!    decides per operation
//!
//! Domain failures bubble out of the handlers as [`error::ApiError`] and are
//! translated to HTTP in one place.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /health                                        - Health check (public)
//! POST   /api/auth/register                             - Player signup (public)
//! POST   /api/auth/login                                - Login (public)
//! POST   /api/users                                     - Provision account (organizer)
//! GET    /api/users/role/{role}                         - Users by role
//! GET    /api/users/{username}                          - User lookup
//! POST   /api/tournaments                               - Create tournament (organizer)
//! DELETE /api/tournaments/{id}                          - Delete tournament (organizer)
//! GET    /api/tournaments                               - List tournaments (public)
//! GET    /api/tournaments/name/{name}                   - By name (public)
//! GET    /api/tournaments/after/{date}                  - Starting after (public)
//! POST   /api/registrations                             - Register player
//! GET    /api/registrations/player/{player_id}          - Registrations by player
//! GET    /api/registrations/tournament/{id}             - Roster (public)
//! GET    /api/registrations/tournament/{id}/pending     - Pending (organizer)
//! POST   /api/registrations/{id}/approve                - Approve (organizer)
//! POST   /api/registrations/{id}/deny                   - Deny (organizer)
//! POST   /api/matches                                   - Create match (organizer)
//! PUT    /api/matches/score                             - Update score (referee/organizer)
//! DELETE /api/matches/{id}                              - Delete match (organizer)
//! GET    /api/matches/tournament/{id}                   - By tournament (public)
//! GET    /api/matches/tournament/{id}/export            - CSV export (organizer)
//! GET    /api/matches/referee/{username}                - By referee
//! GET    /api/matches/player/{username}                 - By player
//! GET    /api/notifications/user/{username}             - Notifications
//! POST   /api/notifications/mark-as-read/{id}           - Mark read
//! ```

pub mod auth;
pub mod error;
pub mod matches;
pub mod middleware;
pub mod notifications;
pub mod registrations;
pub mod request_id;
pub mod tournaments;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
};
use courtside::{
    AuthManager, MatchManager, NotificationManager, RegistrationManager, TournamentManager,
};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; cheap thanks to the Arc wrappers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub registrations: Arc<RegistrationManager>,
    pub matches: Arc<MatchManager>,
    pub notifications: Arc<NotificationManager>,
    pub tournaments: Arc<TournamentManager>,
    pub pool: Arc<PgPool>,
}

/// Plain confirmation payload
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Create the complete API router with all endpoints and middleware.
///
/// The route templates registered here are the same strings the capability
/// map in `courtside::auth::capabilities` keys on; the guard middleware
/// relies on that correspondence.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users", post(users::create_user))
        .route("/api/users/role/{role}", get(users::users_by_role))
        .route("/api/users/{username}", get(users::user_by_username))
        .route(
            "/api/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/api/tournaments/{id}", delete(tournaments::delete_tournament))
        .route("/api/tournaments/name/{name}", get(tournaments::tournament_by_name))
        .route(
            "/api/tournaments/after/{date}",
            get(tournaments::tournaments_starting_after),
        )
        .route("/api/registrations", post(registrations::register_player))
        .route(
            "/api/registrations/player/{player_id}",
            get(registrations::registrations_by_player),
        )
        .route(
            "/api/registrations/tournament/{tournament_id}",
            get(registrations::registrations_by_tournament),
        )
        .route(
            "/api/registrations/tournament/{tournament_id}/pending",
            get(registrations::pending_registrations),
        )
        .route(
            "/api/registrations/{id}/approve",
            post(registrations::approve_registration),
        )
        .route(
            "/api/registrations/{id}/deny",
            post(registrations::deny_registration),
        )
        .route("/api/matches", post(matches::create_match))
        .route("/api/matches/score", put(matches::update_score))
        .route("/api/matches/{id}", delete(matches::delete_match))
        .route(
            "/api/matches/tournament/{tournament_id}",
            get(matches::matches_by_tournament),
        )
        .route(
            "/api/matches/tournament/{tournament_id}/export",
            get(matches::export_matches),
        )
        .route(
            "/api/matches/referee/{username}",
            get(matches::matches_by_referee),
        )
        .route(
            "/api/matches/player/{username}",
            get(matches::matches_by_player),
        )
        .route(
            "/api/notifications/user/{username}",
            get(notifications::notifications_for_user),
        )
        .route(
            "/api/notifications/mark-as-read/{id}",
            post(notifications::mark_as_read),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::guard_middleware,
        ))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Probes database connectivity and reports `200 OK` or
/// `503 Service Unavailable` with a JSON body either way.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&*state.pool).await.is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
