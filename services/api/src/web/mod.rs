pub mod auth;
pub mod middleware;
pub mod reservations;
pub mod restaurants;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

use crate::web::state::AppState;

// Re-export the auth middleware pieces so handlers and binaries can reach
// them without spelling out the module path.
pub use middleware::{require_auth, AuthUser};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        restaurants::list_restaurants_handler,
        reservations::create_reservation_handler,
        reservations::list_reservations_handler,
        reservations::delete_reservation_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::RegisterResponse,
        auth::LoginResponse,
        restaurants::RestaurantView,
        reservations::CreateReservationRequest,
        reservations::CreateReservationResponse,
        reservations::ReservationView,
        reservations::DeleteReservationResponse,
    )),
    tags(
        (name = "Restobook API", description = "Identity and reservation endpoints for the restaurant booking service.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router Assembly
//=========================================================================================

/// Liveness probe for deployment checks. Not part of the documented API.
async fn health_handler() -> &'static str {
    "OK"
}

/// Builds the full API router over the given shared state.
///
/// Split into a public half (health, register, login) and a protected half
/// behind the bearer-token middleware. Integration tests drive exactly this
/// router; the server binary only adds the Swagger UI on top of it.
pub fn router(state: Arc<AppState>) -> Router {
    // Open origin; the token rides in the Authorization header, never a cookie.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/restaurants", get(restaurants::list_restaurants_handler))
        .route("/reservations", post(reservations::create_reservation_handler))
        .route(
            "/reservations/user",
            get(reservations::list_reservations_handler),
        )
        .route(
            "/reservations/{id}",
            delete(reservations::delete_reservation_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(state)
}
