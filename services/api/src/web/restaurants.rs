//! services/api/src/web/restaurants.rs
//!
//! Handler for browsing the read-only restaurant catalog.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::state::AppState;
use restobook_core::domain::Restaurant;

/// One catalog entry as rendered to clients.
#[derive(Serialize, ToSchema)]
pub struct RestaurantView {
    pub restaurant_id: i64,
    pub name: String,
    pub location: String,
    pub description: String,
}

impl RestaurantView {
    fn from_domain(restaurant: Restaurant) -> Self {
        Self {
            restaurant_id: restaurant.restaurant_id,
            name: restaurant.name,
            location: restaurant.location,
            description: restaurant.description,
        }
    }
}

/// GET /restaurants - List the full restaurant catalog
#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants in the catalog", body = [RestaurantView]),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_restaurants_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let restaurants = state.catalog.list_all().await?;

    let views: Vec<RestaurantView> = restaurants
        .into_iter()
        .map(RestaurantView::from_domain)
        .collect();

    Ok(Json(views))
}
