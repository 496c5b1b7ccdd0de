//! services/api/src/web/reservations.rs
//!
//! Handlers for the reservation lifecycle: create, list for the calling
//! user, and delete. Every operation here is scoped to the authenticated
//! caller taken from request extensions; a handler never trusts a user id
//! from the request body or path.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use restobook_core::domain::{NewReservation, ReservationEntry};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub restaurant_id: Option<i64>,
    /// Calendar date as `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Time of day as `HH:MM` or `HH:MM:SS`.
    pub time: Option<String>,
    pub people_count: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreateReservationResponse {
    pub message: String,
    pub reservation_id: Uuid,
}

/// One row of the caller's reservation list, with the restaurant display
/// name joined in and date/time rendered as ISO strings.
#[derive(Serialize, ToSchema)]
pub struct ReservationView {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: i64,
    pub restaurant: String,
    pub date: String,
    pub time: String,
    pub people_count: i32,
}

impl ReservationView {
    fn from_entry(entry: ReservationEntry) -> Self {
        Self {
            reservation_id: entry.reservation_id,
            user_id: entry.user_id,
            restaurant_id: entry.restaurant_id,
            restaurant: entry.restaurant_name,
            date: entry.date.format("%Y-%m-%d").to_string(),
            time: entry.time.format("%H:%M:%S").to_string(),
            people_count: entry.people_count,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DeleteReservationResponse {
    pub message: String,
}

//=========================================================================================
// Field Validation Helpers
//=========================================================================================

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("date must be formatted as YYYY-MM-DD".to_string()))
}

fn parse_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| {
            ApiError::Validation("time must be formatted as HH:MM or HH:MM:SS".to_string())
        })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /reservations - Book a slot at a restaurant for the calling user
#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = CreateReservationResponse),
        (status = 400, description = "Invalid body or unknown restaurant"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_reservation_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the body field by field.
    let restaurant_id = req
        .restaurant_id
        .ok_or_else(|| ApiError::Validation("restaurant_id is required".to_string()))?;

    let date = parse_date(
        req.date
            .as_deref()
            .ok_or_else(|| ApiError::Validation("date is required".to_string()))?,
    )?;

    let time = parse_time(
        req.time
            .as_deref()
            .ok_or_else(|| ApiError::Validation("time is required".to_string()))?,
    )?;

    let people_count = match req.people_count {
        Some(n) if n >= 1 => n,
        _ => {
            return Err(ApiError::Validation(
                "people_count must be at least 1".to_string(),
            ))
        }
    };

    // 2. The restaurant must exist in the catalog. The foreign key would
    //    also catch this, but as an opaque 500 instead of a client error.
    if state.catalog.get_by_id(restaurant_id).await?.is_none() {
        return Err(ApiError::Validation(format!(
            "Unknown restaurant: {}",
            restaurant_id
        )));
    }

    // 3. Insert the reservation under the caller's identity. There is no
    //    overlap or capacity check; any number of reservations may share a
    //    restaurant and slot.
    let reservation_id = state
        .reservations
        .create_reservation(NewReservation {
            user_id: caller.user_id,
            restaurant_id,
            date,
            time,
            people_count,
        })
        .await?;

    info!(user_id = %caller.user_id, %reservation_id, "created reservation");

    Ok((
        StatusCode::CREATED,
        Json(CreateReservationResponse {
            message: "Reservation successful".to_string(),
            reservation_id,
        }),
    ))
}

/// GET /reservations/user - List the calling user's reservations
#[utoipa::path(
    get,
    path = "/reservations/user",
    responses(
        (status = 200, description = "The caller's reservations, newest slot first", body = [ReservationView]),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reservations_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.reservations.list_for_user(caller.user_id).await?;

    let views: Vec<ReservationView> = entries
        .into_iter()
        .map(ReservationView::from_entry)
        .collect();

    Ok(Json(views))
}

/// DELETE /reservations/{id} - Delete one of the calling user's reservations
#[utoipa::path(
    delete,
    path = "/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "The reservation to delete")
    ),
    responses(
        (status = 200, description = "Reservation deleted", body = DeleteReservationResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Reservation missing or owned by someone else"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_reservation_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // The store matches reservation_id and user_id in one statement; a miss
    // for either reason surfaces as the same 403.
    state
        .reservations
        .delete_reservation(reservation_id, caller.user_id)
        .await?;

    info!(user_id = %caller.user_id, %reservation_id, "deleted reservation");

    Ok(Json(DeleteReservationResponse {
        message: "Reservation deleted".to_string(),
    }))
}

//=========================================================================================
// Tests
//=========================================================================================
