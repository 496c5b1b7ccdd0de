//! crates/restobook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

// Represents a registered user - safe to hand out, no credential material.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for registration - carries the already-derived hash,
// never the raw password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub credential_hash: String,
}

// Only used internally for login verification - contains sensitive data.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub credential_hash: String,
}

/// An entry in the read-only restaurant catalog.
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub restaurant_id: i64,
    pub name: String,
    pub location: String,
    pub description: String,
}

/// A booking intent accepted from an authenticated user. The slot is a naive
/// calendar date plus time-of-day; no timezone is modeled.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: Uuid,
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub people_count: i32,
}

/// A reservation joined with its restaurant's display name, as returned when
/// a user lists their own booking history.
#[derive(Debug, Clone)]
pub struct ReservationEntry {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub people_count: i32,
}
