//! crates/restobook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use crate::domain::{NewReservation, NewUser, Restaurant, ReservationEntry, User, UserCredentials};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// An identity with the same email already exists.
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Owns user identity records. The only component allowed to read or write
/// credential material.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Persists a new identity. Uniqueness of the email is enforced by the
    /// storage layer itself, not by a prior read; a violation surfaces as
    /// `PortError::DuplicateEmail` even under concurrent registration.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    /// Looks up the credential record for an exact (case-sensitive) email.
    /// `Ok(None)` means no such identity exists.
    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>>;
}

/// Owns reservation records. Every mutation is scoped to the owning user.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persists a booking and returns its freshly assigned id.
    async fn create_reservation(&self, new_reservation: NewReservation) -> PortResult<Uuid>;

    /// Returns every reservation owned by `user_id`, joined with the
    /// restaurant display name, ordered by date descending then time
    /// descending. An empty list is a valid result.
    async fn list_for_user(&self, user_id: Uuid) -> PortResult<Vec<ReservationEntry>>;

    /// Deletes a reservation only if it exists AND is owned by `user_id`,
    /// as one conditional statement. Zero rows matched surfaces as
    /// `PortError::NotFound` without revealing which condition failed.
    async fn delete_reservation(&self, reservation_id: Uuid, user_id: Uuid) -> PortResult<()>;
}

/// Read-only access to the restaurant catalog.
#[async_trait]
pub trait RestaurantCatalog: Send + Sync {
    async fn get_by_id(&self, restaurant_id: i64) -> PortResult<Option<Restaurant>>;

    async fn list_all(&self) -> PortResult<Vec<Restaurant>>;
}
