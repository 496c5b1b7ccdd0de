//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `IdentityStore`, `ReservationStore` and `RestaurantCatalog` ports from
//! the `core` crate. It handles all interactions with the PostgreSQL database
//! using `sqlx`.
//!
//! The two cross-request contention points, email uniqueness and the owner-scoped
//! delete, are pushed down into single SQL statements so the database enforces
//! them atomically instead of a read-then-write sequence in application code.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use restobook_core::domain::{
    NewReservation, NewUser, Restaurant, ReservationEntry, User, UserCredentials,
};
use restobook_core::ports::{
    IdentityStore, PortError, PortResult, ReservationStore, RestaurantCatalog,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements all three storage ports.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    name: String,
    email: String,
    credential_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }

    fn to_credentials(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            name: self.name,
            email: self.email,
            credential_hash: self.credential_hash,
        }
    }
}

#[derive(FromRow)]
struct RestaurantRecord {
    restaurant_id: i64,
    name: String,
    location: String,
    description: String,
}

impl RestaurantRecord {
    fn to_domain(self) -> Restaurant {
        Restaurant {
            restaurant_id: self.restaurant_id,
            name: self.name,
            location: self.location,
            description: self.description,
        }
    }
}

#[derive(FromRow)]
struct ReservationEntryRecord {
    reservation_id: Uuid,
    user_id: Uuid,
    restaurant_id: i64,
    restaurant_name: String,
    date: NaiveDate,
    time: NaiveTime,
    people_count: i32,
}

impl ReservationEntryRecord {
    fn to_domain(self) -> ReservationEntry {
        ReservationEntry {
            reservation_id: self.reservation_id,
            user_id: self.user_id,
            restaurant_id: self.restaurant_id,
            restaurant_name: self.restaurant_name,
            date: self.date,
            time: self.time,
            people_count: self.people_count,
        }
    }
}

//=========================================================================================
// `IdentityStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, name, email, credential_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING user_id, name, email, credential_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.credential_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The unique index on email is the authoritative duplicate check,
            // so concurrent registrations race here rather than in a prior SELECT.
            sqlx::Error::Database(db) if db.is_unique_violation() => PortError::DuplicateEmail,
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, name, email, credential_hash, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(|r| r.to_credentials()))
    }
}

//=========================================================================================
// `ReservationStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ReservationStore for PgStore {
    async fn create_reservation(&self, new_reservation: NewReservation) -> PortResult<Uuid> {
        let reservation_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO reservations (reservation_id, user_id, restaurant_id, date, time, people_count)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(reservation_id)
        .bind(new_reservation.user_id)
        .bind(new_reservation.restaurant_id)
        .bind(new_reservation.date)
        .bind(new_reservation.time)
        .bind(new_reservation.people_count)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(reservation_id)
    }

    async fn list_for_user(&self, user_id: Uuid) -> PortResult<Vec<ReservationEntry>> {
        let records = sqlx::query_as::<_, ReservationEntryRecord>(
            "SELECT r.reservation_id, r.user_id, r.restaurant_id,
                    rest.name AS restaurant_name, r.date, r.time, r.people_count
             FROM reservations r
             JOIN restaurants rest ON rest.restaurant_id = r.restaurant_id
             WHERE r.user_id = $1
             ORDER BY r.date DESC, r.time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let entries = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(entries)
    }

    async fn delete_reservation(&self, reservation_id: Uuid, user_id: Uuid) -> PortResult<()> {
        // Ownership and existence are checked in the same statement; zero rows
        // affected stays deliberately ambiguous between the two.
        let result =
            sqlx::query("DELETE FROM reservations WHERE reservation_id = $1 AND user_id = $2")
                .bind(reservation_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Reservation {} owned by this user not found",
                reservation_id
            )));
        }

        Ok(())
    }
}

//=========================================================================================
// `RestaurantCatalog` Trait Implementation
//=========================================================================================

#[async_trait]
impl RestaurantCatalog for PgStore {
    async fn get_by_id(&self, restaurant_id: i64) -> PortResult<Option<Restaurant>> {
        let record = sqlx::query_as::<_, RestaurantRecord>(
            "SELECT restaurant_id, name, location, description
             FROM restaurants WHERE restaurant_id = $1",
        )
        .bind(restaurant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(|r| r.to_domain()))
    }

    async fn list_all(&self) -> PortResult<Vec<Restaurant>> {
        let records = sqlx::query_as::<_, RestaurantRecord>(
            "SELECT restaurant_id, name, location, description
             FROM restaurants ORDER BY restaurant_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let restaurants = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(restaurants)
    }
}
