//! Shared fixtures for the integration suites: in-memory implementations of
//! the storage ports, a seeded catalog, and a builder that wires them to the
//! real router, token service and auth middleware.

// Not every suite uses every helper.
#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::token::TokenService;
use api_lib::web::{self, state::AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use restobook_core::domain::{
    NewReservation, NewUser, Restaurant, ReservationEntry, User, UserCredentials,
};
use restobook_core::ports::{
    IdentityStore, PortError, PortResult, ReservationStore, RestaurantCatalog,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Signing secret shared by the app under test and any token a test forges.
pub const TEST_SECRET: &str = "integration-test-signing-secret";

//=========================================================================================
// In-Memory Port Implementations
//=========================================================================================

#[derive(Default)]
pub struct MemoryIdentityStore {
    users: Mutex<Vec<UserCredentials>>,
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let mut users = self.users.lock().unwrap();
        // Verbatim email comparison, like the unique index in the real store.
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(PortError::DuplicateEmail);
        }
        let credentials = UserCredentials {
            user_id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            credential_hash: new_user.credential_hash,
        };
        users.push(credentials.clone());
        Ok(User {
            user_id: credentials.user_id,
            name: credentials.name,
            email: credentials.email,
            created_at: Utc::now(),
        })
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

pub struct MemoryReservationStore {
    reservations: Mutex<Vec<ReservationEntry>>,
    restaurants: Vec<Restaurant>,
}

impl MemoryReservationStore {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self {
            reservations: Mutex::new(Vec::new()),
            restaurants,
        }
    }

    fn restaurant_name(&self, restaurant_id: i64) -> String {
        self.restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn create_reservation(&self, new_reservation: NewReservation) -> PortResult<Uuid> {
        let reservation_id = Uuid::new_v4();
        let entry = ReservationEntry {
            reservation_id,
            user_id: new_reservation.user_id,
            restaurant_id: new_reservation.restaurant_id,
            restaurant_name: self.restaurant_name(new_reservation.restaurant_id),
            date: new_reservation.date,
            time: new_reservation.time,
            people_count: new_reservation.people_count,
        };
        self.reservations.lock().unwrap().push(entry);
        Ok(reservation_id)
    }

    async fn list_for_user(&self, user_id: Uuid) -> PortResult<Vec<ReservationEntry>> {
        let reservations = self.reservations.lock().unwrap();
        let mut rows: Vec<ReservationEntry> = reservations
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Same ordering contract as the SQL query: date desc, then time desc.
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.time.cmp(&a.time)));
        Ok(rows)
    }

    async fn delete_reservation(&self, reservation_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let mut reservations = self.reservations.lock().unwrap();
        let before = reservations.len();
        reservations.retain(|e| !(e.reservation_id == reservation_id && e.user_id == user_id));
        if reservations.len() == before {
            return Err(PortError::NotFound(format!(
                "Reservation {} owned by this user not found",
                reservation_id
            )));
        }
        Ok(())
    }
}

pub struct MemoryCatalog {
    restaurants: Vec<Restaurant>,
}

impl MemoryCatalog {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }
}

#[async_trait]
impl RestaurantCatalog for MemoryCatalog {
    async fn get_by_id(&self, restaurant_id: i64) -> PortResult<Option<Restaurant>> {
        Ok(self
            .restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn list_all(&self) -> PortResult<Vec<Restaurant>> {
        Ok(self.restaurants.clone())
    }
}

//=========================================================================================
// App Builder
//=========================================================================================

pub fn seed_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            restaurant_id: 1,
            name: "La Pizzeria".to_string(),
            location: "12 Harbor Street".to_string(),
            description: "Wood-fired pizza and classic Italian dishes.".to_string(),
        },
        Restaurant {
            restaurant_id: 2,
            name: "Sushi World".to_string(),
            location: "3 Market Square".to_string(),
            description: "Fresh sushi and sashimi.".to_string(),
        },
        Restaurant {
            restaurant_id: 3,
            name: "Greek Tavern".to_string(),
            location: "45 Olive Road".to_string(),
            description: "Traditional Greek dishes by the sea.".to_string(),
        },
    ]
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused-in-tests".to_string(),
        token_secret: TEST_SECRET.to_string(),
        log_level: tracing::Level::INFO,
    }
}

/// Builds the real router over fresh in-memory stores.
///
/// Clones of the returned router share state, so one app instance carries a
/// whole scenario across requests.
pub fn test_app() -> Router {
    let restaurants = seed_restaurants();
    let state = Arc::new(AppState {
        identities: Arc::new(MemoryIdentityStore::default()),
        reservations: Arc::new(MemoryReservationStore::new(restaurants.clone())),
        catalog: Arc::new(MemoryCatalog::new(restaurants)),
        tokens: TokenService::new(TEST_SECRET),
        config: Arc::new(test_config()),
    });
    web::router(state)
}

//=========================================================================================
// Request Helpers
//=========================================================================================

/// Sends one request through the router and returns status plus parsed body.
///
/// Non-JSON bodies (like the health probe's plain text) come back as a JSON
/// string value so assertions stay uniform.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };

    (status, json)
}

pub async fn register(
    app: &Router,
    name: &str,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    request(
        app,
        Method::POST,
        "/register",
        None,
        Some(serde_json::json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    request(
        app,
        Method::POST,
        "/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await
}

/// Registers and logs a user in, returning a live bearer token.
pub async fn signed_up_token(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = register(app, name, email, password).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("login must return a token").to_string()
}

/// Forges a token that expired an hour ago, signed with the app's secret.
pub fn expired_token(email: &str) -> String {
    let issued = Utc::now().timestamp() - 2 * 60 * 60;
    let claims = serde_json::json!({
        "sub": Uuid::new_v4(),
        "email": email,
        "iat": issued,
        "exp": issued + 60 * 60,
    });
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}
