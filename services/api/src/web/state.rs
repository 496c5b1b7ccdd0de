//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::token::TokenService;
use restobook_core::ports::{IdentityStore, ReservationStore, RestaurantCatalog};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<dyn IdentityStore>,
    pub reservations: Arc<dyn ReservationStore>,
    pub catalog: Arc<dyn RestaurantCatalog>,
    pub tokens: TokenService,
    pub config: Arc<Config>,
}
