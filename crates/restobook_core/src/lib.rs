pub mod domain;
pub mod ports;

pub use domain::{NewReservation, NewUser, Restaurant, ReservationEntry, User, UserCredentials};
pub use ports::{IdentityStore, PortError, PortResult, ReservationStore, RestaurantCatalog};
