//! services/api/src/lib.rs
//!
//! Library surface of the API service, so the binaries and the integration
//! tests share one definition of the configuration, error mapping, token
//! service, storage adapter and web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod token;
pub mod web;
