//! Coffee shop menu API.
//!
//! This library exposes the service internals for integration testing.
//! The main entry point for running the server is the `coffee-shop` binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use state::AppState;
