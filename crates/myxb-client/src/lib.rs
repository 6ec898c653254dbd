//! myxb-client: school portal integration.
//!
//! Implements the `ScoreSource` trait over the portal's HTTP API, handles
//! login and session cookies, and stores settings and saved credentials.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;

pub use client::PortalClient;
pub use config::{load_settings_from, Credentials, Settings};
pub use error::ApiError;
