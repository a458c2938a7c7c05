//! Google Calendar gateway for reschedule.
//!
//! Files involved:
//!   credentials.json  OAuth client identity downloaded from the Google Cloud console
//!   token.toml        access/refresh tokens written after the browser grant

use std::path::PathBuf;

pub mod app_config;
pub mod authenticate;
pub mod convert;
pub mod gateway;
pub mod session;

pub use gateway::GoogleGateway;

/// Where the client identity and the token record live.
#[derive(Debug, Clone)]
pub struct AuthPaths {
    pub credentials: PathBuf,
    pub token: PathBuf,
}
