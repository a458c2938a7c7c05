//! The persisted OAuth token record and its refresh.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::Credentials;

/// Treat tokens this close to expiry as already expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub struct Session {
    path: PathBuf,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData::from_tokens(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_in,
        )
    }
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        SessionData {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }
}

impl Session {
    pub fn new(path: &Path, data: SessionData) -> Self {
        Session {
            path: path.to_path_buf(),
            data,
        }
    }

    /// Read the token record at `path`; `Ok(None)` when there is none yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Some(Session::new(path, data)))
    }

    pub fn save(&self) -> Result<()> {
        let contents =
            toml::to_string_pretty(&self.data).context("Failed to serialize token record")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token record to {}", self.path.display()))?;

        // Tokens: owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.data.expires_at
    }

    pub fn can_refresh(&self) -> bool {
        !self.data.refresh_token.is_empty()
    }

    /// An API client carrying this session's tokens.
    pub fn client(&self, credentials: Option<&Credentials>) -> Client {
        let (client_id, client_secret) = credentials
            .map(|c| (c.client_id.clone(), c.client_secret.clone()))
            .unwrap_or_default();

        Client::new(
            client_id,
            client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    /// Exchange the refresh token for a new access token and persist it.
    pub async fn refresh(&mut self, credentials: &Credentials) -> Result<()> {
        let client = self.client(Some(credentials));

        let tokens = client
            .refresh_access_token()
            .await
            .context("Google refused the stored refresh token")?;

        // A refresh response usually omits the refresh token; keep ours.
        let refresh_token = if tokens.refresh_token.is_empty() {
            self.data.refresh_token.clone()
        } else {
            tokens.refresh_token.clone()
        };
        self.data = SessionData::from_tokens(
            tokens.access_token.clone(),
            refresh_token,
            tokens.expires_in,
        );
        self.save()?;

        tracing::info!(expires_at = %self.data.expires_at, "refreshed Google access token");

        Ok(())
    }
}
