//! Settings for the reschedule CLI.
//!
//! Layered lowest to highest: built-in defaults, `<config dir>/reschedule/config.toml`,
//! the `GCAL_CAL_ID` / `GCAL_TZ` environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, File};
use reschedule_core::{BusinessRules, ConflictPolicy, RescheduleError};
use reschedule_google::AuthPaths;
use serde::Deserialize;

const APP_DIR: &str = "reschedule";

pub const CALENDAR_ID_ENV: &str = "GCAL_CAL_ID";
pub const TIME_ZONE_ENV: &str = "GCAL_TZ";

/// Allowed look-ahead, in days.
pub const DAYS_AHEAD_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// IANA zone name sent with the patched start/end. Not interpreted locally.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_min_notice_hours")]
    pub min_notice_hours: f64,

    #[serde(default = "default_business_hours_start")]
    pub business_hours_start: u32,

    #[serde(default = "default_business_hours_end")]
    pub business_hours_end: u32,

    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_time_zone() -> String {
    "Europe/London".to_string()
}

fn default_days_ahead() -> u32 {
    14
}

fn default_max_results() -> usize {
    100
}

fn default_min_notice_hours() -> f64 {
    reschedule_core::rules::DEFAULT_MIN_NOTICE_HOURS
}

fn default_business_hours_start() -> u32 {
    reschedule_core::rules::DEFAULT_BUSINESS_HOURS_START
}

fn default_business_hours_end() -> u32 {
    reschedule_core::rules::DEFAULT_BUSINESS_HOURS_END
}

fn default_credentials_path() -> PathBuf {
    base_dir().join("credentials.json")
}

fn default_token_path() -> PathBuf {
    base_dir().join("token.toml")
}

/// Directory holding the config file, credentials and tokens.
pub fn base_dir() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join(APP_DIR),
        None => PathBuf::from(format!("~/.config/{}", APP_DIR)),
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub calendar_id: Option<String>,
    pub time_zone: Option<String>,
    pub days_ahead: Option<u32>,
    pub min_notice_hours: Option<f64>,
    pub business_hours: Option<(u32, u32)>,
    pub block_on_conflict: bool,
}

impl Settings {
    pub fn config_path() -> PathBuf {
        expand(&base_dir().join("config.toml"))
    }

    /// Load from the default location, creating a commented template if absent.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            if let Err(e) = Self::create_default_config(&path) {
                tracing::warn!(error = %format!("{:#}", e), "could not write default config");
            }
        }

        Self::load_from(
            &path,
            std::env::var(CALENDAR_ID_ENV).ok(),
            std::env::var(TIME_ZONE_ENV).ok(),
        )
    }

    pub fn load_from(
        path: &Path,
        calendar_id_env: Option<String>,
        time_zone_env: Option<String>,
    ) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_override_option("calendar_id", calendar_id_env)?
            .set_override_option("time_zone", time_zone_env)?
            .build()
            .with_context(|| format!("Failed to read config file at {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(calendar_id) = overrides.calendar_id {
            self.calendar_id = calendar_id;
        }
        if let Some(time_zone) = overrides.time_zone {
            self.time_zone = time_zone;
        }
        if let Some(days) = overrides.days_ahead {
            self.days_ahead = days;
        }
        if let Some(hours) = overrides.min_notice_hours {
            self.min_notice_hours = hours;
        }
        if let Some((start, end)) = overrides.business_hours {
            self.business_hours_start = start;
            self.business_hours_end = end;
        }
        if overrides.block_on_conflict {
            self.conflict_policy = ConflictPolicy::Block;
        }
        self
    }

    pub fn rules(&self) -> Result<BusinessRules, RescheduleError> {
        BusinessRules::new(
            self.min_notice_hours,
            self.business_hours_start,
            self.business_hours_end,
        )
    }

    pub fn checked_days_ahead(&self) -> Result<u32, RescheduleError> {
        if DAYS_AHEAD_RANGE.contains(&self.days_ahead) {
            Ok(self.days_ahead)
        } else {
            Err(RescheduleError::InvalidConfiguration(format!(
                "look-ahead must be between {} and {} days, got {}",
                DAYS_AHEAD_RANGE.start(),
                DAYS_AHEAD_RANGE.end(),
                self.days_ahead
            )))
        }
    }

    pub fn auth_paths(&self) -> AuthPaths {
        AuthPaths {
            credentials: expand(&self.credentials_path),
            token: expand(&self.token_path),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> Result<()> {
        let contents = format!(
            "\
# reschedule configuration

# Calendar to browse (\"primary\" is the account's main calendar):
# calendar_id = \"{calendar_id}\"

# Time zone label sent with rescheduled events:
# time_zone = \"{time_zone}\"

# How many days ahead to list events, and how many at most:
# days_ahead = {days_ahead}
# max_results = {max_results}

# Business rules:
# min_notice_hours = {notice}
# business_hours_start = {bh_start}
# business_hours_end = {bh_end}

# What a conflicting event does: \"warn\" (default) or \"block\":
# conflict_policy = \"warn\"

# OAuth client identity and stored tokens:
# credentials_path = \"{credentials}\"
# token_path = \"{token}\"
",
            calendar_id = default_calendar_id(),
            time_zone = default_time_zone(),
            days_ahead = default_days_ahead(),
            max_results = default_max_results(),
            notice = default_min_notice_hours(),
            bh_start = default_business_hours_start(),
            bh_end = default_business_hours_end(),
            credentials = default_credentials_path().display(),
            token = default_token_path().display(),
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create config directory {}", parent.display()))?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Could not write config file {}", path.display()))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Parse `START-END`, e.g. `9-17`.
pub fn parse_business_hours(s: &str) -> Result<(u32, u32), String> {
    let (start, end) = s
        .split_once(['-', '–'])
        .ok_or_else(|| format!("Expected START-END (e.g. 9-17), got '{}'", s))?;

    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid hour '{}' in '{}'", v.trim(), s))
    };

    Ok((parse(start)?, parse(end)?))
}
