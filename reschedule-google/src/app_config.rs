//! The OAuth client identity (client id and secret) used for the browser
//! grant and for token refresh.
//!
//! Accepts the JSON file downloaded from the Google Cloud console
//! (`{"installed": {...}}` or `{"web": {...}}`) as well as a flat
//! `{"client_id": ..., "client_secret": ...}` object.

use std::path::Path;

use reschedule_core::RescheduleError;
use serde::Deserialize;

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

impl From<CredentialsFile> for Credentials {
    fn from(file: CredentialsFile) -> Self {
        match file {
            CredentialsFile::Installed { installed } => installed,
            CredentialsFile::Web { web } => web,
            CredentialsFile::Flat(creds) => creds,
        }
    }
}

pub fn load(path: &Path) -> Result<Credentials, RescheduleError> {
    if !path.exists() {
        return Err(RescheduleError::AuthConfiguration(format!(
            "Google credentials not found.\n\n\
            Download an OAuth client ID (application type \"Desktop app\") from\n\
            https://console.cloud.google.com/apis/credentials\n\
            and save it as {}\n\n\
            Then run the command again.",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        RescheduleError::AuthConfiguration(format!(
            "Failed to read credentials from {}: {}",
            path.display(),
            e
        ))
    })?;

    let file: CredentialsFile = serde_json::from_str(&contents).map_err(|e| {
        RescheduleError::AuthConfiguration(format!(
            "Failed to parse credentials from {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(file.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_downloaded_desktop_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"{"installed": {
                "client_id": "abc.apps.googleusercontent.com",
                "project_id": "demo",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"]
            }}"#,
        );

        let creds = load(&path).unwrap();

        assert_eq!(creds.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(creds.client_secret, "shh");
    }

    #[test]
    fn reads_web_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"web": {"client_id": "w", "client_secret": "s"}}"#);

        assert_eq!(load(&path).unwrap().client_id, "w");
    }

    #[test]
    fn reads_flat_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"client_id": "flat", "client_secret": "s"}"#);

        assert_eq!(load(&path).unwrap().client_id, "flat");
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = load(&dir.path().join("nope.json")).unwrap_err();

        assert!(matches!(err, RescheduleError::AuthConfiguration(_)));
        assert!(err.to_string().contains("console.cloud.google.com"));
    }

    #[test]
    fn malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, r#"{"installed": {"client_id": 5}}"#);

        assert!(matches!(
            load(&path).unwrap_err(),
            RescheduleError::AuthConfiguration(_)
        ));
    }
}
