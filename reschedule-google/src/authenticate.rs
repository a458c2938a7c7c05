//! Token lifecycle: reuse, refresh, or run the browser consent flow.

use anyhow::{Context, Result};
use google_calendar::Client;
use reschedule_core::{RescheduleError, RescheduleResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::AuthPaths;
use crate::app_config::{self, Credentials};
use crate::session::{Session, SessionData};

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Loopback address for the sign-in redirect; the OS picks a free port.
const REDIRECT_BIND: &str = "127.0.0.1:0";

/// Redirect target for a listener bound on `port`.
pub fn redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{}/callback", port)
}

/// Listen for the sign-in redirect, returning the listener and its URI.
async fn bind_redirect() -> Result<(TcpListener, String)> {
    let listener = TcpListener::bind(REDIRECT_BIND)
        .await
        .context("Could not open a local port for the sign-in redirect")?;
    let port = listener.local_addr()?.port();
    Ok((listener, redirect_uri(port)))
}

/// A usable session plus the client identity, if one was needed to get it.
pub struct Authorized {
    pub session: Session,
    pub credentials: Option<Credentials>,
}

/// Load the stored session, refreshing it when expired. Falls back to the
/// browser grant when there is no session or the refresh fails.
pub async fn obtain(paths: &AuthPaths) -> RescheduleResult<Authorized> {
    match Session::load(&paths.token) {
        Ok(Some(session)) if !session.is_expired() => {
            tracing::debug!(path = %paths.token.display(), "using stored Google session");
            // Optional here: API calls only need the access token.
            let credentials = app_config::load(&paths.credentials).ok();
            return Ok(Authorized {
                session,
                credentials,
            });
        }
        Ok(Some(mut session)) if session.can_refresh() => {
            let credentials = app_config::load(&paths.credentials)?;
            match session.refresh(&credentials).await {
                Ok(()) => {
                    return Ok(Authorized {
                        session,
                        credentials: Some(credentials),
                    });
                }
                Err(e) => tracing::warn!(error = %format!("{:#}", e), "token refresh failed"),
            }
        }
        Ok(_) => tracing::debug!("no usable Google session, starting browser grant"),
        Err(e) => tracing::warn!(error = %format!("{:#}", e), "ignoring unreadable session"),
    }

    let credentials = app_config::load(&paths.credentials)?;
    let session = grant(paths, &credentials).await?;
    Ok(Authorized {
        session,
        credentials: Some(credentials),
    })
}

/// Run the interactive consent flow and persist the resulting session.
pub async fn grant(paths: &AuthPaths, credentials: &Credentials) -> RescheduleResult<Session> {
    let data = consent(credentials)
        .await
        .map_err(|e| RescheduleError::AuthFailure(format!("{:#}", e)))?;

    let session = Session::new(&paths.token, data);
    session
        .save()
        .map_err(|e| RescheduleError::AuthFailure(format!("{:#}", e)))?;

    tracing::info!(path = %paths.token.display(), "saved Google session");
    Ok(session)
}

async fn consent(credentials: &Credentials) -> Result<SessionData> {
    let (listener, redirect) = bind_redirect().await?;
    tracing::debug!(%redirect, "waiting for sign-in redirect");

    let mut client = Client::new(
        credentials.client_id.clone(),
        credentials.client_secret.clone(),
        redirect,
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(ToString::to_string).collect();
    let consent_url = client.user_consent_url(&scopes);

    eprintln!("\nSign in to Google to let reschedule manage your calendar:\n");
    eprintln!("  {}\n", consent_url);
    if let Err(e) = open::that(&consent_url) {
        tracing::debug!(error = %e, "could not launch a browser");
        eprintln!("(Open the link above manually.)");
    }

    let callback = wait_for_callback(listener).await?;
    tracing::debug!("received authorization code");

    let tokens = client
        .get_access_token(&callback.code, &callback.state)
        .await
        .context("Google rejected the authorization code")?;

    if tokens.access_token.is_empty() {
        anyhow::bail!("Google returned an empty access token");
    }

    Ok((&tokens).into())
}

/// Query parameters Google appends to the redirect.
#[derive(Debug, PartialEq)]
struct Callback {
    code: String,
    state: String,
}

/// Accept one request on the redirect port and answer it with a small page.
async fn wait_for_callback(listener: TcpListener) -> Result<Callback> {
    let (stream, _) = listener
        .accept()
        .await
        .context("Sign-in redirect never arrived")?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .context("Could not read the sign-in redirect")?;

    // Drain the headers so the browser sees the page rather than a reset.
    let mut header = String::new();
    while reader.read_line(&mut header).await? > 2 {
        header.clear();
    }

    let callback = parse_callback(&request_line);
    let page = match &callback {
        Ok(_) => "<h1>Signed in</h1><p>Return to the terminal to finish rescheduling.</p>",
        Err(_) => "<h1>Sign-in failed</h1><p>See the terminal for details.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nConnection: close\r\n\r\n<html><body>{}</body></html>",
        page
    );

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;

    callback
}

/// `GET /callback?code=...&state=... HTTP/1.1`
fn parse_callback(request_line: &str) -> Result<Callback> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .context("Malformed sign-in redirect")?;
    let url = url::Url::parse("http://localhost")?.join(target)?;

    let (mut code, mut state) = (None, None);
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => anyhow::bail!("Sign-in was declined ({})", value),
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(Callback {
        code: code.context("Sign-in redirect carried no authorization code")?,
        state: state.context("Sign-in redirect carried no state")?,
    })
}
