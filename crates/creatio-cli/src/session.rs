//! Session storage for persisting login state between invocations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use creatio_core::ServiceUrl;
use creatio_odata::{ClientConfig, SessionClient, SessionState};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored sessions older than this are discarded without asking the server.
const MAX_SESSION_AGE_HOURS: i64 = 1;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    base_url: String,
    username: String,
    session: SessionState,
    saved_at: DateTime<Utc>,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "creatio").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session to disk.
pub fn save_session(base_url: &ServiceUrl, username: &str, session: &SessionState) -> Result<()> {
    save_to(&session_path()?, base_url, username, session)
}

/// Load the stored session for the given instance, if present and fresh.
pub fn load_session(base_url: &ServiceUrl) -> Result<Option<SessionState>> {
    load_from(&session_path()?, base_url)
}

/// Clear the stored session.
pub fn clear_session() -> Result<()> {
    let path = session_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }

    Ok(())
}

/// Build a client from the stored session.
///
/// Data commands never log in implicitly; they require a session stored by
/// `creatio login`.
pub fn connected_client(base_url: ServiceUrl) -> Result<SessionClient> {
    let session = load_session(&base_url)?
        .context("No active session. Run 'creatio login' first.")?;

    let config = ClientConfig::new(base_url).session(session);
    Ok(SessionClient::new(config)?)
}

fn save_to(
    path: &Path,
    base_url: &ServiceUrl,
    username: &str,
    session: &SessionState,
) -> Result<()> {
    let stored = StoredSession {
        base_url: base_url.as_str().to_string(),
        username: username.to_string(),
        session: session.clone(),
        saved_at: Utc::now(),
    };

    let json = serde_json::to_string_pretty(&stored)?;
    fs::write(path, &json).context("Failed to write session file")?;

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn load_from(path: &Path, base_url: &ServiceUrl) -> Result<Option<SessionState>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    if stored.base_url != base_url.as_str() {
        tracing::debug!("stored session belongs to a different instance, ignoring");
        return Ok(None);
    }
    if Utc::now() - stored.saved_at > Duration::hours(MAX_SESSION_AGE_HOURS) {
        tracing::debug!("stored session is stale, ignoring");
        return Ok(None);
    }
    if !stored.session.is_authenticated() {
        return Ok(None);
    }

    Ok(Some(stored.session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> ServiceUrl {
        ServiceUrl::new("https://mycompany.creatio.com").unwrap()
    }

    fn session() -> SessionState {
        let mut state = SessionState::default();
        state
            .cookies
            .insert("BPMCSRF".to_string(), "tok".to_string());
        state
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        save_to(&path, &url(), "Supervisor", &session()).unwrap();
        let loaded = load_from(&path, &url()).unwrap().unwrap();

        assert_eq!(loaded.cookies.get("BPMCSRF").map(String::as_str), Some("tok"));
    }

    #[test]
    fn session_for_other_instance_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        save_to(&path, &url(), "Supervisor", &session()).unwrap();
        let other = ServiceUrl::new("https://other.creatio.com").unwrap();
        assert!(load_from(&path, &other).unwrap().is_none());
    }

    #[test]
    fn unauthenticated_snapshot_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        save_to(&path, &url(), "Supervisor", &SessionState::default()).unwrap();
        assert!(load_from(&path, &url()).unwrap().is_none());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        assert!(load_from(&path, &url()).unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        save_to(&path, &url(), "Supervisor", &session()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
