//! Session persistence and identity resolution.
//!
//! The session token issued at sign-in is kept in
//! `~/.rehabos/session.json` (0600 on unix). Identity is decoded from the
//! token's JWT claims on every resolve call — nothing is cached, so a
//! revoked or expired session is caught before the next data operation.

use std::path::PathBuf;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Identity;

/// Session payload persisted at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix seconds. When absent, the JWT `exp` claim is used instead.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// Claims the core reads from the access token.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Resolves the current authenticated identity. Gate for every fetch and
/// mutation; on failure the caller performs no data operation.
pub trait SessionGuard: Send + Sync {
    fn resolve(&self) -> Result<(Identity, StoredSession), CoreError>;
}

/// File-backed guard. Re-reads the session file on every call.
#[derive(Debug, Default, Clone)]
pub struct FileSession;

impl SessionGuard for FileSession {
    fn resolve(&self) -> Result<(Identity, StoredSession), CoreError> {
        let session = load_session()?;
        let identity = identity_from_session(&session)?;
        Ok((identity, session))
    }
}

/// Path to the session file: `~/.rehabos/session.json`.
pub fn session_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rehabos")
        .join("session.json")
}

/// Load the persisted session. A missing file means signed out.
pub fn load_session() -> Result<StoredSession, CoreError> {
    load_session_from(&session_path())
}

pub fn load_session_from(path: &std::path::Path) -> Result<StoredSession, CoreError> {
    if !path.exists() {
        return Err(CoreError::Unauthenticated);
    }
    let content = std::fs::read_to_string(path)?;
    let session: StoredSession = serde_json::from_str(&content)?;
    Ok(session)
}

/// Persist a session (called by the sign-in surface, which is outside this
/// core). Atomic write, 0600 on unix.
pub fn save_session(session: &StoredSession) -> Result<(), CoreError> {
    save_session_to(&session_path(), session)
}

pub fn save_session_to(
    path: &std::path::Path,
    session: &StoredSession,
) -> Result<(), CoreError> {
    let parent = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    if !parent.exists() {
        std::fs::create_dir_all(parent)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
        }
    }

    let content = serde_json::to_string_pretty(session)?;
    let tmp = tempfile::NamedTempFile::new_in(parent)?;
    std::fs::write(tmp.path(), content)?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Remove the persisted session (sign-out).
pub fn delete_session() -> Result<(), CoreError> {
    let path = session_path();
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Decode [`Identity`] from a session, rejecting expired tokens.
pub fn identity_from_session(session: &StoredSession) -> Result<Identity, CoreError> {
    let claims = decode_claims(&session.access_token)?;

    let expires_at = session.expires_at.or(claims.exp);
    if let Some(exp) = expires_at {
        if exp <= Utc::now().timestamp() {
            return Err(CoreError::Unauthenticated);
        }
    }

    Ok(Identity {
        user_id: claims.sub,
        email: claims.email.unwrap_or_default(),
    })
}

/// Decode the JWT payload segment. Signature verification is the store's
/// job; the client only reads its own claims.
fn decode_claims(access_token: &str) -> Result<TokenClaims, CoreError> {
    let payload = access_token
        .split('.')
        .nth(1)
        .ok_or(CoreError::Unauthenticated)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| CoreError::Unauthenticated)?;
    serde_json::from_slice(&bytes).map_err(|_| CoreError::Unauthenticated)
}

#[cfg(test)]
pub(crate) fn make_test_token(user_id: Uuid, email: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "sub": user_id, "email": email, "exp": exp }).to_string(),
    );
    format!("{}.{}.sig", header, payload)
}
