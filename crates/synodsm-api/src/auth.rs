// Credentials and session state
//
// A DSM session is the `sid` returned by `SYNO.API.Auth/login`, optionally
// paired with a `SynoToken` (CSRF guard) and a device token that lets a
// trusted device skip the one-time-code challenge on later logins.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

/// Account credentials used to open sessions.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    /// Device token from an earlier successful two-step login.
    pub device_token: Option<SecretString>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            device_token: None,
        }
    }

    pub fn with_device_token(mut self, token: impl Into<SecretString>) -> Self {
        self.device_token = Some(token.into());
        self
    }
}

/// Observable lifecycle of a gateway session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No login has succeeded yet (or the session was closed).
    Unauthenticated,
    /// A session id is held.
    Authenticated,
    /// The server rejected the session; the next dispatch logs in again.
    SessionInvalidated,
}

/// `data` object of a successful login reply.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    pub sid: String,
    #[serde(default)]
    pub synotoken: Option<String>,
    /// Device token on DSM 6.
    #[serde(default)]
    pub did: Option<String>,
    /// Device token on DSM 7.
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct Session {
    sid: Option<SecretString>,
    syno_token: Option<SecretString>,
    device_token: Option<SecretString>,
    invalidated: bool,
}

impl Session {
    pub fn new(device_token: Option<SecretString>) -> Self {
        Self {
            device_token,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.sid.is_some() {
            SessionState::Authenticated
        } else if self.invalidated {
            SessionState::SessionInvalidated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn sid(&self) -> Option<&str> {
        self.sid.as_ref().map(ExposeSecret::expose_secret)
    }

    pub fn syno_token(&self) -> Option<&str> {
        self.syno_token.as_ref().map(ExposeSecret::expose_secret)
    }

    pub fn device_token(&self) -> Option<&str> {
        self.device_token.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Drop the current session ahead of a new login. The device token survives.
    pub fn reset(&mut self) {
        self.sid = None;
        self.syno_token = None;
        self.invalidated = false;
    }

    /// Record a successful login.
    ///
    /// A returned device token is only kept when this login satisfied a
    /// one-time-code challenge or renewed a token already held.
    pub fn establish(&mut self, data: LoginData, otp_supplied: bool) {
        self.sid = Some(SecretString::from(data.sid));
        self.syno_token = data.synotoken.map(SecretString::from);
        self.invalidated = false;

        if let Some(token) = data.device_id.or(data.did) {
            if otp_supplied || self.device_token.is_some() {
                self.device_token = Some(SecretString::from(token));
            } else {
                debug!("ignoring device token granted without a two-step challenge");
            }
        }
    }

    /// The server no longer recognizes the session.
    pub fn invalidate(&mut self) {
        self.sid = None;
        self.syno_token = None;
        self.device_token = None;
        self.invalidated = true;
    }

    /// Close the session after a logout.
    pub fn end(&mut self) {
        self.sid = None;
        self.syno_token = None;
        self.invalidated = false;
    }
}
