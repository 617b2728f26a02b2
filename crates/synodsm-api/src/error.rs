use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::API_AUTH;
use crate::error_codes::{UNKNOWN_REASON, reason_for};

/// Codes that mean the server no longer recognizes the session.
pub const SESSION_ERROR_CODES: [i64; 3] = [106, 107, 119];

/// Code reported for failures that never produced an API response.
pub const REQUEST_FAILED_CODE: i64 = -1;

/// Code reported when the server does not advertise the requested API.
pub const API_NOT_EXISTS_CODE: i64 = -2;

/// Class of a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFailure {
    /// Connection refused, DNS failure, reset.
    Connect,
    /// The request exceeded the configured timeout.
    Timeout,
    /// The server answered with a non-200 status.
    Status,
    /// The response body could not be read.
    Body,
    /// The response body was not valid JSON.
    Decode,
    /// The request could not be built.
    Builder,
    Other,
}

impl RequestFailure {
    /// Classify a `reqwest` error by what went wrong.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if err.is_status() {
            Self::Status
        } else if err.is_body() {
            Self::Body
        } else if err.is_decode() {
            Self::Decode
        } else if err.is_builder() {
            Self::Builder
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connect => "ConnectionError",
            Self::Timeout => "Timeout",
            Self::Status => "HTTPError",
            Self::Body => "BodyError",
            Self::Decode => "JSONDecodeError",
            Self::Builder => "BuilderError",
            Self::Other => "RequestError",
        };
        f.write_str(name)
    }
}

/// Top-level error type for the `synodsm-api` crate.
///
/// Every failure carries the same four facts: the API that produced it
/// (if any), a numeric code, a human-readable reason resolved from the DSM
/// code tables, and optional details. See [`Error::code`], [`Error::api`],
/// [`Error::reason`] and [`Error::details`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request failed before an API response was available.
    #[error("Request failed: {kind} = {message}")]
    Request {
        kind: RequestFailure,
        message: String,
    },

    /// The configured host/port did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The server does not advertise the requested API.
    #[error("API {api} does not exists")]
    ApiNotExists { api: String },

    /// The API answered with an `error` object.
    #[error("{api} failed with code {code}: {reason}")]
    Api {
        api: String,
        code: i64,
        reason: &'static str,
        details: Option<Value>,
    },

    // ── Login ───────────────────────────────────────────────────────
    /// Code 400: wrong password or not an administrator.
    #[error("Invalid password or not admin account: {username}")]
    LoginInvalid { username: String },

    /// Code 401: guest or disabled account.
    #[error("Guest or disabled account: {username}")]
    LoginDisabledAccount { username: String },

    /// Code 402: the account may not log in.
    #[error("Permission denied for account: {username}")]
    LoginPermissionDenied { username: String },

    /// Code 403: a one-time code is required.
    #[error("Two-step authentication required for account: {username}")]
    Login2faRequired { username: String },

    /// Code 404: the supplied one-time code was rejected.
    #[error("Two-step authentication failed, retry with a new pass code")]
    Login2faFailed,

    /// Any other authentication failure.
    #[error("Login failed with code {code} ({reason}) for account: {username}")]
    LoginFailed {
        code: i64,
        reason: &'static str,
        username: String,
    },
}

impl Error {
    pub(crate) fn request(kind: RequestFailure, message: impl Into<String>) -> Self {
        Self::Request {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        Self::request(RequestFailure::classify(err), err.to_string())
    }

    pub(crate) fn api_error(api: &str, code: i64, details: Option<Value>) -> Self {
        Self::Api {
            api: api.to_owned(),
            code,
            reason: reason_for(Some(api), code),
            details,
        }
    }

    /// Map an authentication error code to its login variant.
    pub(crate) fn from_login_code(code: i64, username: &str) -> Self {
        let username = username.to_owned();
        match code {
            400 => Self::LoginInvalid { username },
            401 => Self::LoginDisabledAccount { username },
            402 => Self::LoginPermissionDenied { username },
            403 => Self::Login2faRequired { username },
            404 => Self::Login2faFailed,
            _ => Self::LoginFailed {
                code,
                reason: reason_for(Some(API_AUTH), code),
                username,
            },
        }
    }

    /// Numeric code: the DSM code for API and login failures, `-1` for
    /// transport failures, `-2` for unadvertised APIs.
    pub fn code(&self) -> i64 {
        match self {
            Self::Request { .. } | Self::InvalidUrl(_) | Self::Tls(_) => REQUEST_FAILED_CODE,
            Self::ApiNotExists { .. } => API_NOT_EXISTS_CODE,
            Self::Api { code, .. } | Self::LoginFailed { code, .. } => *code,
            Self::LoginInvalid { .. } => 400,
            Self::LoginDisabledAccount { .. } => 401,
            Self::LoginPermissionDenied { .. } => 402,
            Self::Login2faRequired { .. } => 403,
            Self::Login2faFailed => 404,
        }
    }

    /// The API identifier that produced the failure, if any.
    pub fn api(&self) -> Option<&str> {
        match self {
            Self::Request { .. } | Self::InvalidUrl(_) | Self::Tls(_) => None,
            Self::ApiNotExists { api } | Self::Api { api, .. } => Some(api.as_str()),
            _ => Some(API_AUTH),
        }
    }

    /// Human-readable reason resolved from the DSM code tables.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Api { reason, .. } | Self::LoginFailed { reason, .. } => *reason,
            Self::Request { .. } | Self::InvalidUrl(_) | Self::Tls(_) | Self::ApiNotExists { .. } => {
                UNKNOWN_REASON
            }
            login => reason_for(Some(API_AUTH), login.code()),
        }
    }

    /// Extra context: the server's `errors` payload for API failures, the
    /// rendered failure for everything else.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Api { details, .. } => details.clone(),
            Self::LoginFailed { username, .. } => Some(Value::String(username.clone())),
            other => Some(Value::String(other.to_string())),
        }
    }

    /// Returns `true` for every failure raised by `login`.
    pub fn is_login_error(&self) -> bool {
        matches!(
            self,
            Self::LoginInvalid { .. }
                | Self::LoginDisabledAccount { .. }
                | Self::LoginPermissionDenied { .. }
                | Self::Login2faRequired { .. }
                | Self::Login2faFailed
                | Self::LoginFailed { .. }
        )
    }

    /// Returns `true` if the server reported the session as no longer valid.
    pub fn is_session_error(&self) -> bool {
        matches!(self, Self::Api { code, .. } if SESSION_ERROR_CODES.contains(code))
    }

    /// Returns `true` if this is a transient transport error worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Request {
                kind: RequestFailure::Connect | RequestFailure::Timeout,
                ..
            }
        )
    }
}
