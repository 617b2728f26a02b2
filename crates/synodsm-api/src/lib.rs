// synodsm-api: Async session gateway for the Synology DSM web API
//
// Login (with two-step codes and device tokens), API discovery, version
// negotiation and request dispatch with a single re-login on session
// expiry. Resource-level accessors live in `synodsm-core`.

pub mod auth;
pub mod capability;
pub mod client;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod format;
pub mod request;
pub mod transport;

pub use auth::{Credentials, SessionState};
pub use capability::{ApiInfo, CapabilityTable};
pub use client::DsmClient;
pub use config::{ConnectionConfig, Scheme};
pub use error::{Error, RequestFailure};
pub use format::{ByteCount, bytes_to_readable, megabytes_to_bytes};
pub use request::{ApiRequest, Params, Payload, UploadFile, Verb};
pub use transport::{TlsMode, TransportConfig};

/// Discovery API, always reachable at `query.cgi` version 1.
pub const API_INFO: &str = "SYNO.API.Info";

/// Authentication API.
pub const API_AUTH: &str = "SYNO.API.Auth";

/// General DSM information; its `version` is the server build number.
pub const API_DSM_INFO: &str = "SYNO.DSM.Info";

/// Storage overview API, which also accepts `action=<method>`.
pub const API_STORAGE: &str = "SYNO.Storage.CGI.Storage";

/// Builds below this predate DSM 6 and serve storage from the legacy handler.
pub const LEGACY_STORAGE_MAX_BUILD: u32 = 7321;
