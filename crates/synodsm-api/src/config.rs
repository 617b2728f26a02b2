// Connection configuration
//
// Pure data describing how to reach one NAS. Never touches disk; the
// config crate (or the caller) builds one and hands it to `DsmClient::new`.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};

/// Fallback device name when the machine hostname cannot be read.
const FALLBACK_DEVICE_NAME: &str = "synodsm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Https => "https",
        })
    }
}

/// Everything needed to reach one NAS.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    /// Only consulted for HTTPS.
    pub tls: TlsMode,
    pub timeout: Duration,
    /// Name this client registers under when a device token is issued.
    /// Defaults to the machine hostname.
    pub device_name: Option<String>,
    /// Route `SYNO.Storage.CGI.Storage` to the pre-DSM-6 storage handler
    /// when the server build is known to be older than 7321.
    pub legacy_storage_compat: bool,
}

impl ConnectionConfig {
    /// Config with the usual defaults: 10 s timeout, hostname as device
    /// name, legacy storage routing on. Certificate verification only
    /// applies when `use_https` is set.
    pub fn new(host: impl Into<String>, port: u16, use_https: bool, verify_ssl: bool) -> Self {
        let (scheme, tls) = if use_https {
            let tls = if verify_ssl {
                TlsMode::System
            } else {
                TlsMode::DangerAcceptInvalid
            };
            (Scheme::Https, tls)
        } else {
            (Scheme::Http, TlsMode::System)
        };

        Self {
            host: host.into(),
            port,
            scheme,
            tls,
            timeout: DEFAULT_TIMEOUT,
            device_name: None,
            legacy_storage_compat: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// `scheme://host:port`
    pub fn base_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{}://{}:{}",
            self.scheme, self.host, self.port
        ))?)
    }

    pub fn transport(&self) -> TransportConfig {
        let tls = match self.scheme {
            Scheme::Https => self.tls.clone(),
            Scheme::Http => TlsMode::System,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Configured device name, else the machine hostname.
    pub fn resolved_device_name(&self) -> String {
        if let Some(ref name) = self.device_name {
            return name.clone();
        }
        hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_DEVICE_NAME.to_owned())
    }
}
