// Capability table
//
// Maps each DSM API identifier to the script path that serves it and the
// range of versions the server accepts. Populated once per gateway from
// `SYNO.API.Info/query` and consulted on every dispatch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::API_INFO;
use crate::error::{Error, RequestFailure};

/// One entry of the capability table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiInfo {
    #[serde(rename = "maxVersion")]
    pub max_version: u32,
    #[serde(rename = "minVersion")]
    pub min_version: u32,
    /// Script path relative to `/webapi/`, e.g. `entry.cgi`.
    pub path: String,
    #[serde(
        rename = "requestFormat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_format: Option<String>,
}

/// API identifier → capability entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    apis: HashMap<String, ApiInfo>,
}

impl CapabilityTable {
    /// The table a gateway starts with: only the discovery API itself.
    pub fn bootstrap() -> Self {
        let mut apis = HashMap::new();
        apis.insert(
            API_INFO.to_owned(),
            ApiInfo {
                max_version: 1,
                min_version: 1,
                path: "query.cgi".into(),
                request_format: None,
            },
        );
        Self { apis }
    }

    /// Build a table from the `data` object of a discovery response.
    pub fn from_discovery(data: Value) -> Result<Self, Error> {
        let apis: HashMap<String, ApiInfo> = serde_json::from_value(data).map_err(|e| {
            Error::request(
                RequestFailure::Decode,
                format!("malformed API discovery data: {e}"),
            )
        })?;
        Ok(Self { apis })
    }

    pub fn get(&self, api: &str) -> Option<&ApiInfo> {
        self.apis.get(api)
    }

    pub fn contains(&self, api: &str) -> bool {
        self.apis.contains_key(api)
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Iterate over advertised API identifiers (unordered).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }

    /// Highest version the server offers for `api`, clamped to `ceiling`.
    ///
    /// The advertised minimum is not enforced: a ceiling below it is sent
    /// as-is and the server decides.
    pub fn negotiate(&self, api: &str, ceiling: Option<u32>) -> Option<u32> {
        let info = self.apis.get(api)?;
        Some(ceiling.map_or(info.max_version, |cap| info.max_version.min(cap)))
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::bootstrap()
    }
}
