// Security Advisor scan status.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use synodsm_api::{DsmClient, Error, Params};

use crate::convert::{bool_field, field, response_data, str_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.SecurityScan.Status";

#[derive(Debug, Clone, Default)]
pub struct Security {
    data: Value,
}

impl Resource for Security {
    const KIND: ResourceKind = ResourceKind::Security;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "system_get", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Security {
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Per-category check results keyed by category (`malware`, `network`, ...).
    pub fn checks(&self) -> Option<&Map<String, Value>> {
        field(&self.data, "items").and_then(Value::as_object)
    }

    pub fn last_scan_time(&self) -> Option<&str> {
        str_field(&self.data, "lastScanTime")
    }

    pub fn start_time(&self) -> Option<&str> {
        str_field(&self.data, "startTime")
    }

    pub fn success(&self) -> Option<bool> {
        bool_field(&self.data, "success")
    }

    pub fn progress(&self) -> Option<&str> {
        str_field(&self.data, "sysProgress")
    }

    /// Overall status: `safe`, `danger`, `info`, `outOfDate`, `risk`, `warning`.
    pub fn status(&self) -> Option<&str> {
        str_field(&self.data, "sysStatus")
    }

    /// Failure severity of each category, keyed by category name.
    pub fn status_by_check(&self) -> BTreeMap<&str, &str> {
        self.checks()
            .into_iter()
            .flatten()
            .filter_map(|(category, check)| {
                str_field(check, "failSeverity").map(|severity| (category.as_str(), severity))
            })
            .collect()
    }
}
