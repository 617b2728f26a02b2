// DSM information: model, firmware build, uptime, chassis temperature.

use serde_json::Value;
use synodsm_api::{ByteCount, DsmClient, Error, Params};
use tracing::debug;

use crate::convert::{bool_field, i64_field, response_data, str_field, u64_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.DSM.Info";

#[derive(Debug, Clone, Default)]
pub struct Information {
    data: Value,
}

impl Resource for Information {
    const KIND: ResourceKind = ResourceKind::Information;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "getinfo", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        if let Some(build) = self.build_number() {
            debug!(build, "recording DSM build");
            client.set_server_build(build);
        }
        Ok(())
    }
}

impl Information {
    /// Raw snapshot.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn model(&self) -> Option<&str> {
        str_field(&self.data, "model")
    }

    /// Installed memory in MB.
    /// Installed RAM, reported in MiB.
    pub fn ram(&self) -> Option<ByteCount> {
        u64_field(&self.data, "ram").map(ByteCount::from_mib)
    }

    pub fn serial(&self) -> Option<&str> {
        str_field(&self.data, "serial")
    }

    /// Chassis temperature in °C.
    pub fn temperature(&self) -> Option<i64> {
        i64_field(&self.data, "temperature")
    }

    pub fn temperature_warn(&self) -> Option<bool> {
        bool_field(&self.data, "temperature_warn")
    }

    /// Seconds since boot.
    pub fn uptime(&self) -> Option<u64> {
        u64_field(&self.data, "uptime")
    }

    /// Firmware build number as reported, e.g. `"25556"`.
    pub fn version(&self) -> Option<&str> {
        str_field(&self.data, "version")
    }

    /// Marketing version, e.g. `"DSM 6.2.3-25426 Update 2"`.
    pub fn version_string(&self) -> Option<&str> {
        str_field(&self.data, "version_string")
    }

    pub fn build_number(&self) -> Option<u32> {
        u64_field(&self.data, "version").and_then(|v| u32::try_from(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_dsm6_info() {
        let info = Information {
            data: json!({
                "codepage": "enu",
                "model": "DS918+",
                "ram": 4096,
                "serial": "1920PDN001501",
                "temperature": 40,
                "temperature_warn": false,
                "time": "Sun Mar 29 19:33:41 2020",
                "uptime": 155_084,
                "version": "24922",
                "version_string": "DSM 6.2.2-24922 Update 4"
            }),
        };

        assert_eq!(info.model(), Some("DS918+"));
        assert_eq!(info.ram(), Some(ByteCount::from_mib(4096)));
        assert_eq!(info.temperature(), Some(40));
        assert_eq!(info.temperature_warn(), Some(false));
        assert_eq!(info.uptime(), Some(155_084));
        assert_eq!(info.version(), Some("24922"));
        assert_eq!(info.build_number(), Some(24922));
        assert_eq!(info.version_string(), Some("DSM 6.2.2-24922 Update 4"));
    }

    #[test]
    fn empty_snapshot_reads_none() {
        let info = Information::default();
        assert_eq!(info.model(), None);
        assert_eq!(info.build_number(), None);
    }
}
