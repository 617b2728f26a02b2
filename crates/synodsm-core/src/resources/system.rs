// System information and power actions.

use serde_json::Value;
use synodsm_api::{ApiRequest, ByteCount, DsmClient, Error, Params};
use tracing::info;

use crate::convert::{array_field, bool_field, i64_field, response_data, str_field, u64_field};
use crate::resource::{Accessor, Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.System";

#[derive(Debug, Clone, Default)]
pub struct System {
    data: Value,
}

impl Resource for System {
    const KIND: ResourceKind = ResourceKind::System;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "info", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl System {
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// CPU clock in MHz.
    pub fn cpu_clock_speed(&self) -> Option<u64> {
        u64_field(&self.data, "cpu_clock_speed")
    }

    pub fn cpu_cores(&self) -> Option<u64> {
        u64_field(&self.data, "cpu_cores")
    }

    pub fn cpu_family(&self) -> Option<&str> {
        str_field(&self.data, "cpu_family")
    }

    pub fn cpu_series(&self) -> Option<&str> {
        str_field(&self.data, "cpu_series")
    }

    pub fn enabled_ntp(&self) -> Option<bool> {
        bool_field(&self.data, "enabled_ntp")
    }

    pub fn ntp_server(&self) -> Option<&str> {
        str_field(&self.data, "ntp_server")
    }

    pub fn firmware_ver(&self) -> Option<&str> {
        str_field(&self.data, "firmware_ver")
    }

    pub fn model(&self) -> Option<&str> {
        str_field(&self.data, "model")
    }

    /// Installed memory in MB.
    /// Installed RAM, reported in MiB.
    pub fn ram_size(&self) -> Option<ByteCount> {
        u64_field(&self.data, "ram_size").map(ByteCount::from_mib)
    }

    pub fn serial(&self) -> Option<&str> {
        str_field(&self.data, "serial")
    }

    pub fn sys_temp(&self) -> Option<i64> {
        i64_field(&self.data, "sys_temp")
    }

    pub fn time(&self) -> Option<&str> {
        str_field(&self.data, "time")
    }

    pub fn time_zone(&self) -> Option<&str> {
        str_field(&self.data, "time_zone")
    }

    pub fn time_zone_desc(&self) -> Option<&str> {
        str_field(&self.data, "time_zone_desc")
    }

    /// Uptime as `hours:minutes:seconds`.
    pub fn up_time(&self) -> Option<&str> {
        str_field(&self.data, "up_time")
    }

    /// Attached USB devices.
    pub fn usb_dev(&self) -> &[Value] {
        array_field(&self.data, "usb_dev")
    }
}

impl Accessor<'_, System> {
    /// Power the NAS off.
    pub async fn shutdown(&mut self) -> Result<(), Error> {
        info!("requesting NAS shutdown");
        self.client
            .request_json(ApiRequest::get(API_KEY, "shutdown").max_version(1))
            .await?;
        Ok(())
    }

    pub async fn reboot(&mut self) -> Result<(), Error> {
        info!("requesting NAS reboot");
        self.client
            .request_json(ApiRequest::get(API_KEY, "reboot").max_version(1))
            .await?;
        Ok(())
    }
}
