// Firmware update availability.

use serde_json::Value;
use synodsm_api::{DsmClient, Error, Params};

use crate::convert::{bool_field, field, response_data, str_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.Upgrade.Server";

#[derive(Debug, Clone, Default)]
pub struct Upgrade {
    data: Value,
}

impl Resource for Upgrade {
    const KIND: ResourceKind = ResourceKind::Upgrade;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "check", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Upgrade {
    pub fn data(&self) -> &Value {
        &self.data
    }

    fn update(&self) -> Option<&Value> {
        field(&self.data, "update")
    }

    pub fn update_available(&self) -> Option<bool> {
        self.update().and_then(|u| bool_field(u, "available"))
    }

    pub fn available_version(&self) -> Option<&str> {
        self.update().and_then(|u| str_field(u, "version"))
    }

    /// Build and nano details of the pending update.
    pub fn available_version_details(&self) -> Option<&Value> {
        self.update().and_then(|u| field(u, "version_details"))
    }

    pub fn reboot_needed(&self) -> Option<&str> {
        self.update().and_then(|u| str_field(u, "reboot"))
    }
}
