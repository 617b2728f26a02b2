// DSM network configuration: hostname, DNS, gateway, interfaces.

use serde_json::Value;
use synodsm_api::{DsmClient, Error, Params};

use crate::convert::{array_field, find_by, response_data, str_field, u64_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.DSM.Network";

#[derive(Debug, Clone, Default)]
pub struct Network {
    data: Value,
}

impl Resource for Network {
    const KIND: ResourceKind = ResourceKind::Network;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "list", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Network {
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn dns(&self) -> Vec<&str> {
        array_field(&self.data, "dns")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    pub fn gateway(&self) -> Option<&str> {
        str_field(&self.data, "gateway")
    }

    pub fn hostname(&self) -> Option<&str> {
        str_field(&self.data, "hostname")
    }

    pub fn workgroup(&self) -> Option<&str> {
        str_field(&self.data, "workgroup")
    }

    pub fn interfaces(&self) -> Vec<NetworkInterface<'_>> {
        array_field(&self.data, "interfaces")
            .iter()
            .map(NetworkInterface)
            .collect()
    }

    /// Interface by id, e.g. `"eth0"`.
    pub fn interface(&self, id: &str) -> Option<NetworkInterface<'_>> {
        find_by(array_field(&self.data, "interfaces"), "id", id).map(NetworkInterface)
    }

    /// MAC addresses of every interface that reports one.
    pub fn macs(&self) -> Vec<&str> {
        self.interfaces()
            .into_iter()
            .filter_map(|iface| iface.mac())
            .collect()
    }
}

/// One IP address bound to an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpBinding<'a> {
    pub address: &'a str,
    /// IPv4 netmask; `None` for IPv6 bindings.
    pub netmask: Option<&'a str>,
    /// IPv6 prefix length; `None` for IPv4 bindings.
    pub prefix_length: Option<u64>,
}

impl<'a> IpBinding<'a> {
    fn from_value(value: &'a Value) -> Option<Self> {
        Some(Self {
            address: str_field(value, "address")?,
            netmask: str_field(value, "netmask"),
            prefix_length: u64_field(value, "prefix_length"),
        })
    }
}

/// Borrowed view of one interface record.
#[derive(Debug, Clone, Copy)]
pub struct NetworkInterface<'a>(&'a Value);

impl<'a> NetworkInterface<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn mac(&self) -> Option<&'a str> {
        str_field(self.0, "mac").filter(|mac| !mac.is_empty())
    }

    /// Interface type: `lan`, `pppoe`, `bond`, ...
    pub fn kind(&self) -> Option<&'a str> {
        str_field(self.0, "type")
    }

    pub fn ipv4(&self) -> Vec<IpBinding<'a>> {
        array_field(self.0, "ip")
            .iter()
            .filter_map(IpBinding::from_value)
            .collect()
    }

    pub fn ipv6(&self) -> Vec<IpBinding<'a>> {
        array_field(self.0, "ipv6")
            .iter()
            .filter_map(IpBinding::from_value)
            .collect()
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}
