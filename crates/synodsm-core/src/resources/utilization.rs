// Live CPU, memory and network utilization.

use serde_json::Value;
use synodsm_api::{ByteCount, DsmClient, Error, Params};

use crate::convert::{array_field, field, find_by, response_data, u64_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.System.Utilization";

#[derive(Debug, Clone, Default)]
pub struct Utilization {
    data: Value,
}

impl Resource for Utilization {
    const KIND: ResourceKind = ResourceKind::Utilization;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let response = client.get(API_KEY, "get", &Params::new()).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Utilization {
    pub fn data(&self) -> &Value {
        &self.data
    }

    // ── CPU ──

    fn cpu(&self, key: &str) -> Option<u64> {
        field(&self.data, "cpu").and_then(|cpu| u64_field(cpu, key))
    }

    pub fn cpu_other_load(&self) -> Option<u64> {
        self.cpu("other_load")
    }

    pub fn cpu_user_load(&self) -> Option<u64> {
        self.cpu("user_load")
    }

    pub fn cpu_system_load(&self) -> Option<u64> {
        self.cpu("system_load")
    }

    /// Sum of the other, user and system loads. `None` unless all three are
    /// reported, or if the sum overflows.
    pub fn cpu_total_load(&self) -> Option<u64> {
        self.cpu_other_load()?
            .checked_add(self.cpu_user_load()?)?
            .checked_add(self.cpu_system_load()?)
    }

    pub fn cpu_1min_load(&self) -> Option<u64> {
        self.cpu("1min_load")
    }

    pub fn cpu_5min_load(&self) -> Option<u64> {
        self.cpu("5min_load")
    }

    pub fn cpu_15min_load(&self) -> Option<u64> {
        self.cpu("15min_load")
    }

    // ── Memory ──
    // The NAS reports memory in KiB.

    fn memory(&self, key: &str) -> Option<u64> {
        field(&self.data, "memory").and_then(|memory| u64_field(memory, key))
    }

    /// Real memory usage in percent.
    pub fn memory_real_usage(&self) -> Option<u64> {
        self.memory("real_usage")
    }

    pub fn memory_size(&self) -> Option<ByteCount> {
        self.memory("memory_size").map(ByteCount::from_kib)
    }

    pub fn memory_available_swap(&self) -> Option<ByteCount> {
        self.memory("avail_swap").map(ByteCount::from_kib)
    }

    pub fn memory_cached(&self) -> Option<ByteCount> {
        self.memory("cached").map(ByteCount::from_kib)
    }

    pub fn memory_available_real(&self) -> Option<ByteCount> {
        self.memory("avail_real").map(ByteCount::from_kib)
    }

    pub fn memory_total_real(&self) -> Option<ByteCount> {
        self.memory("total_real").map(ByteCount::from_kib)
    }

    pub fn memory_total_swap(&self) -> Option<ByteCount> {
        self.memory("total_swap").map(ByteCount::from_kib)
    }

    // ── Network ──

    /// Per-device counters (`eth0`, `total`, ...).
    pub fn network(&self) -> &[Value] {
        array_field(&self.data, "network")
    }

    fn network_total(&self) -> Option<&Value> {
        find_by(self.network(), "device", "total")
    }

    /// Upload throughput in bytes per second.
    pub fn network_up(&self) -> Option<ByteCount> {
        self.network_total()
            .and_then(|total| u64_field(total, "tx"))
            .map(ByteCount)
    }

    /// Download throughput in bytes per second.
    pub fn network_down(&self) -> Option<ByteCount> {
        self.network_total()
            .and_then(|total| u64_field(total, "rx"))
            .map(ByteCount)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn busy() -> Utilization {
        Utilization {
            data: json!({
                "cpu": {
                    "15min_load": 51,
                    "1min_load": 37,
                    "5min_load": 33,
                    "device": "System",
                    "other_load": 3,
                    "system_load": 2,
                    "user_load": 4
                },
                "memory": {
                    "avail_real": 156_400,
                    "avail_swap": 4_718_592,
                    "cached": 842_556,
                    "memory_size": 131_072,
                    "real_usage": 63,
                    "total_real": 3_789_524,
                    "total_swap": 4_718_592
                },
                "network": [
                    { "device": "total", "rx": 1_065_612, "tx": 3_360_735 },
                    { "device": "eth0", "rx": 1_065_612, "tx": 3_360_735 }
                ]
            }),
        }
    }

    #[test]
    fn cpu_total_sums_three_loads() {
        let utilization = busy();
        assert_eq!(utilization.cpu_total_load(), Some(9));
        assert_eq!(utilization.cpu_1min_load(), Some(37));
        assert_eq!(utilization.cpu_15min_load(), Some(51));
    }

    #[test]
    fn cpu_total_needs_every_load() {
        let utilization = Utilization {
            data: json!({ "cpu": { "other_load": 3, "user_load": 4 } }),
        };
        assert_eq!(utilization.cpu_total_load(), None);
    }

    #[test]
    fn cpu_total_overflow_reads_none() {
        let utilization = Utilization {
            data: json!({
                "cpu": { "other_load": u64::MAX, "user_load": 1, "system_load": 0 }
            }),
        };
        assert_eq!(utilization.cpu_other_load(), Some(u64::MAX));
        assert_eq!(utilization.cpu_total_load(), None);
    }

    #[test]
    fn memory_is_reported_in_kib() {
        let utilization = busy();
        assert_eq!(utilization.memory_size(), Some(ByteCount(134_217_728)));
        assert_eq!(utilization.memory_real_usage(), Some(63));
        assert_eq!(
            utilization.memory_total_swap().map(ByteCount::bytes),
            Some(4_831_838_208)
        );
    }

    #[test]
    fn network_reads_total_device() {
        let utilization = busy();
        assert_eq!(utilization.network_up(), Some(ByteCount(3_360_735)));
        assert_eq!(utilization.network_down(), Some(ByteCount(1_065_612)));
        assert_eq!(Utilization::default().network_up(), None);
    }
}
