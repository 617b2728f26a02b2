// Storage: volumes, pools, disks and their health.
//
// Volumes do not list their disks. A volume's disks are found through the
// storage pool that holds it: either the pool's `deploy_path` is the
// volume id (one volume per pool) or the volume appears among the pool's
// `pool_child` entries (several volumes per pool). The pool's `disks`
// array then names disk ids.

use serde_json::Value;
use synodsm_api::{API_STORAGE, ByteCount, DsmClient, Error, Params};

use crate::convert::{
    array_field, bool_field, field, find_by, i64_field, id_matches, is_truthy, str_field,
    u64_field,
};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = API_STORAGE;

#[derive(Debug, Clone, Default)]
pub struct Storage {
    data: Value,
}

impl Resource for Storage {
    const KIND: ResourceKind = ResourceKind::Storage;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let mut response = client.get(API_KEY, "load_info", &Params::new()).await?;
        // The legacy storage handler answers without a `data` envelope.
        let snapshot = if response.get("data").is_some() {
            response["data"].take()
        } else {
            response
        };
        if is_truthy(&snapshot) {
            self.data = snapshot;
        }
        Ok(())
    }
}

impl Storage {
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Enclosure environment block.
    pub fn env(&self) -> Option<&Value> {
        field(&self.data, "env")
    }

    pub fn storage_pools(&self) -> Vec<StoragePool<'_>> {
        array_field(&self.data, "storagePools")
            .iter()
            .map(StoragePool)
            .collect()
    }

    // ── Volumes ──

    pub fn volumes(&self) -> Vec<Volume<'_>> {
        array_field(&self.data, "volumes")
            .iter()
            .map(Volume)
            .collect()
    }

    pub fn volumes_ids(&self) -> Vec<&str> {
        self.volumes().iter().filter_map(Volume::id).collect()
    }

    pub fn volume(&self, volume_id: &str) -> Option<Volume<'_>> {
        find_by(array_field(&self.data, "volumes"), "id", volume_id).map(Volume)
    }

    pub fn volume_status(&self, volume_id: &str) -> Option<&str> {
        self.volume(volume_id).and_then(|v| v.status())
    }

    pub fn volume_device_type(&self, volume_id: &str) -> Option<&str> {
        self.volume(volume_id).and_then(|v| v.device_type())
    }

    pub fn volume_size_total(&self, volume_id: &str) -> Option<ByteCount> {
        self.volume(volume_id).and_then(|v| v.size_total())
    }

    pub fn volume_size_used(&self, volume_id: &str) -> Option<ByteCount> {
        self.volume(volume_id).and_then(|v| v.size_used())
    }

    pub fn volume_percentage_used(&self, volume_id: &str) -> Option<f64> {
        self.volume(volume_id).and_then(|v| v.percentage_used())
    }

    /// Disks backing a volume, resolved through its storage pool.
    pub fn disks_for_volume(&self, volume_id: &str) -> Vec<Disk<'_>> {
        let disks = array_field(&self.data, "disks");
        array_field(&self.data, "storagePools")
            .iter()
            .filter(|pool| pool_holds(pool, volume_id))
            .flat_map(|pool| array_field(pool, "disks"))
            .filter_map(|disk_id| {
                let disk_id = disk_id.as_str()?;
                find_by(disks, "id", disk_id).map(Disk)
            })
            .collect()
    }

    /// Mean temperature of the volume's disks, rounded to whole degrees.
    pub fn volume_disk_temp_avg(&self, volume_id: &str) -> Option<f64> {
        mean(&self.volume_disk_temps(volume_id)).map(f64::round)
    }

    pub fn volume_disk_temp_max(&self, volume_id: &str) -> Option<i64> {
        self.volume_disk_temps(volume_id).into_iter().max()
    }

    // Disks without a sensor report 0.
    fn volume_disk_temps(&self, volume_id: &str) -> Vec<i64> {
        self.disks_for_volume(volume_id)
            .iter()
            .filter_map(Disk::temp)
            .filter(|temp| *temp > 0)
            .collect()
    }

    // ── Disks ──

    pub fn disks(&self) -> Vec<Disk<'_>> {
        array_field(&self.data, "disks").iter().map(Disk).collect()
    }

    pub fn disks_ids(&self) -> Vec<&str> {
        self.disks().iter().filter_map(Disk::id).collect()
    }

    pub fn disk(&self, disk_id: &str) -> Option<Disk<'_>> {
        find_by(array_field(&self.data, "disks"), "id", disk_id).map(Disk)
    }

    pub fn disk_name(&self, disk_id: &str) -> Option<&str> {
        self.disk(disk_id).and_then(|d| d.name())
    }

    pub fn disk_device(&self, disk_id: &str) -> Option<&str> {
        self.disk(disk_id).and_then(|d| d.device())
    }

    pub fn disk_smart_status(&self, disk_id: &str) -> Option<&str> {
        self.disk(disk_id).and_then(|d| d.smart_status())
    }

    pub fn disk_status(&self, disk_id: &str) -> Option<&str> {
        self.disk(disk_id).and_then(|d| d.status())
    }

    pub fn disk_exceed_bad_sector_thr(&self, disk_id: &str) -> Option<bool> {
        self.disk(disk_id).and_then(|d| d.exceed_bad_sector_thr())
    }

    pub fn disk_below_remain_life_thr(&self, disk_id: &str) -> Option<bool> {
        self.disk(disk_id).and_then(|d| d.below_remain_life_thr())
    }

    pub fn disk_temp(&self, disk_id: &str) -> Option<i64> {
        self.disk(disk_id).and_then(|d| d.temp())
    }
}

fn pool_holds(pool: &Value, volume_id: &str) -> bool {
    str_field(pool, "deploy_path") == Some(volume_id)
        || array_field(pool, "pool_child")
            .iter()
            .any(|child| id_matches(child, "id", volume_id))
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some(sum as f64 / values.len() as f64)
}

/// Borrowed view of one volume record.
#[derive(Debug, Clone, Copy)]
pub struct Volume<'a>(&'a Value);

impl<'a> Volume<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    /// `normal`, `degraded`, `crashed`, ...
    pub fn status(&self) -> Option<&'a str> {
        str_field(self.0, "status")
    }

    /// RAID layout, e.g. `shr_without_disk_protect`, `raid_5`.
    pub fn device_type(&self) -> Option<&'a str> {
        str_field(self.0, "device_type")
    }

    pub fn fs_type(&self) -> Option<&'a str> {
        str_field(self.0, "fs_type")
    }

    pub fn size_total(&self) -> Option<ByteCount> {
        self.size("total").map(ByteCount)
    }

    pub fn size_used(&self) -> Option<ByteCount> {
        self.size("used").map(ByteCount)
    }

    /// Used share of the volume in percent, one decimal.
    pub fn percentage_used(&self) -> Option<f64> {
        let total = self.size("total").filter(|t| *t > 0)?;
        let used = self.size("used").filter(|u| *u > 0)?;
        let ratio = u64_ratio(used, total) * 100.0;
        Some((ratio * 10.0).round() / 10.0)
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }

    fn size(&self, key: &str) -> Option<u64> {
        field(self.0, "size").and_then(|size| u64_field(size, key))
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn u64_ratio(num: u64, den: u64) -> f64 {
    num as f64 / den as f64
}

/// Borrowed view of one storage pool record.
#[derive(Debug, Clone, Copy)]
pub struct StoragePool<'a>(&'a Value);

impl<'a> StoragePool<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn deploy_path(&self) -> Option<&'a str> {
        str_field(self.0, "deploy_path")
    }

    pub fn disk_ids(&self) -> Vec<&'a str> {
        array_field(self.0, "disks")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}

/// Borrowed view of one physical disk record.
#[derive(Debug, Clone, Copy)]
pub struct Disk<'a>(&'a Value);

impl<'a> Disk<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    /// Display name, e.g. `Disk 1`.
    pub fn name(&self) -> Option<&'a str> {
        str_field(self.0, "name")
    }

    /// Block device path, e.g. `/dev/sda`.
    pub fn device(&self) -> Option<&'a str> {
        str_field(self.0, "device")
    }

    pub fn model(&self) -> Option<&'a str> {
        str_field(self.0, "model")
    }

    pub fn smart_status(&self) -> Option<&'a str> {
        str_field(self.0, "smart_status")
    }

    pub fn status(&self) -> Option<&'a str> {
        str_field(self.0, "status")
    }

    pub fn exceed_bad_sector_thr(&self) -> Option<bool> {
        bool_field(self.0, "exceed_bad_sector_thr")
    }

    pub fn below_remain_life_thr(&self) -> Option<bool> {
        bool_field(self.0, "below_remain_life_thr")
    }

    /// Temperature in °C.
    pub fn temp(&self) -> Option<i64> {
        i64_field(self.0, "temp")
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}
