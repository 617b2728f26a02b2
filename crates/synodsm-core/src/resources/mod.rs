pub mod backup;
pub mod certificate;
pub mod download_station;
pub mod information;
pub mod network;
pub mod security;
pub mod share;
pub mod storage;
pub mod surveillance;
pub mod system;
pub mod upgrade;
pub mod utilization;

pub use backup::{Backup, BackupTask};
pub use certificate::{Certificate, Certificates};
pub use download_station::{DownloadStation, DownloadTask};
pub use information::Information;
pub use network::{IpBinding, Network, NetworkInterface};
pub use security::Security;
pub use share::{Share, ShareFolder};
pub use storage::{Disk, Storage, StoragePool, Volume};
pub use surveillance::{Camera, LiveViewFormat, SnapshotSize, SurveillanceStation};
pub use system::System;
pub use upgrade::Upgrade;
pub use utilization::Utilization;
