//! Typed resource accessors for a Synology DSM NAS.
//!
//! Built on the session gateway in `synodsm-api`:
//!
//! - **[`Nas`]** owns one [`DsmClient`] and a lazily created snapshot per
//!   resource area. [`Nas::login`] authenticates and loads the DSM
//!   information; [`Nas::update`] refreshes everything loaded so far.
//!
//! - **[`Accessor`]** pairs a snapshot with the gateway for the duration of
//!   a borrow. It derefs to the resource for reads and carries the
//!   resource's actions (`nas.system().reboot()`,
//!   `nas.surveillance_station().set_home_mode(true)`).
//!
//! - **Resources** ([`resources`]) keep the last fetched JSON and read it
//!   leniently: missing or mistyped fields come back as `None`, never as
//!   an error.

mod convert;
pub mod nas;
pub mod resource;
pub mod resources;

// ── Primary re-exports ──────────────────────────────────────────────
pub use nas::Nas;
pub use resource::{Accessor, Resource, ResourceKind};
pub use resources::{
    Backup, BackupTask, Camera, Certificate, Certificates, Disk, DownloadStation, DownloadTask,
    Information, IpBinding, LiveViewFormat, Network, NetworkInterface, Security, Share,
    ShareFolder, SnapshotSize, Storage, StoragePool, SurveillanceStation, System, Upgrade,
    Utilization, Volume,
};

pub use synodsm_api::{ByteCount, ConnectionConfig, Credentials, DsmClient, Error};
