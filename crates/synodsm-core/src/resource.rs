// ── Resource framework ──
//
// Each resource area of the NAS (storage, network, cameras, ...) is a
// `Resource`: a cached snapshot plus the one dispatch call that refreshes
// it. `Accessor` pairs a resource with the gateway for the duration of a
// borrow so refreshes and actions can dispatch without the resource owning
// a gateway reference.

use std::future::Future;
use std::ops::Deref;

use strum::{Display, EnumIter, EnumString};
use synodsm_api::{DsmClient, Error};

/// Tag for every resource area a [`crate::Nas`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Information,
    Network,
    Security,
    Share,
    Storage,
    System,
    Upgrade,
    Utilization,
    DownloadStation,
    SurveillanceStation,
    Backup,
    Certificate,
}

impl ResourceKind {
    /// Primary DSM API identifier behind this resource.
    pub fn api_key(self) -> &'static str {
        match self {
            Self::Information => crate::resources::information::API_KEY,
            Self::Network => crate::resources::network::API_KEY,
            Self::Security => crate::resources::security::API_KEY,
            Self::Share => crate::resources::share::API_KEY,
            Self::Storage => crate::resources::storage::API_KEY,
            Self::System => crate::resources::system::API_KEY,
            Self::Upgrade => crate::resources::upgrade::API_KEY,
            Self::Utilization => crate::resources::utilization::API_KEY,
            Self::DownloadStation => crate::resources::download_station::API_KEY,
            Self::SurveillanceStation => crate::resources::surveillance::API_KEY,
            Self::Backup => crate::resources::backup::API_KEY,
            Self::Certificate => crate::resources::certificate::API_KEY,
        }
    }
}

/// A cached view of one resource area.
///
/// `Default` is the empty snapshot every read operation must tolerate.
pub trait Resource: Default + Send {
    const KIND: ResourceKind;

    /// Re-fetch the snapshot through the gateway.
    fn refresh(&mut self, client: &mut DsmClient) -> impl Future<Output = Result<(), Error>> + Send;
}

/// A resource borrowed together with the gateway that feeds it.
///
/// Derefs to the resource for read operations.
pub struct Accessor<'a, R> {
    pub(crate) client: &'a mut DsmClient,
    resource: &'a mut R,
}

impl<'a, R: Resource> Accessor<'a, R> {
    pub(crate) fn new(client: &'a mut DsmClient, resource: &'a mut R) -> Self {
        Self { client, resource }
    }

    /// Re-fetch this resource's snapshot.
    pub async fn refresh(&mut self) -> Result<&R, Error> {
        self.resource.refresh(self.client).await?;
        Ok(self.resource)
    }

    /// The gateway, for calls this accessor does not wrap.
    pub fn client(&mut self) -> &mut DsmClient {
        self.client
    }
}

impl<R> Deref for Accessor<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.resource
    }
}
