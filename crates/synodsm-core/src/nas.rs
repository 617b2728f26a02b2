// ── NAS facade ──
//
// Owns the session gateway and one lazily created slot per resource area.
// Nothing is fetched until a resource is refreshed, either directly through
// its accessor or in bulk through `Nas::update`.

use synodsm_api::{ConnectionConfig, Credentials, DsmClient, Error};
use tracing::{debug, info};

use crate::resource::{Accessor, Resource, ResourceKind};
use crate::resources::{
    Backup, Certificates, DownloadStation, Information, Network, Security, Share, Storage,
    SurveillanceStation, System, Upgrade, Utilization,
};

/// A Synology NAS reached through one authenticated session.
///
/// ```no_run
/// # async fn demo() -> Result<(), synodsm_api::Error> {
/// use synodsm_api::{ConnectionConfig, Credentials};
/// use synodsm_core::Nas;
///
/// let config = ConnectionConfig::new("nas.local", 5001, true, true);
/// let mut nas = Nas::new(&config, Credentials::new("admin", "secret".to_owned()))?;
/// nas.login(None).await?;
///
/// let mut storage = nas.storage();
/// storage.refresh().await?;
/// for volume in storage.volumes() {
///     println!("{:?}: {:?}%", volume.id(), volume.percentage_used());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Nas {
    client: DsmClient,
    information: Option<Information>,
    network: Option<Network>,
    security: Option<Security>,
    share: Option<Share>,
    storage: Option<Storage>,
    system: Option<System>,
    upgrade: Option<Upgrade>,
    utilization: Option<Utilization>,
    download_station: Option<DownloadStation>,
    surveillance_station: Option<SurveillanceStation>,
    backup: Option<Backup>,
    certificate: Option<Certificates>,
}

fn accessor<'a, R: Resource>(
    client: &'a mut DsmClient,
    slot: &'a mut Option<R>,
) -> Accessor<'a, R> {
    Accessor::new(client, slot.get_or_insert_with(R::default))
}

async fn refresh_loaded<R: Resource>(
    client: &mut DsmClient,
    slot: &mut Option<R>,
) -> Result<(), Error> {
    if let Some(resource) = slot {
        debug!(resource = %R::KIND, "refreshing");
        resource.refresh(client).await?;
    }
    Ok(())
}

impl Nas {
    pub fn new(config: &ConnectionConfig, credentials: Credentials) -> Result<Self, Error> {
        Ok(Self::from_client(DsmClient::new(config, credentials)?))
    }

    /// Wrap an existing gateway; no resource is loaded yet.
    pub fn from_client(client: DsmClient) -> Self {
        Self {
            client,
            information: None,
            network: None,
            security: None,
            share: None,
            storage: None,
            system: None,
            upgrade: None,
            utilization: None,
            download_station: None,
            surveillance_station: None,
            backup: None,
            certificate: None,
        }
    }

    pub fn client(&self) -> &DsmClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut DsmClient {
        &mut self.client
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in and load the DSM information snapshot.
    ///
    /// `otp_code` is only needed when the account has two-step
    /// authentication and no device token is held yet.
    pub async fn login(&mut self, otp_code: Option<&str>) -> Result<bool, Error> {
        let logged_in = self.client.login(otp_code).await?;
        self.information
            .get_or_insert_with(Information::default)
            .refresh(&mut self.client)
            .await?;
        let model = self.information.as_ref().and_then(Information::model);
        info!(
            host = %self.client.base_url(),
            model = model.unwrap_or("unknown"),
            "connected to NAS"
        );
        Ok(logged_in)
    }

    pub async fn logout(&mut self) -> Result<bool, Error> {
        self.client.logout().await
    }

    /// Device token to persist so later logins skip the one-time code.
    pub fn device_token(&self) -> Option<&str> {
        self.client.device_token()
    }

    // ── Bulk refresh ─────────────────────────────────────────────────

    /// Refresh every loaded resource.
    ///
    /// Information and network are refreshed only when asked for, and are
    /// loaded on demand in that case.
    pub async fn update(
        &mut self,
        with_information: bool,
        with_network: bool,
    ) -> Result<(), Error> {
        let client = &mut self.client;
        if with_information {
            self.information
                .get_or_insert_with(Information::default)
                .refresh(client)
                .await?;
        }
        if with_network {
            self.network
                .get_or_insert_with(Network::default)
                .refresh(client)
                .await?;
        }
        refresh_loaded(client, &mut self.security).await?;
        refresh_loaded(client, &mut self.utilization).await?;
        refresh_loaded(client, &mut self.storage).await?;
        refresh_loaded(client, &mut self.share).await?;
        refresh_loaded(client, &mut self.system).await?;
        refresh_loaded(client, &mut self.upgrade).await?;
        refresh_loaded(client, &mut self.download_station).await?;
        refresh_loaded(client, &mut self.surveillance_station).await?;
        refresh_loaded(client, &mut self.backup).await?;
        refresh_loaded(client, &mut self.certificate).await?;
        Ok(())
    }

    /// Drop a resource's snapshot so it is no longer refreshed by
    /// [`Nas::update`]. Information is never dropped.
    pub fn reset(&mut self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Information => return false,
            ResourceKind::Network => self.network = None,
            ResourceKind::Security => self.security = None,
            ResourceKind::Share => self.share = None,
            ResourceKind::Storage => self.storage = None,
            ResourceKind::System => self.system = None,
            ResourceKind::Upgrade => self.upgrade = None,
            ResourceKind::Utilization => self.utilization = None,
            ResourceKind::DownloadStation => self.download_station = None,
            ResourceKind::SurveillanceStation => self.surveillance_station = None,
            ResourceKind::Backup => self.backup = None,
            ResourceKind::Certificate => self.certificate = None,
        }
        debug!(resource = %kind, "resource reset");
        true
    }

    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Information => self.information.is_some(),
            ResourceKind::Network => self.network.is_some(),
            ResourceKind::Security => self.security.is_some(),
            ResourceKind::Share => self.share.is_some(),
            ResourceKind::Storage => self.storage.is_some(),
            ResourceKind::System => self.system.is_some(),
            ResourceKind::Upgrade => self.upgrade.is_some(),
            ResourceKind::Utilization => self.utilization.is_some(),
            ResourceKind::DownloadStation => self.download_station.is_some(),
            ResourceKind::SurveillanceStation => self.surveillance_station.is_some(),
            ResourceKind::Backup => self.backup.is_some(),
            ResourceKind::Certificate => self.certificate.is_some(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn information(&mut self) -> Accessor<'_, Information> {
        accessor(&mut self.client, &mut self.information)
    }

    pub fn network(&mut self) -> Accessor<'_, Network> {
        accessor(&mut self.client, &mut self.network)
    }

    pub fn security(&mut self) -> Accessor<'_, Security> {
        accessor(&mut self.client, &mut self.security)
    }

    pub fn share(&mut self) -> Accessor<'_, Share> {
        accessor(&mut self.client, &mut self.share)
    }

    pub fn storage(&mut self) -> Accessor<'_, Storage> {
        accessor(&mut self.client, &mut self.storage)
    }

    pub fn system(&mut self) -> Accessor<'_, System> {
        accessor(&mut self.client, &mut self.system)
    }

    pub fn upgrade(&mut self) -> Accessor<'_, Upgrade> {
        accessor(&mut self.client, &mut self.upgrade)
    }

    pub fn utilization(&mut self) -> Accessor<'_, Utilization> {
        accessor(&mut self.client, &mut self.utilization)
    }

    pub fn download_station(&mut self) -> Accessor<'_, DownloadStation> {
        accessor(&mut self.client, &mut self.download_station)
    }

    pub fn surveillance_station(&mut self) -> Accessor<'_, SurveillanceStation> {
        accessor(&mut self.client, &mut self.surveillance_station)
    }

    pub fn backup(&mut self) -> Accessor<'_, Backup> {
        accessor(&mut self.client, &mut self.backup)
    }

    pub fn certificate(&mut self) -> Accessor<'_, Certificates> {
        accessor(&mut self.client, &mut self.certificate)
    }
}
