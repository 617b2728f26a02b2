// Shared folders.

use serde_json::Value;
use synodsm_api::{ByteCount, DsmClient, Error, Params};

use crate::convert::{array_field, bool_field, f64_field, find_by, response_data, str_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Core.Share";

/// Extra share attributes requested on every listing.
const ADDITIONAL: &str = r#"["hidden","encryption","is_aclmode","unite_permission","is_support_acl","is_sync_share","is_force_readonly","force_readonly_reason","recyclebin","is_share_moving","is_cluster_share","is_exfat","is_cold_storage","support_snapshot","share_quota","enable_share_compress","enable_share_cow","include_cold_storage_share","is_cold_storage_share"]"#;

#[derive(Debug, Clone, Default)]
pub struct Share {
    data: Value,
}

impl Resource for Share {
    const KIND: ResourceKind = ResourceKind::Share;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let form = Params::new()
            .with("additional", ADDITIONAL)
            .with("shareType", "all");
        let response = client.post(API_KEY, "list", &Params::new(), &form).await?;
        if let Some(data) = response_data(response) {
            self.data = data;
        }
        Ok(())
    }
}

impl Share {
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn shares(&self) -> Vec<ShareFolder<'_>> {
        array_field(&self.data, "shares")
            .iter()
            .map(ShareFolder)
            .collect()
    }

    pub fn shares_uuids(&self) -> Vec<&str> {
        self.shares().iter().filter_map(ShareFolder::uuid).collect()
    }

    pub fn share(&self, uuid: &str) -> Option<ShareFolder<'_>> {
        find_by(array_field(&self.data, "shares"), "uuid", uuid).map(ShareFolder)
    }

    pub fn share_name(&self, uuid: &str) -> Option<&str> {
        self.share(uuid).and_then(|share| share.name())
    }

    pub fn share_path(&self, uuid: &str) -> Option<&str> {
        self.share(uuid).and_then(|share| share.path())
    }

    pub fn share_recycle_bin(&self, uuid: &str) -> Option<bool> {
        self.share(uuid).and_then(|share| share.recycle_bin())
    }

    pub fn share_size(&self, uuid: &str) -> Option<ByteCount> {
        self.share(uuid).and_then(|share| share.size())
    }
}

/// Borrowed view of one shared folder.
#[derive(Debug, Clone, Copy)]
pub struct ShareFolder<'a>(&'a Value);

impl<'a> ShareFolder<'a> {
    pub fn uuid(&self) -> Option<&'a str> {
        str_field(self.0, "uuid")
    }

    pub fn name(&self) -> Option<&'a str> {
        str_field(self.0, "name")
    }

    /// Volume the share lives on, e.g. `/volume1`.
    pub fn path(&self) -> Option<&'a str> {
        str_field(self.0, "vol_path")
    }

    pub fn recycle_bin(&self) -> Option<bool> {
        bool_field(self.0, "enable_recycle_bin")
    }

    pub fn hidden(&self) -> Option<bool> {
        bool_field(self.0, "hidden")
    }

    /// Space used by the share; the NAS reports it in megabytes.
    pub fn size(&self) -> Option<ByteCount> {
        f64_field(self.0, "share_quota_used").map(ByteCount::from_megabytes)
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn two_shares() -> Share {
        Share {
            data: json!({
                "shares": [
                    {
                        "desc": "Media",
                        "enable_recycle_bin": true,
                        "hidden": false,
                        "name": "media",
                        "share_quota_used": 1024.0,
                        "uuid": "2ee6c06a-8766-48b5-013d-63b18652a393",
                        "vol_path": "/volume1"
                    },
                    {
                        "enable_recycle_bin": false,
                        "name": "backup",
                        "share_quota_used": 0,
                        "uuid": "8e2d2f0e-2b1e-4c2c-a1b5-3b8e5d1f1c44",
                        "vol_path": "/volume2"
                    }
                ],
                "total": 2
            }),
        }
    }

    #[test]
    fn lists_shares_by_uuid() {
        let share = two_shares();
        assert_eq!(
            share.shares_uuids(),
            vec![
                "2ee6c06a-8766-48b5-013d-63b18652a393",
                "8e2d2f0e-2b1e-4c2c-a1b5-3b8e5d1f1c44"
            ]
        );
        let uuid = "2ee6c06a-8766-48b5-013d-63b18652a393";
        assert_eq!(share.share_name(uuid), Some("media"));
        assert_eq!(share.share_path(uuid), Some("/volume1"));
        assert_eq!(share.share_recycle_bin(uuid), Some(true));
    }

    #[test]
    fn size_converts_megabytes() {
        let share = two_shares();
        assert_eq!(
            share.share_size("2ee6c06a-8766-48b5-013d-63b18652a393"),
            Some(ByteCount(1_073_741_824))
        );
        assert_eq!(
            share.share_size("8e2d2f0e-2b1e-4c2c-a1b5-3b8e5d1f1c44"),
            Some(ByteCount(0))
        );
    }

    #[test]
    fn unknown_uuid_reads_none() {
        let share = two_shares();
        assert_eq!(share.share_name("missing"), None);
        assert_eq!(share.share_size("missing"), None);
        assert!(Share::default().shares().is_empty());
    }
}
