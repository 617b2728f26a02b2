// Surveillance Station: cameras, motion detection, snapshots, home mode.

use bytes::Bytes;
use serde_json::Value;
use synodsm_api::{ApiRequest, DsmClient, Error, Params};
use tracing::debug;

use crate::convert::{
    array_field, bool_field, field, i64_field, response_data, str_field, u64_field,
};
use crate::resource::{Accessor, Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.SurveillanceStation.Info";
pub const CAMERA_API_KEY: &str = "SYNO.SurveillanceStation.Camera";
pub const CAMERA_EVENT_API_KEY: &str = "SYNO.SurveillanceStation.Camera.Event";
pub const HOME_MODE_API_KEY: &str = "SYNO.SurveillanceStation.HomeMode";
pub const SNAPSHOT_API_KEY: &str = "SYNO.SurveillanceStation.SnapShot";

/// Motion detection handled by Surveillance Station itself.
const MOTION_DETECTION_BY_SURVEILLANCE: i64 = 1;
const MOTION_DETECTION_DISABLED: i64 = -1;

/// Camera listing ceiling; later versions rename fields.
const CAMERA_LIST_MAX_VERSION: u32 = 7;

/// Image size for [`Accessor::download_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSize {
    Icon,
    Full,
}

impl SnapshotSize {
    fn code(self) -> &'static str {
        match self {
            Self::Icon => "1",
            Self::Full => "2",
        }
    }
}

/// Stream flavours a camera exposes a live view path for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveViewFormat {
    MjpegHttp,
    Multicast,
    MxpegHttp,
    RtspHttp,
    Rtsp,
}

impl LiveViewFormat {
    fn key(self) -> &'static str {
        match self {
            Self::MjpegHttp => "mjpegHttpPath",
            Self::Multicast => "multicstPath",
            Self::MxpegHttp => "mxpegHttpPath",
            Self::RtspHttp => "rtspOverHttpPath",
            Self::Rtsp => "rtspPath",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CameraRecord {
    data: Value,
    motion_detection: bool,
    live_view: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SurveillanceStation {
    cameras: Vec<CameraRecord>,
}

impl Resource for SurveillanceStation {
    const KIND: ResourceKind = ResourceKind::SurveillanceStation;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        self.cameras.clear();

        let list = ApiRequest::get(CAMERA_API_KEY, "List").max_version(CAMERA_LIST_MAX_VERSION);
        let response = client.request_json(list).await?;
        let mut cameras: Vec<CameraRecord> = response_data(response)
            .map(|data| array_field(&data, "cameras").to_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|data| CameraRecord {
                data,
                ..CameraRecord::default()
            })
            .collect();

        for camera in &mut cameras {
            let Some(id) = camera_id(&camera.data) else {
                continue;
            };
            let params = Params::new().with("camId", id.to_string());
            let response = client.get(CAMERA_EVENT_API_KEY, "MotionEnum", &params).await?;
            camera.motion_detection = field(&response, "data")
                .and_then(|data| field(data, "MDParam"))
                .and_then(|md| i64_field(md, "source"))
                .is_some_and(|source| source != MOTION_DETECTION_DISABLED);
        }

        let ids = join_ids(cameras.iter().filter_map(|c| camera_id(&c.data)));
        if !ids.is_empty() {
            let params = Params::new().with("idList", ids);
            let response = client.get(CAMERA_API_KEY, "GetLiveViewPath", &params).await?;
            for view in array_field(&response, "data") {
                let target = u64_field(view, "id")
                    .and_then(|id| cameras.iter_mut().find(|c| camera_id(&c.data) == Some(id)));
                if let Some(camera) = target {
                    camera.live_view = Some(view.clone());
                }
            }
        }

        debug!(cameras = cameras.len(), "surveillance cameras refreshed");
        self.cameras = cameras;
        Ok(())
    }
}

fn camera_id(data: &Value) -> Option<u64> {
    u64_field(data, "id")
}

fn join_ids(ids: impl IntoIterator<Item = u64>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl SurveillanceStation {
    pub fn cameras(&self) -> Vec<Camera<'_>> {
        self.cameras.iter().map(Camera).collect()
    }

    pub fn camera(&self, camera_id: u64) -> Option<Camera<'_>> {
        self.cameras().into_iter().find(|c| c.id() == Some(camera_id))
    }

    pub fn live_view_path(&self, camera_id: u64, format: LiveViewFormat) -> Option<&str> {
        self.camera(camera_id).and_then(|c| c.live_view_path(format))
    }

    pub fn is_motion_detection_enabled(&self, camera_id: u64) -> Option<bool> {
        self.camera(camera_id).map(|c| c.is_motion_detection_enabled())
    }
}

impl Accessor<'_, SurveillanceStation> {
    /// General information about the Surveillance Station instance.
    pub async fn info(&mut self) -> Result<Value, Error> {
        self.client.get(API_KEY, "GetInfo", &Params::new()).await
    }

    /// Current image of a camera.
    pub async fn camera_image(&mut self, camera_id: u64) -> Result<Bytes, Error> {
        let request = ApiRequest::get(CAMERA_API_KEY, "GetSnapshot")
            .param("id", camera_id.to_string())
            .param("cameraId", camera_id.to_string());
        self.client.request_bytes(request).await
    }

    pub async fn enable_camera(&mut self, camera_ids: &[u64]) -> Result<bool, Error> {
        let params = Params::new().with("idList", join_ids(camera_ids.iter().copied()));
        let response = self.client.get(CAMERA_API_KEY, "Enable", &params).await?;
        Ok(bool_field(&response, "success").unwrap_or_default())
    }

    pub async fn disable_camera(&mut self, camera_ids: &[u64]) -> Result<bool, Error> {
        let params = Params::new().with("idList", join_ids(camera_ids.iter().copied()));
        let response = self.client.get(CAMERA_API_KEY, "Disable", &params).await?;
        Ok(bool_field(&response, "success").unwrap_or_default())
    }

    /// Take a snapshot; `save` keeps it in the Surveillance Station library.
    pub async fn capture_image(&mut self, camera_id: u64, save: bool) -> Result<Value, Error> {
        let params = Params::new()
            .with("camId", camera_id.to_string())
            .with("blSave", if save { "1" } else { "0" });
        self.client.get(SNAPSHOT_API_KEY, "TakeSnapshot", &params).await
    }

    pub async fn download_snapshot(
        &mut self,
        snapshot_id: u64,
        size: SnapshotSize,
    ) -> Result<Bytes, Error> {
        let request = ApiRequest::get(SNAPSHOT_API_KEY, "LoadSnapshot")
            .param("id", snapshot_id.to_string())
            .param("imgSize", size.code());
        self.client.request_bytes(request).await
    }

    pub async fn enable_motion_detection(&mut self, camera_id: u64) -> Result<Value, Error> {
        self.save_motion_source(camera_id, MOTION_DETECTION_BY_SURVEILLANCE)
            .await
    }

    pub async fn disable_motion_detection(&mut self, camera_id: u64) -> Result<Value, Error> {
        self.save_motion_source(camera_id, MOTION_DETECTION_DISABLED)
            .await
    }

    async fn save_motion_source(&mut self, camera_id: u64, source: i64) -> Result<Value, Error> {
        let params = Params::new()
            .with("camId", camera_id.to_string())
            .with("source", source.to_string());
        self.client
            .get(CAMERA_EVENT_API_KEY, "MDParamSave", &params)
            .await
    }

    pub async fn home_mode_status(&mut self) -> Result<bool, Error> {
        let response = self
            .client
            .get(HOME_MODE_API_KEY, "GetInfo", &Params::new())
            .await?;
        Ok(field(&response, "data")
            .and_then(|data| bool_field(data, "on"))
            .unwrap_or_default())
    }

    pub async fn set_home_mode(&mut self, on: bool) -> Result<bool, Error> {
        let params = Params::new().with("on", on.to_string());
        let response = self.client.get(HOME_MODE_API_KEY, "Switch", &params).await?;
        Ok(bool_field(&response, "success").unwrap_or_default())
    }
}

/// Borrowed view of one camera.
#[derive(Debug, Clone, Copy)]
pub struct Camera<'a>(&'a CameraRecord);

impl<'a> Camera<'a> {
    pub fn id(&self) -> Option<u64> {
        camera_id(&self.0.data)
    }

    pub fn name(&self) -> Option<&'a str> {
        str_field(&self.0.data, "name").or_else(|| str_field(&self.0.data, "newName"))
    }

    pub fn model(&self) -> Option<&'a str> {
        str_field(&self.0.data, "model")
    }

    /// Resolution, e.g. `1280x720`.
    pub fn resolution(&self) -> Option<&'a str> {
        str_field(&self.0.data, "resolution")
    }

    pub fn fps(&self) -> Option<u64> {
        u64_field(&self.0.data, "fps")
    }

    pub fn is_enabled(&self) -> Option<bool> {
        bool_field(&self.0.data, "enabled")
    }

    /// `recStatus` 1 through 5 are the recording states.
    pub fn is_recording(&self) -> bool {
        i64_field(&self.0.data, "recStatus").is_some_and(|status| (1..=5).contains(&status))
    }

    pub fn is_motion_detection_enabled(&self) -> bool {
        self.0.motion_detection
    }

    pub fn live_view_path(&self, format: LiveViewFormat) -> Option<&'a str> {
        self.0
            .live_view
            .as_ref()
            .and_then(|view| str_field(view, format.key()))
    }

    pub fn raw(&self) -> &'a Value {
        &self.0.data
    }
}
