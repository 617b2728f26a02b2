#![allow(clippy::unwrap_used)]
// Integration tests for `Nas` and the resource accessors using wiremock.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use synodsm_core::{
    ConnectionConfig, Credentials, Error, LiveViewFormat, Nas, ResourceKind, SnapshotSize,
};

const SID: &str = "sid-nas-test";
const DSM7_BUILD: &str = "42218";

// ── Helpers ─────────────────────────────────────────────────────────

fn entry(max_version: u32) -> Value {
    json!({ "maxVersion": max_version, "minVersion": 1, "path": "entry.cgi" })
}

fn api_info() -> Value {
    json!({
        "success": true,
        "data": {
            "SYNO.API.Info": { "maxVersion": 1, "minVersion": 1, "path": "query.cgi" },
            "SYNO.API.Auth": { "maxVersion": 6, "minVersion": 1, "path": "auth.cgi" },
            "SYNO.DSM.Info": entry(2),
            "SYNO.Storage.CGI.Storage": entry(1),
            "SYNO.Core.Share": entry(1),
            "SYNO.Core.System": entry(3),
            "SYNO.Core.System.Utilization": entry(1),
            "SYNO.Core.SecurityScan.Status": entry(1),
            "SYNO.SurveillanceStation.Camera": entry(9),
            "SYNO.SurveillanceStation.Camera.Event": entry(1),
            "SYNO.SurveillanceStation.HomeMode": entry(1),
            "SYNO.SurveillanceStation.SnapShot": entry(1),
            "SYNO.Backup.Task": entry(1)
        }
    })
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// Mount discovery, login and `SYNO.DSM.Info` reporting `build`.
async fn setup_with_build(build: &str) -> (MockServer, Nas) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webapi/query.cgi"))
        .and(query_param("query", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_info()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "login"))
        .respond_with(ok(json!({ "sid": SID, "synotoken": "token" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.DSM.Info"))
        .and(query_param("method", "getinfo"))
        .respond_with(ok(json!({
            "model": "DS1819+",
            "ram": 8192,
            "serial": "1930PDN001234",
            "temperature": 43,
            "temperature_warn": false,
            "uptime": 3600,
            "version": build,
            "version_string": "DSM 7.1-42218"
        })))
        .mount(&server)
        .await;

    let config = ConnectionConfig::new("127.0.0.1", server.address().port(), false, false)
        .with_device_name("test-runner");
    let nas = Nas::new(&config, Credentials::new("admin", "s3cret".to_string())).unwrap();
    (server, nas)
}

async fn setup() -> (MockServer, Nas) {
    setup_with_build(DSM7_BUILD).await
}

fn disk(id: &str, temp: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Disk {id}"),
        "device": format!("/dev/{id}"),
        "smart_status": "normal",
        "status": "normal",
        "temp": temp
    })
}

fn shr2_storage() -> Value {
    json!({
        "disks": [disk("sda", 30), disk("sdb", 32), disk("sdc", 35), disk("sdd", 36)],
        "env": { "bay_number": "8" },
        "storagePools": [{
            "id": "reuse_1",
            "deploy_path": "",
            "disks": ["sda", "sdb", "sdc", "sdd"],
            "pool_child": [{ "id": "volume_1" }, { "id": "volume_2" }]
        }],
        "volumes": [
            { "id": "volume_1", "status": "normal", "size": { "total": "4000", "used": "1000" } },
            { "id": "volume_2", "status": "normal", "size": { "total": "2000", "used": "1500" } }
        ]
    })
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_loads_information() {
    let (_server, mut nas) = setup().await;

    assert!(nas.login(None).await.unwrap());
    assert!(nas.is_loaded(ResourceKind::Information));
    assert_eq!(nas.client().server_build(), Some(42218));

    let info = nas.information();
    assert_eq!(info.model(), Some("DS1819+"));
    assert_eq!(info.temperature(), Some(43));
    assert_eq!(info.version_string(), Some("DSM 7.1-42218"));
}

#[tokio::test]
async fn test_login_failure_leaves_information_unloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webapi/query.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(api_info()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": { "code": 400 } })),
        )
        .mount(&server)
        .await;

    let config = ConnectionConfig::new("127.0.0.1", server.address().port(), false, false);
    let mut nas = Nas::new(&config, Credentials::new("admin", "wrong".to_string())).unwrap();

    let err = nas.login(None).await.unwrap_err();
    assert!(matches!(err, Error::LoginInvalid { .. }));
    assert!(!nas.is_loaded(ResourceKind::Information));
}

// ── Storage ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_storage_refresh_logs_in_implicitly() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Storage.CGI.Storage"))
        .and(query_param("method", "load_info"))
        .and(query_param("_sid", SID))
        .respond_with(ok(shr2_storage()))
        .expect(1)
        .mount(&server)
        .await;

    let mut storage = nas.storage();
    let snapshot = storage.refresh().await.unwrap();
    assert_eq!(snapshot.volumes_ids(), vec!["volume_1", "volume_2"]);
    assert_eq!(snapshot.volume_percentage_used("volume_1"), Some(25.0));
    assert_eq!(snapshot.volume_percentage_used("volume_2"), Some(75.0));
    assert_eq!(snapshot.disks_for_volume("volume_2").len(), 4);
    assert_eq!(snapshot.volume_disk_temp_avg("volume_2"), Some(33.0));
    assert_eq!(snapshot.volume_disk_temp_max("volume_2"), Some(36));
}

#[tokio::test]
async fn test_storage_uses_legacy_handler_on_old_builds() {
    let (server, mut nas) = setup_with_build("5967").await;
    let mut legacy = shr2_storage();
    legacy["success"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/webman/modules/StorageManager/storagehandler.cgi"))
        .and(query_param("action", "load_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(legacy))
        .expect(1)
        .mount(&server)
        .await;

    nas.login(None).await.unwrap();
    let mut storage = nas.storage();
    storage.refresh().await.unwrap();
    assert_eq!(storage.disks_ids(), vec!["sda", "sdb", "sdc", "sdd"]);
    assert_eq!(storage.volume_status("volume_1"), Some("normal"));
}

#[tokio::test]
async fn test_empty_reply_keeps_previous_snapshot() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Storage.CGI.Storage"))
        .respond_with(ok(shr2_storage()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Storage.CGI.Storage"))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    let mut storage = nas.storage();
    storage.refresh().await.unwrap();
    storage.refresh().await.unwrap();
    assert_eq!(storage.volumes().len(), 2);
}

// ── Share ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_share_list_is_posted_with_selectors() {
    let (server, mut nas) = setup().await;
    Mock::given(method("POST"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.Share"))
        .and(query_param("method", "list"))
        .and(body_string_contains("shareType=all"))
        .and(body_string_contains("share_quota"))
        .respond_with(ok(json!({
            "shares": [{
                "name": "homes",
                "uuid": "b3a1a9f0",
                "vol_path": "/volume1",
                "enable_recycle_bin": true,
                "share_quota_used": 512
            }],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut share = nas.share();
    share.refresh().await.unwrap();
    assert_eq!(share.shares_uuids(), vec!["b3a1a9f0"]);
    assert_eq!(share.share_path("b3a1a9f0"), Some("/volume1"));
    assert_eq!(
        share.share_size("b3a1a9f0").map(|size| size.bytes()),
        Some(536_870_912)
    );
}

#[tokio::test]
async fn test_refresh_error_keeps_snapshot_empty() {
    let (server, mut nas) = setup().await;
    Mock::given(method("POST"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.Share"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": { "code": 105 } })),
        )
        .mount(&server)
        .await;

    let mut share = nas.share();
    let err = share.refresh().await.unwrap_err();
    assert_eq!(err.code(), 105);
    assert_eq!(err.api(), Some("SYNO.Core.Share"));
    assert!(share.shares().is_empty());
}

// ── Bulk update ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_refreshes_only_loaded_resources() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.System.Utilization"))
        .respond_with(ok(json!({
            "cpu": { "other_load": 1, "user_load": 2, "system_load": 3 },
            "memory": { "memory_size": 131_072, "real_usage": 20 },
            "network": [{ "device": "total", "rx": 10, "tx": 20 }]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.SecurityScan.Status"))
        .respond_with(ok(json!({ "sysStatus": "safe" })))
        .expect(0)
        .mount(&server)
        .await;

    nas.utilization().refresh().await.unwrap();
    nas.update(false, false).await.unwrap();

    let utilization = nas.utilization();
    assert_eq!(utilization.cpu_total_load(), Some(6));
    assert_eq!(
        utilization.memory_size().map(|size| size.bytes()),
        Some(134_217_728)
    );
    assert_eq!(utilization.network_up().map(|up| up.bytes()), Some(20));
    assert!(!nas.is_loaded(ResourceKind::Security));
}

#[tokio::test]
async fn test_reset_resource_is_skipped_by_update() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.SecurityScan.Status"))
        .respond_with(ok(json!({ "sysStatus": "safe" })))
        .expect(1)
        .mount(&server)
        .await;

    nas.security().refresh().await.unwrap();
    assert!(nas.reset(ResourceKind::Security));
    assert!(!nas.reset(ResourceKind::Information));
    nas.update(true, false).await.unwrap();

    assert!(!nas.is_loaded(ResourceKind::Security));
    assert!(nas.is_loaded(ResourceKind::Information));
}

// ── System ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reboot_caps_version_to_one() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Core.System"))
        .and(query_param("method", "reboot"))
        .and(query_param("version", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    nas.system().reboot().await.unwrap();
}

// ── Surveillance Station ────────────────────────────────────────────

async fn mount_cameras(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.Camera"))
        .and(query_param("method", "List"))
        .and(query_param("version", "7"))
        .respond_with(ok(json!({
            "cameras": [
                { "id": 1, "name": "Porch", "enabled": true, "recStatus": 1, "fps": 15 },
                { "id": 2, "newName": "Garage", "enabled": true, "recStatus": 0 }
            ]
        })))
        .mount(server)
        .await;

    for (cam_id, source) in [("1", 1), ("2", -1)] {
        Mock::given(method("GET"))
            .and(path("/webapi/entry.cgi"))
            .and(query_param("api", "SYNO.SurveillanceStation.Camera.Event"))
            .and(query_param("method", "MotionEnum"))
            .and(query_param("camId", cam_id))
            .respond_with(ok(json!({ "MDParam": { "source": source } })))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.Camera"))
        .and(query_param("method", "GetLiveViewPath"))
        .and(query_param("idList", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {
                    "id": 1,
                    "rtspPath": "rtsp://nas/porch",
                    "mjpegHttpPath": "http://nas/porch.mjpeg"
                },
                { "id": 2, "rtspPath": "rtsp://nas/garage" }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_surveillance_refresh_builds_cameras() {
    let (server, mut nas) = setup().await;
    mount_cameras(&server).await;

    let mut station = nas.surveillance_station();
    station.refresh().await.unwrap();

    assert_eq!(station.cameras().len(), 2);
    let porch = station.camera(1).unwrap();
    assert_eq!(porch.name(), Some("Porch"));
    assert!(porch.is_recording());
    assert!(porch.is_motion_detection_enabled());
    assert_eq!(porch.live_view_path(LiveViewFormat::Rtsp), Some("rtsp://nas/porch"));

    let garage = station.camera(2).unwrap();
    assert_eq!(garage.name(), Some("Garage"));
    assert!(!garage.is_motion_detection_enabled());
    assert_eq!(station.live_view_path(2, LiveViewFormat::MjpegHttp), None);
}

#[tokio::test]
async fn test_home_mode_switch() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.HomeMode"))
        .and(query_param("method", "Switch"))
        .and(query_param("on", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.HomeMode"))
        .and(query_param("method", "GetInfo"))
        .respond_with(ok(json!({ "on": true })))
        .mount(&server)
        .await;

    let mut station = nas.surveillance_station();
    assert!(station.set_home_mode(true).await.unwrap());
    assert!(station.home_mode_status().await.unwrap());
}

#[tokio::test]
async fn test_snapshot_download_returns_bytes() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.SnapShot"))
        .and(query_param("method", "LoadSnapshot"))
        .and(query_param("id", "12"))
        .and(query_param("imgSize", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"\xff\xd8jpeg".to_vec(), "image/jpeg"),
        )
        .mount(&server)
        .await;

    let image = nas
        .surveillance_station()
        .download_snapshot(12, SnapshotSize::Full)
        .await
        .unwrap();
    assert_eq!(&image[..], b"\xff\xd8jpeg");
}

// ── Backup ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_backup_refresh_fetches_each_task() {
    let (server, mut nas) = setup().await;
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.Backup.Task"))
        .and(query_param("method", "list"))
        .respond_with(ok(json!({
            "task_list": [
                { "task_id": 4, "name": "Nightly" },
                { "task_id": 7, "name": "Weekly" }
            ]
        })))
        .mount(&server)
        .await;
    for (task_id, state) in [("4", "backupable"), ("7", "error")] {
        Mock::given(method("GET"))
            .and(path("/webapi/entry.cgi"))
            .and(query_param("api", "SYNO.Backup.Task"))
            .and(query_param("method", "get"))
            .and(query_param("task_id", task_id))
            .respond_with(ok(json!({
                "task_id": task_id.parse::<u64>().unwrap(),
                "state": state,
                "transfer_type": "local"
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let mut backup = nas.backup();
    backup.refresh().await.unwrap();
    assert_eq!(backup.tasks().len(), 2);
    assert_eq!(backup.task(7).unwrap().state(), Some("error"));
    assert_eq!(backup.task(4).unwrap().transfer_type(), Some("local"));
}
