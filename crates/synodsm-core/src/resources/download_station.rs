// Download Station tasks and task control.

use serde_json::Value;
use synodsm_api::{ByteCount, DsmClient, Error, Params};
use tracing::debug;

use crate::convert::{array_field, field, find_by, response_data, str_field, u64_field};
use crate::resource::{Accessor, Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.DownloadStation.Info";
pub const TASK_API_KEY: &str = "SYNO.DownloadStation.Task";
pub const STAT_API_KEY: &str = "SYNO.DownloadStation.Statistic";

/// Task details requested on every listing.
const ADDITIONAL: &str = "detail,file";

#[derive(Debug, Clone, Default)]
pub struct DownloadStation {
    tasks: Vec<Value>,
}

impl Resource for DownloadStation {
    const KIND: ResourceKind = ResourceKind::DownloadStation;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        let params = Params::new().with("additional", ADDITIONAL);
        let response = client.get(TASK_API_KEY, "List", &params).await?;
        self.tasks = response_data(response)
            .and_then(|mut data| data.get_mut("tasks").map(Value::take))
            .and_then(|tasks| match tasks {
                Value::Array(tasks) => Some(tasks),
                _ => None,
            })
            .unwrap_or_default();
        debug!(tasks = self.tasks.len(), "download tasks refreshed");
        Ok(())
    }
}

impl DownloadStation {
    /// Raw task records.
    pub fn data(&self) -> &[Value] {
        &self.tasks
    }

    pub fn all_tasks(&self) -> Vec<DownloadTask<'_>> {
        self.tasks.iter().map(DownloadTask).collect()
    }

    pub fn task(&self, task_id: &str) -> Option<DownloadTask<'_>> {
        find_by(&self.tasks, "id", task_id).map(DownloadTask)
    }
}

impl Accessor<'_, DownloadStation> {
    /// General information about the Download Station instance.
    pub async fn info(&mut self) -> Result<Value, Error> {
        self.client.get(API_KEY, "GetInfo", &Params::new()).await
    }

    pub async fn config(&mut self) -> Result<Value, Error> {
        self.client.get(API_KEY, "GetConfig", &Params::new()).await
    }

    /// Current transfer totals.
    pub async fn stats(&mut self) -> Result<Value, Error> {
        self.client.get(STAT_API_KEY, "GetInfo", &Params::new()).await
    }

    /// Queue downloads for HTTP, FTP, magnet or ED2K `uris`.
    pub async fn create(
        &mut self,
        uris: &[&str],
        unzip_password: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Value, Error> {
        let mut params = Params::new().with("uri", uris.join(","));
        if let Some(password) = unzip_password {
            params.insert("unzip_password", password);
        }
        if let Some(destination) = destination {
            params.insert("destination", destination);
        }
        self.client.get(TASK_API_KEY, "create", &params).await
    }

    pub async fn pause(&mut self, task_ids: &[&str]) -> Result<Value, Error> {
        let params = Params::new().with("id", task_ids.join(","));
        self.client.get(TASK_API_KEY, "pause", &params).await
    }

    pub async fn resume(&mut self, task_ids: &[&str]) -> Result<Value, Error> {
        let params = Params::new().with("id", task_ids.join(","));
        self.client.get(TASK_API_KEY, "resume", &params).await
    }

    /// Delete tasks; `force_complete` moves partially downloaded files to
    /// the destination instead of discarding them.
    pub async fn delete(
        &mut self,
        task_ids: &[&str],
        force_complete: bool,
    ) -> Result<Value, Error> {
        let params = Params::new()
            .with("id", task_ids.join(","))
            .with("force_complete", force_complete.to_string());
        self.client.get(TASK_API_KEY, "delete", &params).await
    }
}

/// Borrowed view of one download task.
#[derive(Debug, Clone, Copy)]
pub struct DownloadTask<'a>(&'a Value);

impl<'a> DownloadTask<'a> {
    pub fn id(&self) -> Option<&'a str> {
        str_field(self.0, "id")
    }

    pub fn title(&self) -> Option<&'a str> {
        str_field(self.0, "title")
    }

    /// `bt`, `nzb`, `http`, `ftp`, `eMule`.
    pub fn kind(&self) -> Option<&'a str> {
        str_field(self.0, "type")
    }

    pub fn username(&self) -> Option<&'a str> {
        str_field(self.0, "username")
    }

    /// Total size in bytes.
    pub fn size(&self) -> Option<ByteCount> {
        u64_field(self.0, "size").map(ByteCount)
    }

    /// `waiting`, `downloading`, `paused`, `finished`, `error`, ...
    pub fn status(&self) -> Option<&'a str> {
        str_field(self.0, "status")
    }

    pub fn status_extra(&self) -> Option<&'a Value> {
        field(self.0, "status_extra")
    }

    /// The `detail`/`file` blocks requested on listing.
    pub fn additional(&self) -> Option<&'a Value> {
        field(self.0, "additional")
    }

    pub fn files(&self) -> &'a [Value] {
        self.additional()
            .map(|additional| array_field(additional, "file"))
            .unwrap_or_default()
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_tasks_by_id() {
        let station = DownloadStation {
            tasks: vec![
                json!({
                    "id": "dbid_86",
                    "size": "57226905",
                    "status": "downloading",
                    "status_extra": null,
                    "title": "ubuntu-20.04-desktop-amd64.iso",
                    "type": "bt",
                    "username": "admin",
                    "additional": {
                        "detail": { "destination": "downloads" },
                        "file": [{
                            "filename": "ubuntu-20.04-desktop-amd64.iso",
                            "size": 57_226_905
                        }]
                    }
                }),
                json!({
                    "id": "dbid_87",
                    "status": "paused",
                    "title": "debian.iso",
                    "type": "http"
                }),
            ],
        };

        assert_eq!(station.all_tasks().len(), 2);
        let task = station.task("dbid_86").unwrap();
        assert_eq!(task.title(), Some("ubuntu-20.04-desktop-amd64.iso"));
        assert_eq!(task.kind(), Some("bt"));
        assert_eq!(task.size(), Some(ByteCount(57_226_905)));
        assert_eq!(task.status_extra(), None);
        assert_eq!(task.files().len(), 1);
        assert_eq!(station.task("dbid_87").unwrap().status(), Some("paused"));
        assert!(station.task("dbid_99").is_none());
    }
}
