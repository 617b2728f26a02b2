// Hyper Backup tasks.

use serde_json::Value;
use synodsm_api::{ApiRequest, DsmClient, Error};
use tracing::debug;

use crate::convert::{array_field, field, response_data, str_field, u64_field};
use crate::resource::{Resource, ResourceKind};

pub const API_KEY: &str = "SYNO.Backup.Task";

#[derive(Debug, Clone, Default)]
pub struct Backup {
    tasks: Vec<Value>,
}

impl Resource for Backup {
    const KIND: ResourceKind = ResourceKind::Backup;

    async fn refresh(&mut self, client: &mut DsmClient) -> Result<(), Error> {
        self.tasks.clear();

        let response = client
            .request_json(ApiRequest::get(API_KEY, "list").max_version(1))
            .await?;
        let listed: Vec<Value> = response_data(response)
            .map(|data| array_field(&data, "task_list").to_vec())
            .unwrap_or_default();

        let mut tasks = Vec::with_capacity(listed.len());
        for task in &listed {
            let Some(task_id) = u64_field(task, "task_id") else {
                continue;
            };
            let request = ApiRequest::get(API_KEY, "get")
                .param("task_id", task_id.to_string())
                .max_version(1);
            let details = client.request_json(request).await?;
            tasks.push(response_data(details).unwrap_or_else(|| task.clone()));
        }

        debug!(tasks = tasks.len(), "backup tasks refreshed");
        self.tasks = tasks;
        Ok(())
    }
}

impl Backup {
    /// Raw task records.
    pub fn data(&self) -> &[Value] {
        &self.tasks
    }

    pub fn tasks(&self) -> Vec<BackupTask<'_>> {
        self.tasks.iter().map(BackupTask).collect()
    }

    pub fn task(&self, task_id: u64) -> Option<BackupTask<'_>> {
        self.tasks()
            .into_iter()
            .find(|task| task.task_id() == Some(task_id))
    }
}

/// Borrowed view of one backup task.
#[derive(Debug, Clone, Copy)]
pub struct BackupTask<'a>(&'a Value);

impl<'a> BackupTask<'a> {
    pub fn task_id(&self) -> Option<u64> {
        u64_field(self.0, "task_id")
    }

    pub fn name(&self) -> Option<&'a str> {
        str_field(self.0, "name")
    }

    pub fn state(&self) -> Option<&'a str> {
        str_field(self.0, "state")
    }

    pub fn status(&self) -> Option<&'a str> {
        str_field(self.0, "status")
    }

    pub fn kind(&self) -> Option<&'a str> {
        str_field(self.0, "type")
    }

    pub fn target_type(&self) -> Option<&'a str> {
        str_field(self.0, "target_type")
    }

    pub fn target_id(&self) -> Option<&'a str> {
        str_field(self.0, "target_id")
    }

    pub fn transfer_type(&self) -> Option<&'a str> {
        str_field(self.0, "transfer_type")
    }

    pub fn data_type(&self) -> Option<&'a str> {
        str_field(self.0, "data_type")
    }

    pub fn data_enc(&self) -> Option<&'a Value> {
        field(self.0, "data_enc")
    }

    /// Folders and applications included in the task.
    pub fn source(&self) -> Option<&'a Value> {
        field(self.0, "source")
    }

    pub fn raw(&self) -> &'a Value {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_tasks_by_id() {
        let backup = Backup {
            tasks: vec![json!({
                "task_id": 3,
                "name": "Photos to C2",
                "state": "backupable",
                "status": "none",
                "type": "image",
                "target_type": "cloud_image",
                "target_id": "photos.hbk",
                "transfer_type": "c2",
                "data_type": "data",
                "data_enc": false,
                "source": { "folder_list": ["/photo"] }
            })],
        };

        let task = backup.task(3).unwrap();
        assert_eq!(task.name(), Some("Photos to C2"));
        assert_eq!(task.state(), Some("backupable"));
        assert_eq!(task.transfer_type(), Some("c2"));
        assert_eq!(task.data_enc(), Some(&json!(false)));
        assert!(task.source().is_some());
        assert!(backup.task(4).is_none());
        assert!(Backup::default().tasks().is_empty());
    }
}
