use crate::config::mongo_conf::MongoConfig;
use crate::model::activity_log::ProjectActivityLog;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Append one entry. Entries are never updated or deleted afterwards.
    async fn save(&self, entry: ProjectActivityLog) -> RepositoryResult<ProjectActivityLog>;
    /// Entries for a project, newest first.
    async fn find_by_project_ordered_desc(
        &self,
        project_identifier: &str,
    ) -> RepositoryResult<Vec<ProjectActivityLog>>;
}

pub struct MongoActivityLogRepository {
    collection: mongodb::Collection<ProjectActivityLog>,
}

impl MongoActivityLogRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::mongo_database(config).await?;
        let collection = db.collection::<ProjectActivityLog>("project_activity_log");
        Ok(MongoActivityLogRepository { collection })
    }
}

#[async_trait]
impl ActivityLogRepository for MongoActivityLogRepository {
    #[tracing::instrument(skip(self, entry), fields(project_identifier = %entry.project_identifier, activity_type = %entry.activity_type.as_str()))]
    async fn save(&self, entry: ProjectActivityLog) -> RepositoryResult<ProjectActivityLog> {
        let mut new_entry = entry;
        new_entry.id = Some(bson::oid::ObjectId::new());

        match self.collection.insert_one(new_entry.clone(), None).await {
            Ok(_) => {
                info!("Activity log entry appended");
                Ok(new_entry)
            }
            Err(e) => {
                error!("Failed to append activity log entry: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to append activity log entry: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_project_ordered_desc(
        &self,
        project_identifier: &str,
    ) -> RepositoryResult<Vec<ProjectActivityLog>> {
        let cursor = self
            .collection
            .find(doc! { "projectIdentifier": project_identifier }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query activity log: {}", e)))?;

        let mut cursor = cursor;
        let mut entries = Vec::new();
        while let Some(entry) = cursor.next().await {
            match entry {
                Ok(e) => entries.push(e),
                Err(e) => {
                    error!("Failed to deserialize activity log entry: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize activity log entry: {}",
                        e
                    )));
                }
            }
        }
        // Timestamps are RFC3339 strings in the store; sort the parsed values
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}
