use crate::config::mongo_conf::MongoConfig;
use crate::model::project::{Project, ProjectStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use tracing::{error, info};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: Project) -> RepositoryResult<Project>;
    async fn update(&self, project: Project) -> RepositoryResult<Project>;
    async fn delete(&self, project_identifier: &str) -> RepositoryResult<()>;
    async fn find_by_identifier(&self, project_identifier: &str) -> RepositoryResult<Option<Project>>;
    async fn find_all(&self) -> RepositoryResult<Vec<Project>>;
    async fn find_by_status(&self, status: ProjectStatus) -> RepositoryResult<Vec<Project>>;
    async fn find_by_customer_id(&self, customer_id: &str) -> RepositoryResult<Vec<Project>>;
}

pub struct MongoProjectRepository {
    collection: mongodb::Collection<Project>,
}

impl MongoProjectRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::mongo_database(config).await?;
        let collection = db.collection::<Project>("projects");
        Ok(MongoProjectRepository { collection })
    }

    async fn collect(
        &self,
        cursor: mongodb::Cursor<Project>,
    ) -> RepositoryResult<Vec<Project>> {
        let mut cursor = cursor;
        let mut projects = Vec::new();
        while let Some(project) = cursor.next().await {
            match project {
                Ok(p) => projects.push(p),
                Err(e) => {
                    error!("Failed to deserialize project: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize project: {}",
                        e
                    )));
                }
            }
        }
        Ok(projects)
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    #[tracing::instrument(skip(self, project), fields(project_identifier = %project.project_identifier))]
    async fn insert(&self, project: Project) -> RepositoryResult<Project> {
        let mut new_project = project;
        new_project.id = Some(bson::oid::ObjectId::new());
        let now = chrono::Utc::now();
        new_project.created_at = Some(now);
        new_project.updated_at = Some(now);

        match self.collection.insert_one(new_project.clone(), None).await {
            Ok(_) => {
                info!("Project created: {}", new_project.project_identifier);
                Ok(new_project)
            }
            Err(e) => {
                error!("Failed to insert project: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, project), fields(project_identifier = %project.project_identifier))]
    async fn update(&self, project: Project) -> RepositoryResult<Project> {
        let mut updated = project;
        updated.updated_at = Some(chrono::Utc::now());

        let filter = doc! { "projectIdentifier": &updated.project_identifier };
        let mut doc = bson::to_document(&updated)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize project: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };

        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(updated),
            Ok(_) => {
                error!("No project found to update: {}", updated.project_identifier);
                Err(RepositoryError::not_found(format!(
                    "No project found to update: {}",
                    updated.project_identifier
                )))
            }
            Err(e) => {
                error!("Failed to update project: {}", e);
                Err(RepositoryError::database(format!("Failed to update project: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, project_identifier: &str) -> RepositoryResult<()> {
        let filter = doc! { "projectIdentifier": project_identifier };
        match self.collection.delete_one(filter, None).await {
            Ok(result) if result.deleted_count > 0 => Ok(()),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No project found to delete: {}",
                project_identifier
            ))),
            Err(e) => {
                error!("Failed to delete project: {}", e);
                Err(RepositoryError::database(format!("Failed to delete project: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_identifier(&self, project_identifier: &str) -> RepositoryResult<Option<Project>> {
        let filter = doc! { "projectIdentifier": project_identifier };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find project: {}", e)))
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Project>> {
        let cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list projects: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_status(&self, status: ProjectStatus) -> RepositoryResult<Vec<Project>> {
        let status_value = bson::to_bson(&status)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize status: {}", e)))?;
        let cursor = self
            .collection
            .find(doc! { "status": status_value }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query projects: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_customer_id(&self, customer_id: &str) -> RepositoryResult<Vec<Project>> {
        let cursor = self
            .collection
            .find(doc! { "customerId": customer_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query projects: {}", e)))?;
        self.collect(cursor).await
    }
}
