use crate::config::mongo_conf::MongoConfig;
use crate::model::lot::Lot;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait LotRepository: Send + Sync {
    async fn insert(&self, lot: Lot) -> RepositoryResult<Lot>;
    async fn find_by_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Option<Lot>>;
    async fn find_by_project(&self, project_identifier: &str) -> RepositoryResult<Vec<Lot>>;
}

pub struct MongoLotRepository {
    collection: mongodb::Collection<Lot>,
}

impl MongoLotRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::mongo_database(config).await?;
        let collection = db.collection::<Lot>("lots");
        Ok(MongoLotRepository { collection })
    }
}

#[async_trait]
impl LotRepository for MongoLotRepository {
    #[tracing::instrument(skip(self, lot), fields(lot_identifier = %lot.lot_identifier))]
    async fn insert(&self, lot: Lot) -> RepositoryResult<Lot> {
        let mut new_lot = lot;
        new_lot.id = Some(bson::oid::ObjectId::new());
        let now = chrono::Utc::now();
        new_lot.created_at = Some(now);
        new_lot.updated_at = Some(now);

        match self.collection.insert_one(new_lot.clone(), None).await {
            Ok(_) => {
                info!("Lot created: {}", new_lot.lot_identifier);
                Ok(new_lot)
            }
            Err(e) => {
                error!("Failed to insert lot: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Option<Lot>> {
        let filter = doc! { "lotIdentifier": lot_identifier.to_string() };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find lot: {}", e)))
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_project(&self, project_identifier: &str) -> RepositoryResult<Vec<Lot>> {
        let cursor = self
            .collection
            .find(doc! { "projectIdentifier": project_identifier }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query lots: {}", e)))?;

        let mut cursor = cursor;
        let mut lots = Vec::new();
        while let Some(lot) = cursor.next().await {
            match lot {
                Ok(l) => lots.push(l),
                Err(e) => {
                    error!("Failed to deserialize lot: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize lot: {}",
                        e
                    )));
                }
            }
        }
        Ok(lots)
    }
}
