use crate::config::mongo_conf::MongoConfig;
use crate::model::quote::{Quote, QuoteStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;
use futures::stream::StreamExt;
use mongodb::options::{FindOneOptions, IndexOptions};
use mongodb::IndexModel;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote>;
    async fn update(&self, quote: Quote) -> RepositoryResult<Quote>;
    /// Highest `quote_sequence` currently persisted, if any quote exists.
    async fn find_max_quote_sequence(&self) -> RepositoryResult<Option<i32>>;
    async fn find_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Option<Quote>>;
    async fn find_by_project_identifier(&self, project_identifier: &str) -> RepositoryResult<Vec<Quote>>;
    async fn find_by_lot_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Vec<Quote>>;
    async fn find_by_contractor_id(&self, contractor_id: &str) -> RepositoryResult<Vec<Quote>>;
    async fn find_by_status(&self, status: QuoteStatus) -> RepositoryResult<Vec<Quote>>;
    async fn find_by_project_and_status(
        &self,
        project_identifier: &str,
        status: QuoteStatus,
    ) -> RepositoryResult<Vec<Quote>>;
    async fn find_all(&self) -> RepositoryResult<Vec<Quote>>;
}

pub struct MongoQuoteRepository {
    collection: mongodb::Collection<Quote>,
}

impl MongoQuoteRepository {
    /// Opens the quotes collection and makes sure the unique index on
    /// `quoteNumber` exists. That index is what turns a concurrent
    /// generate-and-insert race into a duplicate-key error the service
    /// layer can retry on.
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::mongo_database(config).await?;
        let collection_name = config.quote_collection.as_deref().unwrap_or("quotes");
        let collection = db.collection::<Quote>(collection_name);

        let index = IndexModel::builder()
            .keys(doc! { "quoteNumber": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(MongoQuoteRepository { collection })
    }

    async fn collect(&self, cursor: mongodb::Cursor<Quote>) -> RepositoryResult<Vec<Quote>> {
        let mut cursor = cursor;
        let mut quotes = Vec::new();
        while let Some(quote) = cursor.next().await {
            match quote {
                Ok(q) => quotes.push(q),
                Err(e) => {
                    error!("Failed to deserialize quote: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize quote: {}",
                        e
                    )));
                }
            }
        }
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteRepository for MongoQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut new_quote = quote;
        new_quote.id = Some(bson::oid::ObjectId::new());
        let now = chrono::Utc::now();
        new_quote.created_at = Some(now);
        new_quote.updated_at = Some(now);

        match self.collection.insert_one(new_quote.clone(), None).await {
            Ok(_) => {
                info!("Quote created: {}", new_quote.quote_number);
                Ok(new_quote)
            }
            Err(e) => {
                error!("Failed to create quote: {}", e);
                // From<mongodb::error::Error> classifies E11000 as AlreadyExists
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn update(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut updated = quote;
        updated.updated_at = Some(chrono::Utc::now());

        let filter = doc! { "quoteNumber": &updated.quote_number };
        let mut doc = bson::to_document(&updated)
            .map_err(|e| RepositoryError::serialization(format!("Failed to serialize quote: {}", e)))?;
        doc.remove("_id");
        let update = doc! { "$set": doc };

        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(updated),
            Ok(_) => {
                error!("No quote found to update: {}", updated.quote_number);
                Err(RepositoryError::not_found(format!(
                    "No quote found to update: {}",
                    updated.quote_number
                )))
            }
            Err(e) => {
                error!("Failed to update quote: {}", e);
                Err(RepositoryError::database(format!("Failed to update quote: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_max_quote_sequence(&self) -> RepositoryResult<Option<i32>> {
        let options = FindOneOptions::builder()
            .sort(doc! { "quoteSequence": -1 })
            .build();
        let quote = self
            .collection
            .find_one(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to read max quote sequence: {}", e)))?;
        Ok(quote.map(|q| q.quote_sequence))
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Option<Quote>> {
        let filter = doc! { "quoteNumber": quote_number };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find quote: {}", e)))
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_project_identifier(&self, project_identifier: &str) -> RepositoryResult<Vec<Quote>> {
        let cursor = self
            .collection
            .find(doc! { "projectIdentifier": project_identifier }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query quotes: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_lot_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Vec<Quote>> {
        let cursor = self
            .collection
            .find(doc! { "lotIdentifier": lot_identifier.to_string() }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query quotes: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_contractor_id(&self, contractor_id: &str) -> RepositoryResult<Vec<Quote>> {
        let cursor = self
            .collection
            .find(doc! { "contractorId": contractor_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query quotes: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_status(&self, status: QuoteStatus) -> RepositoryResult<Vec<Quote>> {
        let cursor = self
            .collection
            .find(doc! { "status": status.as_str() }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query quotes: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_project_and_status(
        &self,
        project_identifier: &str,
        status: QuoteStatus,
    ) -> RepositoryResult<Vec<Quote>> {
        let filter = doc! {
            "projectIdentifier": project_identifier,
            "status": status.as_str(),
        };
        let cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to query quotes: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Quote>> {
        let cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list quotes: {}", e)))?;
        self.collect(cursor).await
    }
}
