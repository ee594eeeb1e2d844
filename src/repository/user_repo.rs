use crate::config::mongo_conf::MongoConfig;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::doc;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_auth0_user_id(&self, auth0_user_id: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_user_identifier(&self, user_identifier: &str) -> RepositoryResult<Option<User>>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = crate::repository::mongo_database(config).await?;
        let collection = db.collection::<User>("users");
        Ok(MongoUserRepository { collection })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let mut new_user = user;
        new_user.id = Some(bson::oid::ObjectId::new());
        let now = chrono::Utc::now();
        new_user.created_at = Some(now);
        new_user.updated_at = Some(now);

        match self.collection.insert_one(new_user.clone(), None).await {
            Ok(_) => Ok(new_user),
            Err(e) => Err(RepositoryError::database(format!("Failed to insert user: {}", e))),
        }
    }

    async fn find_by_auth0_user_id(&self, auth0_user_id: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "auth0UserId": auth0_user_id };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by auth0 id: {}", e)))
    }

    async fn find_by_user_identifier(&self, user_identifier: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "userIdentifier": user_identifier };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by identifier: {}", e)))
    }
}
