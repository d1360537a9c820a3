use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use super::UserRepository;
use crate::models::UserDocument;
use crate::utils::error::AppError;

/// Stand-in used when no MongoDB client could be built at startup.
///
/// The server keeps serving; every storage call answers with a database
/// error carrying the startup failure.
pub struct Disconnected {
    reason: String,
}

impl Disconnected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn error(&self) -> AppError {
        AppError::DatabaseError(format!("MongoDB is not connected: {}", self.reason))
    }
}

#[async_trait]
impl UserRepository for Disconnected {
    async fn list_users(&self) -> Result<Vec<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn find_user(&self, _id: ObjectId) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn upsert_bio(&self, _id: ObjectId, _bio: Option<String>) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn delete_user(&self, _id: ObjectId) -> Result<bool, AppError> {
        Err(self.error())
    }

    async fn add_following(&self, _id: ObjectId, _target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn add_follower(&self, _id: ObjectId, _follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn remove_following(&self, _id: ObjectId, _target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn remove_follower(&self, _id: ObjectId, _follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(self.error())
    }
}
