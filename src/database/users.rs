use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOneOptions, FindOptions, ReturnDocument};
use mongodb::Collection;

use super::MongoDB;
use crate::models::{UserDocument, BIO, CREATED_AT, FOLLOWERS, FOLLOWING, PASSWORD, UPDATED_AT};
use crate::utils::error::AppError;

pub const USERS_COLLECTION: &str = "users";

/// Storage operations behind the user handlers.
///
/// Every method that returns a user excludes the password. All updates are
/// upserts, so a missing user is created with the schema defaults. The two
/// sides of a follow relationship are separate calls; nothing here makes
/// them atomic.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserDocument>, AppError>;

    async fn find_user(&self, id: ObjectId) -> Result<Option<UserDocument>, AppError>;

    /// Sets `bio` on the user. `None` leaves the bio untouched.
    async fn upsert_bio(&self, id: ObjectId, bio: Option<String>) -> Result<Option<UserDocument>, AppError>;

    /// Returns whether a document was removed
    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError>;

    /// Adds `target` to `id`'s following set
    async fn add_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError>;

    /// Adds `follower` to `id`'s followers set
    async fn add_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError>;

    /// Removes `target` from `id`'s following set
    async fn remove_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError>;

    /// Removes `follower` from `id`'s followers set
    async fn remove_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

fn without_password() -> Document {
    doc! { PASSWORD: 0 }
}

fn upsert_options() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .upsert(true)
        .projection(without_password())
        .build()
}

/// `$setOnInsert` defaults, minus the fields the same update already touches
pub(crate) fn insert_defaults(touched: &[&str], now: DateTime) -> Document {
    let mut defaults = doc! {
        FOLLOWING: [],
        FOLLOWERS: [],
        CREATED_AT: now,
    };
    for field in touched {
        defaults.remove(*field);
    }
    defaults
}

impl MongoDB {
    pub fn users(&self) -> Collection<UserDocument> {
        self.collection::<UserDocument>(USERS_COLLECTION)
    }

    async fn upsert_user(&self, id: ObjectId, update: Document) -> Result<Option<UserDocument>, AppError> {
        let user = self
            .users()
            .find_one_and_update(doc! { "_id": id }, update)
            .with_options(upsert_options())
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn list_users(&self) -> Result<Vec<UserDocument>, AppError> {
        let options = FindOptions::builder().projection(without_password()).build();

        let cursor = self.users().find(doc! {}).with_options(options).await?;
        let users: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(users)
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<UserDocument>, AppError> {
        let user = self
            .users()
            .find_one(doc! { "_id": id })
            .with_options(FindOneOptions::builder().projection(without_password()).build())
            .await?;
        Ok(user)
    }

    async fn upsert_bio(&self, id: ObjectId, bio: Option<String>) -> Result<Option<UserDocument>, AppError> {
        let now = DateTime::now();

        let mut set = doc! { UPDATED_AT: now };
        if let Some(bio) = bio {
            set.insert(BIO, bio);
        }

        let update = doc! {
            "$set": set,
            "$setOnInsert": insert_defaults(&[], now),
        };

        self.upsert_user(id, update).await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError> {
        let result = self.users().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn add_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        let now = DateTime::now();
        let update = doc! {
            "$addToSet": { FOLLOWING: target.to_hex() },
            "$set": { UPDATED_AT: now },
            "$setOnInsert": insert_defaults(&[FOLLOWING], now),
        };

        self.upsert_user(id, update).await
    }

    async fn add_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        let now = DateTime::now();
        let update = doc! {
            "$addToSet": { FOLLOWERS: follower.to_hex() },
            "$set": { UPDATED_AT: now },
            "$setOnInsert": insert_defaults(&[FOLLOWERS], now),
        };

        self.upsert_user(id, update).await
    }

    async fn remove_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        let now = DateTime::now();
        let update = doc! {
            "$pull": { FOLLOWING: target.to_hex() },
            "$set": { UPDATED_AT: now },
            "$setOnInsert": insert_defaults(&[FOLLOWING], now),
        };

        self.upsert_user(id, update).await
    }

    async fn remove_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        let now = DateTime::now();
        let update = doc! {
            "$pull": { FOLLOWERS: follower.to_hex() },
            "$set": { UPDATED_AT: now },
            "$setOnInsert": insert_defaults(&[FOLLOWERS], now),
        };

        self.upsert_user(id, update).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        MongoDB::ping(self).await.map_err(AppError::from)
    }
}
