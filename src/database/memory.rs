//! In-memory `UserRepository` for handler tests.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::users::insert_defaults;
use super::UserRepository;
use crate::models::{UserDocument, BIO, FOLLOWERS, FOLLOWING, PASSWORD, UPDATED_AT};
use crate::utils::error::AppError;

pub struct InMemoryUsers {
    users: RwLock<HashMap<ObjectId, UserDocument>>,
    calls: AtomicUsize,
    fail_from_call: AtomicUsize,
}

impl Default for InMemoryUsers {
    fn default() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            fail_from_call: AtomicUsize::new(usize::MAX),
        }
    }
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `fields` as the document for `id`
    pub async fn insert(&self, id: ObjectId, mut fields: UserDocument) {
        fields.insert("_id", id);
        self.users.write().await.insert(id, fields);
    }

    /// Raw stored document, password included
    pub async fn get(&self, id: ObjectId) -> Option<UserDocument> {
        self.users.read().await.get(&id).cloned()
    }

    /// Number of repository operations performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every operation after the first `successful` ones fail
    pub fn fail_after(&self, successful: usize) {
        self.fail_from_call.store(successful, Ordering::SeqCst);
    }

    fn begin(&self) -> Result<(), AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_from_call.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("connection pool cleared".to_string()));
        }
        Ok(())
    }

    /// Upserts like `find_one_and_update`: a missing user starts from the
    /// insert defaults, minus the `touched` field.
    async fn modify<F>(&self, id: ObjectId, touched: &[&str], apply: F) -> Result<Option<UserDocument>, AppError>
    where
        F: FnOnce(&mut UserDocument) + Send,
    {
        self.begin()?;

        let now = DateTime::now();
        let mut users = self.users.write().await;
        let user = users.entry(id).or_insert_with(|| {
            let mut user = doc! { "_id": id };
            user.extend(insert_defaults(touched, now));
            user
        });

        apply(user);
        user.insert(UPDATED_AT, now);

        Ok(Some(redacted(user)))
    }
}

fn redacted(user: &UserDocument) -> UserDocument {
    let mut user = user.clone();
    user.remove(PASSWORD);
    user
}

fn add_to_set(user: &mut UserDocument, field: &str, value: String) {
    if user.get_array(field).is_err() {
        user.insert(field, Bson::Array(Vec::new()));
    }
    if let Ok(items) = user.get_array_mut(field) {
        let value = Bson::String(value);
        if !items.contains(&value) {
            items.push(value);
        }
    }
}

fn pull(user: &mut UserDocument, field: &str, value: String) {
    if let Ok(items) = user.get_array_mut(field) {
        let value = Bson::String(value);
        items.retain(|item| *item != value);
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn list_users(&self) -> Result<Vec<UserDocument>, AppError> {
        self.begin()?;
        Ok(self.users.read().await.values().map(redacted).collect())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.begin()?;
        Ok(self.users.read().await.get(&id).map(redacted))
    }

    async fn upsert_bio(&self, id: ObjectId, bio: Option<String>) -> Result<Option<UserDocument>, AppError> {
        self.modify(id, &[], |user| {
            if let Some(bio) = bio {
                user.insert(BIO, bio);
            }
        })
        .await
    }

    async fn delete_user(&self, id: ObjectId) -> Result<bool, AppError> {
        self.begin()?;
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn add_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.modify(id, &[FOLLOWING], |user| add_to_set(user, FOLLOWING, target.to_hex()))
            .await
    }

    async fn add_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.modify(id, &[FOLLOWERS], |user| add_to_set(user, FOLLOWERS, follower.to_hex()))
            .await
    }

    async fn remove_following(&self, id: ObjectId, target: ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.modify(id, &[FOLLOWING], |user| pull(user, FOLLOWING, target.to_hex()))
            .await
    }

    async fn remove_follower(&self, id: ObjectId, follower: ObjectId) -> Result<Option<UserDocument>, AppError> {
        self.modify(id, &[FOLLOWERS], |user| pull(user, FOLLOWERS, follower.to_hex()))
            .await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.begin()
    }
}
