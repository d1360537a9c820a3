use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Documents in the "users" collection are kept as raw BSON, so fields this
/// service doesn't manage (or stores with an unexpected type) still round-trip.
pub type UserDocument = Document;

pub const PASSWORD: &str = "password";
pub const BIO: &str = "bio";
pub const FOLLOWING: &str = "following";
pub const FOLLOWERS: &str = "followers";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// What clients see of a user: the whole document minus the password
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// bio, following, followers, createdAt, updatedAt and any other stored field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<UserDocument> for UserResponse {
    fn from(mut document: UserDocument) -> Self {
        document.remove(PASSWORD);

        let id = match document.remove("_id") {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(Bson::String(id)) => id,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let fields = document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect();

        Self { id, fields }
    }
}

/// Relaxed extended JSON, except ObjectIds become hex strings and dates RFC 3339
fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(formatted) => Value::String(formatted),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(nested) => Value::Object(
            nested
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        other => other.into_relaxed_extjson(),
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct FollowRequest {
    #[serde(rename = "idToFollow", default)]
    pub id_to_follow: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UnfollowRequest {
    #[serde(rename = "idToUnfollow", default)]
    pub id_to_unfollow: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
