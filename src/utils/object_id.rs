use mongodb::bson::oid::ObjectId;

use super::error::AppError;

/// Parses a client-supplied identifier, which must be 24 hex characters
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}
