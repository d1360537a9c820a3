use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Path or body identifier that is not a valid ObjectId
    InvalidId(String),
    NotFound,
    DatabaseError(String),
}

impl AppError {
    /// Body text used for the client-facing message
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidId(id) => format!("Id unknown: {}", id),
            AppError::NotFound => "User not found".to_string(),
            AppError::DatabaseError(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidId(id) => write!(f, "Invalid id: {}", id),
            AppError::NotFound => write!(f, "Not found"),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InvalidId(_) => HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body(self.message()),
            _ => HttpResponse::build(self.status_code())
                .json(serde_json::json!({ "message": self.message() })),
        }
    }
}
