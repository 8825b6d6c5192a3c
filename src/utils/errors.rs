use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::{bson, error::Error as MongoError};
use serde::Serialize;
use thiserror::Error;
use bson::ser::Error as BsonError;
use bson::de::Error as BsonDeError;

/// Field name -> messages. Problems with the payload as a whole are filed
/// under [`ValidationErrors::NON_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub const NON_FIELD: &'static str = "non_field_errors";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, messages.join(" "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Database unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error(transparent)]
    MongoError(#[from] MongoError),

    #[error("Serialization error")]
    SerializationError(#[from] BsonError),

    #[error("Deserialization error")]
    DeserializationError(#[from] BsonDeError)
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ConnectionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServerError(_)
            | ApiError::MongoError(_)
            | ApiError::SerializationError(_)
            | ApiError::DeserializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = status.as_u16();

        let body = match self {
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::ConnectionUnavailable(message)
            | ApiError::InternalServerError(message) => serde_json::json!({
                "error": message,
                "code": code
            }),
            ApiError::Validation(errors) => serde_json::json!({
                "error": "Validation failed",
                "code": code,
                "details": errors
            }),
            ApiError::MongoError(message) => serde_json::json!({
                "error": format!("Database error: {}", message),
                "code": code,
                "details": message.source().map(|src| src.to_string())
            }),
            ApiError::SerializationError(message) => serde_json::json!({
                "error": "Invalid data format",
                "code": code,
                "details": message.to_string()
            }),
            ApiError::DeserializationError(message) => serde_json::json!({
                "error": "Invalid data format",
                "code": code,
                "details": message.to_string()
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

// ----------------------------- TESTS --------------------------------
