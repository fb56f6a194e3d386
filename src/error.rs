use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::domain::{FieldError, ValidationErrors};

pub type RestResult<T> = Result<T, RestError>;

/// Errors surfaced by the REST API
#[derive(Debug, Error)]
pub enum RestError {
    #[error("Invalid request: {0}")]
    Validation(ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ValidationErrors> for RestError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<actix_web::error::JsonPayloadError> for RestError {
    fn from(e: actix_web::error::JsonPayloadError) -> Self {
        Self::BadRequest(format!("Malformed JSON body: {}", e))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<&'a FieldError>>,
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Validation(errors) => ErrorBody {
                message: "Invalid request".into(),
                errors: Some(errors.iter().collect()),
            },
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => ErrorBody {
                message: msg.clone(),
                errors: None,
            },
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorBody {
                    message: "Internal Server Error".into(),
                    errors: None,
                }
            }
            Self::Other(error) => {
                tracing::error!(error.cause_chain = ?error, "Unhandled error");
                ErrorBody {
                    message: "Internal Server Error".into(),
                    errors: None,
                }
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
