use hyper::StatusCode;
use thiserror::Error;

use crate::ytmusic::{ServiceError, UpstreamError};

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("{0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::MissingParams => ApiError::BadRequest(e.to_string()),
            ServiceError::Upstream(inner) => ApiError::Upstream(inner),
            ServiceError::Parse(_) => ApiError::BadGateway(e.to_string()),
        }
    }
}
