use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// What went wrong, for logs and tests. Callers only ever see a static body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset download failed or returned a non-success status.
    Fetch,
    /// A store operation failed.
    Store,
    /// A query parameter failed type coercion.
    Validation,
}

#[derive(Error, Debug)]
pub enum Failure {
    #[error(transparent)]
    Import(#[from] salesboard_import::Error),

    #[error(transparent)]
    Store(#[from] salesboard_db::Error),

    #[error(transparent)]
    Validation(#[from] salesboard_core::Error),

    #[error(transparent)]
    Query(#[from] QueryRejection),
}

impl Failure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Failure::Import(e) if e.is_fetch() => ErrorKind::Fetch,
            Failure::Import(_) | Failure::Store(_) => ErrorKind::Store,
            Failure::Validation(_) | Failure::Query(_) => ErrorKind::Validation,
        }
    }
}

/// The fixed response body an endpoint answers with on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    ImportFailed,
    FetchFailed,
    Internal,
}

impl Reply {
    pub fn body(&self) -> Value {
        match self {
            Reply::ImportFailed => json!({ "message": "Error importing data" }),
            Reply::FetchFailed => json!({ "message": "Error fetching data" }),
            Reply::Internal => json!({ "error": "Internal Server Error" }),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    reply: Reply,
    failure: Failure,
}

impl ApiError {
    pub fn new(context: &'static str, reply: Reply, failure: impl Into<Failure>) -> Self {
        Self {
            context,
            reply,
            failure: failure.into(),
        }
    }

    pub fn import(failure: impl Into<Failure>) -> Self {
        Self::new("importing data", Reply::ImportFailed, failure)
    }

    pub fn internal(context: &'static str, failure: impl Into<Failure>) -> Self {
        Self::new(context, Reply::Internal, failure)
    }

    pub fn kind(&self) -> ErrorKind {
        self.failure.kind()
    }

    pub fn reply(&self) -> Reply {
        self.reply
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            kind = ?self.kind(),
            "Error {}: {}",
            self.context,
            self.failure
        );

        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.reply.body())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
