use std::fmt;

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// The kind of record an [`AppError::EntityNotFound`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Post,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Account => f.write_str("User"),
            EntityKind::Post => f.write_str("Post"),
        }
    }
}

/// Every failure an identity or social-graph operation can surface to a caller
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Email {0} already exists")]
    DuplicateEmail(String),

    #[error("Email {0} not found")]
    AccountNotFound(String),

    #[error("Wrong password")]
    InvalidCredentials,

    #[error("Your session expired. Sign in again.")]
    SessionExpiredOrInvalid,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Only author can delete this post")]
    ForbiddenNotAuthor,

    #[error("{kind} {id} not found")]
    EntityNotFound { kind: EntityKind, id: String },

    #[error("Internal server error")]
    Internal(color_eyre::Report),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<color_eyre::Report> for AppError {
    fn from(report: color_eyre::Report) -> Self {
        AppError::Internal(report)
    }
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        AppError::EntityNotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable code, exposed as `extensions.code` in GraphQL errors
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            AppError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::SessionExpiredOrInvalid => "SESSION_EXPIRED_OR_INVALID",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::ForbiddenNotAuthor => "FORBIDDEN_NOT_AUTHOR",
            AppError::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AppError::AccountNotFound(_) | AppError::EntityNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidCredentials
            | AppError::SessionExpiredOrInvalid
            | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenNotAuthor => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if let AppError::Internal(report) = self {
            tracing::error!(error = ?report, "Resolver Error");
        }

        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(report) => tracing::error!(error = ?report, "Request Error"),
            other => tracing::info!(code = other.code(), "Request rejected: {}", other),
        }

        let body = json!({
            "errors": [{
                "message": self.to_string(),
                "extensions": { "code": self.code() },
            }]
        });

        (self.status(), Json(body)).into_response()
    }
}

/// Converts a domain result into a GraphQL result that keeps the error code
pub(crate) trait WithCode<T> {
    fn with_code(self) -> async_graphql::Result<T>;
}

impl<T> WithCode<T> for Result<T, AppError> {
    fn with_code(self) -> async_graphql::Result<T> {
        match self {
            Ok(val) => Ok(val),
            Err(err) => Err(err.extend()),
        }
    }
}
