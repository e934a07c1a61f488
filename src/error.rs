use axum::http::StatusCode;
use sea_orm::{DbErr, TransactionError};

/// Failures a request can end in. Every variant maps to one status and one stable code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed request: {0}")]
    Malformed(String),
    #[error("{0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{0}")]
    Referential(String),
    #[error("Database error: {0}")]
    Store(#[from] DbErr),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Malformed(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Referential(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Malformed(_) => "MALFORMED",
            AppError::Validation(_) => "VALIDATION",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Referential(_) => "REFERENTIAL",
            AppError::Store(_) => "SERVER_ERROR",
        }
    }

    /// Message safe to hand to a client. Store failures never leak driver text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Store(_) => "Internal Server Error.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TransactionError<AppError>> for AppError {
    fn from(err: TransactionError<AppError>) -> Self {
        match err {
            TransactionError::Connection(db_err) => AppError::Store(db_err),
            TransactionError::Transaction(app_err) => app_err,
        }
    }
}
