use async_graphql::{Error, ErrorExtensions};

use crate::error::AppError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GraphqlError {
    #[error("{message}")]
    Request { code: &'static str, message: String },
    #[error("Failed to get app state")]
    FailedToGetAppState,
}

impl From<AppError> for GraphqlError {
    fn from(err: AppError) -> Self {
        if let AppError::Store(db_err) = &err {
            log::error!("GraphQL store error: {:#?}", db_err);
        }
        Self::Request {
            code: err.code(),
            message: err.public_message(),
        }
    }
}

impl ErrorExtensions for GraphqlError {
    fn extend(&self) -> Error {
        Error::new(format!("{}", self)).extend_with(|_err, e| match self {
            GraphqlError::Request { code, message } => {
                e.set("code", *code);
                e.set("reason", message.clone());
            }
            GraphqlError::FailedToGetAppState => {
                e.set("code", "SERVER_ERROR");
                e.set("reason", "Failed to get app state".to_string());
            }
        })
    }
}

// Newtype wrapper to avoid blanket From implementation conflict for GraphqlError and async_graphql::Error
#[derive(Debug, Clone)]
pub struct GraphqlErrorWrapper(GraphqlError);

impl From<GraphqlError> for GraphqlErrorWrapper {
    fn from(err: GraphqlError) -> Self {
        Self(err)
    }
}

impl From<AppError> for GraphqlErrorWrapper {
    fn from(err: AppError) -> Self {
        GraphqlError::from(err).into()
    }
}

impl From<GraphqlErrorWrapper> for Error {
    fn from(wrapper: GraphqlErrorWrapper) -> Self {
        wrapper.0.extend()
    }
}

pub type GraphqlResult<T> = Result<T, GraphqlErrorWrapper>;
