use axum::http::StatusCode;
use contracts::domain::a004_tool::ToolLifecycleError;
use contracts::shared::hierarchy::HierarchyError;

/// Failure of a domain service, classified for the HTTP edge
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Access denied")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Lifecycle(#[from] ToolLifecycleError),
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Conflict(_)
            | ServiceError::Lifecycle(_)
            | ServiceError::Hierarchy(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Internal(e.into())
    }
}

impl From<ServiceError> for StatusCode {
    fn from(e: ServiceError) -> Self {
        let status = e.status_code();
        if status.is_server_error() {
            tracing::error!("{:#}", e);
        } else {
            tracing::warn!("{}", e);
        }
        status
    }
}
