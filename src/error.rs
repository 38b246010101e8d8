use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    models::{ActorId, MovieId},
    store::StoreError,
    views::Envelope,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("user with required id does not exist")]
    UserNotFound,

    #[error("user does not have permission for this operation")]
    PermissionDenied,

    #[error("invalid movie: {0}")]
    ValidationFailed(&'static str),

    #[error("movie {0} does not exist")]
    MovieNotFound(MovieId),

    #[error("actor {0} does not exist")]
    ActorNotFound(ActorId),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt(msg) => Self::Unknown(msg),
            err @ StoreError::Database(_) => Self::StoreUnavailable(err),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("authorization header with user id is missing")]
    Unauthorized,

    #[error("invalid input body or query params")]
    InvalidInput,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<JsonRejection> for AppError {
    fn from(_: JsonRejection) -> Self {
        Self::InvalidInput
    }
}

impl From<QueryRejection> for AppError {
    fn from(_: QueryRejection) -> Self {
        Self::InvalidInput
    }
}

impl From<jiff::Error> for AppError {
    fn from(_: jiff::Error) -> Self {
        Self::InvalidInput
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput => StatusCode::BAD_REQUEST,
            AppError::Catalog(err) => match err {
                CatalogError::UserNotFound | CatalogError::PermissionDenied => {
                    StatusCode::FORBIDDEN
                }
                CatalogError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
                CatalogError::MovieNotFound(_) | CatalogError::ActorNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                CatalogError::StoreUnavailable(_) | CatalogError::Unknown(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Catalog(CatalogError::StoreUnavailable(_)) => {
                "something wrong with database".to_string()
            }
            AppError::Catalog(CatalogError::Unknown(_)) => {
                "unknown error from the service".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::error(self.public_message());
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_classified() {
        let err: CatalogError = StoreError::Database(sea_orm::DbErr::Custom("boom".into())).into();
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));

        let err: CatalogError = StoreError::Corrupt("negative id".into()).into();
        assert!(matches!(err, CatalogError::Unknown(_)));
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::InvalidInput, StatusCode::BAD_REQUEST),
            (CatalogError::UserNotFound.into(), StatusCode::FORBIDDEN),
            (CatalogError::PermissionDenied.into(), StatusCode::FORBIDDEN),
            (CatalogError::ValidationFailed("title").into(), StatusCode::BAD_REQUEST),
            (CatalogError::MovieNotFound(3).into(), StatusCode::NOT_FOUND),
            (CatalogError::ActorNotFound(3).into(), StatusCode::NOT_FOUND),
            (CatalogError::Unknown("x".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn database_details_are_not_exposed() {
        let err: AppError = CatalogError::StoreUnavailable(StoreError::Database(
            sea_orm::DbErr::Custom("password=hunter2".into()),
        ))
        .into();
        assert_eq!(err.public_message(), "something wrong with database");
    }
}
