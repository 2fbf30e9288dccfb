use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("You are not allowed here!")]
    PermissionDenied,
    #[error("login required")]
    Unauthenticated { return_url: String },
    #[error(transparent)]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::PermissionDenied => "FORBIDDEN",
            Self::Unauthenticated { .. } => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Unauthenticated { .. } => StatusCode::SEE_OTHER,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated { return_url } => {
                let query = serde_urlencoded::to_string([("return_url", return_url.as_str())])
                    .unwrap_or_default();
                Redirect::to(&format!("/login?{query}")).into_response()
            }
            Self::Internal(err) => {
                error!("{err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}\n\n{}", err, err.backtrace()),
                )
                    .into_response()
            }
            err => (err.status_code(), err.to_string()).into_response(),
        }
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("record"),
            err => Self::Internal(anyhow::Error::from(err)),
        }
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(anyhow::Error);
apperr_impl!(sqlx::migrate::MigrateError);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(tokio::task::JoinError);
