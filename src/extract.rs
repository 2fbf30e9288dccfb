use axum::extract::{FromRequestParts, rejection::PathRejection};

use crate::AppError;

/// [`axum::extract::Path`] for page routes. An id segment that does not parse
/// names nothing, so it is a 404 like any other unknown id.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("unusable path: {rejection}");
        Self::NotFound("page")
    }
}
