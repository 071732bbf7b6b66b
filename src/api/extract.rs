//! Request extractors that reject with [`AppError`]
//!
//! Drop-in replacements for axum's `Path` and `Json`. A malformed path
//! segment or request body answers with the usual `{"error": msg}` body
//! instead of axum's plain-text rejection.

use super::handlers::AppError;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn rejection(status: StatusCode, message: String) -> AppError {
    tracing::debug!(%status, %message, "Request rejected");
    if status.is_server_error() {
        AppError::Internal(anyhow::anyhow!(message))
    } else {
        AppError::BadRequest(message)
    }
}

// ============================================================================
// Path
// ============================================================================

/// Path parameters, deserialized like `axum::extract::Path`
#[derive(Debug)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(err) => Err(rejection(err.status(), err.body_text())),
        }
    }
}

// ============================================================================
// Json
// ============================================================================

/// JSON request body or response, like `axum::Json`
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(err) => Err(rejection(err.status(), err.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
