//! Request extractors whose rejections are reported through [`AppError`],
//! so malformed input gets the same envelope as every other failure.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::PathRejection, FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body that may be missing.
///
/// An empty body or a literal `null` yields `None`; anything that is not
/// valid JSON for `T` is rejected as [`AppError::MalformedRequest`].
#[derive(Debug)]
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::MalformedRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let value = serde_json::from_slice::<Option<T>>(&bytes)
            .map_err(|e| AppError::MalformedRequest(e.to_string()))?;

        Ok(Self(value))
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}
