//! Extractors whose rejections render through [`ApiError`], so malformed
//! bodies and query strings get the same `{"error": …}` shape as every
//! other failure.

use axum::extract::{FromRequest, FromRequestParts};
use uuid::Uuid;

use crate::error::ApiError;

/// [`axum::Json`], rejecting with a 400 `{"error": …}` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Query`], rejecting with a 400 `{"error": …}` body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Parse a contact id from the path. A string that is not a UUID can never
/// name a stored contact, so it is reported as not found.
pub(crate) fn contact_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::contact_not_found())
}
