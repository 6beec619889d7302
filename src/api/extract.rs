//! Request extractors whose rejections use the `AppError` body.
//!
//! A body or path that fails to deserialize (missing field, bad JSON,
//! non-numeric id) is reported as a validation error, like any other
//! malformed input.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
