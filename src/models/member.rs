//! Member model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{non_blank, normalize_phone, validate_not_blank, validate_phone};
use crate::error::AppResult;

/// Member model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    /// Digits only
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalised member fields as written by the membership service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberParams {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl MemberParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Create or update member request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MemberRequest {
    /// Name (required, not blank)
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    /// Email address, unique when present
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Phone number; punctuation is stripped, at least 7 digits required
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl MemberRequest {
    /// Validate and normalise into the fields the membership service accepts
    pub fn into_params(self) -> AppResult<MemberParams> {
        let request = MemberRequest {
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
            ..self
        };
        request.validate()?;

        Ok(MemberParams {
            name: request.name.trim().to_string(),
            email: request.email,
            phone: request.phone.as_deref().map(normalize_phone),
            address: request.address,
        })
    }
}
