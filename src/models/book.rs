//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{non_blank, validate_not_blank};
use crate::error::AppResult;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalised book fields as written by the catalog service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookParams {
    pub isbn: Option<String>,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
}

impl BookParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    /// Title (required, not blank)
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    pub author: Option<String>,
    /// ISBN, unique across the catalog when present
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
}

impl BookRequest {
    /// Validate and normalise into the fields the catalog service accepts
    pub fn into_params(self) -> AppResult<BookParams> {
        self.validate()?;
        Ok(BookParams {
            isbn: non_blank(self.isbn),
            title: self.title.trim().to_string(),
            author: non_blank(self.author),
            publisher: non_blank(self.publisher),
            published_date: self.published_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn request(title: &str) -> BookRequest {
        BookRequest {
            title: title.to_string(),
            author: None,
            isbn: None,
            publisher: None,
            published_date: None,
        }
    }

    #[test]
    fn title_is_trimmed_and_empty_isbn_dropped() {
        let mut req = request("  The Hobbit ");
        req.isbn = Some(String::new());
        req.author = Some("J.R.R. Tolkien".into());

        let params = req.into_params().unwrap();
        assert_eq!(params.title, "The Hobbit");
        assert_eq!(params.isbn, None);
        assert_eq!(params.author.as_deref(), Some("J.R.R. Tolkien"));
    }

    #[test]
    fn blank_title_is_a_validation_error() {
        let err = request("   ").into_params().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("title")));
    }
}
