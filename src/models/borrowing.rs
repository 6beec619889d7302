//! Borrowing (loan record) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppResult;

/// Borrowing lifecycle. `Borrowed` is the only initial state and
/// `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BorrowingStatus {
    Borrowed,
    Returned,
}

impl BorrowingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowingStatus::Borrowed => "BORROWED",
            BorrowingStatus::Returned => "RETURNED",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, BorrowingStatus::Borrowed)
    }
}

impl std::fmt::Display for BorrowingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BORROWED" => Ok(BorrowingStatus::Borrowed),
            "RETURNED" => Ok(BorrowingStatus::Returned),
            _ => Err(format!("Invalid borrowing status: {}", s)),
        }
    }
}

// Stored as TEXT
impl sqlx::Type<Postgres> for BorrowingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BorrowingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BorrowingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Borrowing model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrowing {
    pub id: i64,
    pub book_id: i64,
    pub member_id: i64,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    /// Set if and only if the status is `RETURNED`
    pub returned_at: Option<DateTime<Utc>>,
    pub status: BorrowingStatus,
}

/// Borrow a book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BorrowRequest {
    #[validate(range(min = 1, message = "book_id must be a positive id"))]
    pub book_id: i64,
    #[validate(range(min = 1, message = "member_id must be a positive id"))]
    pub member_id: i64,
    /// Optional due date
    pub due_at: Option<DateTime<Utc>>,
}

impl BorrowRequest {
    pub fn into_params(self) -> AppResult<BorrowParams> {
        self.validate()?;
        Ok(BorrowParams {
            book_id: self.book_id,
            member_id: self.member_id,
            due_at: self.due_at,
        })
    }
}

/// Return a book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReturnRequest {
    #[validate(range(min = 1, message = "borrowing_id must be a positive id"))]
    pub borrowing_id: i64,
}

/// Parameters of a borrow operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorrowParams {
    pub book_id: i64,
    pub member_id: i64,
    pub due_at: Option<DateTime<Utc>>,
}

impl BorrowParams {
    pub fn new(book_id: i64, member_id: i64) -> Self {
        Self {
            book_id,
            member_id,
            due_at: None,
        }
    }

    pub fn due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_its_text_form() {
        for status in [BorrowingStatus::Borrowed, BorrowingStatus::Returned] {
            assert_eq!(status.as_str().parse::<BorrowingStatus>(), Ok(status));
        }
        assert!("LOST".parse::<BorrowingStatus>().is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&BorrowingStatus::Returned).unwrap();
        assert_eq!(json, "\"RETURNED\"");
        assert!(BorrowingStatus::Borrowed.is_active());
        assert!(!BorrowingStatus::Returned.is_active());
    }

    #[test]
    fn borrow_request_rejects_non_positive_ids() {
        let req = BorrowRequest {
            book_id: 0,
            member_id: 3,
            due_at: None,
        };
        assert!(req.into_params().is_err());

        let req = BorrowRequest {
            book_id: 2,
            member_id: 3,
            due_at: None,
        };
        assert_eq!(req.into_params().unwrap(), BorrowParams::new(2, 3));
    }
}
