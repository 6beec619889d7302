//! Data models for the lending service

pub mod book;
pub mod borrowing;
pub mod member;
pub mod validation;

// Re-export commonly used types
pub use book::{Book, BookParams, BookRequest};
pub use borrowing::{BorrowParams, BorrowRequest, Borrowing, BorrowingStatus, ReturnRequest};
pub use member::{Member, MemberParams, MemberRequest};
