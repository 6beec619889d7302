//! Lending service: opening and closing borrowing records.
//!
//! The invariant this module exists for: at most one borrowing per book is
//! `BORROWED` at any instant, however many borrow requests for that book
//! race. Two guards hold it:
//!
//! 1. `borrow` locks the book row (`FOR UPDATE`) before looking for an
//!    active loan, so concurrent borrows of one book run one after the
//!    other. Under READ COMMITTED the waiter re-reads after the winner
//!    commits and sees its loan.
//! 2. The partial unique index `borrowings_one_active_per_book` rejects a
//!    second active row at the store level; that violation is reported as
//!    `AlreadyBorrowed` too.

use tracing::{info, warn};

use crate::{
    error::{unique_violation, AppError, AppResult, ACTIVE_BORROW_INDEX},
    models::borrowing::{BorrowParams, Borrowing},
    repository::{abort, Repository},
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Lend a book to a member
    pub async fn borrow(&self, params: BorrowParams) -> AppResult<Borrowing> {
        let BorrowParams {
            book_id, member_id, ..
        } = params;
        let mut tx = self.repository.begin().await?;

        if !self.repository.books.lock(&mut *tx, book_id).await? {
            return abort(tx, AppError::BookNotFound(book_id)).await;
        }

        if !self.repository.members.lock_shared(&mut *tx, member_id).await? {
            return abort(tx, AppError::MemberNotFound(member_id)).await;
        }

        if self.repository.borrowings.has_active_for_book(&mut *tx, book_id).await? {
            warn!(book_id, member_id, "borrow_rejected_already_borrowed");
            return abort(tx, AppError::AlreadyBorrowed(book_id)).await;
        }

        let borrowing = match self.repository.borrowings.insert(&mut *tx, &params).await {
            Ok(borrowing) => borrowing,
            Err(e) if unique_violation(&e).as_deref() == Some(ACTIVE_BORROW_INDEX) => {
                warn!(book_id, member_id, "borrow_rejected_by_active_loan_index");
                return abort(tx, AppError::AlreadyBorrowed(book_id)).await;
            }
            Err(e) => {
                tracing::error!(book_id, member_id, error = %e, "borrow_book_failed");
                return abort(tx, e.into()).await;
            }
        };

        tx.commit().await?;
        info!(borrowing_id = borrowing.id, book_id, member_id, "book_borrowed");
        Ok(borrowing)
    }

    /// Close a borrowing. A second return of the same record fails with
    /// `AlreadyReturned` and changes nothing.
    pub async fn return_book(&self, borrowing_id: i64) -> AppResult<Borrowing> {
        let mut tx = self.repository.begin().await?;

        let Some(current) = self.repository.borrowings.lock(&mut *tx, borrowing_id).await? else {
            let err = AppError::NotFound(format!("Borrowing with id {} not found", borrowing_id));
            return abort(tx, err).await;
        };

        if !current.status.is_active() {
            warn!(borrowing_id, "return_rejected_already_returned");
            return abort(tx, AppError::AlreadyReturned(borrowing_id)).await;
        }

        let Some(returned) = self
            .repository
            .borrowings
            .mark_returned(&mut *tx, borrowing_id)
            .await?
        else {
            return abort(tx, AppError::AlreadyReturned(borrowing_id)).await;
        };

        tx.commit().await?;
        info!(borrowing_id, book_id = returned.book_id, "book_returned");
        Ok(returned)
    }

    /// Get borrowing by ID
    pub async fn get(&self, borrowing_id: i64) -> AppResult<Borrowing> {
        self.repository
            .borrowings
            .get_by_id(borrowing_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrowing with id {} not found", borrowing_id)))
    }

    /// Books a member currently has out, oldest loan first. Unknown members
    /// simply have none.
    pub async fn list_active_by_member(&self, member_id: i64) -> AppResult<Vec<Borrowing>> {
        self.repository.borrowings.list_active_by_member(member_id).await
    }
}
