//! Catalog management service

use tracing::{info, warn};

use crate::{
    error::{unique_violation, AppError, AppResult},
    models::book::{Book, BookParams},
    repository::{abort, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All books ordered by id
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Create a book; an ISBN already in the catalog yields `AlreadyExists`
    pub async fn create(&self, book: BookParams) -> AppResult<Book> {
        let mut tx = self.repository.begin().await?;

        match self.repository.books.insert(&mut *tx, &book).await {
            Ok(created) => {
                tx.commit().await?;
                info!(book_id = created.id, "book_created");
                Ok(created)
            }
            Err(e) => {
                let err = isbn_conflict(e, &book);
                abort(tx, err).await
            }
        }
    }

    /// Replace all fields of a book
    pub async fn update(&self, id: i64, book: BookParams) -> AppResult<Book> {
        let mut tx = self.repository.begin().await?;

        match self.repository.books.update(&mut *tx, id, &book).await {
            Ok(Some(updated)) => {
                tx.commit().await?;
                info!(book_id = updated.id, "book_updated");
                Ok(updated)
            }
            Ok(None) => {
                let err = AppError::NotFound(format!("Book with id {} not found", id));
                abort(tx, err).await
            }
            Err(e) => {
                let err = isbn_conflict(e, &book);
                abort(tx, err).await
            }
        }
    }

    /// Delete a book unless it is currently lent out.
    ///
    /// Returns `Ok(false)` when no such book exists.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tx = self.repository.begin().await?;

        // Holding the row lock keeps a concurrent borrow of this book from
        // slipping in between the check and the delete.
        if !self.repository.books.lock(&mut *tx, id).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        if self.repository.borrowings.has_active_for_book(&mut *tx, id).await? {
            warn!(book_id = id, "delete_book_blocked_by_active_borrowing");
            return abort(tx, AppError::CannotDeleteBorrowed(id)).await;
        }

        let deleted = self.repository.books.delete(&mut *tx, id).await?;
        tx.commit().await?;
        info!(book_id = id, "book_deleted");
        Ok(deleted)
    }
}

fn isbn_conflict(err: sqlx::Error, book: &BookParams) -> AppError {
    match unique_violation(&err) {
        Some(_) => {
            warn!(isbn = ?book.isbn, "book_duplicate_isbn");
            AppError::AlreadyExists(format!(
                "A book with ISBN {} already exists",
                book.isbn.as_deref().unwrap_or_default()
            ))
        }
        None => {
            tracing::error!(error = %err, "book_write_failed");
            err.into()
        }
    }
}
