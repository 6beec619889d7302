//! Repository layer for database operations
//!
//! Read-only lookups run straight against the pool: each query acquires a
//! connection and hands it back when it completes. Mutating steps take the
//! connection of a transaction the caller opened with [`Repository::begin`],
//! so a whole operation commits or rolls back as one unit.

pub mod books;
pub mod borrowings;
pub mod members;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub borrowings: borrowings::BorrowingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            members: members::MembersRepository::new(pool.clone()),
            borrowings: borrowings::BorrowingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Acquire a pooled connection and open a transaction on it.
    ///
    /// Waits up to the pool's acquire timeout; past that the caller gets
    /// [`AppError::Unavailable`]. Dropping the transaction without commit
    /// rolls it back and returns the connection to the pool.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// One round trip on one pooled connection
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}

/// Roll `tx` back and fail with `err`
pub async fn abort<T>(tx: Transaction<'_, Postgres>, err: AppError) -> AppResult<T> {
    if let Err(e) = tx.rollback().await {
        // The connection is discarded by the pool in this case
        tracing::warn!(error = %e, "rollback failed");
    }
    Err(err)
}
