//! Borrowings repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::borrowing::{BorrowParams, Borrowing, BorrowingStatus},
};

#[derive(Clone)]
pub struct BorrowingsRepository {
    pool: Pool<Postgres>,
}

impl BorrowingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrowing by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Borrowing>> {
        let borrowing = sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(borrowing)
    }

    /// Active borrowings of a member, oldest first
    pub async fn list_active_by_member(&self, member_id: i64) -> AppResult<Vec<Borrowing>> {
        let borrowings = sqlx::query_as::<_, Borrowing>(
            r#"
            SELECT * FROM borrowings
            WHERE member_id = $1 AND status = $2
            ORDER BY borrowed_at, id
            "#,
        )
        .bind(member_id)
        .bind(BorrowingStatus::Borrowed)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrowings)
    }

    /// Count borrowings currently out for a book
    pub async fn count_active_for_book(&self, book_id: i64) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrowings WHERE book_id = $1 AND status = $2")
                .bind(book_id)
                .bind(BorrowingStatus::Borrowed)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn has_active_for_book(&self, conn: &mut PgConnection, book_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrowings WHERE book_id = $1 AND status = $2)",
        )
        .bind(book_id)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    pub async fn has_active_for_member(
        &self,
        conn: &mut PgConnection,
        member_id: i64,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrowings WHERE member_id = $1 AND status = $2)",
        )
        .bind(member_id)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// Record a new active loan stamped with the store's clock. A second
    /// active loan for the same book fails on `borrowings_one_active_per_book`.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        params: &BorrowParams,
    ) -> Result<Borrowing, sqlx::Error> {
        sqlx::query_as::<_, Borrowing>(
            r#"
            INSERT INTO borrowings (book_id, member_id, borrowed_at, due_at, status)
            VALUES ($1, $2, NOW(), $3, $4)
            RETURNING *
            "#,
        )
        .bind(params.book_id)
        .bind(params.member_id)
        .bind(params.due_at)
        .bind(BorrowingStatus::Borrowed)
        .fetch_one(&mut *conn)
        .await
    }

    /// Read a borrowing and lock its row until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i64) -> AppResult<Option<Borrowing>> {
        let borrowing =
            sqlx::query_as::<_, Borrowing>("SELECT * FROM borrowings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(borrowing)
    }

    /// BORROWED -> RETURNED. Only matches a row that is still active, so it
    /// never changes state twice.
    pub async fn mark_returned(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> AppResult<Option<Borrowing>> {
        let borrowing = sqlx::query_as::<_, Borrowing>(
            r#"
            UPDATE borrowings
            SET status = $2, returned_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(BorrowingStatus::Returned)
        .bind(BorrowingStatus::Borrowed)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(borrowing)
    }
}
