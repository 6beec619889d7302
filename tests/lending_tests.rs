//! Service-level tests against a real Postgres database.
//!
//! Each test gets a fresh database from `sqlx::test`, migrated with the
//! embedded migrations. Run with: DATABASE_URL=... cargo test -- --ignored

mod common;

use futures::future::join_all;
use library_lending::{
    models::{BookParams, BorrowParams, BorrowingStatus, MemberParams},
    AppError,
};
use sqlx::PgPool;

use common::{seed_book, seed_member, services};

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore] // requires DATABASE_URL
async fn test_borrow_and_return_round_trip(pool: PgPool) {
    let (services, _) = services(pool);
    let book = services
        .catalog
        .create(BookParams::new("The Hobbit").author("J.R.R. Tolkien"))
        .await
        .unwrap();
    let member = seed_member(&services, "Bilbo").await;

    let stored = services.catalog.get(book.id).await.unwrap();
    assert_eq!(stored.title, "The Hobbit");
    assert_eq!(stored.author.as_deref(), Some("J.R.R. Tolkien"));
    assert_eq!(services.catalog.list().await.unwrap(), vec![stored]);

    let borrowing = services
        .lending
        .borrow(BorrowParams::new(book.id, member.id))
        .await
        .unwrap();
    assert_eq!(borrowing.status, BorrowingStatus::Borrowed);
    assert!(borrowing.returned_at.is_none());
    assert!(borrowing.due_at.is_none());

    let active = services.lending.list_active_by_member(member.id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].book_id, book.id);

    let returned = services.lending.return_book(borrowing.id).await.unwrap();
    assert_eq!(returned.status, BorrowingStatus::Returned);
    assert!(returned.returned_at.is_some());
    assert_eq!(returned.borrowed_at, borrowing.borrowed_at);

    let active = services.lending.list_active_by_member(member.id).await.unwrap();
    assert!(active.is_empty());

    // A fresh borrow after the return opens a new record
    let again = services
        .lending
        .borrow(BorrowParams::new(book.id, member.id))
        .await
        .unwrap();
    assert_ne!(again.id, borrowing.id);
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_borrow_keeps_due_date(pool: PgPool) {
    let (services, _) = services(pool);
    let book = seed_book(&services, "Dune").await;
    let member = seed_member(&services, "Paul").await;
    let due = chrono::Utc::now() + chrono::Duration::days(14);

    let borrowing = services
        .lending
        .borrow(BorrowParams::new(book.id, member.id).due_at(due))
        .await
        .unwrap();

    let stored = services.lending.get(borrowing.id).await.unwrap();
    let stored_due = stored.due_at.unwrap();
    assert!((stored_due - due).num_milliseconds().abs() < 1);
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_second_borrow_of_same_book_is_rejected(pool: PgPool) {
    let (services, _) = services(pool);
    let book = seed_book(&services, "Emma").await;
    let first = seed_member(&services, "Anne").await;
    let second = seed_member(&services, "Harriet").await;

    services
        .lending
        .borrow(BorrowParams::new(book.id, first.id))
        .await
        .unwrap();

    let err = services
        .lending
        .borrow(BorrowParams::new(book.id, second.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyBorrowed(id) if id == book.id));
    assert!(services
        .lending
        .list_active_by_member(second.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_concurrent_borrows_lend_the_book_once(pool: PgPool) {
    let (services, repository) = services(pool);
    let book = seed_book(&services, "Contended").await;

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(seed_member(&services, &format!("Member {}", i)).await);
    }

    let attempts = members.iter().map(|member| {
        let lending = services.lending.clone();
        let params = BorrowParams::new(book.id, member.id);
        tokio::spawn(async move { lending.borrow(params).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(result, Err(AppError::AlreadyBorrowed(_))));
    }

    let active = repository
        .borrowings
        .count_active_for_book(book.id)
        .await
        .unwrap();
    assert_eq!(active, 1);
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_return_is_not_repeatable(pool: PgPool) {
    let (services, _) = services(pool);
    let book = seed_book(&services, "Persuasion").await;
    let member = seed_member(&services, "Anne").await;
    let borrowing = services
        .lending
        .borrow(BorrowParams::new(book.id, member.id))
        .await
        .unwrap();

    let returned = services.lending.return_book(borrowing.id).await.unwrap();
    let err = services.lending.return_book(borrowing.id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(id) if id == borrowing.id));

    // The failed second return left the record untouched
    let stored = services.lending.get(borrowing.id).await.unwrap();
    assert_eq!(stored.returned_at, returned.returned_at);
    assert_eq!(stored.status, BorrowingStatus::Returned);
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_missing_records_are_reported(pool: PgPool) {
    let (services, repository) = services(pool);
    let book = seed_book(&services, "Present").await;
    let member = seed_member(&services, "Present").await;

    let err = services
        .lending
        .borrow(BorrowParams::new(9_999, member.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BookNotFound(9_999)));
    assert_eq!(repository.borrowings.count_active_for_book(9_999).await.unwrap(), 0);

    let err = services
        .lending
        .borrow(BorrowParams::new(book.id, 9_999))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MemberNotFound(9_999)));

    let err = services.lending.return_book(9_999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = services.catalog.get(9_999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = services
        .catalog
        .update(9_999, BookParams::new("Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(!services.catalog.delete(9_999).await.unwrap());
    assert!(!services.members.delete(9_999).await.unwrap());

    // Unknown members simply have no loans
    assert!(services
        .lending
        .list_active_by_member(9_999)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_delete_blocked_by_active_borrowing(pool: PgPool) {
    let (services, repository) = services(pool);
    let book = seed_book(&services, "Middlemarch").await;
    let member = seed_member(&services, "Dorothea").await;
    let borrowing = services
        .lending
        .borrow(BorrowParams::new(book.id, member.id))
        .await
        .unwrap();

    let err = services.catalog.delete(book.id).await.unwrap_err();
    assert!(matches!(err, AppError::CannotDeleteBorrowed(id) if id == book.id));
    let err = services.members.delete(member.id).await.unwrap_err();
    assert!(matches!(err, AppError::CannotDeleteMemberWithBorrowings(id) if id == member.id));

    // The blocked deletes left every row as it was
    assert_eq!(services.catalog.get(book.id).await.unwrap(), book);
    assert_eq!(services.members.get(member.id).await.unwrap(), member);
    assert_eq!(services.lending.get(borrowing.id).await.unwrap(), borrowing);
    assert_eq!(
        repository.borrowings.count_active_for_book(book.id).await.unwrap(),
        1
    );

    services.lending.return_book(borrowing.id).await.unwrap();

    let before = repository.books.count().await.unwrap();
    assert!(services.catalog.delete(book.id).await.unwrap());
    assert_eq!(repository.books.count().await.unwrap(), before - 1);
    assert!(services.members.delete(member.id).await.unwrap());

    // Returned history goes with the book
    assert!(services.lending.get(borrowing.id).await.is_err());
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_isbn_must_be_unique(pool: PgPool) {
    let (services, _) = services(pool);
    services
        .catalog
        .create(BookParams::new("First").isbn("978-0261102217"))
        .await
        .unwrap();
    let other = services
        .catalog
        .create(BookParams::new("Second").isbn("978-0000000000"))
        .await
        .unwrap();

    let err = services
        .catalog
        .create(BookParams::new("Copy").isbn("978-0261102217"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));

    let err = services
        .catalog
        .update(other.id, BookParams::new("Second").isbn("978-0261102217"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));

    // Books without an ISBN never collide
    seed_book(&services, "No isbn").await;
    seed_book(&services, "No isbn either").await;

    let titles: Vec<String> = services
        .catalog
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second", "No isbn", "No isbn either"]);
}

#[sqlx::test(migrator = "library_lending::MIGRATOR")]
#[ignore]
async fn test_member_identity_must_be_unique(pool: PgPool) {
    let (services, _) = services(pool);
    let alice = services
        .members
        .create(
            MemberParams::new("Alice")
                .email("alice@example.com")
                .phone("5551234567"),
        )
        .await
        .unwrap();

    let err = services
        .members
        .create(MemberParams::new("Other Alice").email("alice@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(ref msg) if msg.contains("email")));

    let err = services
        .members
        .create(MemberParams::new("Phone twin").phone("5551234567"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(ref msg) if msg.contains("phone")));

    let updated = services
        .members
        .update(alice.id, MemberParams::new("Alice Liddell").email("alice@example.com"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice Liddell");
    assert!(updated.phone.is_none());
    assert!(updated.updated_at >= alice.updated_at);
}
