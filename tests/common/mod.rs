//! Shared helpers for database-backed tests

#![allow(dead_code)]

use library_lending::{
    models::{Book, BookParams, Member, MemberParams},
    repository::Repository,
    services::Services,
};
use sqlx::PgPool;

pub fn services(pool: PgPool) -> (Services, Repository) {
    let repository = Repository::new(pool);
    (Services::new(repository.clone()), repository)
}

pub async fn seed_book(services: &Services, title: &str) -> Book {
    services
        .catalog
        .create(BookParams::new(title))
        .await
        .expect("Failed to create book")
}

pub async fn seed_member(services: &Services, name: &str) -> Member {
    services
        .members
        .create(MemberParams::new(name))
        .await
        .expect("Failed to create member")
}
