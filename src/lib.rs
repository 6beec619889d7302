//! Library lending service
//!
//! Keeps a catalog of books and a roster of members, and records which
//! member has borrowed which book. A book is never lent to two members at
//! once, however many borrow requests race for it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub repository: Repository,
}

impl AppState {
    pub fn new(repository: Repository) -> Self {
        Self {
            services: Arc::new(Services::new(repository.clone())),
            repository,
        }
    }
}
