//! Users Domain
//!
//! This module provides a complete domain implementation for managing users,
//! including Argon2 password hashing and user-scoped task listings.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::PgTaskRepository;
//! use domain_users::{PgUserRepository, UserService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let repository = PgUserRepository::new(db.clone());
//! let tasks = PgTaskRepository::new(db);
//! let service = UserService::new(repository, tasks);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
