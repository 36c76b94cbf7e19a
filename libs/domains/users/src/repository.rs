use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// The service constructs the `User` (identifier, password hash, timestamps)
/// before handing it over. All read paths exclude soft-deleted rows, and
/// implementations surface email uniqueness as `DuplicateEmail`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// List all users
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Soft-delete a user by ID; returns false when no live user matched
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Duplicate email among live users; exact comparison, matching the
        // unique column constraint in Postgres
        let email_exists = users
            .values()
            .any(|u| u.deleted_at.is_none() && u.email == user.email);

        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .get(&id)
            .filter(|u| u.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Email must stay unique among other live users; exact comparison,
        // matching the unique column constraint in Postgres
        let email_taken = users
            .values()
            .any(|u| u.id != user.id && u.deleted_at.is_none() && u.email == user.email);

        if email_taken {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let stored = users
            .get_mut(&user.id)
            .filter(|u| u.deleted_at.is_none())
            .ok_or(UserError::NotFound(user.id))?;

        *stored = User {
            updated_at: chrono::Utc::now(),
            ..user
        };

        tracing::info!(user_id = %stored.id, "Updated user");
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        match users.get_mut(&id).filter(|u| u.deleted_at.is_none()) {
            Some(user) => {
                user.deleted_at = Some(chrono::Utc::now());
                tracing::info!(user_id = %id, "Deleted user");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
