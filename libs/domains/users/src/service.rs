use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use domain_tasks::{Task, TaskError, TaskRepository};

use crate::error::{is_missing_relation, UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
///
/// Holds the task repository alongside the user repository so user-scoped
/// task listings stay behind the user existence check.
#[derive(Clone)]
pub struct UserService<R: UserRepository, T: TaskRepository> {
    repository: Arc<R>,
    tasks: Arc<T>,
}

impl<R: UserRepository, T: TaskRepository> UserService<R, T> {
    pub fn new(repository: R, tasks: T) -> Self {
        Self {
            repository: Arc::new(repository),
            tasks: Arc::new(tasks),
        }
    }

    /// Create a new user with password hashing
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    /// List all users
    ///
    /// A storage error caused by the users table not existing yet is
    /// answered with an empty list.
    pub async fn get_users(&self) -> UserResult<Vec<UserResponse>> {
        match self.repository.list().await {
            Ok(users) => Ok(users.into_iter().map(Into::into).collect()),
            Err(UserError::Database(msg)) if is_missing_relation(&msg) => {
                tracing::warn!("users relation missing, returning empty list");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Partially update a user
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        if input.is_empty() {
            return Err(UserError::NoFieldsToUpdate);
        }

        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        // Hash the new password before it touches the model
        let new_password_hash = match input.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Soft-delete a user
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// List the tasks owned by a user
    ///
    /// Fails with NotFound when the user does not exist (or is deleted).
    /// A missing tasks table is answered with an empty list.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_tasks_for_user(&self, id: Uuid) -> UserResult<Vec<Task>> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        match self.tasks.list_by_user(id).await {
            Ok(tasks) => Ok(tasks),
            Err(TaskError::Database(msg)) if is_missing_relation(&msg) => {
                tracing::warn!("tasks relation missing, returning empty list");
                Ok(Vec::new())
            }
            // Listing by owner is a storage read; any task-domain error
            // here is a storage failure, never a user-facing 404
            Err(e) => Err(UserError::Database(e.to_string())),
        }
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use argon2::{password_hash::PasswordHash, PasswordVerifier};
    use domain_tasks::{CreateTask, InMemoryTaskRepository};

    fn service_with_memory_repos(
    ) -> UserService<InMemoryUserRepository, InMemoryTaskRepository> {
        UserService::new(InMemoryUserRepository::new(), InMemoryTaskRepository::new())
    }

    fn valid_input() -> CreateUser {
        CreateUser {
            email: "person@example.com".to_string(),
            password: "hunter2!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let service = service_with_memory_repos();

        let result = service
            .create_user(CreateUser {
                email: "nope".to_string(),
                ..valid_input()
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_password() {
        let service = service_with_memory_repos();

        let result = service
            .create_user(CreateUser {
                password: " ".to_string(),
                ..valid_input()
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_stores_argon2_hash_not_plaintext() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone(), InMemoryTaskRepository::new());

        let created = service.create_user(valid_input()).await.unwrap();

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter2!");

        let parsed = PasswordHash::new(&stored.password_hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"hunter2!", &parsed)
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_surfaces_duplicate_email() {
        let service = service_with_memory_repos();

        service.create_user(valid_input()).await.unwrap();
        let result = service.create_user(valid_input()).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_get_users_treats_missing_relation_as_empty() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_list().returning(|| {
            Err(UserError::Database(
                "relation \"users\" does not exist".to_string(),
            ))
        });

        let service = UserService::new(mock_repo, InMemoryTaskRepository::new());
        let users = service.get_users().await.unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_payload() {
        let service = service_with_memory_repos();

        let result = service
            .update_user(Uuid::now_v7(), UpdateUser::default())
            .await;

        assert!(matches!(result, Err(UserError::NoFieldsToUpdate)));
    }

    #[tokio::test]
    async fn test_update_rehashes_new_password() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone(), InMemoryTaskRepository::new());

        let created = service.create_user(valid_input()).await.unwrap();
        let before = repo.get_by_id(created.id).await.unwrap().unwrap();

        service
            .update_user(
                created.id,
                UpdateUser {
                    password: Some("correct horse battery staple".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(after.password_hash, before.password_hash);
        assert_ne!(after.password_hash, "correct horse battery staple");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let service = service_with_memory_repos();
        let id = Uuid::now_v7();

        let result = service
            .update_user(
                id,
                UpdateUser {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_delete_maps_false_to_not_found() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_delete()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(false));

        let service = UserService::new(mock_repo, InMemoryTaskRepository::new());
        let result = service.delete_user(id).await;

        assert!(matches!(result, Err(UserError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_get_tasks_for_missing_user_is_not_found() {
        let service = service_with_memory_repos();

        let result = service.get_tasks_for_user(Uuid::now_v7()).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_task_storage_errors_surface_as_database_not_not_found() {
        use domain_tasks::UpdateTask;

        // Task gateway that fails every read with a non-storage variant
        struct BrokenTaskRepository;

        #[async_trait::async_trait]
        impl TaskRepository for BrokenTaskRepository {
            async fn create(&self, _input: CreateTask) -> Result<Task, TaskError> {
                Err(TaskError::Database("unused".to_string()))
            }
            async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, TaskError> {
                Err(TaskError::NotFound(id))
            }
            async fn list(&self) -> Result<Vec<Task>, TaskError> {
                Err(TaskError::Database("unused".to_string()))
            }
            async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Task>, TaskError> {
                Err(TaskError::NotFound(user_id))
            }
            async fn update(&self, id: Uuid, _input: UpdateTask) -> Result<Task, TaskError> {
                Err(TaskError::NotFound(id))
            }
            async fn delete(&self, _id: Uuid) -> Result<bool, TaskError> {
                Err(TaskError::Database("unused".to_string()))
            }
        }

        let user_repo = InMemoryUserRepository::new();
        let service = UserService::new(user_repo, BrokenTaskRepository);

        let user = service.create_user(valid_input()).await.unwrap();
        let result = service.get_tasks_for_user(user.id).await;

        // The user exists; a misbehaving task gateway must not turn into a 404
        assert!(matches!(result, Err(UserError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_tasks_for_user_returns_only_their_tasks() {
        let user_repo = InMemoryUserRepository::new();
        let task_repo = InMemoryTaskRepository::new();
        let service = UserService::new(user_repo, task_repo.clone());

        let user = service.create_user(valid_input()).await.unwrap();

        use domain_tasks::TaskRepository as _;
        task_repo
            .create(CreateTask {
                user_id: user.id,
                text: "theirs".to_string(),
                is_done: false,
            })
            .await
            .unwrap();
        task_repo
            .create(CreateTask {
                user_id: Uuid::now_v7(),
                text: "someone else's".to_string(),
                is_done: false,
            })
            .await
            .unwrap();

        let tasks = service.get_tasks_for_user(user.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "theirs");
    }
}
