use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, UpdateTask};

/// Repository trait for Task persistence
///
/// Implementations can use different storage backends (PostgreSQL, in-memory).
/// All read paths exclude soft-deleted rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task, assigning its identifier and timestamps
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// List all tasks
    async fn list(&self) -> TaskResult<Vec<Task>>;

    /// List tasks owned by a user
    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>>;

    /// Update an existing task
    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task>;

    /// Soft-delete a task by ID; returns false when no live task matched
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let now = chrono::Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            text: input.text,
            is_done: input.is_done,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .get(&id)
            .filter(|t| t.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result)
    }

    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.deleted_at.is_none() && t.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks
            .get_mut(&id)
            .filter(|t| t.deleted_at.is_none())
            .ok_or(TaskError::NotFound(id))?;

        task.apply_update(input);
        task.updated_at = chrono::Utc::now();

        tracing::info!(task_id = %id, "Updated task");
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        match tasks.get_mut(&id).filter(|t| t.deleted_at.is_none()) {
            Some(task) => {
                task.deleted_at = Some(chrono::Utc::now());
                tracing::info!(task_id = %id, "Deleted task");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(text: &str) -> CreateTask {
        CreateTask {
            user_id: Uuid::now_v7(),
            text: text.to_string(),
            is_done: false,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(create_input("buy milk")).await.unwrap();

        assert!(!task.id.is_nil());
        assert_eq!(task.text, "buy milk");
        assert!(!task.is_done);
        assert!(task.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_deleted_task_disappears_from_reads() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(create_input("buy milk")).await.unwrap();

        assert!(repo.delete(task.id).await.unwrap());
        assert!(repo.get_by_id(task.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());

        // Second delete finds nothing live
        assert!(!repo.delete(task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(create_input("buy milk")).await.unwrap();

        let updated = repo
            .update(
                task.id,
                UpdateTask {
                    is_done: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.is_done);
        assert_eq!(updated.text, "buy milk");
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_list_by_user_scopes_to_owner() {
        let repo = InMemoryTaskRepository::new();
        let mine = repo.create(create_input("mine")).await.unwrap();
        repo.create(create_input("someone else's")).await.unwrap();

        let tasks = repo.list_by_user(mine.user_id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, mine.id);
    }
}
