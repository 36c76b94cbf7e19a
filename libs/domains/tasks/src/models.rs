use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Task entity - a single to-do item owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Task text
    pub text: String,
    /// Whether the task is done
    pub is_done: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Soft-delete timestamp; set means the task is no longer visible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    pub user_id: Uuid,
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(default)]
    pub is_done: bool,
}

/// DTO for partially updating an existing task
///
/// Absent fields keep their stored values. A request with no fields at all
/// is rejected by the service.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, Default)]
pub struct UpdateTask {
    #[validate(custom(function = "not_blank"))]
    pub text: Option<String>,
    pub is_done: Option<bool>,
    pub user_id: Option<Uuid>,
}

impl UpdateTask {
    /// True when no field was provided at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.is_done.is_none() && self.user_id.is_none()
    }
}

/// DTO for task responses; hides the soft-delete marker
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            user_id: task.user_id,
            text: task.text,
            is_done: task.is_done,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl Task {
    /// Apply updates from an UpdateTask DTO.
    ///
    /// Does not touch `updated_at`; the repository stamps it on write.
    pub fn apply_update(&mut self, update: UpdateTask) {
        if let Some(text) = update.text {
            self.text = text;
        }
        if let Some(is_done) = update.is_done {
            self.is_done = is_done;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
    }
}

/// Rejects strings that are empty or whitespace only.
pub(crate) fn not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("must not be blank".into()));
    }
    Ok(())
}
