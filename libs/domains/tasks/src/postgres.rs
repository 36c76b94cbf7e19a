use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{CreateTask, Task, UpdateTask},
    repository::TaskRepository,
};

pub struct PgTaskRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = input.into();

        let model = self.base.insert(active_model).await?;

        tracing::info!(task_id = %model.id, "Created task");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(self.base.db())
            .await?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::DeletedAt.is_null())
            .order_by_asc(entity::Column::CreatedAt)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::DeletedAt.is_null())
            .filter(entity::Column::UserId.eq(user_id))
            .order_by_asc(entity::Column::CreatedAt)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        // Fetch the live row
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::DeletedAt.is_null())
            .one(self.base.db())
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let mut task: Task = model.into();
        task.apply_update(input);

        let active_model = entity::ActiveModel {
            id: Set(task.id),
            user_id: Set(task.user_id),
            text: Set(task.text.clone()),
            is_done: Set(task.is_done),
            created_at: Set(task.created_at.into()),
            updated_at: Set(chrono::Utc::now().into()),
            deleted_at: Set(None),
        };

        let updated_model = self.base.update(active_model).await?;

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated_model.into())
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        // Soft delete: stamp deleted_at on the live row only
        let result = entity::Entity::update_many()
            .col_expr(
                entity::Column::DeletedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(
                    chrono::Utc::now(),
                )),
            )
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::DeletedAt.is_null())
            .exec(self.base.db())
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
