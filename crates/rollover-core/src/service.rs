use crate::error::CoreError;
use crate::models::{TaskRecord, TaskSelector, TaskUpdate};
use async_trait::async_trait;

/// Boundary to the task-tracking service.
///
/// Implementations are constructed explicitly and handed to the pass runner,
/// so tests can substitute an in-memory fake.
#[async_trait]
pub trait TaskService {
    /// Incomplete tasks matching the selector, in the order the service returns them.
    async fn fetch_tasks(&self, selector: &TaskSelector) -> Result<Vec<TaskRecord>, CoreError>;

    /// Applies a partial update and returns the task as stored by the service.
    async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<TaskRecord, CoreError>;
}

