use crate::{
    domain::{NewTask, Page, Tag, Task, TaskId, TaskStatus, User},
    error::Result,
    query::TaskQuery,
};
use async_trait::async_trait;

pub mod memory_backend;

#[cfg(feature = "http-backend")]
pub mod http_backend;

pub use memory_backend::InMemoryBackend;

#[cfg(feature = "http-backend")]
pub use http_backend::HttpBackend;

/// Source of truth for tasks and the reference data around them
///
/// Selected once at startup: [`InMemoryBackend`] for mock mode, the HTTP
/// backend against a real server.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Fetches one page of tasks matching the query
    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Page<Task>>;

    /// Loads a task by ID
    async fn get_task(&self, id: TaskId) -> Result<Task>;

    /// Creates a task, returning it with its server-assigned id
    async fn create_task(&self, task: &NewTask) -> Result<Task>;

    /// Replaces a task
    async fn update_task(&self, task: &Task) -> Result<Task>;

    /// Deletes a task
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Statuses offered by the status filter
    async fn list_statuses(&self) -> Result<Vec<TaskStatus>>;
}
