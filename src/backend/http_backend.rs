use crate::{
    backend::TaskBackend,
    domain::{NewTask, Page, Tag, Task, TaskId, TaskStatus, User},
    error::{Result, TaskboardError},
    query::{TaskQuery, TaskRequest},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const SEARCH_PATH: &str = "/todos/all";
const TODO_PATH: &str = "/todos/todo";

/// Backend talking to the task REST API
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Creates a backend with its own client and request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaskboardError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn todo_url(&self, id: TaskId) -> String {
        self.url(&format!("{}/{}", TODO_PATH, id))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TaskboardError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TaskboardError::Api {
                status: status.as_u16(),
                message: format!("{} {}", status.canonical_reason().unwrap_or(""), body)
                    .trim()
                    .to_string(),
            });
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| TaskboardError::Network(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| TaskboardError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Page<Task>> {
        query.validate()?;

        let request = match query.request() {
            TaskRequest::Nothing => {
                tracing::debug!("Status scope is empty, skipping request");
                return Ok(Page::empty(query.page));
            }
            TaskRequest::Listing(route) => {
                let path = route.path();
                tracing::debug!(%path, page = query.page.index(), "GET task listing");
                self.client
                    .get(self.url(&path))
                    .query(&query.pagination_params())
            }
            TaskRequest::Search(body) => {
                tracing::debug!(page = query.page.index(), "POST task search");
                self.client.post(self.url(SEARCH_PATH)).json(&body)
            }
        };

        let page: Page<Task> = self.execute_json(request).await?;
        page.normalized()
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        match self.execute_json(self.client.get(self.todo_url(id))).await {
            Err(TaskboardError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(TaskboardError::TaskNotFound(id))
            }
            other => other,
        }
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        tracing::info!(title = %task.title, "Creating task");
        self.execute_json(self.client.put(self.url(TODO_PATH)).json(task))
            .await
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        tracing::info!(task_id = %task.id, status = %task.status.as_str(), "Updating task");
        self.execute_json(self.client.post(self.url(TODO_PATH)).json(task))
            .await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        tracing::info!(task_id = %id, "Deleting task");
        match self.execute(self.client.delete(self.todo_url(id))).await {
            Err(TaskboardError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(TaskboardError::TaskNotFound(id))
            }
            Err(e) => Err(e),
            Ok(_) => Ok(()),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.execute_json(self.client.get(self.url("/users"))).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.execute_json(self.client.get(self.url("/tags"))).await
    }

    async fn list_statuses(&self) -> Result<Vec<TaskStatus>> {
        self.execute_json(self.client.get(self.url("/todos/statuses")))
            .await
    }
}
