use crate::{
    backend::TaskBackend,
    domain::{sort_tasks, NewTask, Page, Tag, TagId, Task, TaskId, TaskStatus, User, UserId},
    error::{Result, TaskboardError},
    query::{TaskQuery, TaskRequest},
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::{collections::BTreeMap, time::Duration};
use tokio::sync::RwLock;

struct State {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
}

/// In-process backend used in mock mode
///
/// Runs the whole filter, sort and paginate pipeline locally.
pub struct InMemoryBackend {
    state: RwLock<State>,
    users: Vec<User>,
    tags: Vec<Tag>,
    latency: Option<Duration>,
}

impl InMemoryBackend {
    /// Creates an empty backend
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
            users: Vec::new(),
            tags: Vec::new(),
            latency: None,
        }
    }

    /// Creates a backend holding the given tasks; new ids continue after the
    /// highest one
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks: BTreeMap<TaskId, Task> = tasks.into_iter().map(|task| (task.id, task)).collect();
        let next_id = tasks.keys().last().map_or(1, |id| id.value() + 1);

        Self {
            state: RwLock::new(State { tasks, next_id }),
            ..Self::new()
        }
    }

    pub fn with_reference_data(mut self, users: Vec<User>, tags: Vec<Tag>) -> Self {
        self.users = users;
        self.tags = tags;
        self
    }

    /// Delays every call, to make the mock feel like a network
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Demo data set: five named tasks, twenty generated ones, three users
    /// and four tags
    pub fn with_sample_data() -> Self {
        let users = sample_users();
        let tags = sample_tags();

        let due = |day: u32| Utc.with_ymd_and_hms(2023, 12, day, 0, 0, 0).single();
        let named = [
            ("Implement login page", "Create a login page with email and password fields", 31, TaskStatus::Backlog),
            ("Design dashboard", "Create wireframes for the dashboard", 15, TaskStatus::Ready),
            ("Fix navigation bug", "Navigation menu doesn't close on mobile", 10, TaskStatus::InProgress),
            ("Update documentation", "Update API documentation with new endpoints", 20, TaskStatus::Review),
            ("Release v1.0", "Prepare for initial release", 25, TaskStatus::Done),
        ];

        let mut tasks = Vec::new();
        for (i, (title, description, day, status)) in named.into_iter().enumerate() {
            let mut task = Task::from_new(
                TaskId::new(i as i64 + 1),
                NewTask::new(title).with_description(description),
            )
            .with_status(status);
            task.due_date = due(day);
            task.assignee = users.get(i % users.len()).cloned();
            task.tags = vec![tags[i % tags.len()].clone()];
            tasks.push(task);
        }

        for n in 6..=25_i64 {
            let mut task = Task::from_new(
                TaskId::new(n),
                NewTask::new(format!("Task {}", n)).with_description(format!(
                    "This is task {} description with some more text to test truncation in the UI",
                    n
                )),
            )
            .with_status(TaskStatus::ALL[n as usize % 5]);
            task.due_date = due((n as u32 * 7) % 30 + 1);
            if n % 3 == 0 {
                task.assignee = users.get(n as usize % users.len()).cloned();
            }
            tasks.push(task);
        }

        Self::with_tasks(tasks).with_reference_data(users, tags)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskBackend for InMemoryBackend {
    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Page<Task>> {
        self.simulate_latency().await;
        query.validate()?;

        if query.request() == TaskRequest::Nothing {
            return Ok(Page::empty(query.page));
        }

        let state = self.state.read().await;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        drop(state);

        sort_tasks(&mut matching, query.sort.field, query.sort.order);

        tracing::debug!(
            matched = matching.len(),
            page = query.page.page(),
            size = query.page.size(),
            "In-memory task query"
        );
        Ok(Page::paginate(matching, query.page))
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskboardError::TaskNotFound(id))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        let id = TaskId::new(state.next_id);
        state.next_id += 1;

        let created = Task::from_new(id, task.clone());
        state.tasks.insert(id, created.clone());

        tracing::info!(task_id = %id, "Created task");
        Ok(created)
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        match state.tasks.get_mut(&task.id) {
            Some(existing) => {
                *existing = task.clone();
                tracing::info!(task_id = %task.id, status = %task.status.as_str(), "Updated task");
                Ok(task.clone())
            }
            None => Err(TaskboardError::TaskNotFound(task.id)),
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        if state.tasks.remove(&id).is_none() {
            return Err(TaskboardError::TaskNotFound(id));
        }

        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.simulate_latency().await;
        Ok(self.users.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.simulate_latency().await;
        Ok(self.tags.clone())
    }

    async fn list_statuses(&self) -> Result<Vec<TaskStatus>> {
        self.simulate_latency().await;
        Ok(TaskStatus::ALL
            .into_iter()
            .filter(|status| *status != TaskStatus::Backlog)
            .collect())
    }
}

fn sample_users() -> Vec<User> {
    [
        ("123456789", "Demo User", "demo@example.com"),
        ("987654321", "Jane Smith", "jane@example.com"),
        ("456789123", "John Doe", "john@example.com"),
    ]
    .into_iter()
    .map(|(id, name, email)| User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        picture: None,
    })
    .collect()
}

fn sample_tags() -> Vec<Tag> {
    [
        ("1", "frontend", "#3b82f6"),
        ("2", "backend", "#10b981"),
        ("3", "bug", "#ef4444"),
        ("4", "design", "#a855f7"),
    ]
    .into_iter()
    .map(|(id, name, color)| Tag {
        id: TagId::new(id),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}
