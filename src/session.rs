use crate::{
    backend::TaskBackend,
    calendar::{CalendarNotifier, TracingCalendar},
    config::AppConfig,
    domain::{
        page::{item_range, page_links},
        BoardConfig, FilterState, Lane, NewTask, PageLink, PageRequest, RemovalLabel, SortField,
        SortState, StatusFilter, Task, TaskId, TaskStatus, Toast, ViewMode, ViewTab,
    },
    error::{Result, TaskboardError},
    gesture::DropIntent,
    query::TaskQuery,
};
use std::sync::Arc;

/// Result of a status move
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Task already had the target status, or the lane was not a drop target
    Unchanged,
    Moved(Task),
}

/// Everything the pager needs to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub page_size_options: Vec<u32>,
    pub links: Vec<PageLink>,
    /// "Showing X to Y of Z" bounds
    pub item_range: Option<(u64, u64)>,
}

impl PaginationView {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// State of one board screen and the operations the user drives it with
///
/// Mutations take `&mut self`, so a session never has two requests in
/// flight and a slower response cannot overwrite a newer one.
pub struct BoardSession {
    backend: Arc<dyn TaskBackend>,
    calendar: Arc<dyn CalendarNotifier>,
    board: BoardConfig,
    tab: ViewTab,
    view_mode: ViewMode,
    status_filter: StatusFilter,
    filters: FilterState,
    sort: SortState,
    page: PageRequest,
    page_size_options: Vec<u32>,
    tasks: Vec<Task>,
    total_elements: u64,
    total_pages: u32,
    toasts: Vec<Toast>,
}

impl BoardSession {
    pub fn new(backend: Arc<dyn TaskBackend>, calendar: Arc<dyn CalendarNotifier>) -> Self {
        let defaults = AppConfig::default();
        Self {
            backend,
            calendar,
            board: BoardConfig::default(),
            tab: ViewTab::default(),
            view_mode: ViewMode::default(),
            status_filter: StatusFilter::default(),
            filters: FilterState::default(),
            sort: defaults.default_sort(),
            page: PageRequest::default(),
            page_size_options: defaults.page_size_options,
            tasks: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            toasts: Vec::new(),
        }
    }

    /// Builds the backend named by the config and starts on its defaults
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut session = Self::new(config.build_backend()?, Arc::new(TracingCalendar));
        session.page = config.default_page_request()?;
        session.sort = config.default_sort();
        session.page_size_options = config.page_size_options.clone();
        Ok(session)
    }

    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    pub fn backend(&self) -> &Arc<dyn TaskBackend> {
        &self.backend
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    pub fn tab(&self) -> ViewTab {
        self.tab
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switches between cards and list; the loaded page is kept
    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        self.view_mode = view_mode;
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Edits filters without querying; call [`BoardSession::search`] to apply
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    /// Tasks of the current page
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Query for the current state
    pub fn query(&self) -> TaskQuery {
        TaskQuery::new(self.tab, self.page)
            .with_status_filter(self.status_filter)
            .with_filters(self.filters.clone())
            .with_sort(self.sort)
    }

    /// Fetches the current page
    ///
    /// On failure the previously loaded tasks stay in place and an error
    /// toast is queued.
    pub async fn load_tasks(&mut self) -> Result<()> {
        let query = self.query();
        tracing::debug!(?query, "Loading tasks");

        match self.backend.fetch_tasks(&query).await {
            Ok(page) => {
                self.total_elements = page.total_elements;
                self.total_pages = page.total_pages;
                self.tasks = page.content;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, backend = e.is_backend_failure(), "Failed to fetch tasks");
                self.toasts
                    .push(Toast::error("Failed to fetch tasks. Please try again."));
                Err(e)
            }
        }
    }

    /// Reloads after a mutation; a failure is already reported as a toast
    async fn refresh(&mut self) {
        let _ = self.load_tasks().await;
    }

    pub async fn set_tab(&mut self, tab: ViewTab) -> Result<()> {
        self.tab = tab;
        self.reset_page();
        self.load_tasks().await
    }

    pub async fn set_status_filter(&mut self, status_filter: StatusFilter) -> Result<()> {
        self.status_filter = status_filter;
        self.reset_page();
        self.load_tasks().await
    }

    /// Applies the edited filters from the first page
    pub async fn search(&mut self) -> Result<()> {
        self.filters.validate()?;
        self.reset_page();
        self.load_tasks().await
    }

    pub async fn clear_filters(&mut self) -> Result<()> {
        self.filters.clear();
        self.reset_page();
        self.load_tasks().await
    }

    pub async fn toggle_sort(&mut self, field: SortField) -> Result<()> {
        self.sort.toggle(field);
        self.load_tasks().await
    }

    pub async fn set_page(&mut self, page: u32) -> Result<()> {
        self.page = PageRequest::new(page, self.page.size())?;
        self.load_tasks().await
    }

    pub async fn set_page_size(&mut self, size: u32) -> Result<()> {
        self.page = PageRequest::first(size)?;
        self.load_tasks().await
    }

    fn reset_page(&mut self) {
        self.page = PageRequest::new(1, self.page.size()).unwrap_or_default();
    }

    pub async fn create_task(&mut self, task: NewTask) -> Result<Task> {
        match self.backend.create_task(&task).await {
            Ok(created) => {
                self.refresh().await;
                self.toasts.push(Toast::info(
                    "Task Created",
                    "Your task has been created successfully.",
                ));
                Ok(created)
            }
            Err(e) => Err(self.report("Failed to create task", e)),
        }
    }

    pub async fn update_task(&mut self, task: Task) -> Result<Task> {
        match self.backend.update_task(&task).await {
            Ok(saved) => {
                self.patch(&saved);
                self.refresh().await;
                self.toasts.push(Toast::info(
                    "Task Updated",
                    "Your task has been updated successfully.",
                ));
                Ok(saved)
            }
            Err(e) => Err(self.report("Failed to update task", e)),
        }
    }

    /// Deletes a task; a DONE task is reported as archived
    pub async fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let label = self
            .tasks
            .iter()
            .find(|task| task.id == id)
            .map_or(RemovalLabel::Deleted, Task::removal_label);

        if let Err(e) = self.backend.delete_task(id).await {
            return Err(self.report("Failed to delete task", e));
        }

        self.tasks.retain(|task| task.id != id);
        self.refresh().await;

        self.toasts.push(match label {
            RemovalLabel::Archived => {
                Toast::info("Task Archived", "The completed task has been archived.")
            }
            RemovalLabel::Deleted => {
                Toast::info("Task Deleted", "Your task has been deleted successfully.")
            }
        });
        Ok(())
    }

    /// Moves a task to another status
    ///
    /// Moving to the current status issues no request. After a failed update
    /// the page is re-fetched so nothing shows the task in its new place.
    pub async fn move_task(&mut self, id: TaskId, to: TaskStatus) -> Result<MoveOutcome> {
        let local = self.tasks.iter().find(|task| task.id == id).cloned();
        let task = match local {
            Some(task) => task,
            None => match self.backend.get_task(id).await {
                Ok(task) => task,
                Err(e) => return Err(self.report("Failed to move task", e)),
            },
        };

        if task.status == to {
            tracing::debug!(task_id = %id, status = %to.as_str(), "Task already in target status");
            return Ok(MoveOutcome::Unchanged);
        }

        let from = task.status;
        let saved = match self.backend.update_task(&task.with_status(to)).await {
            Ok(saved) => saved,
            Err(e) => {
                let e = self.report("Failed to move task", e);
                self.refresh().await;
                return Err(e);
            }
        };

        self.patch(&saved);
        self.refresh().await;

        if from == TaskStatus::Backlog && to == TaskStatus::Ready {
            self.calendar.task_scheduled(&saved);
            self.toasts.push(Toast::info(
                "Calendar Event Created",
                format!("\"{}\" has been added to your Google Calendar", saved.title),
            ));
        }

        self.toasts.push(Toast::info(
            "Task Updated",
            format!(
                "Task moved to {}.",
                to.as_str().replace('_', " ").to_lowercase()
            ),
        ));
        Ok(MoveOutcome::Moved(saved))
    }

    /// Applies a finished drag
    ///
    /// Ignored in list view and for lanes that are not shown.
    pub async fn handle_drop(&mut self, intent: DropIntent) -> Result<MoveOutcome> {
        if !self.view_mode.supports_drag() {
            tracing::debug!(task_id = %intent.task_id, "Drop ignored in list view");
            return Ok(MoveOutcome::Unchanged);
        }
        if !self.board.is_drop_target(intent.lane, &self.filters) {
            tracing::debug!(lane = %intent.lane.as_str(), "Dropped outside a visible lane");
            return Ok(MoveOutcome::Unchanged);
        }
        self.move_task(intent.task_id, intent.lane).await
    }

    /// List-view shortcut for moving a backlog task onto the board
    pub async fn mark_ready(&mut self, id: TaskId) -> Result<MoveOutcome> {
        self.move_task(id, TaskStatus::Ready).await
    }

    pub fn visible_lanes(&self) -> Vec<&Lane> {
        self.board.visible_lanes(&self.filters)
    }

    pub fn lane_tasks(&self, lane: &Lane) -> Vec<&Task> {
        self.board.lane_tasks(lane, &self.tasks)
    }

    pub fn pagination(&self) -> PaginationView {
        let current_page = self.page.page();
        let page_size = self.page.size();

        PaginationView {
            current_page,
            total_pages: self.total_pages,
            page_size,
            total_elements: self.total_elements,
            page_size_options: self.page_size_options.clone(),
            links: page_links(current_page, self.total_pages),
            item_range: item_range(current_page, page_size, self.total_elements),
        }
    }

    /// Hands over queued toasts, oldest first
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    fn patch(&mut self, saved: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == saved.id) {
            *slot = saved.clone();
        }
    }

    fn report(&mut self, action: &str, error: TaskboardError) -> TaskboardError {
        tracing::warn!(error = %error, backend = error.is_backend_failure(), "{}", action);
        self.toasts
            .push(Toast::error(format!("{}. Please try again.", action)));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::domain::{Tag, User};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory backend that counts updates and fails on demand
    #[derive(Default)]
    struct ScriptedBackend {
        inner: InMemoryBackend,
        updates: AtomicUsize,
        fetches: AtomicUsize,
        fail_updates: AtomicBool,
        fail_fetches: AtomicBool,
    }

    impl ScriptedBackend {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                inner: InMemoryBackend::with_tasks(tasks),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl TaskBackend for ScriptedBackend {
        async fn fetch_tasks(&self, query: &TaskQuery) -> Result<crate::domain::Page<Task>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetches.load(Ordering::SeqCst) {
                return Err(TaskboardError::Network("connection reset".to_string()));
            }
            self.inner.fetch_tasks(query).await
        }

        async fn get_task(&self, id: TaskId) -> Result<Task> {
            self.inner.get_task(id).await
        }

        async fn create_task(&self, task: &NewTask) -> Result<Task> {
            self.inner.create_task(task).await
        }

        async fn update_task(&self, task: &Task) -> Result<Task> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(TaskboardError::Api {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            self.inner.update_task(task).await
        }

        async fn delete_task(&self, id: TaskId) -> Result<()> {
            self.inner.delete_task(id).await
        }

        async fn list_users(&self) -> Result<Vec<User>> {
            self.inner.list_users().await
        }

        async fn list_tags(&self) -> Result<Vec<Tag>> {
            self.inner.list_tags().await
        }

        async fn list_statuses(&self) -> Result<Vec<TaskStatus>> {
            self.inner.list_statuses().await
        }
    }

    #[derive(Default)]
    struct RecordingCalendar {
        scheduled: Mutex<Vec<TaskId>>,
    }

    impl CalendarNotifier for RecordingCalendar {
        fn task_scheduled(&self, task: &Task) {
            self.scheduled.lock().unwrap().push(task.id);
        }
    }

    fn task(id: i64, title: &str, status: TaskStatus) -> Task {
        Task::from_new(TaskId::new(id), NewTask::new(title)).with_status(status)
    }

    fn session(
        tasks: Vec<Task>,
    ) -> (BoardSession, Arc<ScriptedBackend>, Arc<RecordingCalendar>) {
        let backend = Arc::new(ScriptedBackend::with_tasks(tasks));
        let calendar = Arc::new(RecordingCalendar::default());
        let session = BoardSession::new(backend.clone(), calendar.clone());
        (session, backend, calendar)
    }

    #[tokio::test]
    async fn test_same_lane_drop_makes_no_call() {
        let (mut session, backend, _) = session(vec![task(1, "Review PR", TaskStatus::Review)]);
        session.load_tasks().await.unwrap();

        let outcome = session
            .handle_drop(DropIntent {
                task_id: TaskId::new(1),
                lane: TaskStatus::Review,
            })
            .await
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
        assert!(session.take_toasts().is_empty());
    }

    #[tokio::test]
    async fn test_backlog_to_ready_notifies_calendar_once() {
        let (mut session, backend, calendar) =
            session(vec![task(1, "Plan sprint", TaskStatus::Backlog)]);
        session.set_tab(ViewTab::Backlog).await.unwrap();
        assert_eq!(session.tasks().len(), 1);

        let outcome = session
            .handle_drop(DropIntent {
                task_id: TaskId::new(1),
                lane: TaskStatus::Ready,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, MoveOutcome::Moved(ref t) if t.status == TaskStatus::Ready));
        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
        assert_eq!(*calendar.scheduled.lock().unwrap(), vec![TaskId::new(1)]);

        // Re-fetch wins: the task left the backlog listing
        assert!(session.tasks().is_empty());

        let toasts = session.take_toasts();
        assert_eq!(toasts[0].title, "Calendar Event Created");
        assert_eq!(toasts[0].description, "\"Plan sprint\" has been added to your Google Calendar");
        assert_eq!(toasts[1].description, "Task moved to ready.");
    }

    #[tokio::test]
    async fn test_other_moves_skip_calendar() {
        let (mut session, backend, calendar) =
            session(vec![task(1, "Build API", TaskStatus::Ready)]);
        session.load_tasks().await.unwrap();

        session
            .move_task(TaskId::new(1), TaskStatus::InProgress)
            .await
            .unwrap();

        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
        assert!(calendar.scheduled.lock().unwrap().is_empty());
        assert_eq!(session.tasks()[0].status, TaskStatus::InProgress);

        let toasts = session.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].description, "Task moved to in progress.");
    }

    #[tokio::test]
    async fn test_failed_move_reports_and_refetches() {
        let (mut session, backend, calendar) =
            session(vec![task(1, "Build API", TaskStatus::Ready)]);
        session.load_tasks().await.unwrap();
        let fetches_before = backend.fetches.load(Ordering::SeqCst);

        backend.fail_updates.store(true, Ordering::SeqCst);
        let result = session.move_task(TaskId::new(1), TaskStatus::Done).await;

        assert!(matches!(result, Err(TaskboardError::Api { status: 500, .. })));
        assert_eq!(backend.fetches.load(Ordering::SeqCst), fetches_before + 1);
        assert_eq!(session.tasks()[0].status, TaskStatus::Ready);
        assert!(calendar.scheduled.lock().unwrap().is_empty());

        let toasts = session.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].is_error());
        assert_eq!(toasts[0].description, "Failed to move task. Please try again.");
    }

    #[tokio::test]
    async fn test_drop_on_hidden_lane_is_ignored() {
        let (mut session, backend, _) = session(vec![task(1, "Build API", TaskStatus::Ready)]);
        session.load_tasks().await.unwrap();
        session.filters_mut().toggle_status(TaskStatus::Ready);
        session.filters_mut().toggle_status(TaskStatus::Review);

        let lanes: Vec<_> = session.visible_lanes().iter().map(|l| l.status).collect();
        assert_eq!(lanes, vec![TaskStatus::Ready, TaskStatus::Review]);

        let outcome = session
            .handle_drop(DropIntent {
                task_id: TaskId::new(1),
                lane: TaskStatus::Done,
            })
            .await
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_clear_filters_resets_state_and_page() {
        let tasks = (1..=25)
            .map(|n| task(n, &format!("Task {}", n), TaskStatus::Ready))
            .collect();
        let (mut session, _, _) = session(tasks);

        session.set_page(3).await.unwrap();
        assert_eq!(session.tasks().len(), 5);

        session.filters_mut().set_title("Task 1");
        session.search().await.unwrap();
        assert_eq!(session.page().page(), 1);
        // "Task 1" and "Task 10" through "Task 19"
        assert_eq!(session.total_elements(), 11);

        session.set_page(2).await.unwrap();
        session.clear_filters().await.unwrap();

        assert_eq!(*session.filters(), FilterState::default());
        assert!(!session.filters().is_active());
        assert_eq!(session.page().page(), 1);
        assert_eq!(session.total_elements(), 25);
    }

    #[tokio::test]
    async fn test_fetch_error_keeps_previous_tasks() {
        let (mut session, backend, _) = session(vec![
            task(1, "Build API", TaskStatus::Ready),
            task(2, "Write docs", TaskStatus::Review),
        ]);
        session.load_tasks().await.unwrap();

        backend.fail_fetches.store(true, Ordering::SeqCst);
        let result = session.toggle_sort(SortField::Title).await;

        assert!(matches!(result, Err(TaskboardError::Network(_))));
        assert_eq!(session.tasks().len(), 2);
        let toasts = session.take_toasts();
        assert_eq!(toasts[0].description, "Failed to fetch tasks. Please try again.");
    }

    #[tokio::test]
    async fn test_delete_labels() {
        let (mut session, _, _) = session(vec![
            task(1, "Ship release", TaskStatus::Done),
            task(2, "Write docs", TaskStatus::Review),
        ]);
        session.load_tasks().await.unwrap();

        session.delete_task(TaskId::new(1)).await.unwrap();
        session.delete_task(TaskId::new(2)).await.unwrap();

        let titles: Vec<_> = session.take_toasts().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Task Archived", "Task Deleted"]);
        assert!(session.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_update_reload() {
        let (mut session, _, _) = session(Vec::new());
        session.set_tab(ViewTab::Backlog).await.unwrap();

        let created = session.create_task(NewTask::new("Write tests")).await.unwrap();
        assert_eq!(created.status, TaskStatus::Backlog);
        assert_eq!(session.tasks().len(), 1);

        let mut edited = created.clone();
        edited.title = "Write more tests".to_string();
        session.update_task(edited).await.unwrap();
        assert_eq!(session.tasks()[0].title, "Write more tests");

        let titles: Vec<_> = session.take_toasts().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Task Created", "Task Updated"]);
    }

    #[tokio::test]
    async fn test_update_missing_task_reports_error() {
        let (mut session, _, _) = session(Vec::new());

        let result = session.update_task(task(99, "Ghost", TaskStatus::Ready)).await;

        assert!(matches!(result, Err(TaskboardError::TaskNotFound(_))));
        let toasts = session.take_toasts();
        assert_eq!(toasts[0].description, "Failed to update task. Please try again.");
    }

    #[tokio::test]
    async fn test_mark_ready_from_list_view() {
        let (mut session, _, calendar) = session(vec![task(4, "Triage", TaskStatus::Backlog)]);

        // Not loaded locally: the task is looked up by id
        let outcome = session.mark_ready(TaskId::new(4)).await.unwrap();

        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert_eq!(calendar.scheduled.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_page_size_and_tab_reset_page() {
        let tasks = (1..=25)
            .map(|n| task(n, &format!("Task {}", n), TaskStatus::Ready))
            .collect();
        let (mut session, _, _) = session(tasks);

        session.set_page(3).await.unwrap();
        session.set_page_size(20).await.unwrap();
        assert_eq!(session.page().page(), 1);
        assert_eq!(session.tasks().len(), 20);

        session.set_page(2).await.unwrap();
        session.set_tab(ViewTab::All).await.unwrap();
        assert_eq!(session.page().page(), 1);

        session.set_page(2).await.unwrap();
        session
            .set_status_filter(StatusFilter::Only(TaskStatus::Ready))
            .await
            .unwrap();
        assert_eq!(session.page().page(), 1);

        assert!(matches!(
            session.set_page_size(0).await,
            Err(TaskboardError::InvalidPage(_))
        ));
    }

    #[tokio::test]
    async fn test_list_view_ignores_drops_but_marks_ready() {
        let (mut session, backend, calendar) =
            session(vec![task(1, "Plan sprint", TaskStatus::Backlog)]);
        session.set_tab(ViewTab::Backlog).await.unwrap();
        session.set_view_mode(ViewMode::List);
        assert_eq!(session.view_mode(), ViewMode::List);

        let outcome = session
            .handle_drop(DropIntent {
                task_id: TaskId::new(1),
                lane: TaskStatus::Ready,
            })
            .await
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
        assert_eq!(session.tasks().len(), 1);

        let outcome = session.mark_ready(TaskId::new(1)).await.unwrap();

        assert!(matches!(outcome, MoveOutcome::Moved(ref t) if t.status == TaskStatus::Ready));
        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
        assert_eq!(calendar.scheduled.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_card_view_applies_drops() {
        let (mut session, backend, _) = session(vec![task(1, "Build API", TaskStatus::Ready)]);
        session.load_tasks().await.unwrap();
        session.set_view_mode(ViewMode::List);
        session.set_view_mode(ViewMode::Card);

        let outcome = session
            .handle_drop(DropIntent {
                task_id: TaskId::new(1),
                lane: TaskStatus::Review,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_far_out_page_keeps_pager_usable() {
        let tasks = (1..=25)
            .map(|n| task(n, &format!("Task {}", n), TaskStatus::Ready))
            .collect();
        let (mut session, _, _) = session(tasks);

        session.set_page_size(1).await.unwrap();
        session.set_page(u32::MAX).await.unwrap();
        assert!(session.tasks().is_empty());

        let view = session.pagination();
        assert_eq!(view.total_pages, 25);
        assert_eq!(view.links.first(), Some(&PageLink::Page(1)));
        assert_eq!(view.links.last(), Some(&PageLink::Page(25)));
        assert_eq!(view.item_range, None);
        assert!(!view.has_next());
    }

    #[tokio::test]
    async fn test_pagination_view() {
        let tasks = (1..=25)
            .map(|n| task(n, &format!("Task {}", n), TaskStatus::Ready))
            .collect();
        let (mut session, _, _) = session(tasks);

        session.set_page(3).await.unwrap();
        let view = session.pagination();

        assert_eq!(view.current_page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.item_range, Some((21, 25)));
        assert_eq!(
            view.links,
            vec![PageLink::Page(1), PageLink::Page(2), PageLink::Page(3)]
        );
        assert!(view.has_previous());
        assert!(!view.has_next());
        assert_eq!(view.page_size_options, vec![5, 10, 20, 50]);
    }

    #[tokio::test]
    async fn test_lane_tasks_group_loaded_page() {
        let (mut session, _, _) = session(vec![
            task(1, "Build API", TaskStatus::Ready),
            task(2, "Write docs", TaskStatus::Review),
            task(3, "Fix bug", TaskStatus::Reopened),
        ]);
        session.load_tasks().await.unwrap();
        assert_eq!(session.tasks().len(), 3);

        let lanes: Vec<Lane> = session.visible_lanes().into_iter().cloned().collect();
        let counts: Vec<usize> = lanes.iter().map(|lane| session.lane_tasks(lane).len()).collect();

        // REOPENED is loaded but has no lane
        assert_eq!(counts, vec![1, 0, 1, 0]);
    }
}
