//! # Taskboard Core
//!
//! Query building, pagination and lane transitions for a kanban/backlog
//! task board.
//!
//! The crate turns board state (tab, sidebar status, filters, sort and page)
//! into backend requests, normalizes the pages that come back, and maps drag
//! gestures onto status changes. The backend is chosen once at startup: an
//! in-memory store for demos or the REST API behind the `http-backend`
//! feature.

pub mod backend;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod gesture;
pub mod query;
pub mod session;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use backend::{InMemoryBackend, TaskBackend};
#[cfg(feature = "http-backend")]
pub use backend::HttpBackend;
pub use calendar::{CalendarNotifier, TracingCalendar};
pub use config::AppConfig;
pub use domain::{
    board::{BoardConfig, Lane, StatusFilter, ViewMode, ViewTab},
    filter::{FilterState, TitleSearchMode},
    page::{Page, PageLink, PageRequest},
    sorting::{SortField, SortOrder, SortState},
    task::{NewTask, Tag, TagId, Task, TaskId, TaskStatus, User, UserId},
    toast::Toast,
};
pub use error::{Result, TaskboardError};
pub use gesture::{DragSensor, DropIntent, KeyboardSensor, PointerSensor};
pub use query::TaskQuery;
pub use session::{BoardSession, MoveOutcome};
pub use storage::NotificationStore;
