pub mod board;
pub mod dates;
pub mod filter;
pub mod notification;
pub mod page;
pub mod sorting;
pub mod task;
pub mod toast;

pub use board::{BoardConfig, Lane, StatusFilter, ViewMode, ViewTab};
pub use filter::{FilterState, TitleSearchMode};
pub use notification::{Notification, NotificationFeed, NotificationKind, NotificationPreferences};
pub use page::{Page, PageLink, PageRequest};
pub use sorting::{sort_tasks, SortField, SortOrder, SortState};
pub use task::{NewTask, RemovalLabel, Tag, TagId, Task, TaskId, TaskStatus, User, UserId};
pub use toast::{Toast, ToastVariant};
