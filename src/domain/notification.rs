//! Task-change notifications pushed by the backend.
//!
//! Payloads arrive as raw JSON on a channel fed by the transport (WebSocket
//! or a mock poller). A payload that fails to parse is logged and dropped so
//! that one bad message never stalls the stream.

use crate::domain::{
    task::{TaskId, TaskStatus, UserId},
    toast::Toast,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default = "generate_id")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    pub task_id: TaskId,
    pub task_title: String,
    pub actor_id: UserId,
    pub actor_name: String,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum NotificationKind {
    TaskStatusChanged {
        old_status: TaskStatus,
        new_status: TaskStatus,
    },
    TaskAssigned {
        assignee_id: UserId,
        assignee_name: String,
    },
    TaskMovedFromBacklog {
        new_status: TaskStatus,
    },
    TaskTagsChanged {
        #[serde(default)]
        added_tags: Vec<String>,
        #[serde(default)]
        removed_tags: Vec<String>,
    },
    TaskDeleted,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::TaskStatusChanged { .. } => "Task Status Changed",
            NotificationKind::TaskAssigned { .. } => "Task Assigned to You",
            NotificationKind::TaskMovedFromBacklog { .. } => "Task Moved from Backlog",
            NotificationKind::TaskTagsChanged { .. } => "Task Tags Updated",
            NotificationKind::TaskDeleted => "Task Deleted",
        }
    }

    pub fn description(&self) -> String {
        let actor = &self.actor_name;
        let title = &self.task_title;

        match &self.kind {
            NotificationKind::TaskStatusChanged {
                old_status,
                new_status,
            } => format!(
                "{} changed status of \"{}\" from {} to {}",
                actor,
                title,
                old_status.as_str(),
                new_status.as_str()
            ),
            NotificationKind::TaskAssigned { .. } => {
                format!("{} assigned \"{}\" to you", actor, title)
            }
            NotificationKind::TaskMovedFromBacklog { new_status } => format!(
                "{} moved \"{}\" from Backlog to {}",
                actor,
                title,
                new_status.as_str()
            ),
            NotificationKind::TaskTagsChanged {
                added_tags,
                removed_tags,
            } => {
                let mut parts = Vec::new();
                if !added_tags.is_empty() {
                    parts.push(format!("added tags: {}", added_tags.join(", ")));
                }
                if !removed_tags.is_empty() {
                    parts.push(format!("removed tags: {}", removed_tags.join(", ")));
                }
                format!("{} updated tags on \"{}\" ({})", actor, title, parts.join(" and "))
            }
            NotificationKind::TaskDeleted => format!("{} deleted task \"{}\"", actor, title),
        }
    }

    pub fn to_toast(&self) -> Toast {
        Toast::info(self.title(), self.description())
    }
}

/// Per-kind opt-outs; everything is on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub task_status_changed: bool,
    pub task_assigned: bool,
    pub task_moved_from_backlog: bool,
    pub task_tags_changed: bool,
    pub task_deleted: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            task_status_changed: true,
            task_assigned: true,
            task_moved_from_backlog: true,
            task_tags_changed: true,
            task_deleted: true,
        }
    }
}

impl NotificationPreferences {
    pub fn allows(&self, kind: &NotificationKind) -> bool {
        match kind {
            NotificationKind::TaskStatusChanged { .. } => self.task_status_changed,
            NotificationKind::TaskAssigned { .. } => self.task_assigned,
            NotificationKind::TaskMovedFromBacklog { .. } => self.task_moved_from_backlog,
            NotificationKind::TaskTagsChanged { .. } => self.task_tags_changed,
            NotificationKind::TaskDeleted => self.task_deleted,
        }
    }
}

/// Received notifications, newest first
#[derive(Debug, Default)]
pub struct NotificationFeed {
    notifications: Vec<Notification>,
    preferences: NotificationPreferences,
}

impl NotificationFeed {
    pub fn new(preferences: NotificationPreferences) -> Self {
        Self {
            notifications: Vec::new(),
            preferences,
        }
    }

    /// Restores previously received notifications, newest first
    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn preferences(&self) -> &NotificationPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: NotificationPreferences) {
        self.preferences = preferences;
    }

    /// Parses and records one raw payload
    ///
    /// Returns the toast to show, or `None` when the payload was malformed
    /// or its kind is muted.
    pub fn ingest(&mut self, raw: &str) -> Option<Toast> {
        match serde_json::from_str::<Notification>(raw) {
            Ok(notification) => self.push(notification),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed notification payload");
                None
            }
        }
    }

    pub fn push(&mut self, notification: Notification) -> Option<Toast> {
        if !self.preferences.allows(&notification.kind) {
            tracing::debug!(id = %notification.id, "Notification muted by preferences");
            return None;
        }
        let toast = notification.to_toast();
        self.notifications.insert(0, notification);
        Some(toast)
    }

    /// Ingests everything currently queued on the channel without waiting
    pub fn drain(&mut self, rx: &mut UnboundedReceiver<String>) -> Vec<Toast> {
        let mut toasts = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(raw) => toasts.extend(self.ingest(&raw)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::debug!("Notification channel closed");
                    break;
                }
            }
        }
        toasts
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub fn mark_as_read(&mut self, id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }
}
