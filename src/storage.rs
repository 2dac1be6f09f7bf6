//! Per-user notification state kept on disk between sessions

use crate::{
    domain::{Notification, NotificationFeed, NotificationPreferences, UserId},
    error::Result,
};
use serde::de::DeserializeOwned;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;

/// JSON files holding each user's notification preferences and history
pub struct NotificationStore {
    root_path: PathBuf,
}

impl NotificationStore {
    /// Creates a store writing under the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    fn preferences_file(&self, user: &UserId) -> PathBuf {
        self.root_path
            .join(format!("notification-preferences-{}.json", user.as_str()))
    }

    fn notifications_file(&self, user: &UserId) -> PathBuf {
        self.root_path
            .join(format!("notifications-{}.json", user.as_str()))
    }

    /// Restores a user's feed
    ///
    /// Each file is read on its own: a missing, unreadable or malformed one
    /// falls back to its default and the other is still used.
    pub async fn load(&self, user: &UserId) -> NotificationFeed {
        let preferences: NotificationPreferences = read_json(&self.preferences_file(user))
            .await
            .unwrap_or_default();
        let notifications: Vec<Notification> = read_json(&self.notifications_file(user))
            .await
            .unwrap_or_default();

        NotificationFeed::new(preferences).with_notifications(notifications)
    }

    /// Writes a user's preferences and notifications
    pub async fn save(&self, user: &UserId, feed: &NotificationFeed) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path).await?;
        }

        let preferences = serde_json::to_string_pretty(feed.preferences())?;
        fs::write(self.preferences_file(user), preferences).await?;

        let notifications = serde_json::to_string_pretty(feed.notifications())?;
        fs::write(self.notifications_file(user), notifications).await?;

        tracing::debug!(user = %user, count = feed.notifications().len(), "Saved notifications");
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read saved notifications");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed saved notifications");
            None
        }
    }
}
