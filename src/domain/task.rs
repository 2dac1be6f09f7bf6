use crate::domain::dates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// Server-assigned identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user as handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a task
///
/// Declaration order is workflow order; the derived `Ord` is only used for
/// set ordering, sorting by status uses the wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Ready,
    InProgress,
    Review,
    Reopened,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        Self::Backlog,
        Self::Ready,
        Self::InProgress,
        Self::Review,
        Self::Reopened,
        Self::Done,
    ];

    /// Name used on the wire and in URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "BACKLOG",
            Self::Ready => "READY",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Reopened => "REOPENED",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backlog => write!(f, "Backlog"),
            Self::Ready => write!(f, "Ready"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Review => write!(f, "Review"),
            Self::Reopened => write!(f, "Reopened"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = crate::error::TaskboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| crate::error::TaskboardError::InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
}

/// How a removed task is reported back to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalLabel {
    Archived,
    Deleted,
}

/// A task on the board or in the backlog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Rich text (HTML) body
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "dates::optional_iso", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_document_url: Option<String>,
}

impl Task {
    /// Builds a task from a creation payload once the server assigned an id
    pub fn from_new(id: TaskId, new: NewTask) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            status: new.status,
            assignee: new.assignee,
            tags: new.tags,
            ticket_image_url: new.ticket_image_url,
            attached_document_url: new.attached_document_url,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn tag_ids(&self) -> BTreeSet<&TagId> {
        self.tags.iter().map(|tag| &tag.id).collect()
    }

    pub fn assignee_id(&self) -> Option<&UserId> {
        self.assignee.as_ref().map(|user| &user.id)
    }

    /// Removing a finished task archives it, anything else is a deletion.
    /// Storage does not distinguish the two.
    pub fn removal_label(&self) -> RemovalLabel {
        if self.status == TaskStatus::Done {
            RemovalLabel::Archived
        } else {
            RemovalLabel::Deleted
        }
    }
}

/// Creation payload: a task without its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "dates::optional_iso", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_document_url: Option<String>,
}

impl NewTask {
    /// New tasks land in the backlog
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            status: TaskStatus::Backlog,
            assignee: None,
            tags: Vec::new(),
            ticket_image_url: None,
            attached_document_url: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_assignee(mut self, assignee: User) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }
}
