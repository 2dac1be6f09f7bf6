use crate::domain::{
    filter::FilterState,
    task::{Task, TaskStatus},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Top-level view the task list is scoped by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    #[default]
    Board,
    Backlog,
    All,
}

impl ViewTab {
    /// Statuses a tab shows when nothing else narrows it; `None` means
    /// unrestricted
    pub fn default_statuses(&self) -> Option<BTreeSet<TaskStatus>> {
        match self {
            ViewTab::Board => Some(
                TaskStatus::ALL
                    .into_iter()
                    .filter(|status| *status != TaskStatus::Backlog)
                    .collect(),
            ),
            ViewTab::Backlog => Some(BTreeSet::from([TaskStatus::Backlog])),
            ViewTab::All => None,
        }
    }
}

/// How the task list is rendered; only cards can be dragged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
}

impl ViewMode {
    pub fn supports_drag(&self) -> bool {
        matches!(self, ViewMode::Card)
    }
}

/// Sidebar status selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

/// A board column and drop target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub title: String,
    pub status: TaskStatus,
}

impl Lane {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
        }
    }

    /// Identifier used by drag-and-drop targets
    pub fn id(&self) -> &'static str {
        self.status.as_str()
    }
}

/// Board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub lanes: Vec<Lane>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        // BACKLOG and REOPENED deliberately have no lane
        Self {
            name: "Default Board".to_string(),
            lanes: vec![
                Lane::new("Ready", TaskStatus::Ready),
                Lane::new("In Progress", TaskStatus::InProgress),
                Lane::new("Review", TaskStatus::Review),
                Lane::new("Done", TaskStatus::Done),
            ],
        }
    }
}

impl BoardConfig {
    /// Gets the lane for a status, if the status has one
    pub fn lane_for_status(&self, status: TaskStatus) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.status == status)
    }

    pub fn is_lane(&self, status: TaskStatus) -> bool {
        self.lane_for_status(status).is_some()
    }

    /// Lanes left after status checkboxes; with none checked every lane shows
    pub fn visible_lanes(&self, filters: &FilterState) -> Vec<&Lane> {
        if !filters.any_status_checked() {
            return self.lanes.iter().collect();
        }
        self.lanes
            .iter()
            .filter(|lane| filters.is_status_checked(lane.status))
            .collect()
    }

    pub fn is_drop_target(&self, status: TaskStatus, filters: &FilterState) -> bool {
        self.visible_lanes(filters)
            .iter()
            .any(|lane| lane.status == status)
    }

    /// Tasks of the loaded page that belong to a lane, in page order
    pub fn lane_tasks<'a>(&self, lane: &Lane, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| task.status == lane.status).collect()
    }
}
