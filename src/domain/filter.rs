use crate::{
    domain::{
        dates,
        task::{TagId, Task, TaskStatus, UserId},
    },
    error::{Result, TaskboardError},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Longest title fragment a user can filter by
pub const MAX_TITLE_FILTER_LEN: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleSearchMode {
    Exact,
    #[default]
    Contains,
}

/// Filter bar state
///
/// There is no stored "active" flag: a filter is active exactly when some
/// field differs from [`FilterState::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub title: String,
    pub title_search_mode: TitleSearchMode,
    /// Checked status boxes; an unchecked status is simply absent
    pub status_filters: BTreeSet<TaskStatus>,
    pub due_date_from: Option<NaiveDate>,
    pub due_date_to: Option<NaiveDate>,
    pub assignee_id: Option<UserId>,
    /// Matches tasks carrying any of these tags
    pub tag_ids: BTreeSet<TagId>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sets the title fragment, clipped to [`MAX_TITLE_FILTER_LEN`] characters
    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(MAX_TITLE_FILTER_LEN).collect();
    }

    pub fn toggle_status(&mut self, status: TaskStatus) {
        if !self.status_filters.remove(&status) {
            self.status_filters.insert(status);
        }
    }

    pub fn is_status_checked(&self, status: TaskStatus) -> bool {
        self.status_filters.contains(&status)
    }

    pub fn any_status_checked(&self) -> bool {
        !self.status_filters.is_empty()
    }

    pub fn toggle_tag(&mut self, tag: TagId) {
        if !self.tag_ids.remove(&tag) {
            self.tag_ids.insert(tag);
        }
    }

    pub fn set_due_date_range(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<()> {
        check_range(from, to)?;
        self.due_date_from = from;
        self.due_date_to = to;
        Ok(())
    }

    /// Checks a state that may have been assembled field by field
    pub fn validate(&self) -> Result<()> {
        if self.title.chars().count() > MAX_TITLE_FILTER_LEN {
            return Err(TaskboardError::InvalidFilter(format!(
                "title filter exceeds {} characters",
                MAX_TITLE_FILTER_LEN
            )));
        }
        check_range(self.due_date_from, self.due_date_to)
    }

    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.due_date_from.map(dates::start_of_day)
    }

    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.due_date_to.map(dates::end_of_day)
    }

    /// Applies every field predicate except status, which is resolved
    /// together with the tab scope
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_title(task)
            && self.matches_due_date(task)
            && self.matches_assignee(task)
            && self.matches_tags(task)
    }

    fn matches_title(&self, task: &Task) -> bool {
        if self.title.is_empty() {
            return true;
        }

        let needle = self.title.to_lowercase();
        let haystack = task.title.to_lowercase();
        match self.title_search_mode {
            TitleSearchMode::Exact => haystack == needle,
            TitleSearchMode::Contains => haystack.contains(&needle),
        }
    }

    fn matches_due_date(&self, task: &Task) -> bool {
        let (lower, upper) = (self.lower_bound(), self.upper_bound());
        if lower.is_none() && upper.is_none() {
            return true;
        }

        // A range filter never matches undated tasks
        let Some(due) = task.due_date.map(|dt| dt.naive_utc()) else {
            return false;
        };

        lower.map_or(true, |lower| due >= lower) && upper.map_or(true, |upper| due <= upper)
    }

    fn matches_assignee(&self, task: &Task) -> bool {
        match &self.assignee_id {
            Some(wanted) => task.assignee_id() == Some(wanted),
            None => true,
        }
    }

    fn matches_tags(&self, task: &Task) -> bool {
        self.tag_ids.is_empty() || task.tags.iter().any(|tag| self.tag_ids.contains(&tag.id))
    }
}

fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(TaskboardError::InvalidDateRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
    Ok(())
}
