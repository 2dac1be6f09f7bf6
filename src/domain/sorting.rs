use crate::domain::task::{Task, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Fields available for sorting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Status,
    Assignee,
    DueDate,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortField {
    /// Property name understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::Assignee => "assignee",
            SortField::DueDate => "dueDate",
        }
    }
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "status" => Ok(SortField::Status),
            "assignee" => Ok(SortField::Assignee),
            "duedate" | "due-date" | "due_date" => Ok(SortField::DueDate),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: title, status, assignee, dueDate",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Column sort selection
///
/// Defaults to due date, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Clicking the active column flips direction, any other column starts
    /// ascending
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.reversed();
        } else {
            self.field = field;
            self.order = SortOrder::Ascending;
        }
    }

    /// `field,direction` as used in query strings
    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.field, self.order)
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortField::DueDate, SortOrder::Descending)
    }
}

/// Sorts tasks in place
///
/// The sort is stable. Tasks without a due date (or without an assignee,
/// when sorting by assignee) go last in both directions.
///
/// # Arguments
/// * `tasks` - Tasks to sort
/// * `field` - The field to sort by
/// * `order` - The sort direction (ascending or descending)
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use taskboard_core::domain::sorting::{sort_tasks, SortField, SortOrder};
/// use taskboard_core::domain::task::{NewTask, Task, TaskId};
///
/// let due = Utc.with_ymd_and_hms(2023, 12, 15, 0, 0, 0).unwrap();
/// let mut tasks = vec![
///     Task::from_new(TaskId::new(1), NewTask::new("Undated")),
///     Task::from_new(TaskId::new(2), NewTask::new("Dated").with_due_date(due)),
/// ];
///
/// sort_tasks(&mut tasks, SortField::DueDate, SortOrder::Ascending);
/// assert_eq!(tasks[0].title, "Dated");
///
/// sort_tasks(&mut tasks, SortField::DueDate, SortOrder::Descending);
/// assert_eq!(tasks[0].title, "Dated");
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| match field {
        SortField::Title => order.apply(compare_titles(&a.title, &b.title)),
        // Wire-name order, which is not lane order
        SortField::Status => order.apply(a.status.as_str().cmp(b.status.as_str())),
        SortField::Assignee => compare_missing_last(a.assignee.as_ref(), b.assignee.as_ref(), order, |x, y| {
            compare_assignees(x, y)
        }),
        SortField::DueDate => compare_option_dates(a.due_date, b.due_date, order),
    });
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_assignees(a: &User, b: &User) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

/// Compare Option<DateTime> with None always sorting to end
fn compare_option_dates(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    order: SortOrder,
) -> Ordering {
    compare_missing_last(a.as_ref(), b.as_ref(), order, |x, y| x.cmp(y))
}

/// Direction applies only when both sides are present
fn compare_missing_last<T>(
    a: Option<&T>,
    b: Option<&T>,
    order: SortOrder,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => order.apply(cmp(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
