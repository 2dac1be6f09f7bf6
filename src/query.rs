//! Translation of UI filter/sort/pagination state into backend requests.
//!
//! A [`TaskQuery`] is resolved the same way by every backend: the in-memory
//! backend evaluates [`TaskQuery::matches`] directly, the HTTP backend sends
//! either a plain listing ([`ListingRoute`]) or a [`SearchRequest`] body.

use crate::{
    domain::{
        dates, FilterState, PageRequest, SortState, StatusFilter, TagId, Task, TaskStatus, UserId,
        ViewTab,
    },
    error::Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything needed to fetch one page of tasks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub tab: ViewTab,
    pub status_filter: StatusFilter,
    pub filters: FilterState,
    pub page: PageRequest,
    pub sort: SortState,
}

/// GET listing used while no filter is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingRoute {
    Board,
    Backlog,
    Status(TaskStatus),
    All,
}

impl ListingRoute {
    pub fn path(&self) -> String {
        match self {
            ListingRoute::Board => "/todos/board".to_string(),
            ListingRoute::Backlog => "/todos/backlog".to_string(),
            ListingRoute::Status(status) => format!("/todos/todo/status/{}", status.as_str()),
            ListingRoute::All => "/todos/all".to_string(),
        }
    }
}

/// What a backend has to do to answer a query
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    /// The scope excludes every status; answer with an empty page
    Nothing,
    Listing(ListingRoute),
    Search(SearchRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDto {
    pub property: String,
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDto {
    /// 0-based
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDto {
    pub text: String,
    pub exact_match: bool,
}

/// Body of `POST /todos/all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub page: PaginationDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<TaskStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl TaskQuery {
    pub fn new(tab: ViewTab, page: PageRequest) -> Self {
        Self {
            tab,
            page,
            ..Self::default()
        }
    }

    pub fn with_status_filter(mut self, status_filter: StatusFilter) -> Self {
        self.status_filter = status_filter;
        self
    }

    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.filters.validate()
    }

    /// Statuses the query may return, `None` meaning unrestricted
    ///
    /// Tab default, then the sidebar status, then (with active filters) the
    /// checked status boxes, each narrowing the previous set.
    pub fn status_scope(&self) -> Option<BTreeSet<TaskStatus>> {
        let mut scope = self.tab.default_statuses();

        if let StatusFilter::Only(status) = self.status_filter {
            scope = Some(narrow(scope, &BTreeSet::from([status])));
        }

        if self.filters.is_active() && self.filters.any_status_checked() {
            scope = Some(narrow(scope, &self.filters.status_filters));
        }

        scope
    }

    /// Full predicate, as the backend would evaluate it
    pub fn matches(&self, task: &Task) -> bool {
        let in_scope = self
            .status_scope()
            .map_or(true, |scope| scope.contains(&task.status));

        in_scope && (!self.filters.is_active() || self.filters.matches(task))
    }

    pub fn listing_route(&self) -> ListingRoute {
        match (self.tab, self.status_filter) {
            (ViewTab::Backlog, _) => ListingRoute::Backlog,
            (_, StatusFilter::Only(status)) => ListingRoute::Status(status),
            (ViewTab::Board, StatusFilter::All) => ListingRoute::Board,
            (ViewTab::All, StatusFilter::All) => ListingRoute::All,
        }
    }

    /// Query-string pairs for listing endpoints
    pub fn pagination_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.index().to_string()),
            ("size", self.page.size().to_string()),
            ("sort", self.sort.to_query_value()),
        ]
    }

    pub fn search_request(&self) -> SearchRequest {
        let filters = &self.filters;

        let title = (!filters.title.is_empty()).then(|| TitleDto {
            text: filters.title.clone(),
            exact_match: filters.title_search_mode == crate::domain::TitleSearchMode::Exact,
        });

        let statuses = self
            .status_scope()
            .map(|scope| scope.into_iter().collect::<Vec<_>>())
            .filter(|statuses| !statuses.is_empty());

        let tag_ids = (!filters.tag_ids.is_empty()).then(|| filters.tag_ids.iter().cloned().collect());

        SearchRequest {
            page: PaginationDto {
                page: self.page.index(),
                size: self.page.size(),
                sort: vec![SortDto {
                    property: self.sort.field.as_str().to_string(),
                    direction: self.sort.order.as_str().to_string(),
                }],
            },
            title,
            statuses,
            from_date: filters.lower_bound().map(dates::format_wire),
            to_date: filters.upper_bound().map(dates::format_wire),
            assignee_id: filters.assignee_id.clone(),
            tag_ids,
        }
    }

    /// Decides between an empty answer, a listing and a search
    ///
    /// # Examples
    /// ```
    /// use taskboard_core::domain::{PageRequest, StatusFilter, TaskStatus, ViewTab};
    /// use taskboard_core::query::{ListingRoute, TaskQuery, TaskRequest};
    ///
    /// let page = PageRequest::first(10).unwrap();
    ///
    /// let backlog = TaskQuery::new(ViewTab::Backlog, page);
    /// assert_eq!(backlog.request(), TaskRequest::Listing(ListingRoute::Backlog));
    ///
    /// // The board never shows BACKLOG, so nothing is requested
    /// let none = TaskQuery::new(ViewTab::Board, page)
    ///     .with_status_filter(StatusFilter::Only(TaskStatus::Backlog));
    /// assert_eq!(none.request(), TaskRequest::Nothing);
    /// ```
    pub fn request(&self) -> TaskRequest {
        if self.status_scope().is_some_and(|scope| scope.is_empty()) {
            return TaskRequest::Nothing;
        }
        if self.filters.is_active() {
            TaskRequest::Search(self.search_request())
        } else {
            TaskRequest::Listing(self.listing_route())
        }
    }
}

fn narrow(scope: Option<BTreeSet<TaskStatus>>, with: &BTreeSet<TaskStatus>) -> BTreeSet<TaskStatus> {
    match scope {
        Some(current) => current.intersection(with).copied().collect(),
        None => with.clone(),
    }
}
