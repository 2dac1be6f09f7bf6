//! Reference data and per-user/per-tag task counts for the sidebar

use crate::{
    backend::TaskBackend,
    domain::{FilterState, PageRequest, Tag, TaskStatus, User, ViewTab},
    error::Result,
    query::TaskQuery,
};
use futures::future::join_all;

/// Choices offered by the filter bar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub users: Vec<User>,
    pub tags: Vec<Tag>,
    pub statuses: Vec<TaskStatus>,
}

/// Loads users, tags and statuses concurrently
///
/// A failed list is logged and left empty so the other two stay usable.
pub async fn load_filter_options(backend: &dyn TaskBackend) -> FilterOptions {
    let (users, tags, statuses) = futures::join!(
        backend.list_users(),
        backend.list_tags(),
        backend.list_statuses()
    );

    FilterOptions {
        users: users.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load users");
            Vec::new()
        }),
        tags: tags.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load tags");
            Vec::new()
        }),
        statuses: statuses.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load statuses");
            Vec::new()
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCount<T> {
    pub item: T,
    pub count: u64,
}

/// Board tasks per assignee, busiest first
pub async fn assignee_task_counts(backend: &dyn TaskBackend) -> Result<Vec<TaskCount<User>>> {
    let users = backend.list_users().await?;
    count_by(backend, users, |user| FilterState {
        assignee_id: Some(user.id.clone()),
        ..FilterState::default()
    })
    .await
}

/// Board tasks per tag, most used first
pub async fn tag_task_counts(backend: &dyn TaskBackend) -> Result<Vec<TaskCount<Tag>>> {
    let tags = backend.list_tags().await?;
    count_by(backend, tags, |tag| FilterState {
        tag_ids: [tag.id.clone()].into(),
        ..FilterState::default()
    })
    .await
}

async fn count_by<T>(
    backend: &dyn TaskBackend,
    items: Vec<T>,
    filter_for: impl Fn(&T) -> FilterState,
) -> Result<Vec<TaskCount<T>>> {
    // Only the total is needed
    let page = PageRequest::first(1)?;

    let queries: Vec<TaskQuery> = items
        .iter()
        .map(|item| TaskQuery::new(ViewTab::Board, page).with_filters(filter_for(item)))
        .collect();

    let totals = join_all(queries.iter().map(|query| async move {
        match backend.fetch_tasks(query).await {
            Ok(page) => page.total_elements,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count tasks");
                0
            }
        }
    }))
    .await;

    let mut counts: Vec<TaskCount<T>> = items
        .into_iter()
        .zip(totals)
        .map(|(item, count)| TaskCount { item, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}
