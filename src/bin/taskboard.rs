use anyhow::{Context, Result};
use taskboard_core::{stats, AppConfig, BoardSession, PageLink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path)
            .await
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => AppConfig::from_env()?,
    };

    tracing::info!(websocket_url = %config.websocket_url, "Notifications push endpoint");

    let mut session = BoardSession::from_config(&config)?;
    session.load_tasks().await.context("Failed to load the board")?;

    println!("{}", session.board().name);
    for lane in session.visible_lanes() {
        let tasks = session.lane_tasks(lane);
        println!("\n{} ({})", lane.title, tasks.len());
        for task in tasks {
            let due = task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "no due date".to_string());
            let assignee = task.assignee.as_ref().map_or("unassigned", |u| u.name.as_str());
            println!("  #{} {} [{}, {}]", task.id, task.title, due, assignee);
        }
    }

    let pagination = session.pagination();
    let links: Vec<String> = pagination
        .links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == pagination.current_page => format!("[{}]", n),
            PageLink::Page(n) => n.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect();

    match pagination.item_range {
        Some((from, to)) => println!(
            "\nShowing {} to {} of {} tasks",
            from, to, pagination.total_elements
        ),
        None => println!("\nNo tasks"),
    }
    println!("Pages: {}", links.join(" "));

    let counts = stats::assignee_task_counts(session.backend().as_ref()).await?;
    if !counts.is_empty() {
        println!("\nTasks per assignee");
        for entry in counts {
            println!("  {:<12} {}", entry.item.name, entry.count);
        }
    }

    Ok(())
}
