use crate::domain::Task;

/// External calendar integration, told when a task is scheduled
///
/// Fire-and-forget: implementations must not block and nothing they
/// produce flows back into the board.
pub trait CalendarNotifier: Send + Sync {
    fn task_scheduled(&self, task: &Task);
}

/// Records scheduled tasks in the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCalendar;

impl CalendarNotifier for TracingCalendar {
    fn task_scheduled(&self, task: &Task) {
        tracing::info!(
            task_id = %task.id,
            title = %task.title,
            due_date = ?task.due_date,
            "Creating calendar event"
        );
    }
}
