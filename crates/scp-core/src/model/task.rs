// ── Task domain types ──

wire_enum! {
    /// Lifecycle state of a background task.
    pub enum TaskState {
        Pending => "PENDING",
        Running => "RUNNING",
        Finished => "FINISHED",
        Error => "ERROR",
        Canceled => "CANCELED",
    }
}

impl TaskState {
    /// Pending and running tasks count toward the queue depth.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Task {
    pub uuid: String,
    pub name: String,
    pub state: Option<TaskState>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.state.as_ref().is_some_and(TaskState::is_active)
    }
}
