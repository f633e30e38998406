use chrono::{DateTime, Utc};

/// Next announced maintenance window; either bound may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceWindow {
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
}
