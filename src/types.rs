use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pipeline vocabulary
// ---------------------------------------------------------------------------

/// A lead's position in the sales pipeline.
///
/// The six active stages form a single forward chain (see
/// `pipeline::stages::next_stage`). `Disqualified` and `Junk` are absorbing:
/// a lead enters them only through the first-call or response-check
/// completion flows and never leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    New,
    Responded,
    DemoScheduled,
    DemoCompleted,
    Srs,
    Converted,
    Disqualified,
    Junk,
}

impl Stage {
    /// Stable storage string. The database stores stages as TEXT.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Responded => "responded",
            Stage::DemoScheduled => "demo_scheduled",
            Stage::DemoCompleted => "demo_completed",
            Stage::Srs => "srs",
            Stage::Converted => "converted",
            Stage::Disqualified => "disqualified",
            Stage::Junk => "junk",
        }
    }

    /// Parse a storage string. Unknown or blank input is `None`, never a
    /// silent default.
    pub fn parse(value: &str) -> Option<Stage> {
        match value {
            "new" => Some(Stage::New),
            "responded" => Some(Stage::Responded),
            "demo_scheduled" => Some(Stage::DemoScheduled),
            "demo_completed" => Some(Stage::DemoCompleted),
            "srs" => Some(Stage::Srs),
            "converted" => Some(Stage::Converted),
            "disqualified" => Some(Stage::Disqualified),
            "junk" => Some(Stage::Junk),
            _ => None,
        }
    }

    /// Human-readable label for boards and activity feeds.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Responded => "Responded",
            Stage::DemoScheduled => "Demo Scheduled",
            Stage::DemoCompleted => "Demo Completed",
            Stage::Srs => "SRS",
            Stage::Converted => "Converted",
            Stage::Disqualified => "Disqualified",
            Stage::Junk => "Junk",
        }
    }

    /// True for the negative terminal stages reachable only via special
    /// completion flows.
    pub fn is_absorbing(&self) -> bool {
        matches!(self, Stage::Disqualified | Stage::Junk)
    }

    /// True for the stages whose tasks are demo sessions.
    pub fn is_demo(&self) -> bool {
        matches!(self, Stage::DemoScheduled | Stage::DemoCompleted)
    }
}

/// Which completion flow applies when a task is marked done.
///
/// Assigned once at task creation from the lead's stage at that moment and
/// frozen afterwards, so a lead moving on never reclassifies its old tasks.
/// Replaces the legacy title-substring sniffing (L41).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    FirstCall,
    ResponseCheck,
    DemoOutcome,
    Generic,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::FirstCall => "first_call",
            FlowKind::ResponseCheck => "response_check",
            FlowKind::DemoOutcome => "demo_outcome",
            FlowKind::Generic => "generic",
        }
    }

    pub fn parse(value: &str) -> Option<FlowKind> {
        match value {
            "first_call" => Some(FlowKind::FirstCall),
            "response_check" => Some(FlowKind::ResponseCheck),
            "demo_outcome" => Some(FlowKind::DemoOutcome),
            "generic" => Some(FlowKind::Generic),
            _ => None,
        }
    }

    /// The flow a freshly spawned task gets for a given stage.
    pub fn for_stage(stage: Stage) -> FlowKind {
        match stage {
            Stage::New => FlowKind::FirstCall,
            Stage::Responded => FlowKind::ResponseCheck,
            Stage::DemoScheduled | Stage::DemoCompleted => FlowKind::DemoOutcome,
            _ => FlowKind::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Qualification verdict recorded during the first-call flow. Unset until
/// that flow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualification {
    Qualified,
    Unqualified,
}

impl Qualification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualification::Qualified => "qualified",
            Qualification::Unqualified => "unqualified",
        }
    }
}

/// Response verdict recorded during the response-check flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Responded,
    NotResponded,
    Junk,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Responded => "responded",
            ResponseStatus::NotResponded => "not_responded",
            ResponseStatus::Junk => "junk",
        }
    }
}

/// Outcome tag on an activity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOutcome {
    Success,
    Reschedule,
    NoResponse,
    Disqualified,
    Junk,
    NotConnected,
}

impl ActivityOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityOutcome::Success => "success",
            ActivityOutcome::Reschedule => "reschedule",
            ActivityOutcome::NoResponse => "no_response",
            ActivityOutcome::Disqualified => "disqualified",
            ActivityOutcome::Junk => "junk",
            ActivityOutcome::NotConnected => "not_connected",
        }
    }
}

/// The user's selection when resolving a completed task.
///
/// Which variants are accepted depends on the task's frozen `FlowKind`;
/// the resolver rejects mismatches before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    // FirstCall
    Qualified,
    NotQualified,
    NotConnected,
    // ResponseCheck
    Responded,
    NotResponded,
    JunkLead,
    // DemoOutcome
    NeedsSecondDemo,
    NoSecondDemo,
    // Generic
    Completed,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration stored in ~/.leadline/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Salesperson id used as the default owner for new leads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
    /// Days until a freshly spawned task is due.
    #[serde(default = "default_task_due_days")]
    pub task_due_days: u32,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

fn default_task_due_days() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_owner: None,
            task_due_days: default_task_due_days(),
            booking: BookingConfig::default(),
            features: HashMap::new(),
        }
    }
}

/// External scheduling provider settings. The provider pushes booking
/// events into `commands::ingest_booking_event`; the shared secret gates
/// that endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

// ---------------------------------------------------------------------------
// Boundary views
// ---------------------------------------------------------------------------

/// One pipeline-board column: a stage plus its leads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub stage: Stage,
    pub label: String,
    pub leads: Vec<crate::db::DbLead>,
}

/// Everything the lead-detail view needs in one payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    pub lead: crate::db::DbLead,
    pub tasks: Vec<crate::db::DbTask>,
    pub activities: Vec<crate::db::DbActivity>,
    pub appointments: Vec<crate::db::DbAppointment>,
}

/// What a completion resolution did, echoed back to the caller so the UI
/// can refresh only what changed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub task_id: String,
    pub task_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned_task_id: Option<String>,
    pub activity_id: String,
}

/// Aggregate numbers for the dashboard header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub converted_value: f64,
    pub open_pipeline_value: f64,
    pub converted_count: i64,
    pub lost_count: i64,
    /// converted / (converted + disqualified + junk), when any closed exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub funnel: Vec<FunnelSlice>,
    pub revenue: RevenueSummary,
    pub open_tasks: i64,
    pub overdue_tasks: i64,
    pub recent_activities: Vec<crate::db::DbActivity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelSlice {
    pub stage: Stage,
    pub label: String,
    pub count: i64,
}
