//! Request handlers for the front-end boundary.
//!
//! Each handler validates its request struct before taking any lock or
//! touching the store, then delegates to the matching service. Errors cross
//! the boundary as strings, except task completion which carries the
//! classified `ApiError` so the UI can distinguish bad input from a failed
//! write.

use serde::Deserialize;

use crate::db::{DbTask, Scope};
use crate::error::ApiError;
use crate::services;
use crate::services::bookings::BookingIngestSummary;
use crate::services::dashboard::DashboardResult;
use crate::services::leads::BoardResult;
use crate::state::AppState;
use crate::types::{
    CompletionOutcome, CompletionSummary, Config, LeadDetail, TaskStatus,
};

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Row-visibility selector sent with every read request.
///
/// Absent or empty `owned_by` means the manager view. The caller states its
/// scope explicitly; nothing is inferred from an ambient session role here
/// (authentication lives outside this crate).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequest {
    pub owned_by: Option<String>,
}

impl ScopeRequest {
    pub fn into_scope(self) -> Result<Scope, String> {
        match self.owned_by {
            Some(id) if !id.trim().is_empty() => {
                crate::util::validate_id_slug(&id, "owned_by")?;
                Ok(Scope::OwnedBy(id))
            }
            _ => Ok(Scope::All),
        }
    }
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub owner_id: Option<String>,
    pub estimated_value: Option<f64>,
}

pub fn create_lead(request: CreateLeadRequest, state: &AppState) -> Result<String, String> {
    services::leads::create_lead(request, state)
}

/// Only provided fields are updated; `None` means "don't touch".
/// To clear a nullable field, pass the corresponding `clear_*` flag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub id: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub clear_company: Option<bool>,
    pub email: Option<String>,
    pub clear_email: Option<bool>,
    pub phone: Option<String>,
    pub clear_phone: Option<bool>,
    pub estimated_value: Option<f64>,
    pub clear_estimated_value: Option<bool>,
    pub owner_id: Option<String>,
    pub clear_owner: Option<bool>,
}

pub fn update_lead(request: UpdateLeadRequest, state: &AppState) -> Result<(), String> {
    services::leads::update_lead(request, state)
}

pub fn get_pipeline_board(scope: ScopeRequest, state: &AppState) -> BoardResult {
    match scope.into_scope() {
        Ok(scope) => services::leads::get_pipeline_board(state, &scope),
        Err(message) => BoardResult::Error { message },
    }
}

pub fn get_lead_detail(id: &str, state: &AppState) -> Result<LeadDetail, String> {
    services::leads::get_lead_detail(id, state)
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub lead_id: String,
    pub due_date: Option<String>,
}

pub fn create_task(request: CreateTaskRequest, state: &AppState) -> Result<String, String> {
    services::tasks::create_task(request, state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_id: String,
    pub outcome: CompletionOutcome,
    pub comment: Option<String>,
    pub next_stage_note: Option<String>,
    pub acting_salesperson: Option<String>,
}

pub fn complete_task(
    request: CompleteTaskRequest,
    state: &AppState,
) -> Result<CompletionSummary, ApiError> {
    services::tasks::complete_task(&request, state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTaskStatusRequest {
    pub task_id: String,
    pub status: TaskStatus,
}

pub fn set_task_status(request: SetTaskStatusRequest, state: &AppState) -> Result<(), String> {
    services::tasks::set_task_status(request, state)
}

pub fn list_pending_tasks(scope: ScopeRequest, state: &AppState) -> Result<Vec<DbTask>, String> {
    let scope = scope.into_scope()?;
    services::tasks::list_pending_tasks(state, &scope)
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEventRequest {
    pub provider_event_id: String,
    pub lead_id: String,
    /// One of: booked, rescheduled, cancelled.
    pub event_type: String,
    pub title: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    /// Shared secret from the provider webhook configuration.
    pub secret: Option<String>,
}

/// Ingest a booking event pushed by the scheduling provider.
///
/// When a webhook secret is configured, a missing or wrong secret rejects
/// the payload before anything else is validated.
pub fn ingest_booking_event(
    request: BookingEventRequest,
    state: &AppState,
) -> Result<BookingIngestSummary, String> {
    let expected = {
        let guard = state.config.lock().map_err(|_| "Lock poisoned")?;
        guard
            .as_ref()
            .and_then(|c| c.booking.webhook_secret.clone())
    };

    if let Some(expected) = expected {
        match request.secret.as_deref() {
            Some(provided) if provided == expected => {}
            _ => {
                log::warn!(
                    "rejected booking event {} with bad webhook secret",
                    request.provider_event_id
                );
                return Err("Invalid webhook secret".to_string());
            }
        }
    }

    services::bookings::ingest_booking(request, state)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub fn get_dashboard_data(scope: ScopeRequest, state: &AppState) -> DashboardResult {
    match scope.into_scope() {
        Ok(scope) => services::dashboard::get_dashboard_data(state, &scope),
        Err(message) => DashboardResult::Error { message },
    }
}

/// Rolling activity feed across the scope, newest first.
pub fn get_activity_feed(
    scope: ScopeRequest,
    limit: Option<i64>,
    state: &AppState,
) -> Result<Vec<crate::db::DbActivity>, String> {
    let scope = scope.into_scope()?;
    let limit = limit.unwrap_or(50).clamp(1, 500);

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;
    db.recent_activities(&scope, limit).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn get_config(state: &AppState) -> Result<Config, String> {
    let guard = state.config.lock().map_err(|_| "Lock poisoned")?;
    guard.clone().ok_or_else(|| "No configuration loaded".to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub default_owner: Option<String>,
    pub clear_default_owner: Option<bool>,
    pub task_due_days: Option<u32>,
    pub booking_provider: Option<String>,
    pub booking_webhook_secret: Option<String>,
}

pub fn update_config(request: UpdateConfigRequest, state: &AppState) -> Result<Config, String> {
    if let Some(ref owner) = request.default_owner {
        crate::util::validate_id_slug(owner, "default_owner")?;
    }
    if let Some(days) = request.task_due_days {
        if days == 0 || days > 365 {
            return Err("task_due_days must be between 1 and 365".to_string());
        }
    }

    crate::state::create_or_update_config(state, |config| {
        if request.clear_default_owner == Some(true) {
            config.default_owner = None;
        } else if let Some(owner) = request.default_owner {
            config.default_owner = Some(owner);
        }
        if let Some(days) = request.task_due_days {
            config.task_due_days = days;
        }
        if let Some(provider) = request.booking_provider {
            config.booking.provider = Some(provider);
        }
        if let Some(secret) = request.booking_webhook_secret {
            config.booking.webhook_secret = Some(secret);
        }
    })
}
