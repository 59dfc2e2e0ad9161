// Leads service: intake, board listing, field edits.

use chrono::Utc;
use uuid::Uuid;

use crate::commands::{CreateLeadRequest, UpdateLeadRequest};
use crate::db::{DbLead, Scope};
use crate::error::CrmError;
use crate::pipeline::spawn_task_for_stage;
use crate::state::AppState;
use crate::types::{LeadDetail, Stage, StageColumn};

/// Result type for the pipeline board
#[derive(Debug, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BoardResult {
    Success { columns: Vec<StageColumn> },
    Empty { message: String },
    Error { message: String },
}

/// Create a lead and open its first-call task in one transaction.
///
/// The task spawn is the same guarded path the resolver uses, so repeating
/// an intake for an existing lead id can never produce a second open
/// first-call task.
pub fn create_lead(request: CreateLeadRequest, state: &AppState) -> Result<String, String> {
    let CreateLeadRequest {
        name,
        company,
        email,
        phone,
        source,
        owner_id,
        estimated_value,
    } = request;

    let name = crate::util::validate_bounded_string(&name, "name", 1, 200)?;
    if let Some(ref value) = company {
        crate::util::validate_bounded_string(value, "company", 1, 200)?;
    }
    if let Some(ref value) = email {
        crate::util::validate_bounded_string(value, "email", 3, 254)?;
    }
    if let Some(ref value) = phone {
        crate::util::validate_bounded_string(value, "phone", 3, 40)?;
    }
    if let Some(ref value) = source {
        crate::util::validate_bounded_string(value, "source", 1, 100)?;
    }
    if let Some(ref id) = owner_id {
        crate::util::validate_id_slug(id, "owner_id")?;
    }
    if let Some(value) = estimated_value {
        if !value.is_finite() || value < 0.0 {
            return Err("estimated_value must be a non-negative number".to_string());
        }
    }

    let (default_owner, due_days) = {
        let config_guard = state.config.lock().map_err(|_| "Lock poisoned")?;
        match config_guard.as_ref() {
            Some(c) => (c.default_owner.clone(), c.task_due_days as i64),
            None => (None, 3),
        }
    };

    let now = Utc::now().to_rfc3339();
    let id = format!("lead-{}", Uuid::new_v4());

    let lead = DbLead {
        id: id.clone(),
        name,
        company,
        email,
        phone,
        source: source.or_else(|| Some("manual".to_string())),
        stage: Stage::New.as_str().to_string(),
        qualification: None,
        response_status: None,
        owner_id: owner_id.or(default_owner),
        estimated_value,
        demo_count: 0,
        next_stage_note: None,
        created_at: now.clone(),
        updated_at: now,
        converted_at: None,
    };

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    db.with_transaction::<_, _, CrmError>(|tx| {
        tx.upsert_lead(&lead)?;
        spawn_task_for_stage(tx, &lead, Stage::New, Some(due_days))?;
        Ok(())
    })
    .map_err(|e| e.to_string())?;

    log::info!("lead intake: {} ({})", lead.name, id);
    Ok(id)
}

/// Update contact/value fields on an existing lead.
///
/// Stage is deliberately absent here: stage moves only through the
/// completion resolver and the booking ingest, so the successor table and
/// the activity trail can't be bypassed by an edit form.
pub fn update_lead(request: UpdateLeadRequest, state: &AppState) -> Result<(), String> {
    let UpdateLeadRequest {
        id,
        name,
        company,
        clear_company,
        email,
        clear_email,
        phone,
        clear_phone,
        estimated_value,
        clear_estimated_value,
        owner_id,
        clear_owner,
    } = request;

    crate::util::validate_id_slug(&id, "id")?;
    if let Some(ref value) = name {
        crate::util::validate_bounded_string(value, "name", 1, 200)?;
    }
    if let Some(ref value) = company {
        crate::util::validate_bounded_string(value, "company", 1, 200)?;
    }
    if let Some(ref value) = email {
        crate::util::validate_bounded_string(value, "email", 3, 254)?;
    }
    if let Some(ref value) = phone {
        crate::util::validate_bounded_string(value, "phone", 3, 40)?;
    }
    if let Some(ref value) = owner_id {
        crate::util::validate_id_slug(value, "owner_id")?;
    }
    if let Some(value) = estimated_value {
        if !value.is_finite() || value < 0.0 {
            return Err("estimated_value must be a non-negative number".to_string());
        }
    }

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    let mut lead = db
        .get_lead(&id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Lead not found: {id}"))?;

    if let Some(n) = name {
        lead.name = n;
    }
    if clear_company == Some(true) {
        lead.company = None;
    } else if let Some(c) = company {
        lead.company = Some(c);
    }
    if clear_email == Some(true) {
        lead.email = None;
    } else if let Some(e) = email {
        lead.email = Some(e);
    }
    if clear_phone == Some(true) {
        lead.phone = None;
    } else if let Some(p) = phone {
        lead.phone = Some(p);
    }
    if clear_estimated_value == Some(true) {
        lead.estimated_value = None;
    } else if let Some(v) = estimated_value {
        lead.estimated_value = Some(v);
    }
    if clear_owner == Some(true) {
        lead.owner_id = None;
    } else if let Some(o) = owner_id {
        lead.owner_id = Some(o);
    }

    lead.updated_at = Utc::now().to_rfc3339();
    db.upsert_lead(&lead).map_err(|e| e.to_string())
}

/// The kanban-style board: one column per active stage.
pub fn get_pipeline_board(state: &AppState, scope: &Scope) -> BoardResult {
    let db_guard = match state.db.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return BoardResult::Error {
                message: "Internal error: db lock poisoned".to_string(),
            }
        }
    };
    let db = match db_guard.as_ref() {
        Some(db) => db,
        None => {
            return BoardResult::Error {
                message: "Database not initialized".to_string(),
            }
        }
    };

    let leads = match db.list_board_leads(scope) {
        Ok(leads) => leads,
        Err(e) => {
            return BoardResult::Error {
                message: e.to_string(),
            }
        }
    };

    if leads.is_empty() {
        return BoardResult::Empty {
            message: "No leads yet. Add your first lead to start the pipeline.".to_string(),
        };
    }

    let column_stages = [
        Stage::New,
        Stage::Responded,
        Stage::DemoScheduled,
        Stage::DemoCompleted,
        Stage::Srs,
        Stage::Converted,
    ];
    let columns = column_stages
        .into_iter()
        .map(|stage| StageColumn {
            stage,
            label: stage.label().to_string(),
            leads: leads
                .iter()
                .filter(|l| l.stage == stage.as_str())
                .cloned()
                .collect(),
        })
        .collect();

    BoardResult::Success { columns }
}

/// Lead header plus its tasks, activity trail, and appointments.
pub fn get_lead_detail(id: &str, state: &AppState) -> Result<LeadDetail, String> {
    crate::util::validate_id_slug(id, "id")?;

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    let lead = db
        .get_lead(id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Lead not found: {id}"))?;
    let tasks = db.list_lead_tasks(id).map_err(|e| e.to_string())?;
    let activities = db.list_lead_activities(id, 100).map_err(|e| e.to_string())?;
    let appointments = db.list_lead_appointments(id).map_err(|e| e.to_string())?;

    Ok(LeadDetail {
        lead,
        tasks,
        activities,
        appointments,
    })
}
