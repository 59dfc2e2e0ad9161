// Tasks service: manual creation, completion entry point, status edits.

use chrono::Utc;
use uuid::Uuid;

use crate::commands::{CompleteTaskRequest, CreateTaskRequest, SetTaskStatusRequest};
use crate::db::{CrmDb, DbTask, Scope};
use crate::error::ApiError;
use crate::pipeline::{can_open_task, resolve_completion, CompletionRequest};
use crate::state::AppState;
use crate::types::{CompletionSummary, FlowKind, Stage, TaskStatus};

/// Manually open a task for a lead at its current stage.
///
/// The title comes from the generator and is immutable afterwards; the
/// flow kind is frozen from the lead's stage right now. Converted leads are
/// ineligible, and a second open task at the same stage is rejected rather
/// than silently skipped so the user learns why nothing appeared.
pub fn create_task(request: CreateTaskRequest, state: &AppState) -> Result<String, String> {
    let CreateTaskRequest { lead_id, due_date } = request;

    crate::util::validate_id_slug(&lead_id, "lead_id")?;
    if let Some(ref date) = due_date {
        crate::util::validate_yyyy_mm_dd(date, "due_date")?;
    }

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    let lead = db
        .get_lead(&lead_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Lead not found: {lead_id}"))?;

    let stage = Stage::parse(&lead.stage)
        .ok_or_else(|| format!("Lead {lead_id} has unrecognized stage {:?}", lead.stage))?;

    if !can_open_task(stage) {
        return Err("Tasks cannot be created for a converted lead".to_string());
    }

    let demo_count = if stage.is_demo() {
        lead.demo_count + 1
    } else {
        lead.demo_count
    };
    let title =
        crate::pipeline::task_title(stage, &lead.name, demo_count).map_err(|e| e.to_string())?;

    let now = Utc::now().to_rfc3339();
    let task = DbTask {
        id: format!("task-{}", Uuid::new_v4()),
        lead_id: lead.id.clone(),
        title,
        stage: stage.as_str().to_string(),
        flow_kind: FlowKind::for_stage(stage).as_str().to_string(),
        status: TaskStatus::Pending.as_str().to_string(),
        due_date,
        created_at: now.clone(),
        updated_at: now,
        completed_at: None,
    };

    let inserted = db
        .with_transaction::<_, _, crate::error::CrmError>(|tx| {
            let inserted = tx.insert_task_if_no_pending(&task)?;
            if inserted && stage.is_demo() {
                tx.set_lead_demo_count(&lead.id, demo_count)?;
            }
            Ok(inserted)
        })
        .map_err(|e| e.to_string())?;

    if !inserted {
        return Err(format!(
            "Lead already has an open task for the {} stage",
            stage.label()
        ));
    }
    Ok(task.id)
}

/// Resolve a pending task with an outcome. The heavy lifting happens in
/// `pipeline::resolver`; this wrapper supplies config defaults and maps the
/// error for the boundary.
pub fn complete_task(
    request: &CompleteTaskRequest,
    state: &AppState,
) -> Result<CompletionSummary, ApiError> {
    let due_in_days = {
        let config_guard = state
            .config
            .lock()
            .map_err(|_| validation_error("Lock poisoned"))?;
        config_guard
            .as_ref()
            .map(|c| c.task_due_days as i64)
            .unwrap_or(3)
    };

    let db_guard = state
        .db
        .lock()
        .map_err(|_| validation_error("Lock poisoned"))?;
    let db = db_guard
        .as_ref()
        .ok_or_else(|| validation_error("Database not initialized"))?;

    let completion = CompletionRequest {
        task_id: &request.task_id,
        outcome: request.outcome,
        comment: request.comment.as_deref(),
        next_stage_note: request.next_stage_note.as_deref(),
        acting_salesperson: request.acting_salesperson.as_deref(),
        due_in_days: Some(due_in_days),
    };

    resolve_completion(db, &completion).map_err(ApiError::from)
}

fn validation_error(message: &str) -> ApiError {
    ApiError {
        message: message.to_string(),
        error_type: crate::error::ErrorType::Validation,
        can_retry: false,
    }
}

/// Manual status edit from the task list (the UI allows flipping a task
/// back to pending). Does not run any completion flow.
pub fn set_task_status(request: SetTaskStatusRequest, state: &AppState) -> Result<(), String> {
    let SetTaskStatusRequest { task_id, status } = request;

    crate::util::validate_id_slug(&task_id, "task_id")?;

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    let task = db
        .get_task(&task_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Task not found: {task_id}"))?;

    if TaskStatus::parse(&task.status) == Some(status) {
        return Ok(());
    }

    if status == TaskStatus::Pending {
        // Reopening must not collide with a task spawned at the same stage
        // in the meantime; the partial unique index would reject the update.
        if db
            .has_pending_task(&task.lead_id, &task.stage)
            .map_err(|e| e.to_string())?
        {
            return Err(format!(
                "Lead already has an open task for the {} stage",
                task.stage
            ));
        }
    }

    db.set_task_status(&task_id, status).map_err(|e| e.to_string())
}

/// Pending tasks across the scope for the tasks-list view.
pub fn list_pending_tasks(state: &AppState, scope: &Scope) -> Result<Vec<DbTask>, String> {
    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;
    db.list_pending_tasks(scope).map_err(|e| e.to_string())
}

/// Repair pass shared with the reconcile binary: open the missing task for
/// every lead whose current stage has none.
pub fn reconcile_missing_tasks(db: &CrmDb, due_in_days: i64) -> Result<usize, String> {
    let missing = db.leads_missing_stage_task().map_err(|e| e.to_string())?;
    let mut spawned = 0;
    for lead in missing {
        let Some(stage) = Stage::parse(&lead.stage) else {
            log::warn!("skipping lead {} with unrecognized stage {:?}", lead.id, lead.stage);
            continue;
        };
        let result = db.with_transaction::<_, _, crate::error::CrmError>(|tx| {
            crate::pipeline::spawn_task_for_stage(tx, &lead, stage, Some(due_in_days))
        });
        match result {
            Ok(Some(task_id)) => {
                log::info!("reconcile: spawned task {} for lead {}", task_id, lead.id);
                spawned += 1;
            }
            Ok(None) => {}
            Err(e) => return Err(e.to_string()),
        }
    }
    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CreateLeadRequest;
    use crate::services::leads::create_lead;
    use crate::state::test_state;
    use crate::types::CompletionOutcome;

    fn seed_lead(state: &AppState, name: &str) -> String {
        create_lead(
            CreateLeadRequest {
                name: name.to_string(),
                company: None,
                email: None,
                phone: None,
                source: None,
                owner_id: None,
                estimated_value: None,
            },
            state,
        )
        .expect("seed lead")
    }

    fn first_task_id(state: &AppState, lead_id: &str) -> String {
        let db_guard = state.db.lock().expect("lock");
        let db = db_guard.as_ref().expect("db");
        db.list_lead_tasks(lead_id).expect("tasks")[0].id.clone()
    }

    #[test]
    fn test_create_task_rejects_duplicate_stage() {
        let state = test_state();
        let lead_id = seed_lead(&state, "Acme");

        // Intake already opened the first-call task
        let err = create_task(
            CreateTaskRequest {
                lead_id: lead_id.clone(),
                due_date: None,
            },
            &state,
        )
        .expect_err("duplicate open task");
        assert!(err.contains("already has an open task"));
    }

    #[test]
    fn test_complete_task_full_flow() {
        let state = test_state();
        let lead_id = seed_lead(&state, "Acme");
        let task_id = first_task_id(&state, &lead_id);

        let summary = complete_task(
            &CompleteTaskRequest {
                task_id,
                outcome: CompletionOutcome::Qualified,
                comment: Some("budget confirmed".to_string()),
                next_stage_note: None,
                acting_salesperson: Some("sp-alice".to_string()),
            },
            &state,
        )
        .expect("complete");

        assert_eq!(summary.new_stage, Some(Stage::Responded));
        assert!(summary.spawned_task_id.is_some());
    }

    #[test]
    fn test_complete_task_maps_validation_error() {
        let state = test_state();
        let lead_id = seed_lead(&state, "Acme");
        let task_id = first_task_id(&state, &lead_id);

        let err = complete_task(
            &CompleteTaskRequest {
                task_id,
                outcome: CompletionOutcome::NeedsSecondDemo,
                comment: None,
                next_stage_note: None,
                acting_salesperson: None,
            },
            &state,
        )
        .expect_err("mismatched outcome");
        assert!(matches!(err.error_type, crate::error::ErrorType::Validation));
    }

    #[test]
    fn test_set_task_status_reopen_guard() {
        let state = test_state();
        let lead_id = seed_lead(&state, "Acme");
        let task_id = first_task_id(&state, &lead_id);

        // Qualify: task completes, lead advances, new task spawns
        complete_task(
            &CompleteTaskRequest {
                task_id: task_id.clone(),
                outcome: CompletionOutcome::Qualified,
                comment: Some("ok".to_string()),
                next_stage_note: None,
                acting_salesperson: None,
            },
            &state,
        )
        .expect("complete");

        // Reopening the old first-call task is fine (no other task at new)
        set_task_status(
            SetTaskStatusRequest {
                task_id: task_id.clone(),
                status: TaskStatus::Pending,
            },
            &state,
        )
        .expect("reopen old task");

        // Same-status edit is a no-op
        set_task_status(
            SetTaskStatusRequest {
                task_id: task_id.clone(),
                status: TaskStatus::Pending,
            },
            &state,
        )
        .expect("no-op reopen");

        // Complete it again, then occupy the stage with a fresh pending
        // task; reopening must now trip the guard
        set_task_status(
            SetTaskStatusRequest {
                task_id: task_id.clone(),
                status: TaskStatus::Completed,
            },
            &state,
        )
        .expect("re-complete");
        {
            let db_guard = state.db.lock().expect("lock");
            let db = db_guard.as_ref().expect("db");
            db.insert_task(&crate::db::test_utils::sample_task(
                "task-occupier",
                &lead_id,
                "First Call – Acme",
                "new",
            ))
            .expect("occupy stage");
        }
        let err = set_task_status(
            SetTaskStatusRequest {
                task_id,
                status: TaskStatus::Pending,
            },
            &state,
        )
        .expect_err("stage already occupied");
        assert!(err.contains("already has an open task"));
    }

    #[test]
    fn test_reconcile_spawns_missing_tasks() {
        let state = test_state();
        let lead_id = seed_lead(&state, "Acme");

        {
            // Simulate the gap: delete the intake task, lead keeps its stage
            let db_guard = state.db.lock().expect("lock");
            let db = db_guard.as_ref().expect("db");
            db.conn_ref()
                .execute("DELETE FROM tasks WHERE lead_id = ?1", [&lead_id])
                .expect("drop tasks");

            let spawned = reconcile_missing_tasks(db, 3).expect("reconcile");
            assert_eq!(spawned, 1);

            // Second pass finds nothing to do
            let spawned = reconcile_missing_tasks(db, 3).expect("reconcile again");
            assert_eq!(spawned, 0);
        }

        let tasks = {
            let db_guard = state.db.lock().expect("lock");
            let db = db_guard.as_ref().expect("db");
            db.list_lead_tasks(&lead_id).expect("tasks")
        };
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "First Call – Acme");
    }
}
