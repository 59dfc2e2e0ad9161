//! Completion outcome resolver.
//!
//! Invoked when a user resolves a pending task. The branch taken is keyed
//! by the task's frozen creation-time stage and its `flow_kind` tag, never
//! by the lead's live stage: by the time a first-call task is resolved the
//! lead may already be several stages ahead, and the old task must still
//! behave as a first-call task.
//!
//! Every invocation appends exactly one activity record and performs at
//! most one task update, one lead update, and one task spawn. The whole
//! sequence runs inside a single transaction, so a storage failure leaves
//! nothing half-applied.

use chrono::Utc;
use uuid::Uuid;

use super::{stages, titles};
use crate::db::{CrmDb, DbActivity, DbLead, DbTask};
use crate::error::CrmError;
use crate::types::{
    ActivityOutcome, CompletionOutcome, CompletionSummary, FlowKind, Qualification,
    ResponseStatus, Stage, TaskStatus,
};

/// One task-resolution action as received from the UI.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub task_id: &'a str,
    pub outcome: CompletionOutcome,
    /// Free-text comment. Required for the generic flow and for the
    /// "responded" outcome; optional elsewhere.
    pub comment: Option<&'a str>,
    /// Note stored on the lead when the generic flow advances the stage.
    pub next_stage_note: Option<&'a str>,
    /// Who resolved the task, for the activity record.
    pub acting_salesperson: Option<&'a str>,
    /// Due-date offset for a spawned follow-up task.
    pub due_in_days: Option<i64>,
}

/// Resolve a completed task.
///
/// Validation happens before any write; the writes themselves run in one
/// transaction in the order activity, task, lead, spawned task.
pub fn resolve_completion(
    db: &CrmDb,
    req: &CompletionRequest,
) -> Result<CompletionSummary, CrmError> {
    let task = db
        .get_task(req.task_id)?
        .ok_or_else(|| CrmError::TaskNotFound(req.task_id.to_string()))?;

    if TaskStatus::parse(&task.status) == Some(TaskStatus::Completed) {
        return Err(CrmError::Validation(format!(
            "Task {} is already completed",
            task.id
        )));
    }

    let lead = db
        .get_lead(&task.lead_id)?
        .ok_or_else(|| CrmError::LeadNotFound(task.lead_id.clone()))?;

    // Reject rather than guess when stored state is unreadable.
    let frozen_stage = Stage::parse(&task.stage)
        .ok_or_else(|| CrmError::InvalidStage(task.stage.clone()))?;
    let live_stage =
        Stage::parse(&lead.stage).ok_or_else(|| CrmError::InvalidStage(lead.stage.clone()))?;
    let flow = FlowKind::parse(&task.flow_kind).ok_or_else(|| {
        CrmError::Validation(format!("Task {} has unknown flow kind {:?}", task.id, task.flow_kind))
    })?;

    let comment = req.comment.map(str::trim).filter(|c| !c.is_empty());

    // Comment gating is a hard precondition: no writes may land first.
    let comment_required = matches!(
        (flow, req.outcome),
        (FlowKind::Generic, CompletionOutcome::Completed)
            | (FlowKind::ResponseCheck, CompletionOutcome::Responded)
    );
    if comment_required && comment.is_none() {
        return Err(CrmError::CommentRequired);
    }

    log::debug!(
        "resolving task {} (flow {:?}, frozen stage {:?}) with outcome {:?}",
        task.id,
        flow,
        frozen_stage,
        req.outcome
    );

    db.with_transaction(|tx| match (flow, req.outcome) {
        // -------------------------------------------------------------------
        // First-call qualification
        // -------------------------------------------------------------------
        (FlowKind::FirstCall, CompletionOutcome::Qualified) => {
            tx.set_lead_qualification(&lead.id, Qualification::Qualified)?;
            complete_and_advance(tx, req, &task, &lead, live_stage, comment)
        }
        (FlowKind::FirstCall, CompletionOutcome::NotQualified) => {
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::Disqualified,
                comment,
                Some(live_stage),
                Some(Stage::Disqualified),
            )?;
            tx.complete_task(&task.id)?;
            tx.set_lead_qualification(&lead.id, Qualification::Unqualified)?;
            // Direct write to the absorbing stage, bypassing the table.
            tx.update_lead_stage(&lead.id, Stage::Disqualified, None)?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: true,
                new_stage: Some(Stage::Disqualified),
                spawned_task_id: None,
                activity_id,
            })
        }
        (FlowKind::FirstCall, CompletionOutcome::NotConnected) => {
            // Client did not pick up. Task stays pending for a retry and
            // the lead does not move.
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::NotConnected,
                comment,
                None,
                None,
            )?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: false,
                new_stage: None,
                spawned_task_id: None,
                activity_id,
            })
        }

        // -------------------------------------------------------------------
        // Response check
        // -------------------------------------------------------------------
        (FlowKind::ResponseCheck, CompletionOutcome::Responded) => {
            tx.set_lead_response_status(&lead.id, ResponseStatus::Responded)?;
            complete_and_advance(tx, req, &task, &lead, live_stage, comment)
        }
        (FlowKind::ResponseCheck, CompletionOutcome::NotResponded) => {
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::NoResponse,
                comment,
                None,
                None,
            )?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: false,
                new_stage: None,
                spawned_task_id: None,
                activity_id,
            })
        }
        (FlowKind::ResponseCheck, CompletionOutcome::JunkLead) => {
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::Junk,
                comment,
                Some(live_stage),
                Some(Stage::Junk),
            )?;
            tx.complete_task(&task.id)?;
            tx.set_lead_response_status(&lead.id, ResponseStatus::Junk)?;
            tx.update_lead_stage(&lead.id, Stage::Junk, None)?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: true,
                new_stage: Some(Stage::Junk),
                spawned_task_id: None,
                activity_id,
            })
        }

        // -------------------------------------------------------------------
        // Demo outcome
        // -------------------------------------------------------------------
        (FlowKind::DemoOutcome, CompletionOutcome::NeedsSecondDemo) => {
            // Explicit stage write, not the successor table: DemoCompleted
            // is the signal that another demo task must be generated.
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::Reschedule,
                comment,
                Some(live_stage),
                Some(Stage::DemoCompleted),
            )?;
            tx.complete_task(&task.id)?;
            tx.update_lead_stage(&lead.id, Stage::DemoCompleted, None)?;
            let spawned =
                spawn_task_for_stage(tx, &lead, Stage::DemoCompleted, req.due_in_days)?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: true,
                new_stage: Some(Stage::DemoCompleted),
                spawned_task_id: spawned,
                activity_id,
            })
        }
        (FlowKind::DemoOutcome, CompletionOutcome::NoSecondDemo) => {
            // Exit the demo loop straight into the proposal stage.
            let activity_id = append_activity(
                tx,
                req,
                &task,
                ActivityOutcome::Success,
                comment,
                Some(live_stage),
                Some(Stage::Srs),
            )?;
            tx.complete_task(&task.id)?;
            tx.update_lead_stage(&lead.id, Stage::Srs, None)?;
            let spawned = spawn_task_for_stage(tx, &lead, Stage::Srs, req.due_in_days)?;
            Ok(CompletionSummary {
                task_id: task.id.clone(),
                task_completed: true,
                new_stage: Some(Stage::Srs),
                spawned_task_id: spawned,
                activity_id,
            })
        }

        // -------------------------------------------------------------------
        // Generic completion
        // -------------------------------------------------------------------
        (FlowKind::Generic, CompletionOutcome::Completed) => {
            complete_and_advance(tx, req, &task, &lead, live_stage, comment)
        }

        (flow, outcome) => Err(CrmError::OutcomeMismatch { flow, outcome }),
    })
}

/// The shared tail of the qualified / responded / generic branches:
/// activity, task completion, table-driven stage advance, idempotent spawn.
fn complete_and_advance(
    tx: &CrmDb,
    req: &CompletionRequest,
    task: &DbTask,
    lead: &DbLead,
    live_stage: Stage,
    comment: Option<&str>,
) -> Result<CompletionSummary, CrmError> {
    let next = stages::next_stage(live_stage);

    let activity_id = append_activity(
        tx,
        req,
        task,
        ActivityOutcome::Success,
        comment,
        Some(live_stage),
        next,
    )?;
    tx.complete_task(&task.id)?;

    let mut spawned = None;
    if let Some(next) = next {
        tx.update_lead_stage(&lead.id, next, req.next_stage_note)?;
        spawned = spawn_task_for_stage(tx, lead, next, req.due_in_days)?;
    }

    Ok(CompletionSummary {
        task_id: task.id.clone(),
        task_completed: true,
        new_stage: next,
        spawned_task_id: spawned,
        activity_id,
    })
}

fn append_activity(
    tx: &CrmDb,
    req: &CompletionRequest,
    task: &DbTask,
    outcome: ActivityOutcome,
    comment: Option<&str>,
    from_stage: Option<Stage>,
    to_stage: Option<Stage>,
) -> Result<String, CrmError> {
    let activity = DbActivity {
        id: format!("act-{}", Uuid::new_v4()),
        lead_id: task.lead_id.clone(),
        task_id: Some(task.id.clone()),
        salesperson_id: req.acting_salesperson.map(str::to_string),
        outcome: outcome.as_str().to_string(),
        comment: comment.map(str::to_string),
        from_stage: from_stage.map(|s| s.as_str().to_string()),
        to_stage: to_stage.map(|s| s.as_str().to_string()),
        created_at: Utc::now().to_rfc3339(),
    };
    tx.insert_activity(&activity)?;
    Ok(activity.id)
}

/// Idempotently open the task for a lead arriving at `stage`.
///
/// Returns the new task id, or `None` when the stage takes no auto-created
/// task (terminal or absorbing) or the lead already has a pending task
/// there. The demo counter increments here, in the same write set as the
/// spawn, so the first/second wording can never drift from the tasks that
/// actually exist.
pub fn spawn_task_for_stage(
    db: &CrmDb,
    lead: &DbLead,
    stage: Stage,
    due_in_days: Option<i64>,
) -> Result<Option<String>, CrmError> {
    if !stages::can_open_task(stage) || stage.is_absorbing() {
        return Ok(None);
    }
    if db.has_pending_task(&lead.id, stage.as_str())? {
        return Ok(None);
    }

    let demo_count = if stage.is_demo() {
        lead.demo_count + 1
    } else {
        lead.demo_count
    };
    let title = titles::task_title(stage, &lead.name, demo_count)?;

    let now = Utc::now();
    let due_date = due_in_days
        .map(|days| (now + chrono::Duration::days(days)).format("%Y-%m-%d").to_string());

    let task = DbTask {
        id: format!("task-{}", Uuid::new_v4()),
        lead_id: lead.id.clone(),
        title,
        stage: stage.as_str().to_string(),
        flow_kind: FlowKind::for_stage(stage).as_str().to_string(),
        status: TaskStatus::Pending.as_str().to_string(),
        due_date,
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
        completed_at: None,
    };
    db.insert_task(&task)?;

    if stage.is_demo() {
        db.set_lead_demo_count(&lead.id, demo_count)?;
    }

    log::info!("spawned {:?} task {} for lead {}", stage, task.id, lead.id);
    Ok(Some(task.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{sample_lead, sample_task, test_db};

    fn request<'a>(task_id: &'a str, outcome: CompletionOutcome) -> CompletionRequest<'a> {
        CompletionRequest {
            task_id,
            outcome,
            comment: None,
            next_stage_note: None,
            acting_salesperson: Some("sp-alice"),
            due_in_days: Some(3),
        }
    }

    /// Lead at `stage` with one pending task frozen at the same stage.
    fn seed(db: &CrmDb, stage: Stage) -> (DbLead, DbTask) {
        let mut lead = sample_lead("lead-1", "Acme");
        lead.stage = stage.as_str().to_string();
        if stage.is_demo() {
            lead.demo_count = 1;
        }
        db.upsert_lead(&lead).expect("seed lead");

        let task = sample_task("task-1", "lead-1", "seed task", stage.as_str());
        db.insert_task(&task).expect("seed task");
        (lead, task)
    }

    #[test]
    fn test_not_connected_leaves_task_pending() {
        let db = test_db();
        seed(&db, Stage::New);

        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::NotConnected))
            .expect("resolve");

        assert!(!summary.task_completed);
        assert_eq!(summary.new_stage, None);
        assert_eq!(summary.spawned_task_id, None);

        let task = db.get_task("task-1").expect("get").unwrap();
        assert_eq!(task.status, "pending");
        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "new");

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].outcome, "not_connected");
    }

    #[test]
    fn test_not_qualified_disqualifies_directly() {
        let db = test_db();
        seed(&db, Stage::New);

        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::NotQualified))
            .expect("resolve");

        assert!(summary.task_completed);
        assert_eq!(summary.new_stage, Some(Stage::Disqualified));

        let task = db.get_task("task-1").expect("get").unwrap();
        assert_eq!(task.status, "completed");

        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "disqualified", "not the table successor of new");
        assert_eq!(lead.qualification, Some("unqualified".to_string()));

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].outcome, "disqualified");
        assert_eq!(activities[0].to_stage, Some("disqualified".to_string()));
    }

    #[test]
    fn test_qualified_advances_and_spawns_next_task() {
        let db = test_db();
        seed(&db, Stage::New);

        let mut req = request("task-1", CompletionOutcome::Qualified);
        req.comment = Some("good fit, budget confirmed");
        let summary = resolve_completion(&db, &req).expect("resolve");

        assert!(summary.task_completed);
        assert_eq!(summary.new_stage, Some(Stage::Responded));
        let spawned_id = summary.spawned_task_id.expect("next task spawned");

        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "responded");
        assert_eq!(lead.qualification, Some("qualified".to_string()));

        let spawned = db.get_task(&spawned_id).expect("get").unwrap();
        assert_eq!(spawned.title, "Schedule Demo – Acme");
        assert_eq!(spawned.stage, "responded");
        assert_eq!(spawned.flow_kind, "response_check");
        assert!(spawned.due_date.is_some());
    }

    #[test]
    fn test_generic_empty_comment_rejected_before_writes() {
        let db = test_db();
        seed(&db, Stage::Srs);

        let mut req = request("task-1", CompletionOutcome::Completed);
        req.comment = Some("   ");
        let err = resolve_completion(&db, &req).expect_err("must reject");
        assert!(matches!(err, CrmError::CommentRequired));

        // Zero writes happened
        assert_eq!(db.count_lead_activities("lead-1").expect("count"), 0);
        let task = db.get_task("task-1").expect("get").unwrap();
        assert_eq!(task.status, "pending");
        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "srs");
    }

    #[test]
    fn test_generic_at_srs_converts_without_spawn() {
        let db = test_db();
        seed(&db, Stage::Srs);

        let mut req = request("task-1", CompletionOutcome::Completed);
        req.comment = Some("contract signed");
        req.next_stage_note = Some("handoff to delivery");
        let summary = resolve_completion(&db, &req).expect("resolve");

        assert!(summary.task_completed);
        assert_eq!(summary.new_stage, Some(Stage::Converted));
        assert_eq!(
            summary.spawned_task_id, None,
            "converted leads never get an auto task"
        );

        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "converted");
        assert!(lead.converted_at.is_some());
        assert_eq!(lead.next_stage_note, Some("handoff to delivery".to_string()));

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].comment, Some("contract signed".to_string()));
    }

    #[test]
    fn test_responded_requires_comment_then_advances() {
        let db = test_db();
        seed(&db, Stage::Responded);

        let err = resolve_completion(&db, &request("task-1", CompletionOutcome::Responded))
            .expect_err("comment required");
        assert!(matches!(err, CrmError::CommentRequired));

        let mut req = request("task-1", CompletionOutcome::Responded);
        req.comment = Some("replied by email, wants a demo");
        let summary = resolve_completion(&db, &req).expect("resolve");

        assert_eq!(summary.new_stage, Some(Stage::DemoScheduled));
        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.response_status, Some("responded".to_string()));
        assert_eq!(lead.stage, "demo_scheduled");
        assert_eq!(lead.demo_count, 1, "first demo counted at spawn");

        let spawned = db
            .get_task(&summary.spawned_task_id.expect("spawned"))
            .expect("get")
            .unwrap();
        assert_eq!(spawned.title, "Demo with Acme");
        assert_eq!(spawned.flow_kind, "demo_outcome");
    }

    #[test]
    fn test_junk_lead_absorbs() {
        let db = test_db();
        seed(&db, Stage::Responded);

        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::JunkLead))
            .expect("resolve");

        assert!(summary.task_completed);
        assert_eq!(summary.new_stage, Some(Stage::Junk));
        assert_eq!(summary.spawned_task_id, None);

        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "junk");
        assert_eq!(lead.response_status, Some("junk".to_string()));

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].outcome, "junk");
    }

    #[test]
    fn test_not_responded_leaves_task_for_retry() {
        let db = test_db();
        seed(&db, Stage::Responded);

        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::NotResponded))
            .expect("resolve");

        assert!(!summary.task_completed);
        let task = db.get_task("task-1").expect("get").unwrap();
        assert_eq!(task.status, "pending");

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities[0].outcome, "no_response");
    }

    #[test]
    fn test_needs_second_demo_spawns_second_demo_task() {
        let db = test_db();
        seed(&db, Stage::DemoScheduled); // demo_count = 1 from seed

        let summary =
            resolve_completion(&db, &request("task-1", CompletionOutcome::NeedsSecondDemo))
                .expect("resolve");

        assert_eq!(summary.new_stage, Some(Stage::DemoCompleted));
        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "demo_completed");
        assert_eq!(lead.demo_count, 2);

        let spawned = db
            .get_task(&summary.spawned_task_id.expect("spawned"))
            .expect("get")
            .unwrap();
        assert_eq!(spawned.title, "Second Demo – Acme");
        assert_eq!(spawned.stage, "demo_completed");

        let activities = db.list_lead_activities("lead-1", 10).expect("list");
        assert_eq!(activities[0].outcome, "reschedule");
    }

    #[test]
    fn test_no_second_demo_exits_to_srs() {
        let db = test_db();
        seed(&db, Stage::DemoScheduled);

        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::NoSecondDemo))
            .expect("resolve");

        assert_eq!(summary.new_stage, Some(Stage::Srs));
        let lead = db.get_lead("lead-1").expect("get").unwrap();
        assert_eq!(lead.stage, "srs");
        assert_eq!(lead.demo_count, 1, "counter untouched when demo loop exits");

        let spawned = db
            .get_task(&summary.spawned_task_id.expect("spawned"))
            .expect("get")
            .unwrap();
        assert_eq!(spawned.title, "SRS Follow-up – Acme");
        assert_eq!(spawned.flow_kind, "generic");
    }

    #[test]
    fn test_frozen_stage_beats_live_stage() {
        let db = test_db();
        // First-call task created at New, but the lead has since moved on
        let (mut lead, _task) = seed(&db, Stage::New);
        lead.stage = Stage::Srs.as_str().to_string();
        db.upsert_lead(&lead).expect("advance lead");

        // Resolving with a first-call outcome still works: the flow comes
        // from the task, not from the lead's live stage
        let summary = resolve_completion(&db, &request("task-1", CompletionOutcome::NotQualified))
            .expect("resolve");
        assert_eq!(summary.new_stage, Some(Stage::Disqualified));
    }

    #[test]
    fn test_outcome_mismatch_rejected() {
        let db = test_db();
        seed(&db, Stage::New);

        let err = resolve_completion(&db, &request("task-1", CompletionOutcome::NeedsSecondDemo))
            .expect_err("demo outcome on a first-call task");
        assert!(matches!(err, CrmError::OutcomeMismatch { .. }));
        assert_eq!(db.count_lead_activities("lead-1").expect("count"), 0);
    }

    #[test]
    fn test_unknown_task_is_not_found() {
        let db = test_db();
        let err = resolve_completion(&db, &request("task-missing", CompletionOutcome::Completed))
            .expect_err("missing task");
        assert!(matches!(err, CrmError::TaskNotFound(_)));
    }

    #[test]
    fn test_invalid_stored_stage_rejected() {
        let db = test_db();
        let (_, _) = seed(&db, Stage::New);
        db.conn_ref()
            .execute("UPDATE tasks SET stage = 'follow-up' WHERE id = 'task-1'", [])
            .expect("corrupt stage");

        let err = resolve_completion(&db, &request("task-1", CompletionOutcome::Qualified))
            .expect_err("unknown stage must not be guessed");
        assert!(matches!(err, CrmError::InvalidStage(_)));
    }

    #[test]
    fn test_already_completed_task_rejected() {
        let db = test_db();
        seed(&db, Stage::New);
        db.complete_task("task-1").expect("complete");

        let err = resolve_completion(&db, &request("task-1", CompletionOutcome::Qualified))
            .expect_err("already completed");
        assert!(matches!(err, CrmError::Validation(_)));
    }

    #[test]
    fn test_spawn_is_idempotent_when_successor_task_exists() {
        let db = test_db();
        let (lead, _) = seed(&db, Stage::New);

        // Successor stage already has a pending task
        db.insert_task(&sample_task(
            "task-existing",
            "lead-1",
            "Schedule Demo – Acme",
            Stage::Responded.as_str(),
        ))
        .expect("existing successor task");

        let mut req = request("task-1", CompletionOutcome::Qualified);
        req.comment = Some("ok");
        let summary = resolve_completion(&db, &req).expect("resolve");

        assert_eq!(summary.spawned_task_id, None, "spawn skipped, no error");
        let lead = db.get_lead(&lead.id).expect("get").unwrap();
        assert_eq!(lead.stage, "responded");
    }

    #[test]
    fn test_spawn_refuses_absorbing_stage() {
        let db = test_db();
        let (lead, _) = seed(&db, Stage::New);
        let spawned =
            spawn_task_for_stage(&db, &lead, Stage::Junk, None).expect("no error");
        assert_eq!(spawned, None);
    }

    #[test]
    fn test_exactly_one_activity_per_resolution() {
        let db = test_db();
        seed(&db, Stage::DemoScheduled);

        resolve_completion(&db, &request("task-1", CompletionOutcome::NeedsSecondDemo))
            .expect("resolve");
        assert_eq!(db.count_lead_activities("lead-1").expect("count"), 1);
    }
}
