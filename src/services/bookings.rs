// Bookings service: appointment events pushed by the scheduling provider.
//
// The provider is the source of truth for appointment times; this side only
// records them, links them to the lead, and nudges the pipeline when a
// first demo gets booked.

use chrono::Utc;
use uuid::Uuid;

use crate::commands::BookingEventRequest;
use crate::db::{BookingSyncOutcome, DbActivity, DbAppointment};
use crate::error::CrmError;
use crate::pipeline::spawn_task_for_stage;
use crate::state::AppState;
use crate::types::{ActivityOutcome, Stage};

/// Accepted `event_type` values in provider payloads.
const BOOKING_EVENT_TYPES: [&str; 3] = ["booked", "rescheduled", "cancelled"];

/// What an ingested booking event ended up doing.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIngestSummary {
    pub appointment_id: String,
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned_task_id: Option<String>,
}

/// Record one booking event from the provider webhook.
///
/// Idempotent on `provider_event_id`: redelivered payloads update the same
/// appointment row and each ingest appends one activity. When the first
/// booking lands for a lead still waiting at Responded, the lead advances
/// to DemoScheduled through the same guarded spawn path the resolver uses.
pub fn ingest_booking(
    request: BookingEventRequest,
    state: &AppState,
) -> Result<BookingIngestSummary, String> {
    let BookingEventRequest {
        provider_event_id,
        lead_id,
        event_type,
        title,
        start_time,
        end_time,
        ..
    } = request;

    crate::util::validate_id_slug(&lead_id, "lead_id")?;
    let provider_event_id =
        crate::util::validate_bounded_string(&provider_event_id, "provider_event_id", 1, 200)?;
    crate::util::validate_enum_string(&event_type, "event_type", &BOOKING_EVENT_TYPES)?;
    crate::util::validate_rfc3339(&start_time, "start_time")?;
    if let Some(ref end) = end_time {
        crate::util::validate_rfc3339(end, "end_time")?;
    }
    if let Some(ref value) = title {
        crate::util::validate_bounded_string(value, "title", 1, 280)?;
    }

    let db_guard = state.db.lock().map_err(|_| "Lock poisoned")?;
    let db = db_guard.as_ref().ok_or("Database not initialized")?;

    let lead = db
        .get_lead(&lead_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Lead not found: {lead_id}"))?;

    let now = Utc::now().to_rfc3339();
    let appointment = DbAppointment {
        id: format!("appt-{}", Uuid::new_v4()),
        lead_id: lead.id.clone(),
        provider_event_id,
        title,
        start_time,
        end_time,
        status: event_type.clone(),
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    let outcome = match event_type.as_str() {
        "booked" => ActivityOutcome::Success,
        _ => ActivityOutcome::Reschedule,
    };

    db.with_transaction::<_, _, CrmError>(|tx| {
        let sync = tx.sync_appointment(&appointment)?;

        // The stored row keeps its original id on redelivery/reschedule.
        let appointment_id = match sync {
            BookingSyncOutcome::New => appointment.id.clone(),
            BookingSyncOutcome::Updated => tx
                .get_appointment_by_event(&appointment.provider_event_id)?
                .map(|a| a.id)
                .unwrap_or_else(|| appointment.id.clone()),
        };

        tx.insert_activity(&DbActivity {
            id: format!("act-{}", Uuid::new_v4()),
            lead_id: lead.id.clone(),
            task_id: None,
            salesperson_id: None,
            outcome: outcome.as_str().to_string(),
            comment: Some(format!("Appointment {}: {}", event_type, appointment.start_time)),
            from_stage: None,
            to_stage: None,
            created_at: now.clone(),
        })?;

        // First booking for a lead still waiting on demo scheduling moves
        // it forward; reschedules and cancellations never move stages.
        let mut new_stage = None;
        let mut spawned_task_id = None;
        if sync == BookingSyncOutcome::New
            && event_type == "booked"
            && Stage::parse(&lead.stage) == Some(Stage::Responded)
        {
            tx.update_lead_stage(&lead.id, Stage::DemoScheduled, None)?;
            spawned_task_id = spawn_task_for_stage(tx, &lead, Stage::DemoScheduled, None)?;
            new_stage = Some(Stage::DemoScheduled);
        }

        Ok(BookingIngestSummary {
            appointment_id,
            created: sync == BookingSyncOutcome::New,
            new_stage,
            spawned_task_id,
        })
    })
    .map_err(|e| e.to_string())
}
