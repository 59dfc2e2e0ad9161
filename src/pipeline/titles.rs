//! Task title generation.

use super::PipelineError;
use crate::types::Stage;
use crate::util::display_name_or_fallback;

/// Build the title for a task opened at `stage`.
///
/// `demo_count` is the lead's demo session counter and only matters for the
/// demo stages: the first session reads "Demo with {name}", every later one
/// "Second Demo – {name}". A blank `lead_display_name` falls back to
/// "Client"; that is a deliberate fallback, not an error.
///
/// Converted leads never get tasks (`TerminalStage`), and the absorbing
/// negatives have no template (`NoTemplate`).
pub fn task_title(
    stage: Stage,
    lead_display_name: &str,
    demo_count: i32,
) -> Result<String, PipelineError> {
    let name = display_name_or_fallback(lead_display_name);
    match stage {
        Stage::New => Ok(format!("First Call – {name}")),
        Stage::Responded => Ok(format!("Schedule Demo – {name}")),
        Stage::DemoScheduled | Stage::DemoCompleted => {
            if demo_count <= 1 {
                Ok(format!("Demo with {name}"))
            } else {
                Ok(format!("Second Demo – {name}"))
            }
        }
        Stage::Srs => Ok(format!("SRS Follow-up – {name}")),
        Stage::Converted => Err(PipelineError::TerminalStage),
        Stage::Disqualified | Stage::Junk => Err(PipelineError::NoTemplate(stage)),
    }
}
