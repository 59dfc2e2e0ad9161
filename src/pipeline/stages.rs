//! The stage successor table and task eligibility.

use crate::types::Stage;

/// Single successor for each active stage; `None` for the terminal stage.
///
/// The absorbing stages have no successor and are never produced here; a
/// lead only reaches Disqualified or Junk through the first-call and
/// response-check resolver branches.
pub fn next_stage(stage: Stage) -> Option<Stage> {
    match stage {
        Stage::New => Some(Stage::Responded),
        Stage::Responded => Some(Stage::DemoScheduled),
        Stage::DemoScheduled => Some(Stage::DemoCompleted),
        Stage::DemoCompleted => Some(Stage::Srs),
        Stage::Srs => Some(Stage::Converted),
        Stage::Converted => None,
        Stage::Disqualified | Stage::Junk => None,
    }
}

/// Whether a new task may be opened for a lead in this stage.
///
/// Only Converted is closed to new tasks. The absorbing negatives report
/// true, matching the legacy behavior the original UI shipped with; the
/// spawn path separately refuses to auto-create tasks for them.
pub fn can_open_task(stage: Stage) -> bool {
    !matches!(stage, Stage::Converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVE_CHAIN: [Stage; 6] = [
        Stage::New,
        Stage::Responded,
        Stage::DemoScheduled,
        Stage::DemoCompleted,
        Stage::Srs,
        Stage::Converted,
    ];

    #[test]
    fn test_chain_reaches_converted_in_five_steps() {
        let mut stage = Stage::New;
        let mut visited = vec![stage];
        let mut steps = 0;
        while let Some(next) = next_stage(stage) {
            assert!(!visited.contains(&next), "no stage is ever revisited");
            visited.push(next);
            stage = next;
            steps += 1;
        }
        assert_eq!(steps, 5);
        assert_eq!(stage, Stage::Converted);
        assert_eq!(visited, ACTIVE_CHAIN);
    }

    #[test]
    fn test_terminal_and_absorbing_have_no_successor() {
        assert_eq!(next_stage(Stage::Converted), None);
        assert_eq!(next_stage(Stage::Disqualified), None);
        assert_eq!(next_stage(Stage::Junk), None);
    }

    #[test]
    fn test_every_active_stage_has_successor() {
        for stage in &ACTIVE_CHAIN[..ACTIVE_CHAIN.len() - 1] {
            assert!(next_stage(*stage).is_some(), "{:?} needs a successor", stage);
        }
    }

    #[test]
    fn test_absorbing_never_produced_by_table() {
        for stage in ACTIVE_CHAIN {
            if let Some(next) = next_stage(stage) {
                assert!(!next.is_absorbing(), "{:?} -> {:?} is absorbing", stage, next);
            }
        }
    }

    #[test]
    fn test_can_open_task() {
        assert!(!can_open_task(Stage::Converted));
        for stage in [
            Stage::New,
            Stage::Responded,
            Stage::DemoScheduled,
            Stage::DemoCompleted,
            Stage::Srs,
            Stage::Disqualified,
            Stage::Junk,
        ] {
            assert!(can_open_task(stage), "{:?} should accept tasks", stage);
        }
    }
}
