//! The lead-stage / task-lifecycle state machine.
//!
//! Everything with real branching lives here: the successor table
//! (`stages`), task title generation (`titles`), and the completion outcome
//! resolver (`resolver`). The modules are deliberately free of any command
//! or config plumbing so the whole machine is testable against a temp
//! database.

pub mod resolver;
pub mod stages;
pub mod titles;

pub use resolver::{resolve_completion, spawn_task_for_stage, CompletionRequest};
pub use stages::{can_open_task, next_stage};
pub use titles::task_title;

use thiserror::Error;

use crate::types::Stage;

/// Errors from the pure pipeline functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Unrecognized stage value: {0:?}")]
    InvalidStage(String),

    #[error("Tasks cannot be generated for a converted lead")]
    TerminalStage,

    #[error("No task template exists for the {} stage", .0.label())]
    NoTemplate(Stage),
}
