//! Error types for pipeline operations
//!
//! Errors are classified by what the caller should do with them:
//! - Validation: fix the input and resubmit; nothing was written
//! - NotFound: the referenced lead/task does not exist; nothing was created
//! - Storage: a gateway write/read failed; the enclosing transaction rolled back

use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::types::{CompletionOutcome, FlowKind};

/// Error surfaced by the services and the completion resolver.
#[derive(Debug, Error)]
pub enum CrmError {
    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A comment is required to complete this task")]
    CommentRequired,

    #[error("Outcome {outcome:?} is not valid for a {flow:?} task")]
    OutcomeMismatch {
        flow: FlowKind,
        outcome: CompletionOutcome,
    },

    #[error("Unrecognized stage value: {0:?}")]
    InvalidStage(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    // Not-found errors
    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    // Collaborator failures
    #[error("Storage error: {0}")]
    Storage(#[from] crate::db::DbError),
}

impl CrmError {
    /// Returns true if the caller can fix this by correcting input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CrmError::Validation(_)
                | CrmError::CommentRequired
                | CrmError::OutcomeMismatch { .. }
                | CrmError::InvalidStage(_)
                | CrmError::Pipeline(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CrmError::LeadNotFound(_) | CrmError::TaskNotFound(_))
    }
}

/// Serializable error representation for the front-end boundary.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Validation,
    NotFound,
    Storage,
}

impl From<&CrmError> for ApiError {
    fn from(err: &CrmError) -> Self {
        let error_type = if err.is_validation() {
            ErrorType::Validation
        } else if err.is_not_found() {
            ErrorType::NotFound
        } else {
            ErrorType::Storage
        };

        ApiError {
            message: err.to_string(),
            error_type,
            // Storage failures roll back cleanly, so a retry is safe.
            can_retry: !err.is_validation() && !err.is_not_found(),
        }
    }
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        ApiError::from(&err)
    }
}
