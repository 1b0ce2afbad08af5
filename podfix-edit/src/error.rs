//! Error types for podfix-edit.
//!
//! This module defines error types that distinguish between:
//! - Policy blocks (exit code 2): strict mode refused a run with missing anchors
//! - Runtime errors (exit code 1): I/O errors, invalid SDK versions, discovery failures

use podfix_types::rules::RuleId;
use thiserror::Error;

/// The top-level error type for podfix-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// A policy block occurred (exit code 2).
    #[error("policy block: {0}")]
    PolicyBlock(#[from] PolicyBlockError),

    /// A runtime/tool error occurred (exit code 1).
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

/// Policy block errors that should result in exit code 2.
#[derive(Debug, Error)]
pub enum PolicyBlockError {
    /// One or more rules could not find the text they anchor on.
    #[error("anchor missing for {}: {message}", join_rules(.rules))]
    AnchorMissing {
        rules: Vec<RuleId>,
        message: String,
    },
}

fn join_rules(rules: &[RuleId]) -> String {
    rules
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EditError {
    /// Returns true if this is a policy block error (exit code 2).
    pub fn is_policy_block(&self) -> bool {
        matches!(self, EditError::PolicyBlock(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::PolicyBlock(_) => 2,
            EditError::Runtime(_) => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
