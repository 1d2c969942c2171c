//! Error types for the simplification pass.

use thiserror::Error;

/// Errors surfaced to the embedder. No partial tree accompanies an error.
#[derive(Debug, Error)]
pub enum SimplifyError {
    /// The input tree violates a well-formedness invariant the rewrite
    /// rules depend on.
    #[error("malformed input: {kind}: {message}")]
    Malformed {
        /// Node kind at fault.
        kind: &'static str,
        message: String,
    },

    /// The fixed-point loop hit its iteration cap. Every rewrite strictly
    /// shrinks the tree measure, so this indicates a rule bug.
    #[error(
        "simplification did not reach a fixed point after {passes} passes \
         (last change from rule `{last_rule}`)"
    )]
    NonTerminating { passes: u32, last_rule: &'static str },
}
