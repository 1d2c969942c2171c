//! Traversal: the walker that drives rules over the tree and the path
//! handles rules receive.

pub(crate) mod driver;
pub(crate) mod path;

pub(crate) use driver::run_to_fixed_point;
pub(crate) use path::{Flow, StmtPath};

/// Context of an expression position, propagated down the walk.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExprCtx {
    /// The value of this expression is never observed (expression
    /// statement, discarded sequence element, `for` init/update slot,
    /// `void` operand).
    pub discarded: bool,
    /// Direct child of an expression statement or a sequence expression.
    pub stmt_or_seq_child: bool,
    /// The expression is written to, not read (assignment target, update
    /// operand).
    pub assign_target: bool,
}
