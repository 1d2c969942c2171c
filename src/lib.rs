//! # esimplify
//!
//! AST simplification pass for ECMAScript-style minification. Consumes a
//! parsed program, produces a semantically-equivalent tree that
//! serializes shorter. Parsing, printing, scope analysis and the other
//! minifier passes are the embedder's business.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! rules     → per-node-kind rewrite rules (the if-cascade lives here)
//!   ↓
//! visit     → traversal driver, path handles, fixed-point controller
//!   ↓
//! fold      → statement-list → sequence-expression folding
//!   ↓
//! analysis  → predicate seam to the embedder's scope analyzer
//!   ↓
//! validate  → input well-formedness checking
//!   ↓
//! ast       → owned tagged AST: expressions, statements, operators
//! ```
//!
//! ## Example
//!
//! ```
//! use esimplify::{simplify, SyntacticAnalysis};
//! use esimplify::ast::{Expr, Program, Stmt};
//!
//! // if (x) { foo(); } else { bar(); }
//! let program = Program {
//!     body: vec![Stmt::if_else(
//!         Expr::ident("x"),
//!         Stmt::block(vec![Stmt::expr(Expr::call_ident("foo", vec![]))]),
//!         Stmt::block(vec![Stmt::expr(Expr::call_ident("bar", vec![]))]),
//!     )],
//! };
//!
//! let simplified = simplify(program, &SyntacticAnalysis).unwrap();
//!
//! // x ? foo() : bar();
//! assert_eq!(
//!     simplified.body,
//!     vec![Stmt::expr(Expr::cond(
//!         Expr::ident("x"),
//!         Expr::call_ident("foo", vec![]),
//!         Expr::call_ident("bar", vec![]),
//!     ))]
//! );
//! ```

/// Owned tagged AST: expressions, statements, operator alphabets.
pub mod ast;

/// Predicate seam to the embedder's scope analyzer.
pub mod analysis;

/// Error surface.
pub mod error;

/// Input well-formedness checking.
pub mod validate;

mod fold;
mod rules;
mod visit;

pub use analysis::{Analysis, SyntacticAnalysis, is_valid_identifier};
pub use error::SimplifyError;

use ast::Program;

/// Simplify `program` to a semantically-equivalent tree that serializes
/// shorter.
///
/// Validates the input, then re-drives the rewrite traversal until no
/// rule reports a change.
pub fn simplify(
    mut program: Program,
    analysis: &dyn Analysis,
) -> Result<Program, SimplifyError> {
    validate::validate(&program)?;
    visit::run_to_fixed_point(&mut program, analysis)?;
    Ok(program)
}
