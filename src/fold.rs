//! Statement-to-sequence folding.
//!
//! A run of expressible statements collapses into one expression
//! statement carrying a comma sequence. The first non-expressible
//! statement ends the run: whatever accumulated so far is emitted, the
//! blocker is kept verbatim, and folding restarts after it.

use crate::analysis::Analysis;
use crate::ast::{Expr, Stmt};
use crate::visit::{Flow, StmtPath};

/// A statement the folder can express as a (possibly absent) expression:
/// expression statements, `if`s whose branches are expressible, fully
/// expressible blocks, and empty statements.
fn is_expressible(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Empty | Stmt::Expr(_) => true,
        Stmt::If(if_stmt) => {
            is_expressible(&if_stmt.consequent)
                && if_stmt.alternate.as_deref().is_none_or(is_expressible)
        }
        // A block with a lexical declaration is not expressible; the
        // declaration itself blocks.
        Stmt::Block(block) => block.body.iter().all(is_expressible),
        _ => false,
    }
}

/// Convert an expressible statement. `None` means the statement
/// contributes nothing (`;`, `{}`).
fn into_expr(stmt: Stmt) -> Option<Expr> {
    match stmt {
        Stmt::Empty => None,
        Stmt::Expr(stmt) => Some(stmt.expression),
        Stmt::If(if_stmt) => {
            let consequent = into_expr(*if_stmt.consequent);
            let alternate = if_stmt.alternate.and_then(|alt| into_expr(*alt));
            Some(match (consequent, alternate) {
                (Some(c), Some(a)) => Expr::cond(if_stmt.test, c, a),
                (Some(c), None) => Expr::and(if_stmt.test, c),
                (None, Some(a)) => Expr::or(if_stmt.test, a),
                (None, None) => if_stmt.test,
            })
        }
        Stmt::Block(block) => {
            let exprs: Vec<Expr> = block.body.into_iter().filter_map(into_expr).collect();
            if exprs.is_empty() {
                None
            } else {
                Some(Expr::seq_or_single(exprs))
            }
        }
        other => unreachable!("not expressible: {}", other.kind_name()),
    }
}

pub(crate) struct FoldOutcome {
    pub stmts: Vec<Stmt>,
    pub changed: bool,
}

/// Fold every maximal expressible run in `stmts`; blockers are kept in
/// place.
pub(crate) fn fold_stmt_list(stmts: Vec<Stmt>) -> FoldOutcome {
    let mut out = Vec::with_capacity(stmts.len());
    let mut changed = false;

    // Accumulated expressions of the current run and how many statements
    // contributed to them.
    let mut run: Vec<Expr> = Vec::new();
    let mut contributed = 0usize;

    let mut flush = |run: &mut Vec<Expr>, contributed: &mut usize, out: &mut Vec<Stmt>| {
        if !run.is_empty() {
            out.push(Stmt::expr(Expr::seq_or_single(std::mem::take(run))));
        }
        *contributed = 0;
    };

    for stmt in stmts {
        if is_expressible(&stmt) {
            // Merging two contributing statements, dropping an empty one,
            // or expressing an `if`/block are all real rewrites; splitting
            // an existing sequence back out of one statement is not.
            let trivial = matches!(stmt, Stmt::Expr(_));
            match into_expr(stmt) {
                Some(expr) => {
                    run.push(expr);
                    contributed += 1;
                    if !trivial || contributed > 1 {
                        changed = true;
                    }
                }
                None => changed = true,
            }
        } else {
            flush(&mut run, &mut contributed, &mut out);
            out.push(stmt);
        }
    }
    flush(&mut run, &mut contributed, &mut out);

    FoldOutcome {
        stmts: out,
        changed,
    }
}

/// Replacement policy for folded blocks: a block statement left holding
/// exactly one statement dissolves into it, unless that statement binds to
/// the block. Function bodies and `try`/`catch`/`finally` bodies are typed
/// [`crate::ast::Block`] rather than `Stmt` and so can never reach this
/// rule.
pub(crate) fn dissolve_block(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let dissolvable = matches!(
        path.current(),
        Stmt::Block(block) if block.body.len() == 1 && !block.body[0].is_block_scoped_decl()
    );
    if !dissolvable {
        return Flow::Clean;
    }
    let Stmt::Block(block) = path.current_mut() else {
        unreachable!("shape checked above");
    };
    let inner = block.body.pop().expect("length checked above");
    *path.current_mut() = inner;
    Flow::Revisit
}
