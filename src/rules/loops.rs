//! Loop rewrites.

use std::mem;

use crate::analysis::Analysis;
use crate::ast::{ForStmt, Stmt};
use crate::visit::{Flow, StmtPath};

/// Body slot of any loop kind.
fn loop_body_mut(stmt: &mut Stmt) -> Option<&mut Box<Stmt>> {
    match stmt {
        Stmt::For(s) => Some(&mut s.body),
        Stmt::ForIn(s) => Some(&mut s.body),
        Stmt::ForOf(s) => Some(&mut s.body),
        Stmt::While(s) => Some(&mut s.body),
        Stmt::DoWhile(s) => Some(&mut s.body),
        _ => None,
    }
}

/// `while (c) { s; }` → `while (c) s;` for every loop kind, unless the
/// lone statement binds to the block.
pub(crate) fn unwrap_single_statement_body(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let Some(body) = loop_body_mut(path.current_mut()) else {
        return Flow::Clean;
    };
    let unwrappable = matches!(
        &**body,
        Stmt::Block(block) if block.body.len() == 1 && !block.body[0].is_block_scoped_decl()
    );
    if !unwrappable {
        return Flow::Clean;
    }
    let Stmt::Block(block) = &mut **body else {
        unreachable!("shape checked above");
    };
    let inner = block.body.pop().expect("length checked above");
    **body = inner;
    Flow::Changed
}

/// `while (test) body` → `for (; test; ) body`.
///
/// The replacement is re-visited, so the `for`-only rewrites (init
/// absorption, body unwrap) get their chance in the same pass.
pub(crate) fn while_to_for(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let current = path.current_mut();
    if !matches!(current, Stmt::While(_)) {
        return Flow::Clean;
    }
    let Stmt::While(while_stmt) = mem::replace(current, Stmt::Empty) else {
        unreachable!("shape checked above");
    };
    *current = Stmt::For(ForStmt {
        init: None,
        test: Some(while_stmt.test),
        update: None,
        body: while_stmt.body,
    });
    Flow::Revisit
}
