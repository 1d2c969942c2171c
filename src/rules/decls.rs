//! Declaration and `for`-head rewrites.

use crate::analysis::Analysis;
use crate::ast::{DeclKind, Expr, ForInit, ForStmt, Stmt};
use crate::visit::{Flow, StmtPath};

/// Stable-partition a block body so every function declaration precedes
/// every other statement. Returns whether the order changed.
///
/// Runs on block enter so the sibling-relocating rules and the folder see
/// the final order.
pub(crate) fn hoist_fn_decls(body: &mut Vec<Stmt>) -> bool {
    let mut seen_other = false;
    let mut disordered = false;
    for stmt in body.iter() {
        match stmt {
            Stmt::FnDecl(_) if seen_other => {
                disordered = true;
                break;
            }
            Stmt::FnDecl(_) => {}
            _ => seen_other = true,
        }
    }
    if !disordered {
        return false;
    }
    let mut decls = Vec::new();
    let mut rest = Vec::with_capacity(body.len());
    for stmt in body.drain(..) {
        if matches!(stmt, Stmt::FnDecl(_)) {
            decls.push(stmt);
        } else {
            rest.push(stmt);
        }
    }
    decls.extend(rest);
    *body = decls;
    true
}

/// Absorb immediately following declarations of the same kind:
/// `var a = 1; var b = 2;` → `var a = 1, b = 2;`.
pub(crate) fn concat_var_decls(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let Stmt::VarDecl(decl) = path.current() else {
        return Flow::Clean;
    };
    let kind = decl.kind;
    let mut changed = false;
    while matches!(path.sibling(1), Some(Stmt::VarDecl(next)) if next.kind == kind) {
        let Some(Stmt::VarDecl(next)) = path.take_next() else {
            unreachable!("sibling shape checked above");
        };
        let Stmt::VarDecl(decl) = path.current_mut() else {
            unreachable!("current shape checked above");
        };
        decl.declarations.extend(next.declarations);
        changed = true;
    }
    if changed { Flow::Changed } else { Flow::Clean }
}

/// Move a `var` declaration into a directly following `for` whose init is
/// empty or a `var` declaration: `var a = 1; for (var c = 3; …)` →
/// `for (var a = 1, c = 3; …)`.
///
/// Restricted to `var`: a `let`/`const` moved into a `for` head acquires
/// per-iteration bindings, which closures in the body can observe.
pub(crate) fn merge_decl_into_for(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let Stmt::VarDecl(decl) = path.current() else {
        return Flow::Clean;
    };
    if decl.kind != DeclKind::Var {
        return Flow::Clean;
    }
    let absorbable = match path.sibling(1) {
        Some(Stmt::For(next)) => match &next.init {
            None => true,
            Some(ForInit::Decl(init)) => init.kind == DeclKind::Var,
            Some(ForInit::Expr(_)) => false,
        },
        _ => false,
    };
    if !absorbable {
        return Flow::Clean;
    }
    let Stmt::VarDecl(decl) = path.remove() else {
        unreachable!("current shape checked above");
    };
    let Stmt::For(next) = path.current_mut() else {
        unreachable!("sibling shape checked above");
    };
    match &mut next.init {
        Some(ForInit::Decl(init)) => {
            init.declarations.splice(0..0, decl.declarations);
        }
        init @ None => *init = Some(ForInit::Decl(decl)),
        Some(ForInit::Expr(_)) => unreachable!("absorbability checked above"),
    }
    Flow::Removed
}

/// What [`absorb_preceding_into_init`] decided to consume.
enum Absorb {
    Decl,
    Expr,
    Nothing,
}

/// Consume the statement preceding a `for` into its init slot: an
/// expression statement comma-joins with an expression init, a `var`
/// declaration fills an empty init.
pub(crate) fn absorb_preceding_into_init(path: &mut StmtPath<'_>, _: &dyn Analysis) -> Flow {
    let absorb = {
        let Stmt::For(for_stmt) = path.current() else {
            return Flow::Clean;
        };
        match path.sibling(-1) {
            Some(Stmt::VarDecl(prev))
                if prev.kind == DeclKind::Var && for_stmt.init.is_none() =>
            {
                Absorb::Decl
            }
            Some(Stmt::Expr(_)) if matches!(for_stmt.init, None | Some(ForInit::Expr(_))) => {
                Absorb::Expr
            }
            _ => Absorb::Nothing,
        }
    };
    match absorb {
        Absorb::Decl => {
            let Some(Stmt::VarDecl(decl)) = path.take_prev() else {
                unreachable!("sibling shape checked above");
            };
            let Stmt::For(for_stmt) = path.current_mut() else {
                unreachable!("current shape checked above");
            };
            for_stmt.init = Some(ForInit::Decl(decl));
            Flow::Changed
        }
        Absorb::Expr => {
            let Some(Stmt::Expr(prev)) = path.take_prev() else {
                unreachable!("sibling shape checked above");
            };
            let Stmt::For(for_stmt) = path.current_mut() else {
                unreachable!("current shape checked above");
            };
            prepend_to_init(for_stmt, prev.expression);
            Flow::Changed
        }
        Absorb::Nothing => Flow::Clean,
    }
}

fn prepend_to_init(for_stmt: &mut ForStmt, expr: Expr) {
    for_stmt.init = Some(ForInit::Expr(match for_stmt.init.take() {
        None => expr,
        Some(ForInit::Expr(existing)) => Expr::seq(vec![expr, existing]),
        Some(ForInit::Decl(_)) => unreachable!("absorbability checked by caller"),
    }));
}
