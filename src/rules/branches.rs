//! The `if`-statement simplification cascade.
//!
//! Sub-rules run in a fixed order on `if` exit; the first one that
//! replaces the statement ends the cascade and the walker re-visits the
//! replacement from scratch.

use std::mem;

use crate::analysis::Analysis;
use crate::ast::{Expr, Stmt};
use crate::visit::{Flow, StmtPath};

use super::exprs::strip_negation;

/// Replace the current statement, leaving a placeholder for the blink of
/// the swap.
fn take_current(path: &mut StmtPath<'_>) -> Stmt {
    mem::replace(path.current_mut(), Stmt::Empty)
}

/// A `return` argument where a value is required: the argument itself or
/// `void 0`.
fn arg_or_void_zero(argument: Option<Expr>) -> Expr {
    argument.unwrap_or_else(Expr::void_zero)
}

/// The statement unconditionally returns when it runs to its end: a
/// `return`, or a block whose final statement is one.
fn ends_in_return(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::Block(block) => matches!(block.body.last(), Some(Stmt::Return(_))),
        _ => false,
    }
}

/// Invert the truthiness of `test`: strip a negation, toggle an equality
/// operator, or wrap in `!`.
fn invert_test(test: &mut Expr) {
    if strip_negation(test) {
        return;
    }
    if let Expr::Binary(binary) = test {
        if let Some(toggled) = binary.op.toggled_equality() {
            binary.op = toggled;
            return;
        }
    }
    let positive = mem::replace(test, Expr::null());
    *test = Expr::not(positive);
}

/// A branch that is a block of exactly one statement collapses to that
/// statement, unless the statement binds to the block.
fn coerce_branch(branch: &mut Stmt) -> bool {
    let coercible = matches!(
        branch,
        Stmt::Block(block) if block.body.len() == 1 && !block.body[0].is_block_scoped_decl()
    );
    if !coercible {
        return false;
    }
    let Stmt::Block(block) = branch else {
        unreachable!("shape checked above");
    };
    *branch = block.body.pop().expect("length checked above");
    true
}

pub(crate) fn simplify_if(path: &mut StmtPath<'_>, analysis: &dyn Analysis) -> Flow {
    if !matches!(path.current(), Stmt::If(_)) {
        return Flow::Clean;
    }
    let mut changed = false;

    // 1. Coerce single-statement block branches.
    {
        let Stmt::If(if_stmt) = path.current_mut() else {
            unreachable!("kind checked on entry");
        };
        changed |= coerce_branch(&mut if_stmt.consequent);
        if let Some(alternate) = &mut if_stmt.alternate {
            changed |= coerce_branch(alternate);
        }
    }

    // 2. Negation flip: `if (!x) a; else b;` → `if (x) b; else a;`.
    {
        let Stmt::If(if_stmt) = path.current_mut() else {
            unreachable!("kind checked on entry");
        };
        while if_stmt.alternate.is_some() && strip_negation(&mut if_stmt.test) {
            let alternate = if_stmt.alternate.take().expect("presence checked above");
            let consequent = mem::replace(&mut if_stmt.consequent, alternate);
            if_stmt.alternate = Some(consequent);
            changed = true;
        }
    }

    // 3. Guarded expression: `if (t) e;` → `t && e;` where the statement
    // value is unobservable.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            if_stmt.alternate.is_none() && matches!(*if_stmt.consequent, Stmt::Expr(_))
        };
        if candidate && !path.is_completion_record(analysis) {
            let Stmt::If(if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::Expr(consequent) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            *path.current_mut() = Stmt::expr(Expr::and(if_stmt.test, consequent.expression));
            return Flow::Revisit;
        }
    }

    // 4. Ternary: `if (t) a; else b;` → `t ? a : b;`.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            matches!(*if_stmt.consequent, Stmt::Expr(_))
                && matches!(if_stmt.alternate.as_deref(), Some(Stmt::Expr(_)))
        };
        if candidate {
            let Stmt::If(if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::Expr(consequent) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            let Some(alternate) = if_stmt.alternate else {
                unreachable!("shape checked above");
            };
            let Stmt::Expr(alternate) = *alternate else {
                unreachable!("shape checked above");
            };
            *path.current_mut() = Stmt::expr(Expr::cond(
                if_stmt.test,
                consequent.expression,
                alternate.expression,
            ));
            return Flow::Revisit;
        }
    }

    // 5. Dual return in final position:
    // `if (t) return x; else return y;` → `return t ? x : y;`.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            matches!(*if_stmt.consequent, Stmt::Return(_))
                && matches!(if_stmt.alternate.as_deref(), Some(Stmt::Return(_)))
        };
        if candidate && path.is_last() {
            let Stmt::If(if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::Return(consequent) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            let Stmt::Return(alternate) = *if_stmt.alternate.expect("presence checked above")
            else {
                unreachable!("shape checked above");
            };
            *path.current_mut() = Stmt::ret(Some(Expr::cond(
                if_stmt.test,
                arg_or_void_zero(consequent.argument),
                arg_or_void_zero(alternate.argument),
            )));
            return Flow::Revisit;
        }
    }

    // 6. Return followed by a sibling return:
    // `if (t) return x; return y;` → `return t ? x : y;`.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            if_stmt.alternate.is_none() && matches!(*if_stmt.consequent, Stmt::Return(_))
        };
        if candidate && matches!(path.sibling(1), Some(Stmt::Return(_))) {
            let Some(Stmt::Return(next)) = path.take_next() else {
                unreachable!("sibling shape checked above");
            };
            let Stmt::If(if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::Return(consequent) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            *path.current_mut() = Stmt::ret(Some(Expr::cond(
                if_stmt.test,
                arg_or_void_zero(consequent.argument),
                arg_or_void_zero(next.argument),
            )));
            return Flow::Revisit;
        }
    }

    // 7. Return followed by a final expression statement. With a return
    // value: `if (t) return x; e;` → `return t ? x : void e;`. Without
    // one the `return` is dropped instead: `return t || void e` would
    // leak a truthy `t` as the return value. Only sound on the function
    // body's own list: in a nested block, "last sibling" does not mean
    // "nothing runs afterwards", and the merged `return` would skip it.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            path.in_function_list
                && if_stmt.alternate.is_none()
                && matches!(*if_stmt.consequent, Stmt::Return(_))
        };
        if candidate
            && matches!(path.sibling(1), Some(Stmt::Expr(_)))
            && path.sibling(2).is_none()
        {
            let Some(Stmt::Expr(last)) = path.take_next() else {
                unreachable!("sibling shape checked above");
            };
            let Stmt::If(if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::Return(consequent) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            *path.current_mut() = match consequent.argument {
                Some(argument) => Stmt::ret(Some(Expr::cond(
                    if_stmt.test,
                    argument,
                    Expr::unary(crate::ast::UnaryOp::Void, last.expression),
                ))),
                None => Stmt::expr(Expr::or(if_stmt.test, last.expression)),
            };
            return Flow::Revisit;
        }
    }

    // 8. Lift an `else` that can never run past its `if`:
    // `if (t) return x; else s;` → `if (t) return x; s;`.
    {
        let liftable = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            path.in_list()
                && matches!(
                    if_stmt.alternate.as_deref(),
                    Some(alternate) if !alternate.is_block_scoped_decl()
                )
                && ends_in_return(&if_stmt.consequent)
        };
        if liftable {
            let lifted = {
                let Stmt::If(if_stmt) = path.current_mut() else {
                    unreachable!("kind checked on entry");
                };
                let alternate = *if_stmt.alternate.take().expect("presence checked above");
                match alternate {
                    // Splice block contents unless a member binds to the
                    // block.
                    Stmt::Block(block)
                        if block.body.iter().all(|s| !s.is_block_scoped_decl()) =>
                    {
                        block.body
                    }
                    other => vec![other],
                }
            };
            path.insert_after(lifted);
            changed = true;
        }
    }

    // 9. Fold `if (a) if (b) s;` into `if (a && b) s;`.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            if_stmt.alternate.is_none()
                && matches!(&*if_stmt.consequent, Stmt::If(inner) if inner.alternate.is_none())
        };
        if candidate {
            let Stmt::If(mut if_stmt) = take_current(path) else {
                unreachable!("kind checked on entry");
            };
            let Stmt::If(inner) = *if_stmt.consequent else {
                unreachable!("shape checked above");
            };
            if_stmt.test = Expr::and(if_stmt.test, inner.test);
            if_stmt.consequent = inner.consequent;
            *path.current_mut() = Stmt::If(if_stmt);
            return Flow::Revisit;
        }
    }

    // 10. Early-exit inversion inside a function body:
    // `if (t) return; rest…` → `if (!t) { rest… }`.
    {
        let candidate = {
            let Stmt::If(if_stmt) = path.current() else {
                unreachable!("kind checked on entry");
            };
            path.in_function_list
                && if_stmt.alternate.is_none()
                && matches!(&*if_stmt.consequent, Stmt::Return(ret) if ret.argument.is_none())
                && path.has_next()
        };
        // Consuming a lexical declaration into the new block would
        // re-scope it.
        let mut offset = 1;
        let mut tail_movable = true;
        while let Some(sibling) = path.sibling(offset) {
            if sibling.is_block_scoped_decl() {
                tail_movable = false;
                break;
            }
            offset += 1;
        }
        if candidate && tail_movable {
            let mut rest = path.split_off_rest();
            let Stmt::If(if_stmt) = path.current_mut() else {
                unreachable!("kind checked on entry");
            };
            invert_test(&mut if_stmt.test);
            if_stmt.consequent = Box::new(if rest.len() == 1 {
                rest.pop().expect("length checked")
            } else {
                Stmt::block(rest)
            });
            return Flow::Revisit;
        }
    }

    if changed { Flow::Changed } else { Flow::Clean }
}
