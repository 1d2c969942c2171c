//! Expression-level rewrites.

use std::mem;

use crate::analysis::{Analysis, is_valid_identifier};
use crate::ast::{
    BinaryOp, Expr, Ident, Lit, LogicalOp, MemberProp, PropKey, UnaryOp,
};
use crate::visit::{ExprCtx, Flow};

/// Placeholder used while a subtree is moved out of its slot.
fn hole() -> Expr {
    Expr::null()
}

/// Referenced `undefined` → `void 0`.
pub(crate) fn undefined_to_void_zero(expr: &mut Expr, ctx: ExprCtx, _: &dyn Analysis) -> Flow {
    if ctx.assign_target {
        return Flow::Clean;
    }
    match expr {
        Expr::Ident(ident) if ident.name == "undefined" => {
            *expr = Expr::void_zero();
            Flow::Revisit
        }
        _ => Flow::Clean,
    }
}

/// `true` → `!0`, `false` → `!1`.
pub(crate) fn compress_bool_literal(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    match expr {
        Expr::Lit(Lit::Bool(value)) => {
            let digit = if *value { 0.0 } else { 1.0 };
            *expr = Expr::not(Expr::num(digit));
            Flow::Revisit
        }
        _ => Flow::Clean,
    }
}

/// String-literal property keys that form valid identifiers become plain
/// names: `{ "foo": v }` → `{ foo: v }`, `{ ["foo"]: v }` likewise.
pub(crate) fn literal_keys_to_names(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    let Expr::Object(object) = expr else {
        return Flow::Clean;
    };
    let mut changed = false;
    for property in &mut object.properties {
        let name = match &property.key {
            PropKey::Str(value) if is_valid_identifier(value) => value.clone(),
            PropKey::Computed(key) => match key.as_str_lit() {
                Some(value) if is_valid_identifier(value) => value.to_owned(),
                _ => continue,
            },
            _ => continue,
        };
        property.key = PropKey::Ident(Ident::new(name));
        changed = true;
    }
    if changed { Flow::Changed } else { Flow::Clean }
}

/// `a["foo"]` → `a.foo` when the key is a valid identifier.
pub(crate) fn computed_access_to_dotted(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    let Expr::Member(member) = expr else {
        return Flow::Clean;
    };
    let name = match &member.property {
        MemberProp::Computed(property) => match property.as_str_lit() {
            Some(value) if is_valid_identifier(value) => Ident::new(value),
            _ => return Flow::Clean,
        },
        MemberProp::Name(_) => return Flow::Clean,
    };
    member.property = MemberProp::Name(name);
    Flow::Changed
}

fn is_global_call(expr: &Expr, name: &str) -> bool {
    matches!(
        expr,
        Expr::Call(call)
            if call.arguments.len() == 1
                && matches!(&*call.callee, Expr::Ident(ident) if ident.name == name)
    )
}

/// `Number(x)` → `+x`.
pub(crate) fn number_call_to_coercion(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    if !is_global_call(expr, "Number") {
        return Flow::Clean;
    }
    let Expr::Call(mut call) = mem::replace(expr, hole()) else {
        unreachable!("shape checked above");
    };
    let argument = call.arguments.pop().expect("arity checked above");
    *expr = Expr::unary(UnaryOp::Plus, argument);
    Flow::Revisit
}

/// `String(x)` → `x + ""`.
pub(crate) fn string_call_to_concat(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    if !is_global_call(expr, "String") {
        return Flow::Clean;
    }
    let Expr::Call(mut call) = mem::replace(expr, hole()) else {
        unreachable!("shape checked above");
    };
    let argument = call.arguments.pop().expect("arity checked above");
    *expr = Expr::binary(BinaryOp::Add, argument, Expr::str_lit(""));
    Flow::Revisit
}

/// Prefix the callee of a statement-position IIFE with `!`.
///
/// The printed form `!function () {…}()` re-parses as a negated call, which
/// saves the wrapping parentheses the serializer would otherwise need.
/// Only applied where the expression value is discarded.
pub(crate) fn mark_statement_iife(expr: &mut Expr, ctx: ExprCtx, _: &dyn Analysis) -> Flow {
    if !ctx.discarded || !ctx.stmt_or_seq_child {
        return Flow::Clean;
    }
    let Expr::Call(call) = expr else {
        return Flow::Clean;
    };
    if !matches!(&*call.callee, Expr::Function(_)) {
        return Flow::Clean;
    }
    let callee = mem::replace(&mut *call.callee, hole());
    *call.callee = Expr::not(callee);
    Flow::Changed
}

/// `!a && b` → `a || b`, valid only where the result is discarded (the
/// two forms agree on effects and on which operand runs, not on the
/// value).
pub(crate) fn negated_and_to_or(expr: &mut Expr, ctx: ExprCtx, _: &dyn Analysis) -> Flow {
    if !ctx.discarded {
        return Flow::Clean;
    }
    let Expr::Logical(logical) = expr else {
        return Flow::Clean;
    };
    if logical.op != LogicalOp::And {
        return Flow::Clean;
    }
    if !matches!(&*logical.left, Expr::Unary(unary) if unary.op == UnaryOp::Not) {
        return Flow::Clean;
    }
    let Expr::Unary(unary) = mem::replace(&mut *logical.left, hole()) else {
        unreachable!("shape checked above");
    };
    *logical.left = *unary.argument;
    logical.op = LogicalOp::Or;
    Flow::Changed
}

/// Equality operands flip so the pure side lands on the left; when both
/// sides are pure, the structural fingerprint decides a canonical order so
/// the rule recognizes its own output.
pub(crate) fn flip_equality_toward_pure(
    expr: &mut Expr,
    _: ExprCtx,
    analysis: &dyn Analysis,
) -> Flow {
    let Expr::Binary(binary) = expr else {
        return Flow::Clean;
    };
    if !binary.op.is_equality() {
        return Flow::Clean;
    }
    if !analysis.is_pure(&binary.right) {
        return Flow::Clean;
    }
    let flip = if analysis.is_pure(&binary.left) {
        // Swapping two pure operands is unobservable; order by key.
        binary.left.fingerprint() > binary.right.fingerprint()
    } else {
        // The pure side may move across the impure side without
        // reordering any effect.
        true
    };
    if flip {
        mem::swap(&mut binary.left, &mut binary.right);
        Flow::Changed
    } else {
        Flow::Clean
    }
}

/// `===`/`!==` → `==`/`!=` when both sides provably share a primitive
/// type tag.
pub(crate) fn loosen_strict_equality(
    expr: &mut Expr,
    _: ExprCtx,
    analysis: &dyn Analysis,
) -> Flow {
    let Expr::Binary(binary) = expr else {
        return Flow::Clean;
    };
    let Some(loosened) = binary.op.loosened() else {
        return Flow::Clean;
    };
    if analysis.base_type_matches(&binary.left, &binary.right) {
        binary.op = loosened;
        Flow::Changed
    } else {
        Flow::Clean
    }
}

/// If `test` is a negation (`!x`) or a negated equality (`!=`/`!==`),
/// rewrite it to the positive form and report that the branches of the
/// enclosing conditional must swap. Shared by the conditional-expression
/// and `if`-statement flips.
pub(crate) fn strip_negation(test: &mut Expr) -> bool {
    match test {
        Expr::Unary(unary) if unary.op == UnaryOp::Not => {
            let Expr::Unary(unary) = mem::replace(test, hole()) else {
                unreachable!("shape checked above");
            };
            *test = *unary.argument;
            true
        }
        Expr::Binary(binary) if matches!(binary.op, BinaryOp::NotEq | BinaryOp::NotEqEq) => {
            binary.op = binary.op.toggled_equality().expect("negated equality");
            true
        }
        _ => false,
    }
}

/// `!x ? a : b` → `x ? b : a`; `x != y ? a : b` → `x == y ? b : a`.
pub(crate) fn flip_negated_conditional(expr: &mut Expr, _: ExprCtx, _: &dyn Analysis) -> Flow {
    let Expr::Cond(cond) = expr else {
        return Flow::Clean;
    };
    let mut changed = false;
    // `!!x` sheds one negation per round; keep going until the test is
    // positive.
    while strip_negation(&mut cond.test) {
        mem::swap(&mut cond.consequent, &mut cond.alternate);
        changed = true;
    }
    if changed { Flow::Changed } else { Flow::Clean }
}
