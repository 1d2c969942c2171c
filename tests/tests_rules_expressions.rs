//! Expression rewrite rules: references, literals, member access,
//! coercion calls, logical and equality canonicalization.

mod helpers;

use helpers::{call, call_stmt, run};

use esimplify::ast::{
    BinaryOp, Expr, Ident, MemberProp, ObjectLit, PropKey, Property, Stmt, UnaryOp,
};
use rstest::rstest;

// ============================================================================
// undefined → void 0
// ============================================================================

#[test]
fn test_undefined_reference_becomes_void_zero() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::ident("undefined"),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(Expr::ident("x"), Expr::void_zero()))]
    );
}

#[test]
fn test_undefined_member_name_is_not_a_reference() {
    // `a.undefined` names a property; only the base is a reference.
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::member(Expr::ident("a"), "undefined"),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("x"),
            Expr::member(Expr::ident("a"), "undefined"),
        ))]
    );
}

// ============================================================================
// Literal keys and computed access
// ============================================================================

#[test]
fn test_string_keys_become_names_where_valid() {
    let object = Expr::Object(ObjectLit {
        properties: vec![
            Property {
                key: PropKey::Str("foo".into()),
                value: Expr::num(1.0),
            },
            Property {
                key: PropKey::Str("a-b".into()),
                value: Expr::num(2.0),
            },
            Property {
                key: PropKey::Computed(Box::new(Expr::str_lit("baz"))),
                value: Expr::num(3.0),
            },
        ],
    });
    let out = run(vec![Stmt::expr(Expr::assign(Expr::ident("x"), object))]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected ExpressionStatement");
    };
    let Expr::Assign(assign) = &stmt.expression else {
        panic!("expected AssignmentExpression");
    };
    let Expr::Object(object) = &*assign.value else {
        panic!("expected ObjectExpression");
    };
    assert_eq!(object.properties[0].key, PropKey::Ident(Ident::new("foo")));
    // Not an identifier: stays a string key.
    assert_eq!(object.properties[1].key, PropKey::Str("a-b".into()));
    assert_eq!(object.properties[2].key, PropKey::Ident(Ident::new("baz")));
}

#[rstest]
#[case::valid_identifier("foo", true)]
#[case::hyphenated("a-b", false)]
#[case::leading_digit("1x", false)]
#[case::reserved_word("class", false)]
#[case::dollar("$el", true)]
fn test_computed_access(#[case] key: &str, #[case] becomes_dotted: bool) {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::member_computed(Expr::ident("o"), Expr::str_lit(key)),
    ))]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected ExpressionStatement");
    };
    let Expr::Assign(assign) = &stmt.expression else {
        panic!("expected AssignmentExpression");
    };
    let Expr::Member(member) = &*assign.value else {
        panic!("expected MemberExpression");
    };
    match &member.property {
        MemberProp::Name(ident) => {
            assert!(becomes_dotted, "`{key}` should have stayed computed");
            assert_eq!(ident.name, key);
        }
        MemberProp::Computed(_) => {
            assert!(!becomes_dotted, "`{key}` should have become dotted");
        }
    }
}

#[test]
fn test_non_literal_computed_access_is_kept() {
    let access = Expr::member_computed(Expr::ident("o"), Expr::ident("k"));
    let out = run(vec![Stmt::expr(Expr::assign(Expr::ident("x"), access.clone()))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(Expr::ident("x"), access))]
    );
}

// ============================================================================
// Coercion calls
// ============================================================================

#[test]
fn test_number_call_requires_exactly_one_argument() {
    let zero = Expr::call_ident("Number", vec![]);
    let two = Expr::call_ident("Number", vec![Expr::ident("a"), Expr::ident("b")]);
    let out = run(vec![
        Stmt::expr(Expr::assign(Expr::ident("x"), zero.clone())),
        Stmt::expr(Expr::assign(Expr::ident("y"), two.clone())),
    ]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected folded ExpressionStatement");
    };
    let Expr::Seq(seq) = &stmt.expression else {
        panic!("expected SequenceExpression");
    };
    assert_eq!(seq.exprs[0], Expr::assign(Expr::ident("x"), zero));
    assert_eq!(seq.exprs[1], Expr::assign(Expr::ident("y"), two));
}

#[test]
fn test_string_call_becomes_concat() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("s"),
        Expr::call_ident("String", vec![call("f")]),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("s"),
            Expr::binary(BinaryOp::Add, call("f"), Expr::str_lit("")),
        ))]
    );
}

// ============================================================================
// IIFE marker
// ============================================================================

fn iife() -> Expr {
    Expr::call(
        Expr::Function(esimplify::ast::FnExpr {
            name: None,
            params: vec![],
            body: esimplify::ast::Block {
                body: vec![call_stmt("init")],
            },
        }),
        vec![],
    )
}

#[test]
fn test_statement_iife_gets_negation_marker() {
    let out = run(vec![Stmt::expr(iife())]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected ExpressionStatement");
    };
    let Expr::Call(call) = &stmt.expression else {
        panic!("expected CallExpression");
    };
    let Expr::Unary(unary) = &*call.callee else {
        panic!("expected marked callee, got {}", call.callee.kind_name());
    };
    assert_eq!(unary.op, UnaryOp::Not);
    assert!(matches!(*unary.argument, Expr::Function(_)));
}

#[test]
fn test_used_iife_value_is_not_marked() {
    // The call result is assigned; negating would corrupt it.
    let out = run(vec![Stmt::expr(Expr::assign(Expr::ident("x"), iife()))]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected ExpressionStatement");
    };
    let Expr::Assign(assign) = &stmt.expression else {
        panic!("expected AssignmentExpression");
    };
    let Expr::Call(call) = &*assign.value else {
        panic!("expected CallExpression");
    };
    assert!(matches!(*call.callee, Expr::Function(_)));
}

// ============================================================================
// !a && b in discarded positions
// ============================================================================

#[test]
fn test_negated_and_statement_becomes_or() {
    let out = run(vec![Stmt::expr(Expr::and(
        Expr::not(Expr::ident("a")),
        call("b"),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::or(Expr::ident("a"), call("b")))]
    );
}

#[test]
fn test_negated_and_in_condition_is_kept() {
    // The test value is observed; `a || b` has different truthiness.
    let test = Expr::and(Expr::not(Expr::ident("a")), Expr::ident("b"));
    let out = run(vec![Stmt::if_stmt(test.clone(), Stmt::ret(None))]);
    let Stmt::If(if_stmt) = &out[0] else {
        panic!("expected IfStatement, got {}", out[0].kind_name());
    };
    assert_eq!(if_stmt.test, test);
}

// ============================================================================
// Equality canonicalization
// ============================================================================

#[test]
fn test_equality_flips_pure_operand_left() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("r"),
        Expr::binary(BinaryOp::EqEqEq, Expr::ident("x"), Expr::num(1.0)),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("r"),
            Expr::binary(BinaryOp::EqEqEq, Expr::num(1.0), Expr::ident("x")),
        ))]
    );
}

#[test]
fn test_equality_with_impure_right_is_kept() {
    let cmp = Expr::binary(BinaryOp::EqEq, Expr::num(1.0), call("f"));
    let out = run(vec![Stmt::expr(Expr::assign(Expr::ident("r"), cmp.clone()))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(Expr::ident("r"), cmp))]
    );
}

#[test]
fn test_pure_pure_equality_has_a_canonical_order() {
    let ab = Expr::binary(BinaryOp::EqEq, Expr::str_lit("a"), Expr::str_lit("b"));
    let ba = Expr::binary(BinaryOp::EqEq, Expr::str_lit("b"), Expr::str_lit("a"));
    let out_ab = run(vec![Stmt::expr(Expr::assign(Expr::ident("r"), ab))]);
    let out_ba = run(vec![Stmt::expr(Expr::assign(Expr::ident("r"), ba))]);
    // Whichever order wins, both inputs land on it and stay there.
    assert_eq!(out_ab, out_ba);
    assert_eq!(run(out_ab.clone()), out_ab);
}

#[test]
fn test_typeof_comparison_loosens() {
    // typeof x === "undefined"  →  "undefined" == typeof x
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("r"),
        Expr::binary(
            BinaryOp::EqEqEq,
            Expr::unary(UnaryOp::Typeof, Expr::ident("x")),
            Expr::str_lit("undefined"),
        ),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("r"),
            Expr::binary(
                BinaryOp::EqEq,
                Expr::str_lit("undefined"),
                Expr::unary(UnaryOp::Typeof, Expr::ident("x")),
            ),
        ))]
    );
}

#[test]
fn test_mixed_tag_strict_equality_is_kept_strict() {
    let cmp = Expr::binary(BinaryOp::EqEqEq, Expr::num(1.0), Expr::str_lit("1"));
    let out = run(vec![Stmt::expr(Expr::assign(Expr::ident("r"), cmp))]);
    let Stmt::Expr(stmt) = &out[0] else {
        panic!("expected ExpressionStatement");
    };
    let Expr::Assign(assign) = &stmt.expression else {
        panic!("expected AssignmentExpression");
    };
    let Expr::Binary(binary) = &*assign.value else {
        panic!("expected BinaryExpression");
    };
    assert_eq!(binary.op, BinaryOp::EqEqEq);
}

// ============================================================================
// Literals and conditional flips
// ============================================================================

#[test]
fn test_bool_literals_compress_everywhere() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::cond(Expr::ident("c"), Expr::bool_lit(true), Expr::bool_lit(false)),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("x"),
            Expr::cond(
                Expr::ident("c"),
                Expr::not(Expr::num(0.0)),
                Expr::not(Expr::num(1.0)),
            ),
        ))]
    );
}

#[test]
fn test_negated_conditional_flips() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::cond(Expr::not(Expr::ident("c")), call("a"), call("b")),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("x"),
            Expr::cond(Expr::ident("c"), call("b"), call("a")),
        ))]
    );
}

#[test]
fn test_negated_equality_conditional_flips() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::cond(
            Expr::binary(BinaryOp::NotEqEq, Expr::ident("a"), call("f")),
            call("c"),
            call("d"),
        ),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("x"),
            Expr::cond(
                Expr::binary(BinaryOp::EqEqEq, Expr::ident("a"), call("f")),
                call("d"),
                call("c"),
            ),
        ))]
    );
}

#[test]
fn test_double_negation_conditional_unwinds() {
    let out = run(vec![Stmt::expr(Expr::assign(
        Expr::ident("x"),
        Expr::cond(
            Expr::not(Expr::not(Expr::ident("c"))),
            call("a"),
            call("b"),
        ),
    ))]);
    assert_eq!(
        out,
        vec![Stmt::expr(Expr::assign(
            Expr::ident("x"),
            Expr::cond(Expr::ident("c"), call("a"), call("b")),
        ))]
    );
}
