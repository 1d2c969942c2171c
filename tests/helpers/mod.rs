//! Shared builders and output-shape assertions for the simplification
//! tests.

// Each integration test crate uses its own slice of these helpers.
#![allow(dead_code)]

use esimplify::ast::{
    Expr, ForHead, ForInit, Lit, MemberProp, Program, PropKey, Stmt,
};
use esimplify::{SyntacticAnalysis, simplify};

/// Simplify a statement list with the bundled syntactic analyzer.
pub fn run(body: Vec<Stmt>) -> Vec<Stmt> {
    simplify(Program { body }, &SyntacticAnalysis)
        .expect("simplification should succeed")
        .body
}

pub fn call(name: &str) -> Expr {
    Expr::call_ident(name, vec![])
}

pub fn call_stmt(name: &str) -> Stmt {
    Stmt::expr(call(name))
}

// ============================================================================
// Output-shape sweeps
// ============================================================================

/// Visit every expression in every statement of `body`, including nested
/// function bodies.
pub fn for_each_expr(body: &[Stmt], f: &mut impl FnMut(&Expr)) {
    for stmt in body {
        for_each_expr_in_stmt(stmt, f);
    }
}

fn for_each_expr_in_stmt(stmt: &Stmt, f: &mut impl FnMut(&Expr)) {
    match stmt {
        Stmt::Expr(s) => visit_expr(&s.expression, f),
        Stmt::Block(b) => for_each_expr(&b.body, f),
        Stmt::Empty | Stmt::Break | Stmt::Continue => {}
        Stmt::VarDecl(d) => {
            for declarator in &d.declarations {
                if let Some(init) = &declarator.init {
                    visit_expr(init, f);
                }
            }
        }
        Stmt::FnDecl(d) => for_each_expr(&d.body.body, f),
        Stmt::Return(r) => {
            if let Some(argument) = &r.argument {
                visit_expr(argument, f);
            }
        }
        Stmt::If(s) => {
            visit_expr(&s.test, f);
            for_each_expr_in_stmt(&s.consequent, f);
            if let Some(alternate) = &s.alternate {
                for_each_expr_in_stmt(alternate, f);
            }
        }
        Stmt::For(s) => {
            match &s.init {
                Some(ForInit::Decl(d)) => {
                    for declarator in &d.declarations {
                        if let Some(init) = &declarator.init {
                            visit_expr(init, f);
                        }
                    }
                }
                Some(ForInit::Expr(e)) => visit_expr(e, f),
                None => {}
            }
            if let Some(test) = &s.test {
                visit_expr(test, f);
            }
            if let Some(update) = &s.update {
                visit_expr(update, f);
            }
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::ForIn(s) => {
            if let ForHead::Target(target) = &s.left {
                visit_expr(target, f);
            }
            visit_expr(&s.right, f);
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::ForOf(s) => {
            if let ForHead::Target(target) = &s.left {
                visit_expr(target, f);
            }
            visit_expr(&s.right, f);
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::While(s) => {
            visit_expr(&s.test, f);
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::DoWhile(s) => {
            for_each_expr_in_stmt(&s.body, f);
            visit_expr(&s.test, f);
        }
        Stmt::Throw(s) => visit_expr(&s.argument, f),
        Stmt::Try(s) => {
            for_each_expr(&s.block.body, f);
            if let Some(handler) = &s.handler {
                for_each_expr(&handler.body.body, f);
            }
            if let Some(finalizer) = &s.finalizer {
                for_each_expr(&finalizer.body, f);
            }
        }
    }
}

fn visit_expr(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    f(expr);
    match expr {
        Expr::Ident(_) | Expr::Lit(_) => {}
        Expr::Array(e) => {
            for element in e.elements.iter().flatten() {
                visit_expr(element, f);
            }
        }
        Expr::Object(e) => {
            for property in &e.properties {
                if let PropKey::Computed(key) = &property.key {
                    visit_expr(key, f);
                }
                visit_expr(&property.value, f);
            }
        }
        Expr::Function(e) => for_each_expr(&e.body.body, f),
        Expr::Unary(e) => visit_expr(&e.argument, f),
        Expr::Update(e) => visit_expr(&e.argument, f),
        Expr::Binary(e) => {
            visit_expr(&e.left, f);
            visit_expr(&e.right, f);
        }
        Expr::Logical(e) => {
            visit_expr(&e.left, f);
            visit_expr(&e.right, f);
        }
        Expr::Assign(e) => {
            visit_expr(&e.target, f);
            visit_expr(&e.value, f);
        }
        Expr::Cond(e) => {
            visit_expr(&e.test, f);
            visit_expr(&e.consequent, f);
            visit_expr(&e.alternate, f);
        }
        Expr::Call(e) => {
            visit_expr(&e.callee, f);
            for argument in &e.arguments {
                visit_expr(argument, f);
            }
        }
        Expr::New(e) => {
            visit_expr(&e.callee, f);
            for argument in &e.arguments {
                visit_expr(argument, f);
            }
        }
        Expr::Member(e) => {
            visit_expr(&e.object, f);
            if let MemberProp::Computed(property) = &e.property {
                visit_expr(property, f);
            }
        }
        Expr::Seq(e) => {
            for element in &e.exprs {
                visit_expr(element, f);
            }
        }
    }
}

/// No boolean literal survives simplification.
pub fn assert_no_bool_literals(body: &[Stmt]) {
    for_each_expr(body, &mut |expr| {
        assert!(
            !matches!(expr, Expr::Lit(Lit::Bool(_))),
            "boolean literal survived simplification"
        );
    });
}

/// No referenced `undefined` identifier survives simplification.
pub fn assert_no_undefined_refs(body: &[Stmt]) {
    for_each_expr(body, &mut |expr| {
        assert!(
            !matches!(expr, Expr::Ident(ident) if ident.name == "undefined"),
            "`undefined` reference survived simplification"
        );
    });
}

/// No computed member access with an identifier-like string key survives.
pub fn assert_no_computed_ident_keys(body: &[Stmt]) {
    for_each_expr(body, &mut |expr| {
        if let Expr::Member(member) = expr {
            if let MemberProp::Computed(property) = &member.property {
                if let Some(key) = property.as_str_lit() {
                    assert!(
                        !esimplify::is_valid_identifier(key),
                        "computed access with identifier-like key `{key}` survived"
                    );
                }
            }
        }
    });
}

/// Function declarations precede every other statement in every block
/// body.
pub fn assert_fn_decls_first(body: &[Stmt]) {
    let mut seen_other = false;
    for stmt in body {
        match stmt {
            Stmt::FnDecl(decl) => {
                assert!(
                    !seen_other,
                    "function declaration `{}` follows a non-declaration",
                    decl.name.name
                );
                assert_fn_decls_first(&decl.body.body);
            }
            other => {
                seen_other = true;
                assert_blocks_ordered(other);
            }
        }
    }
}

fn assert_blocks_ordered(stmt: &Stmt) {
    match stmt {
        Stmt::Block(block) => assert_fn_decls_first(&block.body),
        Stmt::If(s) => {
            assert_blocks_ordered(&s.consequent);
            if let Some(alternate) = &s.alternate {
                assert_blocks_ordered(alternate);
            }
        }
        Stmt::For(s) => assert_blocks_ordered(&s.body),
        Stmt::ForIn(s) => assert_blocks_ordered(&s.body),
        Stmt::ForOf(s) => assert_blocks_ordered(&s.body),
        Stmt::While(s) => assert_blocks_ordered(&s.body),
        Stmt::DoWhile(s) => assert_blocks_ordered(&s.body),
        Stmt::Try(s) => {
            assert_fn_decls_first(&s.block.body);
            if let Some(handler) = &s.handler {
                assert_fn_decls_first(&handler.body.body);
            }
            if let Some(finalizer) = &s.finalizer {
                assert_fn_decls_first(&finalizer.body);
            }
        }
        _ => {}
    }
}
