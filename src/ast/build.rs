//! Constructor shorthands.
//!
//! Rewrite rules build a lot of small replacement subtrees; these keep the
//! rule bodies (and tests) close to the shape of the source they describe.

use smol_str::SmolStr;

use super::expr::*;
use super::ops::*;
use super::stmt::*;

impl Ident {
    pub fn new(name: impl Into<SmolStr>) -> Ident {
        Ident { name: name.into() }
    }
}

impl Expr {
    pub fn ident(name: impl Into<SmolStr>) -> Expr {
        Expr::Ident(Ident::new(name))
    }

    pub fn num(value: f64) -> Expr {
        Expr::Lit(Lit::Num(value))
    }

    pub fn str_lit(value: impl Into<String>) -> Expr {
        Expr::Lit(Lit::Str(value.into()))
    }

    pub fn bool_lit(value: bool) -> Expr {
        Expr::Lit(Lit::Bool(value))
    }

    pub fn null() -> Expr {
        Expr::Lit(Lit::Null)
    }

    pub fn unary(op: UnaryOp, argument: Expr) -> Expr {
        Expr::Unary(UnaryExpr {
            op,
            argument: Box::new(argument),
        })
    }

    pub fn not(argument: Expr) -> Expr {
        Expr::unary(UnaryOp::Not, argument)
    }

    /// The canonical `undefined` spelling: `void 0`.
    pub fn void_zero() -> Expr {
        Expr::unary(UnaryOp::Void, Expr::num(0.0))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
        Expr::Logical(LogicalExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::logical(LogicalOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::logical(LogicalOp::Or, left, right)
    }

    pub fn cond(test: Expr, consequent: Expr, alternate: Expr) -> Expr {
        Expr::Cond(CondExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
        Expr::Call(CallExpr {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn call_ident(name: impl Into<SmolStr>, arguments: Vec<Expr>) -> Expr {
        Expr::call(Expr::ident(name), arguments)
    }

    pub fn member(object: Expr, name: impl Into<SmolStr>) -> Expr {
        Expr::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProp::Name(Ident::new(name)),
        })
    }

    pub fn member_computed(object: Expr, property: Expr) -> Expr {
        Expr::Member(MemberExpr {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(property)),
        })
    }

    pub fn assign(target: Expr, value: Expr) -> Expr {
        Expr::Assign(AssignExpr {
            op: AssignOp::Assign,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    /// Comma expression. Nested sequences are flattened so a well-formed
    /// tree never holds a sequence directly inside a sequence.
    pub fn seq(exprs: Vec<Expr>) -> Expr {
        let mut flat = Vec::with_capacity(exprs.len());
        for expr in exprs {
            match expr {
                Expr::Seq(inner) => flat.extend(inner.exprs),
                other => flat.push(other),
            }
        }
        debug_assert!(flat.len() >= 2, "sequence requires at least two members");
        Expr::Seq(SeqExpr { exprs: flat })
    }

    /// `exprs` joined into a single expression: the expression itself for
    /// one member, a sequence otherwise.
    pub fn seq_or_single(mut exprs: Vec<Expr>) -> Expr {
        if exprs.len() == 1 {
            exprs.pop().expect("length checked")
        } else {
            Expr::seq(exprs)
        }
    }
}

impl Stmt {
    pub fn expr(expression: Expr) -> Stmt {
        Stmt::Expr(ExprStmt { expression })
    }

    pub fn block(body: Vec<Stmt>) -> Stmt {
        Stmt::Block(Block { body })
    }

    pub fn ret(argument: Option<Expr>) -> Stmt {
        Stmt::Return(ReturnStmt { argument })
    }

    pub fn if_stmt(test: Expr, consequent: Stmt) -> Stmt {
        Stmt::If(IfStmt {
            test,
            consequent: Box::new(consequent),
            alternate: None,
        })
    }

    pub fn if_else(test: Expr, consequent: Stmt, alternate: Stmt) -> Stmt {
        Stmt::If(IfStmt {
            test,
            consequent: Box::new(consequent),
            alternate: Some(Box::new(alternate)),
        })
    }

    pub fn var_decl(kind: DeclKind, declarations: Vec<Declarator>) -> Stmt {
        Stmt::VarDecl(VarDecl { kind, declarations })
    }

    pub fn while_stmt(test: Expr, body: Stmt) -> Stmt {
        Stmt::While(WhileStmt {
            test,
            body: Box::new(body),
        })
    }
}

impl Declarator {
    pub fn new(name: impl Into<SmolStr>, init: Option<Expr>) -> Declarator {
        Declarator {
            name: Ident::new(name),
            init,
        }
    }
}
