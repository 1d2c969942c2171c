//! Input well-formedness checking.
//!
//! The typed tree makes most malformed states unrepresentable (operators
//! draw from fixed alphabets, statements cannot sit in expression slots).
//! What remains representable is checked here before any rewrite runs;
//! the first violation aborts the traversal with no partial result.
//!
//! The rewrite rules preserve every invariant checked here, so a validated
//! input implies a valid output.

use crate::ast::{Expr, ForHead, ForInit, MemberProp, Program, PropKey, Stmt};
use crate::error::SimplifyError;

/// Validate `program` against the well-formedness invariants the rewrite
/// rules rely on.
pub fn validate(program: &Program) -> Result<(), SimplifyError> {
    let mut validator = Validator { loop_depth: 0 };
    validator.check_stmts(&program.body)
}

fn malformed(kind: &'static str, message: impl Into<String>) -> SimplifyError {
    SimplifyError::Malformed {
        kind,
        message: message.into(),
    }
}

struct Validator {
    loop_depth: u32,
}

impl Validator {
    fn check_stmts(&mut self, stmts: &[Stmt]) -> Result<(), SimplifyError> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), SimplifyError> {
        match stmt {
            Stmt::Expr(expr_stmt) => self.check_expr(&expr_stmt.expression),
            Stmt::Block(block) => self.check_stmts(&block.body),
            Stmt::Empty => Ok(()),
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::FnDecl(decl) => self.check_function(&decl.body.body),
            Stmt::Return(ret) => match &ret.argument {
                Some(argument) => self.check_expr(argument),
                None => Ok(()),
            },
            Stmt::If(if_stmt) => {
                self.check_expr(&if_stmt.test)?;
                self.check_stmt(&if_stmt.consequent)?;
                match &if_stmt.alternate {
                    Some(alternate) => self.check_stmt(alternate),
                    None => Ok(()),
                }
            }
            Stmt::For(for_stmt) => {
                match &for_stmt.init {
                    Some(ForInit::Decl(decl)) => self.check_var_decl(decl)?,
                    Some(ForInit::Expr(expr)) => self.check_expr(expr)?,
                    None => {}
                }
                if let Some(test) = &for_stmt.test {
                    self.check_expr(test)?;
                }
                if let Some(update) = &for_stmt.update {
                    self.check_expr(update)?;
                }
                self.check_loop_body(&for_stmt.body)
            }
            Stmt::ForIn(for_in) => {
                self.check_for_head(&for_in.left, "ForInStatement")?;
                self.check_expr(&for_in.right)?;
                self.check_loop_body(&for_in.body)
            }
            Stmt::ForOf(for_of) => {
                self.check_for_head(&for_of.left, "ForOfStatement")?;
                self.check_expr(&for_of.right)?;
                self.check_loop_body(&for_of.body)
            }
            Stmt::While(while_stmt) => {
                self.check_expr(&while_stmt.test)?;
                self.check_loop_body(&while_stmt.body)
            }
            Stmt::DoWhile(do_while) => {
                self.check_expr(&do_while.test)?;
                self.check_loop_body(&do_while.body)
            }
            Stmt::Break => {
                if self.loop_depth == 0 {
                    return Err(malformed("BreakStatement", "`break` outside of a loop"));
                }
                Ok(())
            }
            Stmt::Continue => {
                if self.loop_depth == 0 {
                    return Err(malformed(
                        "ContinueStatement",
                        "`continue` outside of a loop",
                    ));
                }
                Ok(())
            }
            Stmt::Throw(throw) => self.check_expr(&throw.argument),
            Stmt::Try(try_stmt) => {
                self.check_stmts(&try_stmt.block.body)?;
                if let Some(handler) = &try_stmt.handler {
                    self.check_stmts(&handler.body.body)?;
                }
                match &try_stmt.finalizer {
                    Some(finalizer) => self.check_stmts(&finalizer.body),
                    None => Ok(()),
                }
            }
        }
    }

    fn check_loop_body(&mut self, body: &Stmt) -> Result<(), SimplifyError> {
        self.loop_depth += 1;
        let result = self.check_stmt(body);
        self.loop_depth -= 1;
        result
    }

    /// Function bodies start a fresh loop context; `break` cannot cross a
    /// function boundary.
    fn check_function(&mut self, body: &[Stmt]) -> Result<(), SimplifyError> {
        let depth = std::mem::replace(&mut self.loop_depth, 0);
        let result = self.check_stmts(body);
        self.loop_depth = depth;
        result
    }

    fn check_var_decl(&mut self, decl: &crate::ast::VarDecl) -> Result<(), SimplifyError> {
        if decl.declarations.is_empty() {
            return Err(malformed(
                "VariableDeclaration",
                "declaration without declarators",
            ));
        }
        for declarator in &decl.declarations {
            if let Some(init) = &declarator.init {
                self.check_expr(init)?;
            }
        }
        Ok(())
    }

    fn check_for_head(&mut self, head: &ForHead, kind: &'static str) -> Result<(), SimplifyError> {
        match head {
            ForHead::Decl(decl) => {
                if decl.declarations.len() != 1 {
                    return Err(malformed(kind, "head declaration with multiple declarators"));
                }
                if decl.declarations[0].init.is_some() {
                    return Err(malformed(kind, "head declaration with an initializer"));
                }
                Ok(())
            }
            ForHead::Target(target) => self.check_assign_target(target, kind),
        }
    }

    fn check_assign_target(&mut self, target: &Expr, kind: &'static str) -> Result<(), SimplifyError> {
        match target {
            Expr::Ident(_) => Ok(()),
            Expr::Member(member) => {
                self.check_expr(&member.object)?;
                match &member.property {
                    MemberProp::Computed(property) => self.check_expr(property),
                    MemberProp::Name(_) => Ok(()),
                }
            }
            other => Err(malformed(
                kind,
                format!("invalid assignment target: {}", other.kind_name()),
            )),
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<(), SimplifyError> {
        match expr {
            Expr::Ident(_) | Expr::Lit(_) => Ok(()),
            Expr::Array(array) => {
                for element in array.elements.iter().flatten() {
                    self.check_expr(element)?;
                }
                Ok(())
            }
            Expr::Object(object) => {
                for property in &object.properties {
                    if let PropKey::Computed(key) = &property.key {
                        self.check_expr(key)?;
                    }
                    self.check_expr(&property.value)?;
                }
                Ok(())
            }
            Expr::Function(function) => self.check_function(&function.body.body),
            Expr::Unary(unary) => self.check_expr(&unary.argument),
            Expr::Update(update) => {
                self.check_assign_target(&update.argument, "UpdateExpression")
            }
            Expr::Binary(binary) => {
                self.check_expr(&binary.left)?;
                self.check_expr(&binary.right)
            }
            Expr::Logical(logical) => {
                self.check_expr(&logical.left)?;
                self.check_expr(&logical.right)
            }
            Expr::Assign(assign) => {
                self.check_assign_target(&assign.target, "AssignmentExpression")?;
                self.check_expr(&assign.value)
            }
            Expr::Cond(cond) => {
                self.check_expr(&cond.test)?;
                self.check_expr(&cond.consequent)?;
                self.check_expr(&cond.alternate)
            }
            Expr::Call(call) => {
                self.check_expr(&call.callee)?;
                for argument in &call.arguments {
                    self.check_expr(argument)?;
                }
                Ok(())
            }
            Expr::New(new) => {
                self.check_expr(&new.callee)?;
                for argument in &new.arguments {
                    self.check_expr(argument)?;
                }
                Ok(())
            }
            Expr::Member(member) => {
                self.check_expr(&member.object)?;
                match &member.property {
                    MemberProp::Computed(property) => self.check_expr(property),
                    MemberProp::Name(_) => Ok(()),
                }
            }
            Expr::Seq(seq) => {
                if seq.exprs.len() < 2 {
                    return Err(malformed(
                        "SequenceExpression",
                        "sequence with fewer than two expressions",
                    ));
                }
                for expr in &seq.exprs {
                    self.check_expr(expr)?;
                }
                Ok(())
            }
        }
    }
}
