//! The traversal driver and fixed-point controller.
//!
//! One [`Rewriter`] owns a full left-to-right, depth-first pass: per
//! statement slot it runs the kind's enter rules, walks the children,
//! then runs the exit rules, applying the [`Flow`] each rule returns.
//! The fixed-point loop re-drives passes until one reports no change.

use std::mem;

use tracing::{debug, trace, warn};

use crate::analysis::Analysis;
use crate::ast::{Expr, ForInit, ForHead, Program, PropKey, MemberProp, Stmt, UnaryOp};
use crate::error::SimplifyError;
use crate::fold;
use crate::rules::{self, ExprRuleSet, StmtRuleSet};

use super::path::{Flow, StmtPath};
use super::ExprCtx;

/// Hard cap on fixed-point passes. Every rewrite strictly shrinks a
/// well-founded tree measure, so hitting the cap is a rule bug.
pub(crate) const MAX_PASSES: u32 = 16;

/// Cap on in-place re-visits of a single slot within one pass; a rule
/// that keeps requesting re-visits of its own output has lost its
/// canonical-form check.
const MAX_REVISITS: u32 = 64;

pub(crate) fn run_to_fixed_point(
    program: &mut Program,
    analysis: &dyn Analysis,
) -> Result<(), SimplifyError> {
    for pass in 1..=MAX_PASSES {
        let mut rewriter = Rewriter::new(analysis);
        rewriter.run_pass(program);
        debug!(pass, changes = rewriter.changes, "simplification pass finished");
        if rewriter.changes == 0 {
            return Ok(());
        }
        if pass == MAX_PASSES {
            warn!(
                last_rule = rewriter.last_rule,
                "fixed-point iteration cap reached"
            );
            return Err(SimplifyError::NonTerminating {
                passes: MAX_PASSES,
                last_rule: rewriter.last_rule,
            });
        }
    }
    unreachable!("the final pass either quiesces or errors")
}

struct Rewriter<'a> {
    analysis: &'a dyn Analysis,
    observes_completion: bool,
    changes: u32,
    last_rule: &'static str,
}

fn enter_rules(stmt: &Stmt) -> StmtRuleSet {
    match stmt {
        Stmt::VarDecl(_) => rules::VAR_DECL_ENTER,
        Stmt::For(_) => rules::FOR_ENTER,
        _ => &[],
    }
}

fn exit_rules(stmt: &Stmt) -> StmtRuleSet {
    match stmt {
        Stmt::If(_) => rules::IF_EXIT,
        Stmt::While(_) => rules::WHILE_EXIT,
        Stmt::For(_) | Stmt::ForIn(_) | Stmt::ForOf(_) | Stmt::DoWhile(_) => rules::LOOP_EXIT,
        Stmt::Block(_) => rules::BLOCK_EXIT,
        _ => &[],
    }
}

fn expr_rules(expr: &Expr) -> ExprRuleSet {
    match expr {
        Expr::Ident(_) => rules::IDENT_EXIT,
        Expr::Lit(_) => rules::LITERAL_EXIT,
        Expr::Object(_) => rules::OBJECT_EXIT,
        Expr::Member(_) => rules::MEMBER_EXIT,
        Expr::Call(_) => rules::CALL_EXIT,
        Expr::Logical(_) => rules::LOGICAL_EXIT,
        Expr::Binary(_) => rules::BINARY_EXIT,
        Expr::Cond(_) => rules::COND_EXIT,
        _ => &[],
    }
}

impl<'a> Rewriter<'a> {
    fn new(analysis: &'a dyn Analysis) -> Self {
        Rewriter {
            analysis,
            observes_completion: analysis.observes_program_completion(),
            changes: 0,
            last_rule: "",
        }
    }

    fn note(&mut self, rule: &'static str) {
        self.changes += 1;
        self.last_rule = rule;
        trace!(rule, "rewrite applied");
    }

    fn run_pass(&mut self, program: &mut Program) {
        self.walk_block_body(&mut program.body, false, true);
    }

    // ------------------------------------------------------------------
    // Statement lists
    // ------------------------------------------------------------------

    /// Process a block body: hoist function declarations, walk the list,
    /// then fold expressible runs into sequences.
    fn walk_block_body(&mut self, body: &mut Vec<Stmt>, in_function_list: bool, tail: bool) {
        if rules::decls::hoist_fn_decls(body) {
            self.note("hoist_fn_decls");
        }
        self.walk_stmt_list(body, in_function_list, tail);

        // When top-level completions are observable, the tail statement's
        // completion value must survive folding untouched.
        let mut stmts = mem::take(body);
        let protected_tail = if tail && self.observes_completion {
            stmts.pop()
        } else {
            None
        };
        let mut outcome = fold::fold_stmt_list(stmts);
        if outcome.changed {
            self.note("fold_sequences");
        }
        outcome.stmts.extend(protected_tail);
        *body = outcome.stmts;
    }

    fn walk_stmt_list(&mut self, list: &mut Vec<Stmt>, in_function_list: bool, block_tail: bool) {
        let mut index = 0;
        while index < list.len() {
            match self.visit_list_slot(list, &mut index, in_function_list, block_tail) {
                // The cursor already names the successor.
                Flow::Removed => {}
                _ => index += 1,
            }
        }
    }

    fn visit_list_slot(
        &mut self,
        list: &mut Vec<Stmt>,
        index: &mut usize,
        in_function_list: bool,
        block_tail: bool,
    ) -> Flow {
        let mut rounds = 0;
        loop {
            rounds += 1;
            assert!(
                rounds <= MAX_REVISITS,
                "statement rules failed to stabilize at one slot"
            );

            let tail = block_tail && *index + 1 == list.len();
            let mut path = StmtPath::list_slot(list, index, in_function_list, tail);
            match self.run_stmt_rules(enter_rules(path.current()), &mut path) {
                Flow::Removed => return Flow::Removed,
                Flow::Revisit => continue,
                _ => {}
            }

            // Sibling edits may have made the current statement the last.
            let tail = block_tail && *index + 1 == list.len();
            self.walk_stmt_children(&mut list[*index], tail);

            let tail = block_tail && *index + 1 == list.len();
            let mut path = StmtPath::list_slot(list, index, in_function_list, tail);
            match self.run_stmt_rules(exit_rules(path.current()), &mut path) {
                Flow::Revisit => continue,
                flow => return flow,
            }
        }
    }

    /// Visit a statement in a single slot (an `if` branch, a loop body).
    fn visit_single_slot(&mut self, slot: &mut Stmt, tail: bool) {
        let mut rounds = 0;
        loop {
            rounds += 1;
            assert!(
                rounds <= MAX_REVISITS,
                "statement rules failed to stabilize at one slot"
            );

            {
                let mut path = StmtPath::single(slot, tail);
                match self.run_stmt_rules(enter_rules(path.current()), &mut path) {
                    Flow::Removed => unreachable!("single-slot statements cannot be removed"),
                    Flow::Revisit => continue,
                    _ => {}
                }
            }

            self.walk_stmt_children(slot, tail);

            let mut path = StmtPath::single(slot, tail);
            match self.run_stmt_rules(exit_rules(path.current()), &mut path) {
                Flow::Revisit => continue,
                _ => return,
            }
        }
    }

    fn run_stmt_rules(&mut self, table: StmtRuleSet, path: &mut StmtPath<'_>) -> Flow {
        let mut changed = false;
        for (name, rule) in table.iter().copied() {
            match rule(path, self.analysis) {
                Flow::Clean => {}
                Flow::Changed => {
                    self.note(name);
                    changed = true;
                }
                Flow::Revisit => {
                    self.note(name);
                    return Flow::Revisit;
                }
                Flow::Removed => {
                    self.note(name);
                    return Flow::Removed;
                }
            }
        }
        if changed { Flow::Changed } else { Flow::Clean }
    }

    // ------------------------------------------------------------------
    // Statement children
    // ------------------------------------------------------------------

    fn walk_stmt_children(&mut self, stmt: &mut Stmt, tail: bool) {
        let value = ExprCtx::default();
        match stmt {
            Stmt::Expr(expr_stmt) => {
                let discarded = !(tail && self.observes_completion);
                self.walk_expr(
                    &mut expr_stmt.expression,
                    ExprCtx {
                        discarded,
                        stmt_or_seq_child: true,
                        assign_target: false,
                    },
                );
            }
            Stmt::Block(block) => self.walk_block_body(&mut block.body, false, tail),
            Stmt::Empty | Stmt::Break | Stmt::Continue => {}
            Stmt::VarDecl(decl) => {
                for declarator in &mut decl.declarations {
                    if let Some(init) = &mut declarator.init {
                        self.walk_expr(init, value);
                    }
                }
            }
            Stmt::FnDecl(decl) => self.walk_block_body(&mut decl.body.body, true, false),
            Stmt::Return(ret) => {
                if let Some(argument) = &mut ret.argument {
                    self.walk_expr(argument, value);
                }
            }
            Stmt::If(if_stmt) => {
                self.walk_expr(&mut if_stmt.test, value);
                self.visit_single_slot(&mut if_stmt.consequent, tail);
                if let Some(alternate) = &mut if_stmt.alternate {
                    self.visit_single_slot(alternate, tail);
                }
            }
            Stmt::For(for_stmt) => {
                match &mut for_stmt.init {
                    Some(ForInit::Decl(decl)) => {
                        for declarator in &mut decl.declarations {
                            if let Some(init) = &mut declarator.init {
                                self.walk_expr(init, value);
                            }
                        }
                    }
                    Some(ForInit::Expr(expr)) => self.walk_expr(
                        expr,
                        ExprCtx {
                            discarded: true,
                            ..value
                        },
                    ),
                    None => {}
                }
                if let Some(test) = &mut for_stmt.test {
                    self.walk_expr(test, value);
                }
                if let Some(update) = &mut for_stmt.update {
                    self.walk_expr(
                        update,
                        ExprCtx {
                            discarded: true,
                            ..value
                        },
                    );
                }
                self.visit_single_slot(&mut for_stmt.body, tail);
            }
            Stmt::ForIn(for_in) => {
                self.walk_for_head(&mut for_in.left);
                self.walk_expr(&mut for_in.right, value);
                self.visit_single_slot(&mut for_in.body, tail);
            }
            Stmt::ForOf(for_of) => {
                self.walk_for_head(&mut for_of.left);
                self.walk_expr(&mut for_of.right, value);
                self.visit_single_slot(&mut for_of.body, tail);
            }
            Stmt::While(while_stmt) => {
                self.walk_expr(&mut while_stmt.test, value);
                self.visit_single_slot(&mut while_stmt.body, tail);
            }
            Stmt::DoWhile(do_while) => {
                self.visit_single_slot(&mut do_while.body, tail);
                self.walk_expr(&mut do_while.test, value);
            }
            Stmt::Throw(throw) => self.walk_expr(&mut throw.argument, value),
            Stmt::Try(try_stmt) => {
                self.walk_block_body(&mut try_stmt.block.body, false, tail);
                if let Some(handler) = &mut try_stmt.handler {
                    self.walk_block_body(&mut handler.body.body, false, tail);
                }
                if let Some(finalizer) = &mut try_stmt.finalizer {
                    self.walk_block_body(&mut finalizer.body, false, tail);
                }
            }
        }
    }

    fn walk_for_head(&mut self, head: &mut ForHead) {
        match head {
            // Head declarations carry no initializer (§ validation).
            ForHead::Decl(_) => {}
            ForHead::Target(target) => self.walk_expr(
                target,
                ExprCtx {
                    assign_target: true,
                    ..ExprCtx::default()
                },
            ),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn walk_expr(&mut self, expr: &mut Expr, ctx: ExprCtx) {
        let mut rounds = 0;
        loop {
            rounds += 1;
            assert!(
                rounds <= MAX_REVISITS,
                "expression rules failed to stabilize at one slot"
            );
            self.walk_expr_children(expr, ctx);
            match self.run_expr_rules(expr, ctx) {
                Flow::Revisit => continue,
                _ => return,
            }
        }
    }

    fn run_expr_rules(&mut self, expr: &mut Expr, ctx: ExprCtx) -> Flow {
        let mut changed = false;
        for (name, rule) in expr_rules(expr).iter().copied() {
            match rule(expr, ctx, self.analysis) {
                Flow::Clean => {}
                Flow::Changed => {
                    self.note(name);
                    changed = true;
                }
                Flow::Revisit => {
                    self.note(name);
                    return Flow::Revisit;
                }
                Flow::Removed => unreachable!("expression rules cannot remove nodes"),
            }
        }
        if changed { Flow::Changed } else { Flow::Clean }
    }

    fn walk_expr_children(&mut self, expr: &mut Expr, ctx: ExprCtx) {
        let value = ExprCtx::default();
        match expr {
            Expr::Ident(_) | Expr::Lit(_) => {}
            Expr::Array(array) => {
                for element in array.elements.iter_mut().flatten() {
                    self.walk_expr(element, value);
                }
            }
            Expr::Object(object) => {
                for property in &mut object.properties {
                    if let PropKey::Computed(key) = &mut property.key {
                        self.walk_expr(key, value);
                    }
                    self.walk_expr(&mut property.value, value);
                }
            }
            Expr::Function(function) => {
                self.walk_block_body(&mut function.body.body, true, false)
            }
            Expr::Unary(unary) => {
                // `void e` discards its operand's value.
                let child = if unary.op == UnaryOp::Void {
                    ExprCtx {
                        discarded: true,
                        ..value
                    }
                } else {
                    value
                };
                self.walk_expr(&mut unary.argument, child);
            }
            Expr::Update(update) => self.walk_expr(
                &mut update.argument,
                ExprCtx {
                    assign_target: true,
                    ..value
                },
            ),
            Expr::Binary(binary) => {
                self.walk_expr(&mut binary.left, value);
                self.walk_expr(&mut binary.right, value);
            }
            Expr::Logical(logical) => {
                // The left operand's truthiness is tested; only the right
                // operand inherits the discard context.
                self.walk_expr(&mut logical.left, value);
                self.walk_expr(
                    &mut logical.right,
                    ExprCtx {
                        discarded: ctx.discarded,
                        ..value
                    },
                );
            }
            Expr::Assign(assign) => {
                self.walk_expr(
                    &mut assign.target,
                    ExprCtx {
                        assign_target: true,
                        ..value
                    },
                );
                self.walk_expr(&mut assign.value, value);
            }
            Expr::Cond(cond) => {
                self.walk_expr(&mut cond.test, value);
                let branch = ExprCtx {
                    discarded: ctx.discarded,
                    ..value
                };
                self.walk_expr(&mut cond.consequent, branch);
                self.walk_expr(&mut cond.alternate, branch);
            }
            Expr::Call(call) => {
                self.walk_expr(&mut call.callee, value);
                for argument in &mut call.arguments {
                    self.walk_expr(argument, value);
                }
            }
            Expr::New(new) => {
                self.walk_expr(&mut new.callee, value);
                for argument in &mut new.arguments {
                    self.walk_expr(argument, value);
                }
            }
            Expr::Member(member) => {
                self.walk_expr(&mut member.object, value);
                if let MemberProp::Computed(property) = &mut member.property {
                    self.walk_expr(property, value);
                }
            }
            Expr::Seq(seq) => {
                let last = seq.exprs.len().saturating_sub(1);
                for (i, element) in seq.exprs.iter_mut().enumerate() {
                    let child = ExprCtx {
                        discarded: i < last || ctx.discarded,
                        stmt_or_seq_child: true,
                        assign_target: false,
                    };
                    self.walk_expr(element, child);
                }
            }
        }
    }
}
