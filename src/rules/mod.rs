//! Rewrite rules, registered per node kind.
//!
//! Rule order within a table is the execution order; the tables are the
//! single source of truth for rule sequencing (the equality flip must
//! precede strict-equality loosening, the negation flip runs inside the
//! `if` cascade before its branch-matching steps).

pub(crate) mod branches;
pub(crate) mod decls;
pub(crate) mod exprs;
pub(crate) mod loops;

use crate::analysis::Analysis;
use crate::ast::Expr;
use crate::visit::{ExprCtx, Flow, StmtPath};

pub(crate) type StmtRule = fn(&mut StmtPath<'_>, &dyn Analysis) -> Flow;
pub(crate) type ExprRule = fn(&mut Expr, ExprCtx, &dyn Analysis) -> Flow;

pub(crate) type StmtRuleSet = &'static [(&'static str, StmtRule)];
pub(crate) type ExprRuleSet = &'static [(&'static str, ExprRule)];

// Statement rules. Sibling-relocating rules run on enter, the rest on
// exit.

pub(crate) static VAR_DECL_ENTER: StmtRuleSet = &[
    ("concat_var_decls", decls::concat_var_decls),
    ("merge_decl_into_for", decls::merge_decl_into_for),
];

pub(crate) static FOR_ENTER: StmtRuleSet = &[(
    "absorb_preceding_into_init",
    decls::absorb_preceding_into_init,
)];

/// Exit rules for every loop kind (`for`, `for-in`, `for-of`, `while`,
/// `do-while`).
pub(crate) static LOOP_EXIT: StmtRuleSet = &[(
    "unwrap_single_statement_body",
    loops::unwrap_single_statement_body,
)];

/// `while` is a loop kind too: it unwraps its body like the others before
/// converting to `for`.
pub(crate) static WHILE_EXIT: StmtRuleSet = &[
    (
        "unwrap_single_statement_body",
        loops::unwrap_single_statement_body,
    ),
    ("while_to_for", loops::while_to_for),
];

pub(crate) static IF_EXIT: StmtRuleSet = &[("simplify_if", branches::simplify_if)];

pub(crate) static BLOCK_EXIT: StmtRuleSet =
    &[("dissolve_block", crate::fold::dissolve_block)];

// Expression rules, all on exit.

pub(crate) static IDENT_EXIT: ExprRuleSet =
    &[("undefined_to_void_zero", exprs::undefined_to_void_zero)];

pub(crate) static LITERAL_EXIT: ExprRuleSet =
    &[("compress_bool_literal", exprs::compress_bool_literal)];

pub(crate) static OBJECT_EXIT: ExprRuleSet =
    &[("literal_keys_to_names", exprs::literal_keys_to_names)];

pub(crate) static MEMBER_EXIT: ExprRuleSet =
    &[("computed_access_to_dotted", exprs::computed_access_to_dotted)];

pub(crate) static CALL_EXIT: ExprRuleSet = &[
    ("number_call_to_coercion", exprs::number_call_to_coercion),
    ("string_call_to_concat", exprs::string_call_to_concat),
    ("mark_statement_iife", exprs::mark_statement_iife),
];

pub(crate) static LOGICAL_EXIT: ExprRuleSet =
    &[("negated_and_to_or", exprs::negated_and_to_or)];

pub(crate) static BINARY_EXIT: ExprRuleSet = &[
    ("flip_equality_toward_pure", exprs::flip_equality_toward_pure),
    ("loosen_strict_equality", exprs::loosen_strict_equality),
];

pub(crate) static COND_EXIT: ExprRuleSet =
    &[("flip_negated_conditional", exprs::flip_negated_conditional)];
