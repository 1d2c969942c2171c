//! Scope-analysis seam.
//!
//! The pass itself never inspects scopes; it asks the embedder's analyzer
//! through [`Analysis`]. The bundled [`SyntacticAnalysis`] answers from
//! expression shape alone and is deliberately conservative: a `false` from
//! `is_pure` or `base_type_matches` only costs a missed rewrite, never a
//! wrong one.

use crate::ast::{BinaryOp, Expr, Lit, PropKey, UnaryOp};

/// Predicates supplied by the environment's scope analyzer.
pub trait Analysis {
    /// Evaluating `expr` has no side effects and cannot throw.
    fn is_pure(&self, expr: &Expr) -> bool;

    /// Both expressions provably evaluate to values of the same primitive
    /// type tag on every execution.
    fn base_type_matches(&self, a: &Expr, b: &Expr) -> bool;

    /// Whether the completion value of the top-level program body is
    /// observable to the host (true in `eval`-like embeddings).
    fn observes_program_completion(&self) -> bool {
        false
    }
}

// ============================================================================
// Identifier grammar
// ============================================================================

/// Keywords and reserved words that can never be used as an identifier.
fn is_reserved_word(s: &str) -> bool {
    matches!(
        s,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
    )
}

/// Whether `s` is a valid identifier under the target-language grammar,
/// i.e. whether `{ "s": 1 }` may be rewritten to `{ s: 1 }` and `a["s"]`
/// to `a.s`.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(unicode_ident::is_xid_start(first) || first == '$' || first == '_') {
        return false;
    }
    if !chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$') {
        return false;
    }
    !is_reserved_word(s)
}

// ============================================================================
// Conservative syntactic analyzer
// ============================================================================

/// Primitive type tags distinguishable by the syntactic analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeTag {
    Undefined,
    Null,
    Bool,
    Num,
    Str,
}

/// Analyzer that reasons from expression shape only; it knows nothing about
/// bindings. Bare identifiers are never pure (they may throw a reference
/// error) and have no known type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticAnalysis;

impl SyntacticAnalysis {
    fn type_tag(&self, expr: &Expr) -> Option<TypeTag> {
        match expr {
            Expr::Lit(Lit::Null) => Some(TypeTag::Null),
            Expr::Lit(Lit::Bool(_)) => Some(TypeTag::Bool),
            Expr::Lit(Lit::Num(_)) => Some(TypeTag::Num),
            Expr::Lit(Lit::Str(_)) => Some(TypeTag::Str),
            Expr::Unary(unary) => match unary.op {
                UnaryOp::Void => Some(TypeTag::Undefined),
                UnaryOp::Not | UnaryOp::Delete => Some(TypeTag::Bool),
                UnaryOp::Typeof => Some(TypeTag::Str),
                UnaryOp::Minus | UnaryOp::Plus | UnaryOp::BitNot => Some(TypeTag::Num),
            },
            Expr::Update(_) => Some(TypeTag::Num),
            Expr::Binary(binary) => match binary.op {
                BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Rem
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::UShr
                | BinaryOp::BitOr
                | BinaryOp::BitXor
                | BinaryOp::BitAnd => Some(TypeTag::Num),
                BinaryOp::EqEq
                | BinaryOp::NotEq
                | BinaryOp::EqEqEq
                | BinaryOp::NotEqEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::In
                | BinaryOp::Instanceof => Some(TypeTag::Bool),
                // `+` is addition or concatenation; a string on either side
                // forces concatenation, two known numbers force addition.
                BinaryOp::Add => {
                    let left = self.type_tag(&binary.left);
                    let right = self.type_tag(&binary.right);
                    if left == Some(TypeTag::Str) || right == Some(TypeTag::Str) {
                        Some(TypeTag::Str)
                    } else if left == Some(TypeTag::Num) && right == Some(TypeTag::Num) {
                        Some(TypeTag::Num)
                    } else {
                        None
                    }
                }
            },
            Expr::Logical(logical) => {
                // `&&`/`||` yield one of their operands.
                let left = self.type_tag(&logical.left)?;
                let right = self.type_tag(&logical.right)?;
                (left == right).then_some(left)
            }
            Expr::Cond(cond) => {
                let consequent = self.type_tag(&cond.consequent)?;
                let alternate = self.type_tag(&cond.alternate)?;
                (consequent == alternate).then_some(consequent)
            }
            Expr::Assign(assign) => self.type_tag(&assign.value),
            Expr::Seq(seq) => self.type_tag(seq.exprs.last()?),
            _ => None,
        }
    }
}

impl Analysis for SyntacticAnalysis {
    fn is_pure(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Lit(_) => true,
            // Closure creation allocates but neither runs user code nor
            // throws.
            Expr::Function(_) => true,
            Expr::Unary(unary) => match unary.op {
                // ToBoolean and `void`/`typeof` never invoke user code.
                UnaryOp::Not | UnaryOp::Void | UnaryOp::Typeof => self.is_pure(&unary.argument),
                // Numeric coercion may call `valueOf`; only literals are
                // known not to.
                UnaryOp::Minus | UnaryOp::Plus | UnaryOp::BitNot => {
                    matches!(*unary.argument, Expr::Lit(_))
                }
                UnaryOp::Delete => false,
            },
            // Strict equality never coerces, so it cannot re-enter user
            // code; loose equality can (object operands).
            Expr::Binary(binary) => {
                matches!(binary.op, BinaryOp::EqEqEq | BinaryOp::NotEqEq)
                    && self.is_pure(&binary.left)
                    && self.is_pure(&binary.right)
            }
            Expr::Logical(logical) => self.is_pure(&logical.left) && self.is_pure(&logical.right),
            Expr::Cond(cond) => {
                self.is_pure(&cond.test)
                    && self.is_pure(&cond.consequent)
                    && self.is_pure(&cond.alternate)
            }
            Expr::Seq(seq) => seq.exprs.iter().all(|e| self.is_pure(e)),
            Expr::Array(array) => array
                .elements
                .iter()
                .flatten()
                .all(|element| self.is_pure(element)),
            Expr::Object(object) => object.properties.iter().all(|property| {
                // Computed keys coerce to property keys, which may call
                // user code.
                !matches!(property.key, PropKey::Computed(_)) && self.is_pure(&property.value)
            }),
            _ => false,
        }
    }

    fn base_type_matches(&self, a: &Expr, b: &Expr) -> bool {
        match (self.type_tag(a), self.type_tag(b)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LogicalOp;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("foo"));
        assert!(is_valid_identifier("$jq"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("café"));
        assert!(is_valid_identifier("a1"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1a"));
        assert!(!is_valid_identifier("foo-bar"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("null"));
        assert!(!is_valid_identifier("true"));
    }

    #[test]
    fn test_literals_are_pure() {
        let analysis = SyntacticAnalysis;
        assert!(analysis.is_pure(&Expr::num(1.0)));
        assert!(analysis.is_pure(&Expr::str_lit("x")));
        assert!(analysis.is_pure(&Expr::null()));
        assert!(analysis.is_pure(&Expr::not(Expr::bool_lit(true))));
        assert!(analysis.is_pure(&Expr::void_zero()));
    }

    #[test]
    fn test_identifiers_and_calls_are_not_pure() {
        let analysis = SyntacticAnalysis;
        // A bare identifier may throw a reference error.
        assert!(!analysis.is_pure(&Expr::ident("x")));
        assert!(!analysis.is_pure(&Expr::call_ident("f", vec![])));
        // Numeric coercion of a non-literal may call valueOf.
        assert!(!analysis.is_pure(&Expr::unary(UnaryOp::Minus, Expr::ident("x"))));
    }

    #[test]
    fn test_base_type_matching() {
        let analysis = SyntacticAnalysis;
        assert!(analysis.base_type_matches(&Expr::num(1.0), &Expr::num(2.0)));
        assert!(analysis.base_type_matches(
            &Expr::unary(UnaryOp::Typeof, Expr::ident("x")),
            &Expr::str_lit("number"),
        ));
        assert!(!analysis.base_type_matches(&Expr::num(1.0), &Expr::str_lit("1")));
        assert!(!analysis.base_type_matches(&Expr::ident("x"), &Expr::num(1.0)));
    }

    #[test]
    fn test_string_concat_has_string_tag() {
        let analysis = SyntacticAnalysis;
        let concat = Expr::binary(BinaryOp::Add, Expr::ident("y"), Expr::str_lit(""));
        assert!(analysis.base_type_matches(&concat, &Expr::str_lit("abc")));
    }

    #[test]
    fn test_logical_joins_operand_tags() {
        let analysis = SyntacticAnalysis;
        let both_num = Expr::logical(LogicalOp::Or, Expr::num(1.0), Expr::num(2.0));
        assert!(analysis.base_type_matches(&both_num, &Expr::num(0.0)));

        let mixed = Expr::logical(LogicalOp::Or, Expr::num(1.0), Expr::str_lit("s"));
        assert!(!analysis.base_type_matches(&mixed, &Expr::num(0.0)));
    }
}
