//! Expression nodes.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use smol_str::SmolStr;

use super::ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
use super::stmt::Block;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Lit(Lit),
    Array(ArrayLit),
    Object(ObjectLit),
    Function(FnExpr),
    Unary(UnaryExpr),
    Update(UpdateExpr),
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Assign(AssignExpr),
    Cond(CondExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Seq(SeqExpr),
}

/// A referenced or binding name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: SmolStr,
}

/// Literal value. Regular-expression and template literals are outside the
/// supported grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    /// `None` entries are elisions (`[1, , 3]`).
    pub elements: Vec<Option<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLit {
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropKey,
    pub value: Expr,
}

/// Property key. `Computed` is the only variant whose key is an expression
/// position; the other variants are plain names/literals.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(Ident),
    Str(String),
    Num(f64),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnExpr {
    pub name: Option<Ident>,
    pub params: Vec<Ident>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub argument: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpr {
    pub op: UpdateOp,
    pub argument: Box<Expr>,
    pub prefix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub op: LogicalOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: MemberProp,
}

/// Member access property. `Name` is dotted access (`a.b`); `Computed` is
/// bracketed access (`a[b]`). A non-computed access with a non-identifier
/// property is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Name(Ident),
    Computed(Box<Expr>),
}

/// Comma expression; value is the last member. Always has at least two
/// members.
#[derive(Debug, Clone, PartialEq)]
pub struct SeqExpr {
    pub exprs: Vec<Expr>,
}

impl Expr {
    pub fn as_str_lit(&self) -> Option<&str> {
        match self {
            Expr::Lit(Lit::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Short label for diagnostics and trace output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Ident(_) => "Identifier",
            Expr::Lit(_) => "Literal",
            Expr::Array(_) => "ArrayExpression",
            Expr::Object(_) => "ObjectExpression",
            Expr::Function(_) => "FunctionExpression",
            Expr::Unary(_) => "UnaryExpression",
            Expr::Update(_) => "UpdateExpression",
            Expr::Binary(_) => "BinaryExpression",
            Expr::Logical(_) => "LogicalExpression",
            Expr::Assign(_) => "AssignmentExpression",
            Expr::Cond(_) => "ConditionalExpression",
            Expr::Call(_) => "CallExpression",
            Expr::New(_) => "NewExpression",
            Expr::Member(_) => "MemberExpression",
            Expr::Seq(_) => "SequenceExpression",
        }
    }

    /// Structural fingerprint, stable across runs.
    ///
    /// Used as the canonical-ordering key when two pure equality operands
    /// could otherwise be swapped back and forth forever.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hash_expr(self, &mut hasher);
        hasher.finish()
    }
}

// f64 has no Hash impl (NaN != NaN); hash the bit pattern, as with the
// manual literal Hash impls elsewhere in the codebase's lineage.
fn hash_f64(value: f64, h: &mut FxHasher) {
    value.to_bits().hash(h);
}

fn hash_expr(expr: &Expr, h: &mut FxHasher) {
    std::mem::discriminant(expr).hash(h);
    match expr {
        Expr::Ident(ident) => ident.name.hash(h),
        Expr::Lit(lit) => {
            std::mem::discriminant(lit).hash(h);
            match lit {
                Lit::Null => {}
                Lit::Bool(b) => b.hash(h),
                Lit::Num(n) => hash_f64(*n, h),
                Lit::Str(s) => s.hash(h),
            }
        }
        Expr::Array(array) => {
            array.elements.len().hash(h);
            for element in array.elements.iter().flatten() {
                hash_expr(element, h);
            }
        }
        Expr::Object(object) => {
            object.properties.len().hash(h);
            for property in &object.properties {
                match &property.key {
                    PropKey::Ident(ident) => ident.name.hash(h),
                    PropKey::Str(s) => s.hash(h),
                    PropKey::Num(n) => hash_f64(*n, h),
                    PropKey::Computed(key) => hash_expr(key, h),
                }
                hash_expr(&property.value, h);
            }
        }
        Expr::Function(function) => {
            // Function bodies are opaque to the fingerprint; identity is
            // name/arity.
            function.name.hash(h);
            function.params.hash(h);
        }
        Expr::Unary(unary) => {
            unary.op.hash(h);
            hash_expr(&unary.argument, h);
        }
        Expr::Update(update) => {
            update.op.hash(h);
            update.prefix.hash(h);
            hash_expr(&update.argument, h);
        }
        Expr::Binary(binary) => {
            binary.op.hash(h);
            hash_expr(&binary.left, h);
            hash_expr(&binary.right, h);
        }
        Expr::Logical(logical) => {
            logical.op.hash(h);
            hash_expr(&logical.left, h);
            hash_expr(&logical.right, h);
        }
        Expr::Assign(assign) => {
            assign.op.hash(h);
            hash_expr(&assign.target, h);
            hash_expr(&assign.value, h);
        }
        Expr::Cond(cond) => {
            hash_expr(&cond.test, h);
            hash_expr(&cond.consequent, h);
            hash_expr(&cond.alternate, h);
        }
        Expr::Call(call) => {
            hash_expr(&call.callee, h);
            call.arguments.len().hash(h);
            for argument in &call.arguments {
                hash_expr(argument, h);
            }
        }
        Expr::New(new) => {
            hash_expr(&new.callee, h);
            new.arguments.len().hash(h);
            for argument in &new.arguments {
                hash_expr(argument, h);
            }
        }
        Expr::Member(member) => {
            hash_expr(&member.object, h);
            match &member.property {
                MemberProp::Name(ident) => ident.name.hash(h),
                MemberProp::Computed(property) => hash_expr(property, h),
            }
        }
        Expr::Seq(seq) => {
            seq.exprs.len().hash(h);
            for expr in &seq.exprs {
                hash_expr(expr, h);
            }
        }
    }
}
