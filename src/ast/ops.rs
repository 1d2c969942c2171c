//! Operator alphabets.
//!
//! Each node kind draws its operator from a dedicated enum, so an
//! out-of-alphabet operator is unrepresentable.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    Typeof,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitOr,
    BitXor,
    BitAnd,
    In,
    Instanceof,
}

impl BinaryOp {
    /// `==`, `!=`, `===` or `!==`.
    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::EqEqEq | BinaryOp::NotEqEq
        )
    }

    /// Toggle an equality operator between its positive and negated form
    /// (`==` ↔ `!=`, `===` ↔ `!==`). `None` for non-equality operators.
    pub fn toggled_equality(&self) -> Option<BinaryOp> {
        match self {
            BinaryOp::EqEq => Some(BinaryOp::NotEq),
            BinaryOp::NotEq => Some(BinaryOp::EqEq),
            BinaryOp::EqEqEq => Some(BinaryOp::NotEqEq),
            BinaryOp::NotEqEq => Some(BinaryOp::EqEqEq),
            _ => None,
        }
    }

    /// Strict equality weakened to its loose form (`===` → `==`,
    /// `!==` → `!=`). `None` when the operator is not strict equality.
    pub fn loosened(&self) -> Option<BinaryOp> {
        match self {
            BinaryOp::EqEqEq => Some(BinaryOp::EqEq),
            BinaryOp::NotEqEq => Some(BinaryOp::NotEq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ShlAssign,
    ShrAssign,
    UShrAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
}

/// Declaration keyword of a `VariableDeclaration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclKind {
    #[default]
    Var,
    Let,
    Const,
}

impl DeclKind {
    /// `let` and `const` bind to the enclosing block, not the enclosing
    /// function.
    pub fn is_lexical(&self) -> bool {
        matches!(self, DeclKind::Let | DeclKind::Const)
    }
}
