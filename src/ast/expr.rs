use super::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        position: Position,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        position: Position,
    },
    IntegerLiteral {
        value: i64,
        position: Position,
    },
    /// Lexeme text preserved verbatim (decimal separator may be `,` or `.`);
    /// normalized only by emitters, never by the analyzer.
    RealLiteral {
        text: String,
        position: Position,
    },
    StringLiteral {
        value: String,
        position: Position,
    },
    BooleanLiteral {
        value: bool,
        position: Position,
    },
    Identifier {
        name: String,
        position: Position,
    },
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
        position: Position,
    },
    Field {
        base: Box<Expression>,
        field: String,
        position: Position,
    },
    Call {
        callee: Box<Expression>,
        args: Vec<Expression>,
        position: Position,
    },
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::Binary { position, .. }
            | Expression::Unary { position, .. }
            | Expression::IntegerLiteral { position, .. }
            | Expression::RealLiteral { position, .. }
            | Expression::StringLiteral { position, .. }
            | Expression::BooleanLiteral { position, .. }
            | Expression::Identifier { position, .. }
            | Expression::Index { position, .. }
            | Expression::Field { position, .. }
            | Expression::Call { position, .. } => *position,
        }
    }

    /// An lvalue is one of: identifier, index, or field-access (invariant 2).
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            Expression::Identifier { .. } | Expression::Index { .. } | Expression::Field { .. }
        )
    }
}
