use super::{Declaration, Expression, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub values: Vec<Expression>,
    pub body: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A declaration appearing inline in a statement list (local `Objets:`
    /// declarations are parsed separately, then prepended to the body block
    /// as a run of these, ahead of the executable statements).
    Declaration(Declaration),
    /// A bare nested block. The grammar described in spec.md never produces
    /// one directly (every compound statement carries its own body list),
    /// but the category exists in the tagged union for completeness and is
    /// what the pretty-printer round-trips a raw statement list through.
    Block(Vec<Statement>, Position),
    Assign {
        target: Expression,
        value: Expression,
        position: Position,
    },
    If {
        condition: Expression,
        then_block: Vec<Statement>,
        elif_conditions: Vec<Expression>,
        elif_blocks: Vec<Vec<Statement>>,
        else_block: Option<Vec<Statement>>,
        position: Position,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
        position: Position,
    },
    For {
        variable: String,
        start: Expression,
        end: Expression,
        step: Option<Expression>,
        body: Vec<Statement>,
        position: Position,
    },
    Repeat {
        body: Vec<Statement>,
        until: Option<Expression>,
        position: Position,
    },
    CallStatement(Expression),
    Return {
        value: Option<Expression>,
        position: Position,
    },
    Write {
        args: Vec<Expression>,
        position: Position,
    },
    Read {
        targets: Vec<Expression>,
        position: Position,
    },
    Break(Position),
    QuitLoop(Position),
    Switch {
        scrutinee: Expression,
        cases: Vec<Case>,
        default: Option<Vec<Statement>>,
        position: Position,
    },
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Declaration(decl) => decl.position(),
            Statement::Block(_, position) => *position,
            Statement::Assign { position, .. }
            | Statement::If { position, .. }
            | Statement::While { position, .. }
            | Statement::For { position, .. }
            | Statement::Repeat { position, .. }
            | Statement::Return { position, .. }
            | Statement::Write { position, .. }
            | Statement::Read { position, .. }
            | Statement::Switch { position, .. } => *position,
            Statement::CallStatement(call) => call.position(),
            Statement::Break(position) | Statement::QuitLoop(position) => *position,
        }
    }
}
