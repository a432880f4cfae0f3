use super::{Position, Statement, TypeExpr};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_expr: TypeExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_expr: TypeExpr,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Struct {
        name: String,
        fields: Vec<Field>,
        position: Position,
    },
    Function {
        name: String,
        params: Vec<Param>,
        return_type: TypeExpr,
        body: Vec<Statement>,
        position: Position,
    },
    Procedure {
        name: String,
        params: Vec<Param>,
        body: Vec<Statement>,
        position: Position,
    },
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Struct { name, .. }
            | Definition::Function { name, .. }
            | Definition::Procedure { name, .. } => name,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Definition::Struct { position, .. }
            | Definition::Function { position, .. }
            | Definition::Procedure { position, .. } => *position,
        }
    }
}
