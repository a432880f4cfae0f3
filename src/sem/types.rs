use std::fmt;

/// The analyzer's resolved type descriptor. Distinct from `ast::TypeExpr`,
/// which is surface syntax: a `TypeExpr::Named("Point", ..)` only becomes
/// `Type::Struct("Point")` once the analyzer has confirmed the struct exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Suppresses cascading diagnostics: structurally compatible with every
    /// other type in both directions.
    Error,
    Void,
    Integer,
    Real,
    Boolean,
    Character,
    String,
    Array {
        element: Box<Type>,
        dimensions: usize,
    },
    Struct {
        name: String,
    },
}

impl Type {
    /// Integer, or one of the two types the checker tolerates wherever an
    /// integer is expected (indexing, loop bounds, switch scrutinee/labels).
    pub fn is_integer_ish(&self) -> bool {
        matches!(
            self,
            Type::Error | Type::Integer | Type::Character | Type::Boolean
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Error | Type::Integer | Type::Real) || self.is_integer_ish()
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Error | Type::Boolean)
    }

    /// `dst <- src` assignability: exact match, widening integer-ish -> real,
    /// or widening character/boolean -> integer. `Type::Error` is compatible
    /// with anything in both directions.
    pub fn is_assignable_from(&self, src: &Type) -> bool {
        if *self == Type::Error || *src == Type::Error {
            return true;
        }
        if self == src {
            return true;
        }
        match self {
            Type::Real => matches!(src, Type::Integer | Type::Character | Type::Boolean),
            Type::Integer => matches!(src, Type::Character | Type::Boolean),
            _ => false,
        }
    }

    /// Equality-operator compatibility: numeric-with-numeric, or exact
    /// structural equality.
    pub fn comparable_for_equality(&self, other: &Type) -> bool {
        if *self == Type::Error || *other == Type::Error {
            return true;
        }
        if self.is_numeric() && other.is_numeric() {
            return true;
        }
        self == other
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Error => write!(f, "<erreur>"),
            Type::Void => write!(f, "void"),
            Type::Integer => write!(f, "entier"),
            Type::Real => write!(f, "reel"),
            Type::Boolean => write!(f, "booleen"),
            Type::Character => write!(f, "caractere"),
            Type::String => write!(f, "chaine"),
            Type::Array { element, dimensions } => {
                write!(f, "tableau {element}")?;
                for _ in 0..*dimensions {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            Type::Struct { name } => write!(f, "{name}"),
        }
    }
}

/// A resolved field or parameter: name paired with its resolved type.
pub type NamedType = (String, Type);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Array,
    Parameter,
    Function,
    Procedure,
    Struct,
}

/// An entry in a [`super::scope::Scope`]. Carries every field spec.md's
/// Symbol record lists, even the ones only meaningful for a subset of
/// `SymbolKind`s (e.g. `params`/`return_type` only apply to callables).
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Type,
    pub const_value: Option<i64>,
    pub params: Vec<NamedType>,
    pub return_type: Type,
    pub fields: Vec<NamedType>,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: Type) -> Self {
        Self::simple(name, SymbolKind::Variable, ty)
    }

    pub fn constant(name: impl Into<String>, ty: Type, const_value: Option<i64>) -> Self {
        let mut symbol = Self::simple(name, SymbolKind::Constant, ty);
        symbol.const_value = const_value;
        symbol
    }

    pub fn array(name: impl Into<String>, ty: Type) -> Self {
        Self::simple(name, SymbolKind::Array, ty)
    }

    pub fn parameter(name: impl Into<String>, ty: Type) -> Self {
        Self::simple(name, SymbolKind::Parameter, ty)
    }

    pub fn function(name: impl Into<String>, params: Vec<NamedType>, return_type: Type) -> Self {
        let mut symbol = Self::simple(name, SymbolKind::Function, Type::Void);
        symbol.params = params;
        symbol.return_type = return_type;
        symbol
    }

    pub fn procedure(name: impl Into<String>, params: Vec<NamedType>) -> Self {
        let mut symbol = Self::simple(name, SymbolKind::Procedure, Type::Void);
        symbol.params = params;
        symbol
    }

    pub fn strukt(name: impl Into<String>, fields: Vec<NamedType>) -> Self {
        let name = name.into();
        let ty = Type::Struct { name: name.clone() };
        let mut symbol = Self::simple(name, SymbolKind::Struct, ty);
        symbol.fields = fields;
        symbol
    }

    fn simple(name: impl Into<String>, kind: SymbolKind, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            const_value: None,
            params: Vec::new(),
            return_type: Type::Void,
            fields: Vec::new(),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.kind == SymbolKind::Constant
    }
}
