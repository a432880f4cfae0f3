//! Name resolution, type derivation, assignability, constant folding, and
//! control-flow validation. Operates in five explicit phases over an already
//! parsed [`Program`] and never mutates it — it only produces tables keyed by
//! name (struct layouts, function signatures) and a diagnostics list.

mod fold;
mod scope;
mod types;

pub use scope::Scope;
pub use types::{NamedType, Symbol, SymbolKind, Type};

use std::collections::{HashMap, HashSet};

use crate::ast::{
    Declaration, Definition, Expression, Field, Param, Position, Program, PrimitiveType,
    Statement, TypeExpr,
};
use crate::diagnostics::Diagnostic;
use fold::fold_integer;

/// One resolved struct field: name, its position in declaration order, and
/// resolved type. Read by emitters for consistent field ordering.
#[derive(Debug, Clone)]
pub struct StructField {
    pub name: String,
    pub offset: usize,
    pub ty: Type,
}

/// A resolved function or procedure signature, read by emitters to generate
/// forward declarations / method signatures without re-deriving types.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<NamedType>,
    pub return_type: Type,
    pub is_function: bool,
}

pub struct AnalysisResult {
    pub struct_layouts: HashMap<String, Vec<StructField>>,
    pub functions: HashMap<String, FunctionSignature>,
    /// Folded values of every top-level integer constant whose initializer
    /// was foldable. Read by the C emitter, which lowers these into an
    /// `enum` block so array dimensions can reference them by name.
    pub global_constants: HashMap<String, i64>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn analyze(program: &Program) -> AnalysisResult {
    let mut analyzer = Analyzer::new();
    analyzer.run(program);
    AnalysisResult {
        struct_layouts: analyzer.structs,
        functions: analyzer.functions,
        global_constants: analyzer.global_constants,
        diagnostics: analyzer.diagnostics,
    }
}

#[derive(Clone, PartialEq, Eq)]
enum ReturnContext {
    None,
    Procedure,
    Function(Type),
}

struct Analyzer {
    scope: Scope,
    diagnostics: Vec<Diagnostic>,
    structs: HashMap<String, Vec<StructField>>,
    functions: HashMap<String, FunctionSignature>,
    global_constants: HashMap<String, i64>,
    return_context: ReturnContext,
    loop_or_switch_depth: u32,
    for_depth: u32,
}

/// The innermost identifier an lvalue chain of `[]`/`.` ultimately denotes.
/// Used to reject writes to a constant through an index or field access.
fn lvalue_root(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::Identifier { name, .. } => Some(name),
        Expression::Index { base, .. } | Expression::Field { base, .. } => lvalue_root(base),
        _ => None,
    }
}

impl Analyzer {
    fn new() -> Self {
        Self {
            scope: Scope::new(),
            diagnostics: Vec::new(),
            structs: HashMap::new(),
            functions: HashMap::new(),
            global_constants: HashMap::new(),
            return_context: ReturnContext::None,
            loop_or_switch_depth: 0,
            for_depth: 0,
        }
    }

    fn error(&mut self, position: Position, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(position, message));
    }

    fn fold(&self, expr: &Expression) -> Option<i64> {
        fold_integer(expr, &|name| {
            self.scope.lookup(name).and_then(|symbol| symbol.const_value)
        })
    }

    fn run(&mut self, program: &Program) {
        // Phase 1: struct pre-declaration.
        for def in &program.definitions {
            if let Definition::Struct { name, fields, position } = def {
                self.declare_struct(name, fields, *position);
            }
        }

        // Phase 2: global declarations.
        for decl in &program.declarations {
            self.declare_decl(decl, true);
        }

        // Phase 3: function/procedure pre-declaration.
        for def in &program.definitions {
            match def {
                Definition::Function { name, params, return_type, position, .. } => {
                    self.predeclare_callable(name, params, Some(return_type), *position);
                }
                Definition::Procedure { name, params, position, .. } => {
                    self.predeclare_callable(name, params, None, *position);
                }
                Definition::Struct { .. } => {}
            }
        }

        // Phase 4: body checking.
        for def in &program.definitions {
            match def {
                Definition::Function { name, body, .. } => self.check_callable_body(name, body, true),
                Definition::Procedure { name, body, .. } => self.check_callable_body(name, body, false),
                Definition::Struct { .. } => {}
            }
        }

        // Phase 5: main block, no enclosing return context.
        self.return_context = ReturnContext::None;
        self.scope.enter_scope();
        self.check_block(&program.main_block);
        self.scope.exit_scope();
    }

    fn declare_struct(&mut self, name: &str, fields: &[Field], position: Position) {
        if self.structs.contains_key(name) {
            self.error(position, format!("structure dupliquee: {name}"));
            return;
        }

        let mut seen = HashSet::new();
        let mut layout = Vec::new();
        for field in fields {
            if !seen.insert(field.name.clone()) {
                self.error(
                    field.position,
                    format!("champ duplique dans la structure {name}: {}", field.name),
                );
                continue;
            }
            let ty = self.resolve_type_expr(&field.type_expr);
            let offset = layout.len();
            layout.push(StructField {
                name: field.name.clone(),
                offset,
                ty,
            });
        }

        self.structs.insert(name.to_string(), layout.clone());
        let fields = layout.into_iter().map(|f| (f.name, f.ty)).collect();
        self.scope.declare(Symbol::strukt(name, fields));
    }

    fn declare_decl(&mut self, decl: &Declaration, is_global: bool) {
        match decl {
            Declaration::Variable { name, type_expr, position } => {
                let ty = self.resolve_type_expr(type_expr);
                if !self.scope.declare(Symbol::variable(name.clone(), ty)) {
                    self.error(*position, format!("declaration dupliquee dans cette portee: {name}"));
                }
            }
            Declaration::Constant { name, type_expr, value, position } => {
                let ty = self.resolve_type_expr(type_expr);
                let value_ty = self.check_expression(value);
                if !ty.is_assignable_from(&value_ty) {
                    self.error(
                        *position,
                        format!("type incompatible pour la constante {name}: attendu {ty}, trouve {value_ty}"),
                    );
                }
                let const_value = if ty == Type::Integer { self.fold(value) } else { None };
                if is_global {
                    if let Some(folded) = const_value {
                        self.global_constants.insert(name.clone(), folded);
                    }
                }
                if !self.scope.declare(Symbol::constant(name.clone(), ty, const_value)) {
                    self.error(*position, format!("declaration dupliquee dans cette portee: {name}"));
                }
            }
            Declaration::Array { name, element_type, dimensions, position } => {
                let element_ty = self.resolve_type_expr(element_type);
                for dim_expr in dimensions {
                    let dim_ty = self.check_expression(dim_expr);
                    if !dim_ty.is_integer_ish() {
                        self.error(dim_expr.position(), "dimension de tableau non entiere");
                    }
                    match self.fold(dim_expr) {
                        Some(value) if value > 0 => {}
                        Some(value) => self.error(
                            dim_expr.position(),
                            format!("dimension de tableau non strictement positive: {value}"),
                        ),
                        None => self.error(
                            dim_expr.position(),
                            "dimension de tableau non calculable a la compilation",
                        ),
                    }
                }
                let ty = Type::Array {
                    element: Box::new(element_ty),
                    dimensions: dimensions.len(),
                };
                if !self.scope.declare(Symbol::array(name.clone(), ty)) {
                    self.error(*position, format!("declaration dupliquee dans cette portee: {name}"));
                }
            }
        }
    }

    fn predeclare_callable(
        &mut self,
        name: &str,
        params: &[Param],
        return_type: Option<&TypeExpr>,
        position: Position,
    ) {
        let resolved_params: Vec<NamedType> = params
            .iter()
            .map(|p| (p.name.clone(), self.resolve_type_expr(&p.type_expr)))
            .collect();
        let resolved_return = match return_type {
            Some(type_expr) => self.resolve_type_expr(type_expr),
            None => Type::Void,
        };

        let symbol = if return_type.is_some() {
            Symbol::function(name, resolved_params.clone(), resolved_return.clone())
        } else {
            Symbol::procedure(name, resolved_params.clone())
        };
        if !self.scope.declare(symbol) {
            self.error(position, format!("nom deja declare au premier niveau: {name}"));
        }

        self.functions.insert(
            name.to_string(),
            FunctionSignature {
                name: name.to_string(),
                params: resolved_params,
                return_type: resolved_return,
                is_function: return_type.is_some(),
            },
        );
    }

    fn check_callable_body(&mut self, name: &str, body: &[Statement], is_function: bool) {
        let Some(signature) = self.functions.get(name).cloned() else {
            return;
        };

        self.scope.enter_scope();
        for (param_name, param_type) in &signature.params {
            self.scope
                .declare(Symbol::parameter(param_name.clone(), param_type.clone()));
        }

        self.return_context = if is_function {
            ReturnContext::Function(signature.return_type.clone())
        } else {
            ReturnContext::Procedure
        };
        let (saved_loop, saved_for) = (self.loop_or_switch_depth, self.for_depth);
        self.loop_or_switch_depth = 0;
        self.for_depth = 0;

        self.check_block(body);

        self.loop_or_switch_depth = saved_loop;
        self.for_depth = saved_for;
        self.return_context = ReturnContext::None;
        self.scope.exit_scope();
    }

    fn resolve_type_expr(&mut self, type_expr: &TypeExpr) -> Type {
        match type_expr {
            TypeExpr::Primitive { kind, .. } => match kind {
                PrimitiveType::Integer => Type::Integer,
                PrimitiveType::Real => Type::Real,
                PrimitiveType::Character => Type::Character,
                PrimitiveType::String => Type::String,
                PrimitiveType::Boolean => Type::Boolean,
            },
            TypeExpr::Named { name, position } => {
                if self.structs.contains_key(name) {
                    Type::Struct { name: name.clone() }
                } else {
                    self.error(*position, format!("structure inconnue: {name}"));
                    Type::Error
                }
            }
            TypeExpr::ArrayOf { element, dimensions, .. } => {
                let element_ty = self.resolve_type_expr(element);
                for dim in dimensions.iter().flatten() {
                    let dim_ty = self.check_expression(dim);
                    if !dim_ty.is_integer_ish() {
                        self.error(dim.position(), "dimension de tableau non entiere");
                    }
                }
                Type::Array {
                    element: Box::new(element_ty),
                    dimensions: dimensions.len(),
                }
            }
        }
    }

    fn check_block(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_scoped_block(&mut self, statements: &[Statement]) {
        self.scope.enter_scope();
        self.check_block(statements);
        self.scope.exit_scope();
    }

    fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declaration(decl) => self.declare_decl(decl, false),
            Statement::Block(statements, _) => self.check_scoped_block(statements),
            Statement::Assign { target, value, position } => {
                let target_ty = self.check_expression(target);
                if !target.is_lvalue() {
                    self.error(*position, "cible d'affectation invalide");
                } else if let Some(root) = lvalue_root(target) {
                    if let Some(symbol) = self.scope.lookup(root) {
                        if symbol.is_constant() {
                            self.error(*position, format!("affectation interdite vers la constante {root}"));
                        }
                    }
                }
                let value_ty = self.check_expression(value);
                if !target_ty.is_assignable_from(&value_ty) {
                    self.error(
                        *position,
                        format!("type incompatible dans l'affectation: attendu {target_ty}, trouve {value_ty}"),
                    );
                }
            }
            Statement::If {
                condition,
                then_block,
                elif_conditions,
                elif_blocks,
                else_block,
                position,
            } => {
                let cond_ty = self.check_expression(condition);
                if !cond_ty.is_boolean() {
                    self.error(*position, "condition 'Si' non booleenne");
                }
                self.check_scoped_block(then_block);
                for (elif_condition, elif_block) in elif_conditions.iter().zip(elif_blocks) {
                    let elif_ty = self.check_expression(elif_condition);
                    if !elif_ty.is_boolean() {
                        self.error(elif_condition.position(), "condition 'SinonSi' non booleenne");
                    }
                    self.check_scoped_block(elif_block);
                }
                if let Some(else_block) = else_block {
                    self.check_scoped_block(else_block);
                }
            }
            Statement::While { condition, body, position } => {
                let cond_ty = self.check_expression(condition);
                if !cond_ty.is_boolean() {
                    self.error(*position, "condition 'TantQue' non booleenne");
                }
                self.loop_or_switch_depth += 1;
                self.check_scoped_block(body);
                self.loop_or_switch_depth -= 1;
            }
            Statement::For {
                variable,
                start,
                end,
                step,
                body,
                position,
            } => {
                match self.scope.lookup(variable) {
                    None => self.error(*position, format!("variable de boucle non declaree: {variable}")),
                    Some(symbol) if symbol.is_constant() => {
                        self.error(*position, format!("variable de boucle constante: {variable}"))
                    }
                    Some(symbol) if !symbol.ty.is_integer_ish() => self.error(
                        *position,
                        format!("variable de boucle non entiere: {variable}"),
                    ),
                    Some(_) => {}
                }
                let start_ty = self.check_expression(start);
                if !start_ty.is_integer_ish() {
                    self.error(start.position(), "borne de depart 'Pour' non entiere");
                }
                let end_ty = self.check_expression(end);
                if !end_ty.is_integer_ish() {
                    self.error(end.position(), "borne de fin 'Pour' non entiere");
                }
                if let Some(step) = step {
                    let step_ty = self.check_expression(step);
                    if !step_ty.is_integer_ish() {
                        self.error(step.position(), "pas 'Pour' non entier");
                    }
                }
                self.for_depth += 1;
                self.loop_or_switch_depth += 1;
                self.check_scoped_block(body);
                self.for_depth -= 1;
                self.loop_or_switch_depth -= 1;
            }
            Statement::Repeat { body, until, position } => {
                self.loop_or_switch_depth += 1;
                self.check_scoped_block(body);
                self.loop_or_switch_depth -= 1;
                if let Some(until) = until {
                    let until_ty = self.check_expression(until);
                    if !until_ty.is_boolean() {
                        self.error(*position, "condition 'Repeter ... TantQue' non booleenne");
                    }
                }
            }
            Statement::CallStatement(expr) => {
                self.check_expression(expr);
            }
            Statement::Return { value, position } => match self.return_context.clone() {
                ReturnContext::None => self.error(*position, "instruction de retour hors fonction ou procedure"),
                ReturnContext::Procedure => {
                    if let Some(value) = value {
                        self.check_expression(value);
                        self.error(*position, "retour avec une valeur dans une procedure");
                    }
                }
                ReturnContext::Function(return_type) => match value {
                    Some(value) => {
                        let value_ty = self.check_expression(value);
                        if !return_type.is_assignable_from(&value_ty) {
                            self.error(
                                *position,
                                format!(
                                    "type de retour incompatible: attendu {return_type}, trouve {value_ty}"
                                ),
                            );
                        }
                    }
                    None => self.error(*position, "retour sans valeur dans une fonction"),
                },
            },
            Statement::Write { args, .. } => {
                for arg in args {
                    self.check_expression(arg);
                }
            }
            Statement::Read { targets, position } => {
                for target in targets {
                    if !target.is_lvalue() {
                        self.error(target.position(), "cible de lecture invalide");
                        continue;
                    }
                    if let Some(root) = lvalue_root(target) {
                        if let Some(symbol) = self.scope.lookup(root) {
                            if symbol.is_constant() {
                                self.error(*position, format!("lecture interdite vers la constante {root}"));
                            }
                        }
                    }
                    self.check_expression(target);
                }
            }
            Statement::Break(position) => {
                if self.loop_or_switch_depth == 0 {
                    self.error(*position, "'Sortir' hors boucle ou 'Selon'");
                }
            }
            Statement::QuitLoop(position) => {
                if self.for_depth == 0 {
                    self.error(*position, "'Quitter Pour' hors boucle 'Pour'");
                }
            }
            Statement::Switch { scrutinee, cases, default, position } => {
                let scrutinee_ty = self.check_expression(scrutinee);
                if !scrutinee_ty.is_integer_ish() {
                    self.error(*position, "selecteur 'Selon' non entier");
                }

                self.loop_or_switch_depth += 1;
                let mut seen_labels = HashSet::new();
                for case in cases {
                    for value in &case.values {
                        let value_ty = self.check_expression(value);
                        if !value_ty.is_integer_ish() {
                            self.error(value.position(), "etiquette de cas non entiere");
                        }
                        match self.fold(value) {
                            Some(folded) => {
                                if !seen_labels.insert(folded) {
                                    self.error(
                                        value.position(),
                                        format!("etiquette de cas dupliquee: {folded}"),
                                    );
                                }
                            }
                            None => self.error(
                                value.position(),
                                "etiquette de cas non calculable a la compilation",
                            ),
                        }
                    }
                    self.check_scoped_block(&case.body);
                }
                if let Some(default) = default {
                    self.check_scoped_block(default);
                }
                self.loop_or_switch_depth -= 1;
            }
        }
    }

    fn check_expression(&mut self, expr: &Expression) -> Type {
        match expr {
            Expression::IntegerLiteral { .. } => Type::Integer,
            Expression::RealLiteral { .. } => Type::Real,
            Expression::StringLiteral { .. } => Type::String,
            Expression::BooleanLiteral { .. } => Type::Boolean,
            Expression::Identifier { name, position } => match self.scope.lookup(name) {
                None => {
                    self.error(*position, format!("identifiant non declare: {name}"));
                    Type::Error
                }
                Some(symbol) => match symbol.kind {
                    SymbolKind::Function | SymbolKind::Procedure | SymbolKind::Struct => {
                        self.error(*position, format!("{name} ne peut pas etre utilise comme valeur"));
                        Type::Error
                    }
                    _ => symbol.ty.clone(),
                },
            },
            Expression::Unary { op, operand, position } => {
                let operand_ty = self.check_expression(operand);
                match op {
                    crate::ast::UnaryOp::Not => {
                        if !operand_ty.is_boolean() {
                            self.error(*position, "operande de 'Non' non booleen");
                        }
                        Type::Boolean
                    }
                    crate::ast::UnaryOp::Neg => {
                        if !operand_ty.is_numeric() {
                            self.error(*position, "operande de la negation non numerique");
                            return Type::Error;
                        }
                        operand_ty
                    }
                }
            }
            Expression::Binary { op, left, right, position } => {
                use crate::ast::BinaryOp::*;
                let left_ty = self.check_expression(left);
                let right_ty = self.check_expression(right);
                match op {
                    Add | Sub | Mul | Div | IntDiv | Mod | Pow => {
                        if !left_ty.is_numeric() || !right_ty.is_numeric() {
                            self.error(*position, "operandes arithmetiques non numeriques");
                            Type::Error
                        } else if left_ty == Type::Real || right_ty == Type::Real {
                            Type::Real
                        } else {
                            Type::Integer
                        }
                    }
                    Lt | Le | Gt | Ge => {
                        if !left_ty.is_numeric() || !right_ty.is_numeric() {
                            self.error(*position, "comparaison sur des operandes non numeriques");
                        }
                        Type::Boolean
                    }
                    Eq | Ne => {
                        if !left_ty.comparable_for_equality(&right_ty) {
                            self.error(*position, "comparaison d'egalite entre types incompatibles");
                        }
                        Type::Boolean
                    }
                    And | Or => {
                        if !left_ty.is_boolean() || !right_ty.is_boolean() {
                            self.error(*position, "operandes logiques non booleens");
                        }
                        Type::Boolean
                    }
                }
            }
            Expression::Index { base, index, position } => {
                let base_ty = self.check_expression(base);
                let index_ty = self.check_expression(index);
                if !index_ty.is_integer_ish() {
                    self.error(*position, "indice de tableau non entier");
                }
                match base_ty {
                    Type::Array { element, dimensions } if dimensions > 1 => Type::Array {
                        element,
                        dimensions: dimensions - 1,
                    },
                    Type::Array { element, .. } => *element,
                    Type::Error => Type::Error,
                    other => {
                        self.error(*position, format!("indexation sur un type non-tableau: {other}"));
                        Type::Error
                    }
                }
            }
            Expression::Field { base, field, position } => {
                let base_ty = self.check_expression(base);
                match base_ty {
                    Type::Struct { name } => {
                        let fields = self.structs.get(&name);
                        match fields.and_then(|fields| fields.iter().find(|f| &f.name == field)) {
                            Some(found) => found.ty.clone(),
                            None => {
                                self.error(*position, format!("champ inconnu {field} dans {name}"));
                                Type::Error
                            }
                        }
                    }
                    Type::Error => Type::Error,
                    other => {
                        self.error(*position, format!("acces de champ sur un type non-structure: {other}"));
                        Type::Error
                    }
                }
            }
            Expression::Call { callee, args, position } => {
                let Expression::Identifier { name, .. } = callee.as_ref() else {
                    self.error(*position, "l'appele doit etre un identifiant de fonction ou procedure");
                    for arg in args {
                        self.check_expression(arg);
                    }
                    return Type::Error;
                };

                let Some(symbol) = self.scope.lookup(name).cloned() else {
                    self.error(*position, format!("identifiant non declare: {name}"));
                    for arg in args {
                        self.check_expression(arg);
                    }
                    return Type::Error;
                };

                if !matches!(symbol.kind, SymbolKind::Function | SymbolKind::Procedure) {
                    self.error(*position, format!("{name} n'est ni une fonction ni une procedure"));
                    for arg in args {
                        self.check_expression(arg);
                    }
                    return Type::Error;
                }

                if args.len() != symbol.params.len() {
                    self.error(
                        *position,
                        format!(
                            "nombre d'arguments incorrect pour {name}: attendu {}, trouve {}",
                            symbol.params.len(),
                            args.len()
                        ),
                    );
                }

                for (arg, (param_name, param_type)) in args.iter().zip(&symbol.params) {
                    let arg_ty = self.check_expression(arg);
                    if !param_type.is_assignable_from(&arg_ty) {
                        self.error(
                            arg.position(),
                            format!(
                                "argument {param_name} de {name}: attendu {param_type}, trouve {arg_ty}"
                            ),
                        );
                    }
                }
                for extra in args.iter().skip(symbol.params.len()) {
                    self.check_expression(extra);
                }

                symbol.return_type.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};

    fn analyze_source(source: &str) -> AnalysisResult {
        let (tokens, lex_diagnostics) = lexer::lex(source);
        assert!(lex_diagnostics.is_empty(), "{lex_diagnostics:?}");
        let (program, parse_diagnostics) = parser::parse(tokens);
        assert!(parse_diagnostics.is_empty(), "{parse_diagnostics:?}");
        analyze(&program)
    }

    #[test]
    fn accepts_clean_program() {
        let result = analyze_source(
            "Algorithme A\nObjets:\nx: Variable entier\nDebut\nx <- 2 + 3 * 4\nEcrire(x)\nFin\n",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn reports_undeclared_identifier() {
        let result = analyze_source("Algorithme U\nDebut\ny <- 1\nFin\n");
        assert!(result.diagnostics.iter().any(|d| d.message.contains("y")));
    }

    #[test]
    fn reports_duplicate_case_label_exactly_once() {
        let source = "Algorithme D\nObjets:\nn: Variable entier\nDebut\nSelon n\nCas 1:\nEcrire(1)\nCas 1:\nEcrire(2)\nFinSelon\nFin\n";
        let result = analyze_source(source);
        let duplicates = result
            .diagnostics
            .iter()
            .filter(|d| d.message.contains("dupliquee"))
            .count();
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn folds_array_size_constant() {
        let source =
            "Algorithme B\nObjets:\nN: Constante entier = 5\nt: Tableau entier[N]\nDebut\nt[0] <- 1\nFin\n";
        let result = analyze_source(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn rejects_assignment_to_constant() {
        let source = "Algorithme C\nObjets:\nN: Constante entier = 5\nDebut\nN <- 6\nFin\n";
        let result = analyze_source(source);
        assert!(result.diagnostics.iter().any(|d| d.message.contains("constante")));
    }

    #[test]
    fn rejects_break_outside_loop() {
        let result = analyze_source("Algorithme S\nDebut\nSortir\nFin\n");
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn rejects_function_without_return_value() {
        let source = "Algorithme F\nDebut\nFonction Carre(x: entier): entier\nDebut\nRetour\nFinFonct\nFin\n";
        let result = analyze_source(source);
        assert!(result.diagnostics.iter().any(|d| d.message.contains("retour")));
    }

    #[test]
    fn allows_recursive_function_calls() {
        let source = "Algorithme R\nDebut\nFonction Fact(n: entier): entier\nDebut\nRetourner n * Fact(n - 1)\nFinFonct\nFin\n";
        let result = analyze_source(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn widens_character_and_boolean_to_integer_in_indexing() {
        let source = "Algorithme I\nObjets:\nt: Tableau entier[3]\nb: Variable booleen\nDebut\nb <- Vrai\nt[b] <- 1\nFin\n";
        let result = analyze_source(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }
}
