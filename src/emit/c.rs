//! C back-end: a read-only tree walker over the resolved [`Program`] producing
//! a single translation unit (`out.c`). Mirrors the shape of the distilled
//! original's `cgen.c`: struct typedefs, an `enum` for foldable top-level
//! integer constants (so array dimensions and case labels can reference them
//! by name, exactly as a real C compile-time constant would), global
//! variable declarations with default-value synthesis, function/procedure
//! definitions, and `int main(void)`.
//!
//! Per spec.md's "Open Questions" (design note 9) and DESIGN.md's recorded
//! decision, arrays of more than one dimension are refused here rather than
//! reproducing the original's hard-coded column-stride flattening variable.

use crate::ast::{
    BinaryOp, Case, Declaration, Definition, Expression, Field, Param, Program, Statement,
    TypeExpr, UnaryOp,
};
use crate::diagnostics::Diagnostic;
use crate::sem::{AnalysisResult, Scope, Symbol, Type};

use super::{emit_error, type_expr_to_type, Writer};

pub fn emit(program: &Program, analysis: &AnalysisResult) -> Result<String, Diagnostic> {
    let mut w = Writer::new();
    w.line("#include <stdio.h>");
    w.line("#include <stdlib.h>");
    w.line("#include <stdbool.h>");
    w.line("#include <string.h>");
    w.line("#include <math.h>");
    w.blank();

    let struct_names: Vec<&str> = program
        .definitions
        .iter()
        .filter_map(|d| match d {
            Definition::Struct { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let mut global_scope = Scope::new();
    for def in &program.definitions {
        match def {
            Definition::Struct { name, .. } => {
                let fields = analysis
                    .struct_layouts
                    .get(name)
                    .map(|fs| fs.iter().map(|f| (f.name.clone(), f.ty.clone())).collect())
                    .unwrap_or_default();
                global_scope.declare(Symbol::strukt(name.clone(), fields));
            }
            Definition::Function { name, .. } | Definition::Procedure { name, .. } => {
                if let Some(sig) = analysis.functions.get(name) {
                    let symbol = if sig.is_function {
                        Symbol::function(name.clone(), sig.params.clone(), sig.return_type.clone())
                    } else {
                        Symbol::procedure(name.clone(), sig.params.clone())
                    };
                    global_scope.declare(symbol);
                }
            }
        }
    }
    for decl in &program.declarations {
        declare_global(&mut global_scope, decl);
    }

    if !struct_names.is_empty() {
        w.line("// Structures");
        for def in &program.definitions {
            if let Definition::Struct { name, fields, .. } = def {
                emit_struct(&mut w, name, fields)?;
            }
        }
        w.blank();
    }

    let enum_members: Vec<(&str, i64)> = program
        .declarations
        .iter()
        .filter_map(|decl| match decl {
            Declaration::Constant { name, .. } => analysis
                .global_constants
                .get(name)
                .map(|value| (name.as_str(), *value)),
            _ => None,
        })
        .collect();
    if !enum_members.is_empty() {
        w.line("// Constantes");
        w.line("enum {");
        w.indent();
        for (name, value) in &enum_members {
            w.line(format!("{name} = {value},"));
        }
        w.dedent();
        w.line("};");
        w.blank();
    }

    w.line("// Globales");
    for decl in &program.declarations {
        emit_global_decl(&mut w, decl, analysis)?;
    }
    w.blank();

    w.line("// Fonctions");
    for def in &program.definitions {
        match def {
            Definition::Function { name, params, return_type, body, .. } => {
                emit_callable(&mut w, name, params, Some(return_type), body, &global_scope, analysis)?;
            }
            Definition::Procedure { name, params, body, .. } => {
                emit_callable(&mut w, name, params, None, body, &global_scope, analysis)?;
            }
            Definition::Struct { .. } => {}
        }
    }

    w.line("// Main");
    w.line("int main(void) {");
    w.indent();
    let mut main_scope = global_scope.clone();
    emit_block(&mut w, &program.main_block, &mut main_scope, analysis)?;
    w.line("return 0;");
    w.dedent();
    w.line("}");

    Ok(w.finish())
}

fn declare_global(scope: &mut Scope, decl: &Declaration) {
    match decl {
        Declaration::Variable { name, type_expr, .. } => {
            scope.declare(Symbol::variable(name.clone(), type_expr_to_type(type_expr)));
        }
        Declaration::Constant { name, type_expr, .. } => {
            scope.declare(Symbol::constant(name.clone(), type_expr_to_type(type_expr), None));
        }
        Declaration::Array { name, element_type, dimensions, .. } => {
            let ty = Type::Array {
                element: Box::new(type_expr_to_type(element_type)),
                dimensions: dimensions.len(),
            };
            scope.declare(Symbol::array(name.clone(), ty));
        }
    }
}

fn check_single_dimension(type_expr: &TypeExpr) -> Result<(), Diagnostic> {
    if let TypeExpr::ArrayOf { dimensions, .. } = type_expr {
        if dimensions.len() > 1 {
            return Err(emit_error(
                "le backend C ne prend en charge que les tableaux a une dimension",
            ));
        }
    }
    Ok(())
}

fn emit_struct(w: &mut Writer, name: &str, fields: &[Field]) -> Result<(), Diagnostic> {
    w.line(format!("typedef struct {name} {{"));
    w.indent();
    for field in fields {
        check_single_dimension(&field.type_expr)?;
        w.line(format!("{};", c_declarator(&field.type_expr, &field.name)?));
    }
    w.dedent();
    w.line(format!("}} {name};"));
    Ok(())
}

/// Renders `<base type> name[dim]` (or bare `<type> name` for non-arrays).
fn c_declarator(type_expr: &TypeExpr, name: &str) -> Result<String, Diagnostic> {
    match type_expr {
        TypeExpr::ArrayOf { element, dimensions, .. } => {
            if dimensions.len() > 1 {
                return Err(emit_error(
                    "le backend C ne prend en charge que les tableaux a une dimension",
                ));
            }
            let base = c_type_name(element)?;
            match dimensions.first().and_then(|d| d.as_ref()) {
                Some(dim) => Ok(format!("{base} {name}[{}]", render_const_expr(dim))),
                None => Ok(format!("{base} {name}[]")),
            }
        }
        other => Ok(format!("{} {name}", c_type_name(other)?)),
    }
}

fn c_type_name(type_expr: &TypeExpr) -> Result<String, Diagnostic> {
    use crate::ast::PrimitiveType::*;
    match type_expr {
        TypeExpr::Primitive { kind, .. } => Ok(match kind {
            Integer => "int",
            Real => "double",
            Character => "char",
            String => "char*",
            Boolean => "bool",
        }
        .to_string()),
        TypeExpr::Named { name, .. } => Ok(name.clone()),
        TypeExpr::ArrayOf { .. } => {
            Err(emit_error("type de tableau utilise hors d'une declaration"))
        }
    }
}

fn default_value_for(type_expr: &TypeExpr) -> String {
    match type_expr {
        TypeExpr::Primitive { kind, .. } => match kind {
            crate::ast::PrimitiveType::Integer => "0".into(),
            crate::ast::PrimitiveType::Real => "0.0".into(),
            crate::ast::PrimitiveType::Character => "'\\0'".into(),
            crate::ast::PrimitiveType::String => "NULL".into(),
            crate::ast::PrimitiveType::Boolean => "false".into(),
        },
        TypeExpr::Named { .. } | TypeExpr::ArrayOf { .. } => "{0}".into(),
    }
}

/// Renders a constant-folded expression textually for use in a C constant
/// context (array dimension, enum initializer). Identifiers referencing
/// already-declared integer constants render as bare C identifiers, which
/// remain valid C constant-expressions since those constants are lowered
/// into the `enum` block above.
fn render_const_expr(expr: &Expression) -> String {
    render_plain_expr(expr)
}

fn render_plain_expr(expr: &Expression) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", c_escape(value)),
        Expression::BooleanLiteral { value, .. } => value.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => {
            format!("-({})", render_plain_expr(operand))
        }
        Expression::Binary { op, left, right, .. } => {
            let l = render_plain_expr(left);
            let r = render_plain_expr(right);
            let sym = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::IntDiv | BinaryOp::Div => "/",
                BinaryOp::Mod => "%",
                _ => "+",
            };
            format!("({l} {sym} {r})")
        }
        _ => "0".to_string(),
    }
}

fn emit_global_decl(w: &mut Writer, decl: &Declaration, analysis: &AnalysisResult) -> Result<(), Diagnostic> {
    match decl {
        Declaration::Variable { name, type_expr, .. } => {
            check_single_dimension(type_expr)?;
            w.line(format!(
                "{} = {};",
                c_declarator(type_expr, name)?,
                default_value_for(type_expr)
            ));
        }
        Declaration::Array { name, element_type, dimensions, .. } => {
            if dimensions.len() > 1 {
                return Err(emit_error(
                    "le backend C ne prend en charge que les tableaux a une dimension",
                ));
            }
            let base = c_type_name(element_type)?;
            let dim = render_const_expr(&dimensions[0]);
            w.line(format!("{base} {name}[{dim}];"));
        }
        Declaration::Constant { name, type_expr, value, .. } => {
            if analysis.global_constants.contains_key(name) {
                return Ok(()); // already lowered into the enum block
            }
            w.line(format!(
                "static const {} = {};",
                c_declarator(type_expr, name)?,
                render_plain_expr(value)
            ));
        }
    }
    Ok(())
}

fn emit_callable(
    w: &mut Writer,
    name: &str,
    params: &[Param],
    return_type: Option<&TypeExpr>,
    body: &[Statement],
    global_scope: &Scope,
    analysis: &AnalysisResult,
) -> Result<(), Diagnostic> {
    let ret = match return_type {
        Some(t) => c_type_name(t)?,
        None => "void".to_string(),
    };
    let mut param_strs = Vec::new();
    let mut scope = global_scope.clone();
    scope.enter_scope();
    for p in params {
        check_single_dimension(&p.type_expr)?;
        param_strs.push(c_declarator(&p.type_expr, &p.name)?);
        scope.declare(Symbol::parameter(p.name.clone(), type_expr_to_type(&p.type_expr)));
    }
    w.line(format!("{ret} {name}({}) {{", param_strs.join(", ")));
    w.indent();
    emit_block(w, body, &mut scope, analysis)?;
    w.dedent();
    w.line("}");
    w.blank();
    Ok(())
}

fn emit_block(
    w: &mut Writer,
    statements: &[Statement],
    scope: &mut Scope,
    analysis: &AnalysisResult,
) -> Result<(), Diagnostic> {
    for statement in statements {
        emit_statement(w, statement, scope, analysis)?;
    }
    Ok(())
}

fn emit_scoped_block(
    w: &mut Writer,
    statements: &[Statement],
    scope: &Scope,
    analysis: &AnalysisResult,
) -> Result<(), Diagnostic> {
    w.line("{");
    w.indent();
    let mut inner = scope.clone();
    inner.enter_scope();
    emit_block(w, statements, &mut inner, analysis)?;
    w.dedent();
    w.line("}");
    Ok(())
}

fn emit_statement(
    w: &mut Writer,
    statement: &Statement,
    scope: &mut Scope,
    analysis: &AnalysisResult,
) -> Result<(), Diagnostic> {
    match statement {
        Statement::Declaration(decl) => {
            declare_global(scope, decl);
            match decl {
                Declaration::Variable { name, type_expr, .. } => {
                    check_single_dimension(type_expr)?;
                    w.line(format!(
                        "{} = {};",
                        c_declarator(type_expr, name)?,
                        default_value_for(type_expr)
                    ));
                }
                Declaration::Constant { name, type_expr, value, .. } => {
                    w.line(format!(
                        "const {} = {};",
                        c_declarator(type_expr, name)?,
                        render_expr(value, scope, analysis)
                    ));
                }
                Declaration::Array { name, element_type, dimensions, .. } => {
                    if dimensions.len() > 1 {
                        return Err(emit_error(
                            "le backend C ne prend en charge que les tableaux a une dimension",
                        ));
                    }
                    let base = c_type_name(element_type)?;
                    let dim = render_const_expr(&dimensions[0]);
                    w.line(format!("{base} {name}[{dim}];"));
                }
            }
        }
        Statement::Block(statements, _) => emit_scoped_block(w, statements, scope, analysis)?,
        Statement::Assign { target, value, .. } => {
            w.line(format!(
                "{} = {};",
                render_expr(target, scope, analysis),
                render_expr(value, scope, analysis)
            ));
        }
        Statement::If {
            condition,
            then_block,
            elif_conditions,
            elif_blocks,
            else_block,
            ..
        } => {
            w.line(format!("if ({}) {{", render_expr(condition, scope, analysis)));
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, then_block, &mut inner, analysis)?;
            w.dedent();
            for (cond, block) in elif_conditions.iter().zip(elif_blocks) {
                w.line(format!("}} else if ({}) {{", render_expr(cond, scope, analysis)));
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, block, &mut inner, analysis)?;
                w.dedent();
            }
            if let Some(else_block) = else_block {
                w.line("} else {");
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, else_block, &mut inner, analysis)?;
                w.dedent();
            }
            w.line("}");
        }
        Statement::While { condition, body, .. } => {
            w.line(format!("while ({}) {{", render_expr(condition, scope, analysis)));
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, body, &mut inner, analysis)?;
            w.dedent();
            w.line("}");
        }
        Statement::For { variable, start, end, step, body, .. } => {
            w.line("{");
            w.indent();
            w.line(format!("long long __start = {};", render_expr(start, scope, analysis)));
            w.line(format!("long long __end = {};", render_expr(end, scope, analysis)));
            let step_text = step
                .as_ref()
                .map(|s| render_expr(s, scope, analysis))
                .unwrap_or_else(|| "1".to_string());
            w.line(format!("long long __step = {step_text};"));
            w.line(format!("{variable} = __start;"));
            w.line(format!(
                "for (; (__step >= 0) ? ({variable} <= __end) : ({variable} >= __end); {variable} += __step) {{"
            ));
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, body, &mut inner, analysis)?;
            w.dedent();
            w.line("}");
            w.dedent();
            w.line("}");
        }
        Statement::Repeat { body, until, .. } => {
            w.line("do {");
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, body, &mut inner, analysis)?;
            w.dedent();
            let cond = until
                .as_ref()
                .map(|u| render_expr(u, scope, analysis))
                .unwrap_or_else(|| "true".to_string());
            w.line(format!("}} while (!({cond}));"));
        }
        Statement::CallStatement(expr) => {
            w.line(format!("{};", render_expr(expr, scope, analysis)));
        }
        Statement::Return { value, .. } => match value {
            Some(value) => w.line(format!("return {};", render_expr(value, scope, analysis))),
            None => w.line("return;"),
        },
        Statement::Write { args, .. } => emit_write(w, args, scope, analysis),
        Statement::Read { targets, .. } => {
            for target in targets {
                emit_read(w, target, scope, analysis)?;
            }
        }
        Statement::Break(_) => w.line("break;"),
        Statement::QuitLoop(_) => w.line("break;"),
        Statement::Switch { scrutinee, cases, default, .. } => {
            w.line(format!("switch ({}) {{", render_expr(scrutinee, scope, analysis)));
            w.indent();
            for case in cases {
                emit_case(w, case, scope, analysis)?;
            }
            if let Some(default) = default {
                w.line("default: {");
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, default, &mut inner, analysis)?;
                w.dedent();
                w.line("}");
                w.line("break;");
            }
            w.dedent();
            w.line("}");
        }
    }
    Ok(())
}

fn emit_case(w: &mut Writer, case: &Case, scope: &Scope, analysis: &AnalysisResult) -> Result<(), Diagnostic> {
    for value in &case.values {
        w.line(format!("case {}:", render_const_expr(value)));
    }
    w.line("{");
    w.indent();
    let mut inner = scope.clone();
    inner.enter_scope();
    emit_block(w, &case.body, &mut inner, analysis)?;
    w.dedent();
    w.line("}");
    w.line("break;");
    Ok(())
}

fn emit_write(w: &mut Writer, args: &[Expression], scope: &Scope, analysis: &AnalysisResult) {
    let mut format = String::new();
    let mut rendered = Vec::new();
    for arg in args {
        if let Expression::StringLiteral { value, .. } = arg {
            format.push_str(&value.replace('%', "%%"));
            continue;
        }
        let ty = infer(scope, analysis, arg);
        format.push_str(match ty {
            Type::Real => "%g",
            Type::Character => "%c",
            Type::String => "%s",
            _ => "%d",
        });
        rendered.push(render_expr(arg, scope, analysis));
    }
    format.push_str("\\n");
    if rendered.is_empty() {
        w.line(format!("printf(\"{format}\");"));
    } else {
        w.line(format!("printf(\"{format}\", {});", rendered.join(", ")));
    }
}

fn emit_read(w: &mut Writer, target: &Expression, scope: &Scope, analysis: &AnalysisResult) -> Result<(), Diagnostic> {
    let ty = infer(scope, analysis, target);
    let lvalue = render_expr(target, scope, analysis);
    match ty {
        Type::Real => w.line(format!("scanf(\"%lf\", &{lvalue});")),
        Type::Character => w.line(format!("scanf(\" %c\", &{lvalue});")),
        Type::String => {
            w.line("{");
            w.indent();
            w.line("char __buf[256];");
            w.line("scanf(\"%255s\", __buf);");
            w.line(format!("{lvalue} = (char*)malloc(strlen(__buf) + 1);"));
            w.line(format!("strcpy({lvalue}, __buf);"));
            w.dedent();
            w.line("}");
        }
        Type::Boolean => {
            w.line("{");
            w.indent();
            w.line("int __tmp;");
            w.line("scanf(\"%d\", &__tmp);");
            w.line(format!("{lvalue} = (__tmp != 0);"));
            w.dedent();
            w.line("}");
        }
        _ => w.line(format!("scanf(\"%d\", &{lvalue});")),
    }
    Ok(())
}

/// Type inference the emitter performs purely for its own lowering
/// decisions (format specifiers, division strategy) — mirrors
/// `sem::Analyzer::check_expression`'s type-derivation rules but never
/// raises diagnostics: the tree is already known-valid by the time any
/// emitter runs.
fn infer(scope: &Scope, analysis: &AnalysisResult, expr: &Expression) -> Type {
    match expr {
        Expression::IntegerLiteral { .. } => Type::Integer,
        Expression::RealLiteral { .. } => Type::Real,
        Expression::StringLiteral { .. } => Type::String,
        Expression::BooleanLiteral { .. } => Type::Boolean,
        Expression::Identifier { name, .. } => {
            scope.lookup(name).map(|s| s.ty.clone()).unwrap_or(Type::Error)
        }
        Expression::Unary { op, operand, .. } => match op {
            UnaryOp::Not => Type::Boolean,
            UnaryOp::Neg => infer(scope, analysis, operand),
        },
        Expression::Binary { op, left, right, .. } => {
            let l = infer(scope, analysis, left);
            let r = infer(scope, analysis, right);
            match op {
                BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
                | BinaryOp::IntDiv | BinaryOp::Mod | BinaryOp::Pow => {
                    if l == Type::Real || r == Type::Real {
                        Type::Real
                    } else {
                        Type::Integer
                    }
                }
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
                | BinaryOp::Eq | BinaryOp::Ne | BinaryOp::And | BinaryOp::Or => Type::Boolean,
            }
        }
        Expression::Index { base, .. } => match infer(scope, analysis, base) {
            Type::Array { element, dimensions } if dimensions > 1 => {
                Type::Array { element, dimensions: dimensions - 1 }
            }
            Type::Array { element, .. } => *element,
            other => other,
        },
        Expression::Field { base, field, .. } => match infer(scope, analysis, base) {
            Type::Struct { name } => analysis
                .struct_layouts
                .get(&name)
                .and_then(|fields| fields.iter().find(|f| &f.name == field))
                .map(|f| f.ty.clone())
                .unwrap_or(Type::Error),
            _ => Type::Error,
        },
        Expression::Call { callee, .. } => {
            let Expression::Identifier { name, .. } = callee.as_ref() else {
                return Type::Error;
            };
            analysis
                .functions
                .get(name)
                .map(|sig| sig.return_type.clone())
                .unwrap_or(Type::Error)
        }
    }
}

fn render_expr(expr: &Expression, scope: &Scope, analysis: &AnalysisResult) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", c_escape(value)),
        Expression::BooleanLiteral { value, .. } => value.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op, operand, .. } => {
            let inner = render_expr(operand, scope, analysis);
            match op {
                UnaryOp::Not => format!("!({inner})"),
                UnaryOp::Neg => format!("-({inner})"),
            }
        }
        Expression::Binary { op, left, right, .. } => {
            let l = render_expr(left, scope, analysis);
            let r = render_expr(right, scope, analysis);
            match op {
                BinaryOp::Add => format!("({l} + {r})"),
                BinaryOp::Sub => format!("({l} - {r})"),
                BinaryOp::Mul => format!("({l} * {r})"),
                BinaryOp::Div => format!("({l} / {r})"),
                BinaryOp::IntDiv => format!("((long long)({l}) / (long long)({r}))"),
                BinaryOp::Mod => format!("((long long)({l}) % (long long)({r}))"),
                BinaryOp::Pow => {
                    let ty = infer(scope, analysis, expr);
                    if ty == Type::Integer {
                        format!("((int)pow({l}, {r}))")
                    } else {
                        format!("pow({l}, {r})")
                    }
                }
                BinaryOp::Lt => format!("({l} < {r})"),
                BinaryOp::Le => format!("({l} <= {r})"),
                BinaryOp::Gt => format!("({l} > {r})"),
                BinaryOp::Ge => format!("({l} >= {r})"),
                BinaryOp::Eq => format!("({l} == {r})"),
                BinaryOp::Ne => format!("({l} != {r})"),
                BinaryOp::And => format!("({l} && {r})"),
                BinaryOp::Or => format!("({l} || {r})"),
            }
        }
        Expression::Index { base, index, .. } => {
            format!("{}[{}]", render_expr(base, scope, analysis), render_expr(index, scope, analysis))
        }
        Expression::Field { base, field, .. } => {
            format!("{}.{field}", render_expr(base, scope, analysis))
        }
        Expression::Call { callee, args, .. } => {
            let name = render_expr(callee, scope, analysis);
            let args: Vec<String> = args.iter().map(|a| render_expr(a, scope, analysis)).collect();
            format!("{name}({})", args.join(", "))
        }
    }
}

fn c_escape(value: &str) -> String {
    let mut out = String::new();
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
