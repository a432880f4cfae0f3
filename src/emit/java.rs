//! Java back-end: emits a single `Main.java` — a public class `Main` with a
//! shared `Scanner` for input, static nested classes for structs (each with a
//! default-initializing constructor), static fields for globals, a static
//! initializer block for any array-of-struct global that needs per-element
//! `new` calls, static methods for functions/procedures, and a
//! `public static void main(String[] args)` entry point. Mirrors the shape
//! of the distilled original's `jgen.c` (`emit_structs`, `emit_global_static_init`,
//! `emit_funcproc`).

use std::collections::HashMap;

use crate::ast::{
    BinaryOp, Case, Declaration, Definition, Expression, Field, Param, Program, Statement,
    TypeExpr, UnaryOp,
};
use crate::diagnostics::Diagnostic;
use crate::sem::{AnalysisResult, Scope, Symbol, Type};

use super::{type_expr_to_type, Writer};

pub fn emit(program: &Program, analysis: &AnalysisResult) -> Result<String, Diagnostic> {
    let mut w = Writer::new();
    w.line("import java.util.*;");
    w.blank();
    w.line("public class Main {");
    w.indent();
    w.line("static Scanner _sc = new Scanner(System.in);");
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
        for def in &program.definitions {
            if let Definition::Struct { name, fields, .. } = def {
                emit_struct(&mut w, name, fields)?;
            }
        }
    }

    w.line("// Globales");
    let mut array_struct_inits = Vec::new();
    for decl in &program.declarations {
        emit_global_decl(&mut w, decl, &struct_names, &mut array_struct_inits)?;
    }
    w.blank();

    if !array_struct_inits.is_empty() {
        w.line("static {");
        w.indent();
        for init in &array_struct_inits {
            w.line(init);
        }
        w.dedent();
        w.line("}");
        w.blank();
    }

    w.line("// Fonctions / Procedures");
    for def in &program.definitions {
        match def {
            Definition::Function { name, params, return_type, body, .. } => {
                emit_callable(&mut w, name, params, Some(return_type), body, &global_scope, analysis, &struct_names)?;
            }
            Definition::Procedure { name, params, body, .. } => {
                emit_callable(&mut w, name, params, None, body, &global_scope, analysis, &struct_names)?;
            }
            Definition::Struct { .. } => {}
        }
    }

    w.line("public static void main(String[] args) {");
    w.indent();
    let mut main_scope = global_scope.clone();
    main_scope.enter_scope();
    emit_block(&mut w, &program.main_block, &mut main_scope, analysis, &struct_names)?;
    w.dedent();
    w.line("}");

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

fn is_struct_name(name: &str, struct_names: &[&str]) -> bool {
    struct_names.contains(&name)
}

/// Base element type name, peeling through any `ArrayOf` wrapper.
fn base_type_expr(mut type_expr: &TypeExpr) -> &TypeExpr {
    while let TypeExpr::ArrayOf { element, .. } = type_expr {
        type_expr = element;
    }
    type_expr
}

fn java_base_type_name(type_expr: &TypeExpr) -> String {
    use crate::ast::PrimitiveType::*;
    match type_expr {
        TypeExpr::Primitive { kind, .. } => match kind {
            Integer => "int",
            Real => "double",
            Character => "char",
            String => "String",
            Boolean => "boolean",
        }
        .to_string(),
        TypeExpr::Named { name, .. } => name.clone(),
        TypeExpr::ArrayOf { .. } => java_base_type_name(base_type_expr(type_expr)),
    }
}

/// Full Java type name, e.g. `int[][]` for a two-dimensional integer array.
fn java_type_name(type_expr: &TypeExpr) -> String {
    match type_expr {
        TypeExpr::ArrayOf { element, dimensions, .. } => {
            format!("{}{}", java_type_name(element), "[]".repeat(dimensions.len()))
        }
        other => java_base_type_name(other),
    }
}

fn default_value_java(type_expr: &TypeExpr, struct_names: &[&str]) -> String {
    match type_expr {
        TypeExpr::Primitive { kind, .. } => match kind {
            crate::ast::PrimitiveType::Integer => "0".into(),
            crate::ast::PrimitiveType::Real => "0.0".into(),
            crate::ast::PrimitiveType::Character => "'\\0'".into(),
            crate::ast::PrimitiveType::String => "\"\"".into(),
            crate::ast::PrimitiveType::Boolean => "false".into(),
        },
        TypeExpr::Named { name, .. } => format!("new {name}()"),
        TypeExpr::ArrayOf { element, dimensions, .. } => {
            let base = java_base_type_name(element);
            let dims: Vec<String> = dimensions
                .iter()
                .map(|d| d.as_ref().map(render_const_expr).unwrap_or_default())
                .collect();
            let _ = struct_names;
            format!("new {base}[{}]", dims.join("]["))
        }
    }
}

fn render_const_expr(expr: &Expression) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => {
            format!("-({})", render_const_expr(operand))
        }
        Expression::Binary { op, left, right, .. } => {
            let l = render_const_expr(left);
            let r = render_const_expr(right);
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

fn emit_struct(w: &mut Writer, name: &str, fields: &[Field]) -> Result<(), Diagnostic> {
    w.line(format!("static class {name} {{"));
    w.indent();
    for field in fields {
        w.line(format!("{} {};", java_type_name(&field.type_expr), field.name));
    }
    w.line(format!("{name}() {{"));
    w.indent();
    for field in fields {
        w.line(format!("this.{} = {};", field.name, default_value_java(&field.type_expr, &[])));
    }
    w.dedent();
    w.line("}");
    w.dedent();
    w.line("}");
    w.blank();
    Ok(())
}

/// Emits nested for-loops constructing each element of `name` (rank
/// `dims.len()`) via `new Struct()`, used both inside the global static
/// initializer block and inline for local array-of-struct declarations.
fn struct_array_init_stmts(w: &mut Writer, name: &str, struct_name: &str, dims: &[String]) {
    let mut indices = Vec::new();
    for (depth, dim) in dims.iter().enumerate() {
        let idx = format!("__i{depth}");
        w.line(format!("for (int {idx} = 0; {idx} < {dim}; {idx}++) {{"));
        w.indent();
        indices.push(idx);
    }
    let access = indices.iter().map(|i| format!("[{i}]")).collect::<String>();
    w.line(format!("{name}{access} = new {struct_name}();"));
    for _ in dims {
        w.dedent();
        w.line("}");
    }
}

fn emit_global_decl(
    w: &mut Writer,
    decl: &Declaration,
    struct_names: &[&str],
    array_struct_inits: &mut Vec<String>,
) -> Result<(), Diagnostic> {
    match decl {
        Declaration::Variable { name, type_expr, .. } => {
            w.line(format!(
                "static {} {name} = {};",
                java_type_name(type_expr),
                default_value_java(type_expr, struct_names)
            ));
        }
        Declaration::Constant { name, type_expr, value, .. } => {
            w.line(format!(
                "static final {} {name} = {};",
                java_type_name(type_expr),
                render_plain_expr(value)
            ));
        }
        Declaration::Array { name, element_type, dimensions, .. } => {
            let base = java_base_type_name(element_type);
            let dims: Vec<String> = dimensions.iter().map(render_const_expr).collect();
            w.line(format!(
                "static {}{} {name} = new {base}[{}];",
                base,
                "[]".repeat(dimensions.len()),
                dims.join("][")
            ));
            if let TypeExpr::Named { name: struct_name, .. } = element_type {
                if is_struct_name(struct_name, struct_names) {
                    let mut inner = Writer::new();
                    struct_array_init_stmts(&mut inner, name, struct_name, &dims);
                    array_struct_inits.push(inner.finish().trim_end().to_string());
                }
            }
        }
    }
    Ok(())
}

fn render_plain_expr(expr: &Expression) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", java_escape(value)),
        Expression::BooleanLiteral { value, .. } => value.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => format!("-({})", render_plain_expr(operand)),
        Expression::Binary { op, left, right, .. } => {
            let l = render_plain_expr(left);
            let r = render_plain_expr(right);
            let sym = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div | BinaryOp::IntDiv => "/",
                BinaryOp::Mod => "%",
                _ => "+",
            };
            format!("({l} {sym} {r})")
        }
        _ => "0".to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_callable(
    w: &mut Writer,
    name: &str,
    params: &[Param],
    return_type: Option<&TypeExpr>,
    body: &[Statement],
    global_scope: &Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    let ret = match return_type {
        Some(t) => java_type_name(t),
        None => "void".to_string(),
    };
    let mut param_strs = Vec::new();
    let mut scope = global_scope.clone();
    scope.enter_scope();
    for p in params {
        param_strs.push(format!("{} {}", java_type_name(&p.type_expr), p.name));
        scope.declare(Symbol::parameter(p.name.clone(), type_expr_to_type(&p.type_expr)));
    }
    w.line(format!("static {ret} {name}({}) {{", param_strs.join(", ")));
    w.indent();
    emit_block(w, body, &mut scope, analysis, struct_names)?;
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
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    for statement in statements {
        emit_statement(w, statement, scope, analysis, struct_names)?;
    }
    Ok(())
}

fn emit_scoped_block(
    w: &mut Writer,
    statements: &[Statement],
    scope: &Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    w.line("{");
    w.indent();
    let mut inner = scope.clone();
    inner.enter_scope();
    emit_block(w, statements, &mut inner, analysis, struct_names)?;
    w.dedent();
    w.line("}");
    Ok(())
}

fn emit_statement(
    w: &mut Writer,
    statement: &Statement,
    scope: &mut Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    match statement {
        Statement::Declaration(decl) => {
            declare_global(scope, decl);
            match decl {
                Declaration::Variable { name, type_expr, .. } => {
                    w.line(format!(
                        "{} {name} = {};",
                        java_type_name(type_expr),
                        default_value_java(type_expr, struct_names)
                    ));
                }
                Declaration::Constant { name, type_expr, value, .. } => {
                    w.line(format!(
                        "final {} {name} = {};",
                        java_type_name(type_expr),
                        render_expr(value, scope, analysis)
                    ));
                }
                Declaration::Array { name, element_type, dimensions, .. } => {
                    let base = java_base_type_name(element_type);
                    let dims: Vec<String> = dimensions
                        .iter()
                        .map(|d| render_expr(d, scope, analysis))
                        .collect();
                    w.line(format!(
                        "{}{} {name} = new {base}[{}];",
                        base,
                        "[]".repeat(dimensions.len()),
                        dims.join("][")
                    ));
                    if let TypeExpr::Named { name: struct_name, .. } = element_type {
                        if is_struct_name(struct_name, struct_names) {
                            struct_array_init_stmts(w, name, struct_name, &dims);
                        }
                    }
                }
            }
        }
        Statement::Block(statements, _) => emit_scoped_block(w, statements, scope, analysis, struct_names)?,
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
            emit_block(w, then_block, &mut inner, analysis, struct_names)?;
            w.dedent();
            for (cond, block) in elif_conditions.iter().zip(elif_blocks) {
                w.line(format!("}} else if ({}) {{", render_expr(cond, scope, analysis)));
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, block, &mut inner, analysis, struct_names)?;
                w.dedent();
            }
            if let Some(else_block) = else_block {
                w.line("} else {");
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, else_block, &mut inner, analysis, struct_names)?;
                w.dedent();
            }
            w.line("}");
        }
        Statement::While { condition, body, .. } => {
            w.line(format!("while ({}) {{", render_expr(condition, scope, analysis)));
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, body, &mut inner, analysis, struct_names)?;
            w.dedent();
            w.line("}");
        }
        Statement::For { variable, start, end, step, body, .. } => {
            w.line("{");
            w.indent();
            w.line(format!("long __start = {};", render_expr(start, scope, analysis)));
            w.line(format!("long __end = {};", render_expr(end, scope, analysis)));
            let step_text = step
                .as_ref()
                .map(|s| render_expr(s, scope, analysis))
                .unwrap_or_else(|| "1".to_string());
            w.line(format!("long __step = {step_text};"));
            w.line(format!("{variable} = (int) __start;"));
            w.line(format!(
                "for (; (__step >= 0) ? ({variable} <= __end) : ({variable} >= __end); {variable} += __step) {{"
            ));
            w.indent();
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, body, &mut inner, analysis, struct_names)?;
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
            emit_block(w, body, &mut inner, analysis, struct_names)?;
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
                emit_read(w, target, scope, analysis);
            }
        }
        Statement::Break(_) => w.line("break;"),
        Statement::QuitLoop(_) => w.line("break;"),
        Statement::Switch { scrutinee, cases, default, .. } => {
            w.line(format!("switch ({}) {{", render_expr(scrutinee, scope, analysis)));
            w.indent();
            for case in cases {
                emit_case(w, case, scope, analysis, struct_names)?;
            }
            if let Some(default) = default {
                w.line("default: {");
                w.indent();
                let mut inner = scope.clone();
                inner.enter_scope();
                emit_block(w, default, &mut inner, analysis, struct_names)?;
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

fn emit_case(
    w: &mut Writer,
    case: &Case,
    scope: &Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    let globals = &analysis.global_constants;
    for value in &case.values {
        let folded = fold_case_label(value, globals).unwrap_or(0);
        w.line(format!("case {folded}:"));
    }
    w.line("{");
    w.indent();
    let mut inner = scope.clone();
    inner.enter_scope();
    emit_block(w, &case.body, &mut inner, analysis, struct_names)?;
    w.dedent();
    w.line("}");
    w.line("break;");
    Ok(())
}

/// Java `case` labels must be compile-time constants; folding them here
/// (rather than re-emitting the source expression) sidesteps the question
/// of whether every referenced identifier is itself a Java compile-time
/// constant.
fn fold_case_label(expr: &Expression, globals: &HashMap<String, i64>) -> Option<i64> {
    match expr {
        Expression::IntegerLiteral { value, .. } => Some(*value),
        Expression::Identifier { name, .. } => globals.get(name).copied(),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => {
            fold_case_label(operand, globals).map(|v| v.wrapping_neg())
        }
        Expression::Binary { op, left, right, .. } => {
            let l = fold_case_label(left, globals)?;
            let r = fold_case_label(right, globals)?;
            match op {
                BinaryOp::Add => Some(l.wrapping_add(r)),
                BinaryOp::Sub => Some(l.wrapping_sub(r)),
                BinaryOp::Mul => Some(l.wrapping_mul(r)),
                BinaryOp::IntDiv => (r != 0).then(|| l.wrapping_div(r)),
                BinaryOp::Mod => (r != 0).then(|| l.wrapping_rem(r)),
                _ => None,
            }
        }
        _ => None,
    }
}

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
                _ => Type::Boolean,
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
            analysis.functions.get(name).map(|sig| sig.return_type.clone()).unwrap_or(Type::Error)
        }
    }
}

fn emit_write(w: &mut Writer, args: &[Expression], scope: &Scope, analysis: &AnalysisResult) {
    if args.is_empty() {
        w.line("System.out.println();");
        return;
    }
    let parts: Vec<String> = args
        .iter()
        .map(|arg| match arg {
            Expression::StringLiteral { value, .. } => format!("\"{}\"", java_escape(value)),
            other => render_expr(other, scope, analysis),
        })
        .collect();
    w.line(format!("System.out.println({});", parts.join(" + ")));
}

fn emit_read(w: &mut Writer, target: &Expression, scope: &Scope, analysis: &AnalysisResult) {
    let ty = infer(scope, analysis, target);
    let lvalue = render_expr(target, scope, analysis);
    let read_expr = match ty {
        Type::Real => "_sc.nextDouble()".to_string(),
        Type::Character => "_sc.next().charAt(0)".to_string(),
        Type::String => "_sc.next()".to_string(),
        Type::Boolean => "_sc.nextBoolean()".to_string(),
        _ => "_sc.nextInt()".to_string(),
    };
    w.line(format!("{lvalue} = {read_expr};"));
}

fn render_expr(expr: &Expression, scope: &Scope, analysis: &AnalysisResult) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", java_escape(value)),
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
                BinaryOp::Div => format!("((double)({l}) / (double)({r}))"),
                BinaryOp::IntDiv => format!("((long)({l}) / (long)({r}))"),
                BinaryOp::Mod => format!("((long)({l}) % (long)({r}))"),
                BinaryOp::Pow => format!("Math.pow({l}, {r})"),
                BinaryOp::Lt => format!("({l} < {r})"),
                BinaryOp::Le => format!("({l} <= {r})"),
                BinaryOp::Gt => format!("({l} > {r})"),
                BinaryOp::Ge => format!("({l} >= {r})"),
                BinaryOp::Eq => {
                    if infer(scope, analysis, expr_left(expr)) == Type::String {
                        format!("{l}.equals({r})")
                    } else {
                        format!("({l} == {r})")
                    }
                }
                BinaryOp::Ne => format!("!({l} == {r})"),
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

fn expr_left(expr: &Expression) -> &Expression {
    match expr {
        Expression::Binary { left, .. } => left,
        other => other,
    }
}

fn java_escape(value: &str) -> String {
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
