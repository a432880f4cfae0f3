//! Python back-end: emits a single `out.py` — one class per struct (with a
//! `__init__` performing the same default-value initialization as the other
//! two targets), module-level globals, top-level `def` functions/procedures,
//! a `def main():` holding the `Debut`/`Fin` block, and the customary
//! `if __name__ == "__main__": main()` guard. Grounded on the distilled
//! original's `pygen.c` (`emit_class`, `emit_def`, `emit_main_guard`).

use std::collections::HashMap;

use crate::ast::{
    BinaryOp, Case, Declaration, Definition, Expression, Program, Statement, TypeExpr, UnaryOp,
};
use crate::diagnostics::Diagnostic;
use crate::sem::{AnalysisResult, Scope, Symbol, Type};

use super::{type_expr_to_type, Writer};

pub fn emit(program: &Program, analysis: &AnalysisResult) -> Result<String, Diagnostic> {
    let mut w = Writer::new();

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

    for def in &program.definitions {
        if let Definition::Struct { name, fields, .. } = def {
            w.line(format!("class {name}:"));
            w.indent();
            w.line("def __init__(self):");
            w.indent();
            if fields.is_empty() {
                w.line("pass");
            }
            for field in fields {
                w.line(format!("self.{} = {}", field.name, default_value_py(&field.type_expr)));
            }
            w.dedent();
            w.dedent();
            w.blank();
        }
    }

    w.line("# Globales");
    for decl in &program.declarations {
        emit_global_decl(&mut w, decl, &struct_names)?;
    }
    w.blank();

    for def in &program.definitions {
        match def {
            Definition::Function { name, params, body, .. } | Definition::Procedure { name, params, body, .. } => {
                let mut scope = global_scope.clone();
                scope.enter_scope();
                let param_names: Vec<String> = params
                    .iter()
                    .map(|p| {
                        scope.declare(Symbol::parameter(p.name.clone(), type_expr_to_type(&p.type_expr)));
                        p.name.clone()
                    })
                    .collect();
                w.line(format!("def {name}({}):", param_names.join(", ")));
                w.indent();
                if body.is_empty() {
                    w.line("pass");
                }
                emit_block(&mut w, body, &mut scope, analysis, &struct_names)?;
                w.dedent();
                w.blank();
            }
            Definition::Struct { .. } => {}
        }
    }

    w.line("def main():");
    w.indent();
    let mut globals_used = Vec::new();
    for decl in &program.declarations {
        globals_used.push(decl.name().to_string());
    }
    if !globals_used.is_empty() {
        w.line(format!("global {}", globals_used.join(", ")));
    }
    let mut main_scope = global_scope.clone();
    main_scope.enter_scope();
    if program.main_block.is_empty() {
        w.line("pass");
    }
    emit_block(&mut w, &program.main_block, &mut main_scope, analysis, &struct_names)?;
    w.dedent();
    w.blank();
    w.line("if __name__ == \"__main__\":");
    w.indent();
    w.line("main()");
    w.dedent();

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

fn default_value_py(type_expr: &TypeExpr) -> String {
    match type_expr {
        TypeExpr::Primitive { kind, .. } => match kind {
            crate::ast::PrimitiveType::Integer => "0".into(),
            crate::ast::PrimitiveType::Real => "0.0".into(),
            crate::ast::PrimitiveType::Character => "'\\0'".into(),
            crate::ast::PrimitiveType::String => "\"\"".into(),
            crate::ast::PrimitiveType::Boolean => "False".into(),
        },
        TypeExpr::Named { name, .. } => format!("{name}()"),
        TypeExpr::ArrayOf { element, dimensions, .. } => {
            let inner_default = default_value_py(element);
            let mut value = inner_default;
            for dim in dimensions.iter().rev() {
                let size = dim
                    .as_ref()
                    .map(render_const_expr)
                    .unwrap_or_else(|| "0".to_string());
                value = format!("[{value} for _ in range({size})]");
            }
            value
        }
    }
}

fn default_value_for_array_decl(element_type: &TypeExpr, dimensions: &[Expression]) -> String {
    let inner_default = default_value_py(element_type);
    let mut value = inner_default;
    for dim in dimensions.iter().rev() {
        let size = render_const_expr(dim);
        value = format!("[{value} for _ in range({size})]");
    }
    value
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
                BinaryOp::IntDiv => "//",
                BinaryOp::Div => "/",
                BinaryOp::Mod => "%",
                _ => "+",
            };
            format!("({l} {sym} {r})")
        }
        _ => "0".to_string(),
    }
}

fn render_plain_expr(expr: &Expression) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", py_escape(value)),
        Expression::BooleanLiteral { value, .. } => if *value { "True" } else { "False" }.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op: UnaryOp::Neg, operand, .. } => format!("-({})", render_plain_expr(operand)),
        Expression::Binary { op, left, right, .. } => {
            let l = render_plain_expr(left);
            let r = render_plain_expr(right);
            let sym = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::IntDiv => "//",
                BinaryOp::Div => "/",
                BinaryOp::Mod => "%",
                _ => "+",
            };
            format!("({l} {sym} {r})")
        }
        _ => "0".to_string(),
    }
}

fn emit_global_decl(w: &mut Writer, decl: &Declaration, struct_names: &[&str]) -> Result<(), Diagnostic> {
    let _ = struct_names;
    match decl {
        Declaration::Variable { name, type_expr, .. } => {
            w.line(format!("{name} = {}", default_value_py(type_expr)));
        }
        Declaration::Constant { name, value, .. } => {
            w.line(format!("{name} = {}", render_plain_expr(value)));
        }
        Declaration::Array { name, element_type, dimensions, .. } => {
            w.line(format!("{name} = {}", default_value_for_array_decl(element_type, dimensions)));
        }
    }
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
                    w.line(format!("{name} = {}", default_value_py(type_expr)));
                }
                Declaration::Constant { name, value, .. } => {
                    w.line(format!("{name} = {}", render_expr(value, scope, analysis)));
                }
                Declaration::Array { name, element_type, dimensions, .. } => {
                    let inner_default = default_value_py(element_type);
                    let mut value = inner_default;
                    for dim in dimensions.iter().rev() {
                        let size = render_expr(dim, scope, analysis);
                        value = format!("[{value} for _ in range({size})]");
                    }
                    w.line(format!("{name} = {value}"));
                }
            }
        }
        Statement::Block(statements, _) => {
            let mut inner = scope.clone();
            inner.enter_scope();
            emit_block(w, statements, &mut inner, analysis, struct_names)?;
        }
        Statement::Assign { target, value, .. } => {
            w.line(format!(
                "{} = {}",
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
            w.line(format!("if {}:", render_expr(condition, scope, analysis)));
            w.indent();
            emit_guarded_block(w, then_block, scope, analysis, struct_names)?;
            w.dedent();
            for (cond, block) in elif_conditions.iter().zip(elif_blocks) {
                w.line(format!("elif {}:", render_expr(cond, scope, analysis)));
                w.indent();
                emit_guarded_block(w, block, scope, analysis, struct_names)?;
                w.dedent();
            }
            if let Some(else_block) = else_block {
                w.line("else:");
                w.indent();
                emit_guarded_block(w, else_block, scope, analysis, struct_names)?;
                w.dedent();
            }
        }
        Statement::While { condition, body, .. } => {
            w.line(format!("while {}:", render_expr(condition, scope, analysis)));
            w.indent();
            emit_guarded_block(w, body, scope, analysis, struct_names)?;
            w.dedent();
        }
        Statement::For { variable, start, end, step, body, .. } => {
            let step_text = step
                .as_ref()
                .map(|s| render_expr(s, scope, analysis))
                .unwrap_or_else(|| "1".to_string());
            let start_text = render_expr(start, scope, analysis);
            let end_text = render_expr(end, scope, analysis);
            w.line(format!("__step = {step_text}"));
            w.line(format!("__end = {end_text}"));
            w.line(format!("{variable} = {start_text}"));
            w.line(format!(
                "while ({variable} <= __end) if __step >= 0 else ({variable} >= __end):"
            ));
            w.indent();
            emit_guarded_block(w, body, scope, analysis, struct_names)?;
            w.line(format!("{variable} += __step"));
            w.dedent();
        }
        Statement::Repeat { body, until, .. } => {
            w.line("while True:");
            w.indent();
            emit_guarded_block(w, body, scope, analysis, struct_names)?;
            let cond = until
                .as_ref()
                .map(|u| render_expr(u, scope, analysis))
                .unwrap_or_else(|| "True".to_string());
            w.line(format!("if {cond}:"));
            w.indent();
            w.line("break");
            w.dedent();
            w.dedent();
        }
        Statement::CallStatement(expr) => {
            w.line(render_expr(expr, scope, analysis));
        }
        Statement::Return { value, .. } => match value {
            Some(value) => w.line(format!("return {}", render_expr(value, scope, analysis))),
            None => w.line("return"),
        },
        Statement::Write { args, .. } => emit_write(w, args, scope, analysis),
        Statement::Read { targets, .. } => {
            for target in targets {
                emit_read(w, target, scope, analysis);
            }
        }
        Statement::Break(_) => w.line("break"),
        Statement::QuitLoop(_) => w.line("break"),
        Statement::Switch { scrutinee, cases, default, .. } => {
            let scrutinee_text = render_expr(scrutinee, scope, analysis);
            let mut first = true;
            for case in cases {
                emit_case(w, case, &scrutinee_text, first, scope, analysis, struct_names)?;
                first = false;
            }
            if let Some(default) = default {
                w.line(if first { "if True:" } else { "else:" }.to_string());
                w.indent();
                emit_guarded_block(w, default, scope, analysis, struct_names)?;
                w.dedent();
            }
        }
    }
    Ok(())
}

fn emit_guarded_block(
    w: &mut Writer,
    statements: &[Statement],
    scope: &Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    let mut inner = scope.clone();
    inner.enter_scope();
    if statements.is_empty() {
        w.line("pass");
        return Ok(());
    }
    emit_block(w, statements, &mut inner, analysis, struct_names)
}

#[allow(clippy::too_many_arguments)]
fn emit_case(
    w: &mut Writer,
    case: &Case,
    scrutinee_text: &str,
    first: bool,
    scope: &Scope,
    analysis: &AnalysisResult,
    struct_names: &[&str],
) -> Result<(), Diagnostic> {
    let globals = &analysis.global_constants;
    let labels: Vec<String> = case
        .values
        .iter()
        .map(|v| match fold_case_label(v, globals) {
            Some(n) => n.to_string(),
            None => render_expr(v, scope, analysis),
        })
        .collect();
    let condition = labels
        .iter()
        .map(|label| format!("{scrutinee_text} == {label}"))
        .collect::<Vec<_>>()
        .join(" or ");
    w.line(format!("{} {condition}:", if first { "if" } else { "elif" }));
    w.indent();
    emit_guarded_block(w, &case.body, scope, analysis, struct_names)?;
    w.dedent();
    Ok(())
}

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
        w.line("print()");
        return;
    }
    let parts: Vec<String> = args
        .iter()
        .map(|arg| match arg {
            Expression::StringLiteral { value, .. } => format!("\"{}\"", py_escape(value)),
            other => format!("str({})", render_expr(other, scope, analysis)),
        })
        .collect();
    if parts.len() == 1 {
        w.line(format!("print({})", parts[0]));
    } else {
        w.line(format!("print({}, sep=\"\")", parts.join(", ")));
    }
}

fn emit_read(w: &mut Writer, target: &Expression, scope: &Scope, analysis: &AnalysisResult) {
    let ty = infer(scope, analysis, target);
    let lvalue = render_expr(target, scope, analysis);
    let read_expr = match ty {
        Type::Real => "float(input())".to_string(),
        Type::Character => "input()[0]".to_string(),
        Type::String => "input()".to_string(),
        Type::Boolean => "input().strip().lower() in (\"vrai\", \"true\", \"1\")".to_string(),
        _ => "int(input())".to_string(),
    };
    w.line(format!("{lvalue} = {read_expr}"));
}

fn render_expr(expr: &Expression, scope: &Scope, analysis: &AnalysisResult) -> String {
    match expr {
        Expression::IntegerLiteral { value, .. } => value.to_string(),
        Expression::RealLiteral { text, .. } => text.replace(',', "."),
        Expression::StringLiteral { value, .. } => format!("\"{}\"", py_escape(value)),
        Expression::BooleanLiteral { value, .. } => if *value { "True" } else { "False" }.to_string(),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Unary { op, operand, .. } => {
            let inner = render_expr(operand, scope, analysis);
            match op {
                UnaryOp::Not => format!("(not {inner})"),
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
                BinaryOp::Div => format!("(({l}) / ({r}))"),
                BinaryOp::IntDiv => format!("(({l}) // ({r}))"),
                BinaryOp::Mod => format!("(({l}) % ({r}))"),
                BinaryOp::Pow => format!("(({l}) ** ({r}))"),
                BinaryOp::Lt => format!("({l} < {r})"),
                BinaryOp::Le => format!("({l} <= {r})"),
                BinaryOp::Gt => format!("({l} > {r})"),
                BinaryOp::Ge => format!("({l} >= {r})"),
                BinaryOp::Eq => format!("({l} == {r})"),
                BinaryOp::Ne => format!("({l} != {r})"),
                BinaryOp::And => format!("({l} and {r})"),
                BinaryOp::Or => format!("({l} or {r})"),
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

fn py_escape(value: &str) -> String {
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
