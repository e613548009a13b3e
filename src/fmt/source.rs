//! Pretty printer for Source programs
//!
//! Diagnostics quote the offending construct with the functions in this
//! module. Expressions are printed in full; statements that contain blocks
//! are shortened to a header such as `if (x) { ... } else { ... }`.

use std::fmt::{self, Display};

use crate::ast::{
    Alternate, Assignment, BinOpKind, BinaryOp, Block, Conditional, Declaration, Expression, FunctionCall,
    FunctionDeclaration, IfStatement, Lambda, LambdaBody, Program, Statement, UnaryOp, UnaryOpKind,
};

const INDENT: &str = "  ";

const ASSIGNMENT: u8 = 1;
const CONDITIONAL: u8 = 2;
const UNARY: u8 = 9;
const CALL: u8 = 10;

struct Formatter {
    buffer: String,
    indent_level: usize,
}

impl Formatter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(INDENT);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn finish(self) -> String {
        self.buffer
    }
}

/// Print an expression the way it would be written in source.
pub fn expression_to_string<T>(expr: &Expression<T>) -> String {
    let mut fmt = Formatter::new();
    format_expression(expr, &mut fmt, 0);
    fmt.finish()
}

/// Print a call expression.
pub fn function_call_to_string<T>(call: &FunctionCall<T>) -> String {
    let mut fmt = Formatter::new();
    format_function_call(call, &mut fmt);
    fmt.finish()
}

pub fn binary_op_to_string<T>(binop: &BinaryOp<T>) -> String {
    let mut fmt = Formatter::new();
    format_binary_op(binop, &mut fmt, 0);
    fmt.finish()
}

pub fn unary_op_to_string<T>(unop: &UnaryOp<T>) -> String {
    let mut fmt = Formatter::new();
    format_unary_op(unop, &mut fmt, 0);
    fmt.finish()
}

pub fn assignment_to_string<T>(assign: &Assignment<T>) -> String {
    let mut fmt = Formatter::new();
    format_assignment(assign, &mut fmt, 0);
    fmt.finish()
}

/// `test ? ... : ...`
pub fn conditional_header<T>(cond: &Conditional<T>) -> String {
    let mut fmt = Formatter::new();
    format_expression(&cond.test, &mut fmt, CONDITIONAL + 1);
    fmt.write_str(" ? ... : ...");
    fmt.finish()
}

/// `if (test) { ... } else { ... }`, without the `else` part when there is
/// none.
pub fn if_header<T>(stmt: &IfStatement<T>) -> String {
    let mut fmt = Formatter::new();
    fmt.write_str("if (");
    format_expression(&stmt.test, &mut fmt, 0);
    fmt.write_str(") { ... }");
    if stmt.alternate.is_some() {
        fmt.write_str(" else { ... }");
    }
    fmt.finish()
}

/// `function name(a, b) { ... }`
pub fn function_header<T>(func: &FunctionDeclaration<T>) -> String {
    let params: Vec<&str> = func.params.iter().map(|p| p.value.as_str()).collect();
    format!("function {}({}) {{ ... }}", func.name.value, params.join(", "))
}

/// `const name = init;` or `let name = init;`
pub fn declaration_header<T>(keyword: &str, decl: &Declaration<T>) -> String {
    format!(
        "{} {} = {};",
        keyword,
        decl.name.value,
        expression_to_string(&decl.init)
    )
}

impl<T> Display for Program<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = Formatter::new();
        for stmt in &self.body {
            format_statement(stmt, &mut formatter);
            formatter.write_newline();
        }
        write!(f, "{}", formatter.finish())
    }
}

fn format_statement<T>(stmt: &Statement<T>, fmt: &mut Formatter) {
    fmt.write_indent();
    match stmt {
        Statement::Const(decl) => fmt.write_str(&declaration_header("const", decl)),
        Statement::Let(decl) => fmt.write_str(&declaration_header("let", decl)),
        Statement::Function(func) => {
            let params: Vec<&str> = func.params.iter().map(|p| p.value.as_str()).collect();
            fmt.write_str(&format!("function {}({}) ", func.name.value, params.join(", ")));
            format_block(&func.body, fmt);
        }
        Statement::Return(ret) => match &ret.value {
            Some(value) => {
                fmt.write_str("return ");
                format_expression(value, fmt, 0);
                fmt.write_str(";");
            }
            None => fmt.write_str("return;"),
        },
        Statement::If(stmt) => format_if(stmt, fmt),
        Statement::Block(block) => format_block(block, fmt),
        Statement::Expression(expr) => {
            format_expression(expr, fmt, 0);
            fmt.write_str(";");
        }
    }
}

fn format_if<T>(stmt: &IfStatement<T>, fmt: &mut Formatter) {
    fmt.write_str("if (");
    format_expression(&stmt.test, fmt, 0);
    fmt.write_str(") ");
    format_block(&stmt.consequent, fmt);
    match &stmt.alternate {
        Some(Alternate::Block(block)) => {
            fmt.write_str(" else ");
            format_block(block, fmt);
        }
        Some(Alternate::If(inner)) => {
            fmt.write_str(" else ");
            format_if(inner, fmt);
        }
        None => {}
    }
}

fn format_block<T>(block: &Block<T>, fmt: &mut Formatter) {
    fmt.write_str("{");
    fmt.write_newline();

    fmt.indent();
    for stmt in &block.statements {
        format_statement(stmt, fmt);
        fmt.write_newline();
    }
    fmt.dedent();

    fmt.write_indent();
    fmt.write_str("}");
}

fn format_expression<T>(expr: &Expression<T>, fmt: &mut Formatter, precedence: u8) {
    match expr {
        Expression::Number(n) => fmt.write_str(&n.value.to_string()),
        Expression::String(s) => fmt.write_str(&format!("{:?}", s.value)),
        Expression::Boolean(b) => fmt.write_str(if b.value { "true" } else { "false" }),
        Expression::Null(_) => fmt.write_str("null"),
        Expression::Ident(ident) => fmt.write_str(&ident.value),
        Expression::UnaryOp(unop) => format_unary_op(unop, fmt, precedence),
        Expression::BinaryOp(binop) => format_binary_op(binop, fmt, precedence),
        Expression::Conditional(cond) => format_conditional(cond, fmt, precedence),
        Expression::FunctionCall(call) => format_function_call(call, fmt),
        Expression::Lambda(lambda) => format_lambda(lambda, fmt, precedence),
        Expression::Assignment(assign) => format_assignment(assign, fmt, precedence),
    }
}

fn format_assignment<T>(assign: &Assignment<T>, fmt: &mut Formatter, parent_prec: u8) {
    let needs_parens = ASSIGNMENT < parent_prec;
    if needs_parens {
        fmt.write_str("(");
    }
    fmt.write_str(&assign.name.value);
    fmt.write_str(" = ");
    format_expression(&assign.value, fmt, ASSIGNMENT);
    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_function_call<T>(call: &FunctionCall<T>, fmt: &mut Formatter) {
    format_expression(&call.func, fmt, CALL);
    fmt.write_str("(");
    for (i, arg) in call.args.iter().enumerate() {
        if i > 0 {
            fmt.write_str(", ");
        }
        format_expression(arg, fmt, ASSIGNMENT);
    }
    fmt.write_str(")");
}

fn format_lambda<T>(lambda: &Lambda<T>, fmt: &mut Formatter, parent_prec: u8) {
    let needs_parens = ASSIGNMENT < parent_prec;
    if needs_parens {
        fmt.write_str("(");
    }

    match lambda.params.as_slice() {
        [param] => fmt.write_str(&param.value),
        params => {
            let names: Vec<&str> = params.iter().map(|p| p.value.as_str()).collect();
            fmt.write_str(&format!("({})", names.join(", ")));
        }
    }
    fmt.write_str(" => ");
    match &lambda.body {
        LambdaBody::Expression(body) => format_expression(body, fmt, ASSIGNMENT),
        LambdaBody::Block(_) => fmt.write_str("{ ... }"),
    }

    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_conditional<T>(cond: &Conditional<T>, fmt: &mut Formatter, parent_prec: u8) {
    let needs_parens = CONDITIONAL < parent_prec;
    if needs_parens {
        fmt.write_str("(");
    }

    format_expression(&cond.test, fmt, CONDITIONAL + 1);
    fmt.write_str(" ? ");
    format_expression(&cond.consequent, fmt, ASSIGNMENT);
    fmt.write_str(" : ");
    format_expression(&cond.alternate, fmt, ASSIGNMENT);

    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_binary_op<T>(binop: &BinaryOp<T>, fmt: &mut Formatter, parent_prec: u8) {
    let op_prec = binop_precedence(binop.op);
    let needs_parens = op_prec < parent_prec;

    if needs_parens {
        fmt.write_str("(");
    }

    format_expression(&binop.left, fmt, op_prec);
    fmt.write_str(" ");
    fmt.write_str(binop.op.symbol());
    fmt.write_str(" ");
    format_expression(&binop.right, fmt, op_prec + 1);

    if needs_parens {
        fmt.write_str(")");
    }
}

fn format_unary_op<T>(unop: &UnaryOp<T>, fmt: &mut Formatter, parent_prec: u8) {
    let needs_parens = UNARY < parent_prec;

    if needs_parens {
        fmt.write_str("(");
    }

    fmt.write_str(unop.op.symbol());
    if unop.op == UnaryOpKind::Minus {
        fmt.write_str(" ");
    }
    format_expression(&unop.operand, fmt, UNARY);

    if needs_parens {
        fmt.write_str(")");
    }
}

fn binop_precedence(kind: BinOpKind) -> u8 {
    match kind {
        BinOpKind::Or => 3,
        BinOpKind::And => 4,
        BinOpKind::StrictEq | BinOpKind::StrictNotEq => 5,
        BinOpKind::Lt | BinOpKind::Gt | BinOpKind::LtEq | BinOpKind::GtEq => 6,
        BinOpKind::Add | BinOpKind::Sub => 7,
        BinOpKind::Mul | BinOpKind::Div | BinOpKind::Mod => 8,
    }
}
