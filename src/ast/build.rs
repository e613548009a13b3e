//! Constructors for building programs by hand.
//!
//! Expression constructors leave their nodes unlocated. Statement
//! constructors take the line the statement starts on and stamp it onto
//! every unlocated expression inside, so a statement spread over several
//! lines can still locate its parts precisely by building them with
//! [`Expression::locate`] first.
//!
//! ```
//! use source_inference::ast::build::*;
//! use source_inference::ast::BinOpKind;
//!
//! // function square(x) {
//! //     return x * x;
//! // }
//! let program = program(vec![function(
//!     1,
//!     "square",
//!     &["x"],
//!     vec![ret(2, binary(BinOpKind::Mul, ident("x"), ident("x")))],
//! )]);
//! assert_eq!(program.body.len(), 1);
//! ```

use super::{Location, Program};
use super::expression::*;
use super::statement::*;

fn unlocated() -> Location {
    Location::default()
}

fn at(line: usize) -> Location {
    Location::new(line, 0)
}

fn name(value: &str, line: usize) -> Ident<()> {
    Ident {
        value: value.to_string(),
        position: at(line),
        info: (),
    }
}

pub fn num(value: f64) -> Expression<()> {
    Expression::Number(Number {
        value,
        position: unlocated(),
        info: (),
    })
}

pub fn string(value: &str) -> Expression<()> {
    Expression::String(StringLiteral {
        value: value.to_string(),
        position: unlocated(),
        info: (),
    })
}

pub fn boolean(value: bool) -> Expression<()> {
    Expression::Boolean(Boolean {
        value,
        position: unlocated(),
        info: (),
    })
}

pub fn null() -> Expression<()> {
    Expression::Null(Null {
        position: unlocated(),
        info: (),
    })
}

pub fn ident(value: &str) -> Expression<()> {
    Expression::Ident(Ident {
        value: value.to_string(),
        position: unlocated(),
        info: (),
    })
}

pub fn call(func: Expression<()>, args: Vec<Expression<()>>) -> Expression<()> {
    Expression::FunctionCall(FunctionCall {
        func: Box::new(func),
        args,
        position: unlocated(),
        info: (),
    })
}

/// Call a function by name.
pub fn call_named(func: &str, args: Vec<Expression<()>>) -> Expression<()> {
    call(ident(func), args)
}

pub fn binary(op: BinOpKind, left: Expression<()>, right: Expression<()>) -> Expression<()> {
    Expression::BinaryOp(BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
        position: unlocated(),
        info: (),
    })
}

pub fn unary(op: UnaryOpKind, operand: Expression<()>) -> Expression<()> {
    Expression::UnaryOp(UnaryOp {
        op,
        operand: Box::new(operand),
        position: unlocated(),
        info: (),
    })
}

pub fn cond(
    test: Expression<()>,
    consequent: Expression<()>,
    alternate: Expression<()>,
) -> Expression<()> {
    Expression::Conditional(Conditional {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        position: unlocated(),
        info: (),
    })
}

fn params(names: &[&str]) -> Vec<Ident<()>> {
    names
        .iter()
        .map(|param| Ident {
            value: param.to_string(),
            position: unlocated(),
            info: (),
        })
        .collect()
}

pub fn arrow(names: &[&str], body: Expression<()>) -> Expression<()> {
    Expression::Lambda(Lambda {
        params: params(names),
        body: LambdaBody::Expression(Box::new(body)),
        position: unlocated(),
        info: (),
    })
}

/// An arrow function with a block body. The statements carry their own lines.
pub fn arrow_block(names: &[&str], statements: Vec<Statement<()>>) -> Expression<()> {
    Expression::Lambda(Lambda {
        params: params(names),
        body: LambdaBody::Block(Block {
            statements,
            position: unlocated(),
            info: (),
        }),
        position: unlocated(),
        info: (),
    })
}

pub fn assign(target: &str, value: Expression<()>) -> Expression<()> {
    Expression::Assignment(Assignment {
        name: Ident {
            value: target.to_string(),
            position: unlocated(),
            info: (),
        },
        value: Box::new(value),
        position: unlocated(),
        info: (),
    })
}

fn declaration(line: usize, target: &str, mut init: Expression<()>) -> Declaration<()> {
    init.locate(line);
    Declaration {
        name: name(target, line),
        init,
        position: at(line),
        info: (),
    }
}

pub fn const_decl(line: usize, target: &str, init: Expression<()>) -> Statement<()> {
    Statement::Const(declaration(line, target, init))
}

pub fn let_decl(line: usize, target: &str, init: Expression<()>) -> Statement<()> {
    Statement::Let(declaration(line, target, init))
}

pub fn function(
    line: usize,
    target: &str,
    names: &[&str],
    body: Vec<Statement<()>>,
) -> Statement<()> {
    Statement::Function(FunctionDeclaration {
        name: name(target, line),
        params: names.iter().map(|param| name(param, line)).collect(),
        body: Block {
            statements: body,
            position: at(line),
            info: (),
        },
        position: at(line),
        info: (),
    })
}

pub fn ret(line: usize, mut value: Expression<()>) -> Statement<()> {
    value.locate(line);
    Statement::Return(Return {
        value: Some(value),
        position: at(line),
        info: (),
    })
}

/// `return;`
pub fn ret_nothing(line: usize) -> Statement<()> {
    Statement::Return(Return {
        value: None,
        position: at(line),
        info: (),
    })
}

pub fn if_else(
    line: usize,
    mut test: Expression<()>,
    consequent: Vec<Statement<()>>,
    alternate: Option<Vec<Statement<()>>>,
) -> Statement<()> {
    test.locate(line);
    Statement::If(IfStatement {
        test,
        consequent: Block {
            statements: consequent,
            position: at(line),
            info: (),
        },
        alternate: alternate.map(|statements| {
            Alternate::Block(Block {
                statements,
                position: at(line),
                info: (),
            })
        }),
        position: at(line),
        info: (),
    })
}

/// `if (test) { ... } else if ...`, where `otherwise` is the nested if
/// statement built with [`if_else`].
pub fn if_else_if(
    line: usize,
    mut test: Expression<()>,
    consequent: Vec<Statement<()>>,
    otherwise: Statement<()>,
) -> Statement<()> {
    test.locate(line);
    let alternate = match otherwise {
        Statement::If(inner) => Alternate::If(Box::new(inner)),
        Statement::Block(block) => Alternate::Block(block),
        other => Alternate::Block(Block {
            position: other.position(),
            statements: vec![other],
            info: (),
        }),
    };
    Statement::If(IfStatement {
        test,
        consequent: Block {
            statements: consequent,
            position: at(line),
            info: (),
        },
        alternate: Some(alternate),
        position: at(line),
        info: (),
    })
}

pub fn expr_stmt(line: usize, mut expr: Expression<()>) -> Statement<()> {
    expr.locate(line);
    Statement::Expression(expr)
}

pub fn block(line: usize, statements: Vec<Statement<()>>) -> Statement<()> {
    Statement::Block(Block {
        statements,
        position: at(line),
        info: (),
    })
}

pub fn program(body: Vec<Statement<()>>) -> Program<()> {
    Program { body }
}
