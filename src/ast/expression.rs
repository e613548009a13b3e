use super::Location;
use super::statement::Block;

#[derive(Debug, Clone)]
pub enum Expression<T> {
    Number(Number<T>),
    String(StringLiteral<T>),
    Boolean(Boolean<T>),
    Null(Null<T>),
    Ident(Ident<T>),
    UnaryOp(UnaryOp<T>),
    BinaryOp(BinaryOp<T>),
    Conditional(Conditional<T>),
    FunctionCall(FunctionCall<T>),
    Lambda(Lambda<T>),
    Assignment(Assignment<T>),
}

#[derive(Debug, Clone)]
pub struct Number<T> {
    pub value: f64,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct StringLiteral<T> {
    pub value: String,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct Boolean<T> {
    pub value: bool,
    pub position: Location,
    pub info: T,
}

/// The empty list literal.
#[derive(Debug, Clone)]
pub struct Null<T> {
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct Ident<T> {
    pub value: String,
    pub position: Location,
    pub info: T,
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Mod => "%",
            BinOpKind::StrictEq => "===",
            BinOpKind::StrictNotEq => "!==",
            BinOpKind::Lt => "<",
            BinOpKind::Gt => ">",
            BinOpKind::LtEq => "<=",
            BinOpKind::GtEq => ">=",
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
        }
    }
}

/// Unary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Minus,
    Not,
}

impl UnaryOpKind {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOpKind::Minus => "-",
            UnaryOpKind::Not => "!",
        }
    }
}

/// Binary operation expression
#[derive(Debug, Clone)]
pub struct BinaryOp<T> {
    pub op: BinOpKind,
    pub left: Box<Expression<T>>,
    pub right: Box<Expression<T>>,
    pub position: Location,
    pub info: T,
}

/// Unary operation expression
#[derive(Debug, Clone)]
pub struct UnaryOp<T> {
    pub op: UnaryOpKind,
    pub operand: Box<Expression<T>>,
    pub position: Location,
    pub info: T,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone)]
pub struct Conditional<T> {
    pub test: Box<Expression<T>>,
    pub consequent: Box<Expression<T>>,
    pub alternate: Box<Expression<T>>,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct FunctionCall<T> {
    pub func: Box<Expression<T>>,
    pub args: Vec<Expression<T>>,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub enum LambdaBody<T> {
    Expression(Box<Expression<T>>),
    Block(Block<T>),
}

/// An arrow function.
#[derive(Debug, Clone)]
pub struct Lambda<T> {
    pub params: Vec<Ident<T>>,
    pub body: LambdaBody<T>,
    pub position: Location,
    pub info: T,
}

/// `name = value`, only valid from chapter 3 on.
#[derive(Debug, Clone)]
pub struct Assignment<T> {
    pub name: Ident<T>,
    pub value: Box<Expression<T>>,
    pub position: Location,
    pub info: T,
}

impl<T> Ident<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Ident<U> {
        Ident {
            value: self.value,
            position: self.position,
            info: f(self.info),
        }
    }

    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        f(&mut self.info);
    }
}

impl<T> LambdaBody<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> LambdaBody<U> {
        match self {
            LambdaBody::Expression(expr) => LambdaBody::Expression(Box::new(expr.map_info(f))),
            LambdaBody::Block(block) => LambdaBody::Block(block.map_info(f)),
        }
    }
}

impl<T> Expression<T> {
    pub fn info(&self) -> &T {
        match self {
            Expression::Number(n) => &n.info,
            Expression::String(s) => &s.info,
            Expression::Boolean(b) => &b.info,
            Expression::Null(n) => &n.info,
            Expression::Ident(i) => &i.info,
            Expression::UnaryOp(u) => &u.info,
            Expression::BinaryOp(b) => &b.info,
            Expression::Conditional(c) => &c.info,
            Expression::FunctionCall(c) => &c.info,
            Expression::Lambda(l) => &l.info,
            Expression::Assignment(a) => &a.info,
        }
    }

    pub fn info_mut(&mut self) -> &mut T {
        match self {
            Expression::Number(n) => &mut n.info,
            Expression::String(s) => &mut s.info,
            Expression::Boolean(b) => &mut b.info,
            Expression::Null(n) => &mut n.info,
            Expression::Ident(i) => &mut i.info,
            Expression::UnaryOp(u) => &mut u.info,
            Expression::BinaryOp(b) => &mut b.info,
            Expression::Conditional(c) => &mut c.info,
            Expression::FunctionCall(c) => &mut c.info,
            Expression::Lambda(l) => &mut l.info,
            Expression::Assignment(a) => &mut a.info,
        }
    }

    pub fn position(&self) -> Location {
        match self {
            Expression::Number(n) => n.position,
            Expression::String(s) => s.position,
            Expression::Boolean(b) => b.position,
            Expression::Null(n) => n.position,
            Expression::Ident(i) => i.position,
            Expression::UnaryOp(u) => u.position,
            Expression::BinaryOp(b) => b.position,
            Expression::Conditional(c) => c.position,
            Expression::FunctionCall(c) => c.position,
            Expression::Lambda(l) => l.position,
            Expression::Assignment(a) => a.position,
        }
    }

    /// Rebuild the tree with every annotation passed through `f`, in
    /// depth-first order.
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Expression<U> {
        match self {
            Expression::Number(n) => Expression::Number(Number {
                value: n.value,
                position: n.position,
                info: f(n.info),
            }),
            Expression::String(s) => Expression::String(StringLiteral {
                value: s.value,
                position: s.position,
                info: f(s.info),
            }),
            Expression::Boolean(b) => Expression::Boolean(Boolean {
                value: b.value,
                position: b.position,
                info: f(b.info),
            }),
            Expression::Null(n) => Expression::Null(Null {
                position: n.position,
                info: f(n.info),
            }),
            Expression::Ident(i) => Expression::Ident(i.map_info(f)),
            Expression::UnaryOp(u) => {
                let operand = Box::new(u.operand.map_info(f));
                Expression::UnaryOp(UnaryOp {
                    op: u.op,
                    operand,
                    position: u.position,
                    info: f(u.info),
                })
            }
            Expression::BinaryOp(b) => {
                let left = Box::new(b.left.map_info(f));
                let right = Box::new(b.right.map_info(f));
                Expression::BinaryOp(BinaryOp {
                    op: b.op,
                    left,
                    right,
                    position: b.position,
                    info: f(b.info),
                })
            }
            Expression::Conditional(c) => {
                let test = Box::new(c.test.map_info(f));
                let consequent = Box::new(c.consequent.map_info(f));
                let alternate = Box::new(c.alternate.map_info(f));
                Expression::Conditional(Conditional {
                    test,
                    consequent,
                    alternate,
                    position: c.position,
                    info: f(c.info),
                })
            }
            Expression::FunctionCall(c) => {
                let func = Box::new(c.func.map_info(f));
                let args = c.args.into_iter().map(|arg| arg.map_info(f)).collect();
                Expression::FunctionCall(FunctionCall {
                    func,
                    args,
                    position: c.position,
                    info: f(c.info),
                })
            }
            Expression::Lambda(l) => {
                let params = l.params.into_iter().map(|p| p.map_info(f)).collect();
                let body = l.body.map_info(f);
                Expression::Lambda(Lambda {
                    params,
                    body,
                    position: l.position,
                    info: f(l.info),
                })
            }
            Expression::Assignment(a) => {
                let name = a.name.map_info(f);
                let value = Box::new(a.value.map_info(f));
                Expression::Assignment(Assignment {
                    name,
                    value,
                    position: a.position,
                    info: f(a.info),
                })
            }
        }
    }

    /// Visit every annotation below and including this node.
    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        match self {
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::Null(_)
            | Expression::Ident(_) => {}
            Expression::UnaryOp(u) => u.operand.for_each_info_mut(f),
            Expression::BinaryOp(b) => {
                b.left.for_each_info_mut(f);
                b.right.for_each_info_mut(f);
            }
            Expression::Conditional(c) => {
                c.test.for_each_info_mut(f);
                c.consequent.for_each_info_mut(f);
                c.alternate.for_each_info_mut(f);
            }
            Expression::FunctionCall(c) => {
                c.func.for_each_info_mut(f);
                for arg in &mut c.args {
                    arg.for_each_info_mut(f);
                }
            }
            Expression::Lambda(l) => {
                for param in &mut l.params {
                    param.for_each_info_mut(f);
                }
                match &mut l.body {
                    LambdaBody::Expression(expr) => expr.for_each_info_mut(f),
                    LambdaBody::Block(block) => block.for_each_info_mut(f),
                }
            }
            Expression::Assignment(a) => {
                a.name.for_each_info_mut(f);
                a.value.for_each_info_mut(f);
            }
        }
        f(self.info_mut());
    }

    /// Give this node and every unlocated node below it the location
    /// `line`. Nested blocks keep the lines of their own statements.
    pub fn locate(&mut self, line: usize) {
        match self {
            Expression::UnaryOp(u) => u.operand.locate(line),
            Expression::BinaryOp(b) => {
                b.left.locate(line);
                b.right.locate(line);
            }
            Expression::Conditional(c) => {
                c.test.locate(line);
                c.consequent.locate(line);
                c.alternate.locate(line);
            }
            Expression::FunctionCall(c) => {
                c.func.locate(line);
                for arg in &mut c.args {
                    arg.locate(line);
                }
            }
            Expression::Lambda(l) => {
                for param in &mut l.params {
                    locate(&mut param.position, line);
                }
                match &mut l.body {
                    LambdaBody::Expression(expr) => expr.locate(line),
                    LambdaBody::Block(block) => locate(&mut block.position, line),
                }
            }
            Expression::Assignment(a) => {
                locate(&mut a.name.position, line);
                a.value.locate(line);
            }
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::Null(_)
            | Expression::Ident(_) => {}
        }
        let position = match self {
            Expression::Number(n) => &mut n.position,
            Expression::String(s) => &mut s.position,
            Expression::Boolean(b) => &mut b.position,
            Expression::Null(n) => &mut n.position,
            Expression::Ident(i) => &mut i.position,
            Expression::UnaryOp(u) => &mut u.position,
            Expression::BinaryOp(b) => &mut b.position,
            Expression::Conditional(c) => &mut c.position,
            Expression::FunctionCall(c) => &mut c.position,
            Expression::Lambda(l) => &mut l.position,
            Expression::Assignment(a) => &mut a.position,
        };
        locate(position, line);
    }
}

fn locate(position: &mut Location, line: usize) {
    if position.line == 0 {
        position.line = line;
    }
}
