use super::Location;
use super::expression::{Expression, Ident};

#[derive(Debug, Clone)]
pub enum Statement<T> {
    Const(Declaration<T>),
    /// Only valid from chapter 3 on.
    Let(Declaration<T>),
    Function(FunctionDeclaration<T>),
    Return(Return<T>),
    If(IfStatement<T>),
    Block(Block<T>),
    Expression(Expression<T>),
}

/// `const name = init;` or `let name = init;`
#[derive(Debug, Clone)]
pub struct Declaration<T> {
    pub name: Ident<T>,
    pub init: Expression<T>,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration<T> {
    pub name: Ident<T>,
    pub params: Vec<Ident<T>>,
    pub body: Block<T>,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct Return<T> {
    pub value: Option<Expression<T>>,
    pub position: Location,
    pub info: T,
}

#[derive(Debug, Clone)]
pub struct IfStatement<T> {
    pub test: Expression<T>,
    pub consequent: Block<T>,
    pub alternate: Option<Alternate<T>>,
    pub position: Location,
    pub info: T,
}

/// The `else` part of an if statement.
#[derive(Debug, Clone)]
pub enum Alternate<T> {
    Block(Block<T>),
    If(Box<IfStatement<T>>),
}

#[derive(Debug, Clone)]
pub struct Block<T> {
    pub statements: Vec<Statement<T>>,
    pub position: Location,
    pub info: T,
}

impl<T> Statement<T> {
    pub fn position(&self) -> Location {
        match self {
            Statement::Const(decl) | Statement::Let(decl) => decl.position,
            Statement::Function(func) => func.position,
            Statement::Return(ret) => ret.position,
            Statement::If(stmt) => stmt.position,
            Statement::Block(block) => block.position,
            Statement::Expression(expr) => expr.position(),
        }
    }

    /// The name this statement declares in its block, if any.
    pub fn declared_name(&self) -> Option<&Ident<T>> {
        match self {
            Statement::Const(decl) | Statement::Let(decl) => Some(&decl.name),
            Statement::Function(func) => Some(&func.name),
            _ => None,
        }
    }

    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Statement<U> {
        match self {
            Statement::Const(decl) => Statement::Const(decl.map_info(f)),
            Statement::Let(decl) => Statement::Let(decl.map_info(f)),
            Statement::Function(func) => {
                let name = func.name.map_info(f);
                let params = func.params.into_iter().map(|p| p.map_info(f)).collect();
                let body = func.body.map_info(f);
                Statement::Function(FunctionDeclaration {
                    name,
                    params,
                    body,
                    position: func.position,
                    info: f(func.info),
                })
            }
            Statement::Return(ret) => {
                let value = ret.value.map(|value| value.map_info(f));
                Statement::Return(Return {
                    value,
                    position: ret.position,
                    info: f(ret.info),
                })
            }
            Statement::If(stmt) => Statement::If(stmt.map_info(f)),
            Statement::Block(block) => Statement::Block(block.map_info(f)),
            Statement::Expression(expr) => Statement::Expression(expr.map_info(f)),
        }
    }

    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        match self {
            Statement::Const(decl) | Statement::Let(decl) => {
                decl.name.for_each_info_mut(f);
                decl.init.for_each_info_mut(f);
                f(&mut decl.info);
            }
            Statement::Function(func) => {
                func.name.for_each_info_mut(f);
                for param in &mut func.params {
                    param.for_each_info_mut(f);
                }
                func.body.for_each_info_mut(f);
                f(&mut func.info);
            }
            Statement::Return(ret) => {
                if let Some(value) = &mut ret.value {
                    value.for_each_info_mut(f);
                }
                f(&mut ret.info);
            }
            Statement::If(stmt) => stmt.for_each_info_mut(f),
            Statement::Block(block) => block.for_each_info_mut(f),
            Statement::Expression(expr) => expr.for_each_info_mut(f),
        }
    }
}

impl<T> Declaration<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Declaration<U> {
        let name = self.name.map_info(f);
        let init = self.init.map_info(f);
        Declaration {
            name,
            init,
            position: self.position,
            info: f(self.info),
        }
    }
}

impl<T> IfStatement<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> IfStatement<U> {
        let test = self.test.map_info(f);
        let consequent = self.consequent.map_info(f);
        let alternate = self.alternate.map(|alternate| match alternate {
            Alternate::Block(block) => Alternate::Block(block.map_info(f)),
            Alternate::If(stmt) => Alternate::If(Box::new(stmt.map_info(f))),
        });
        IfStatement {
            test,
            consequent,
            alternate,
            position: self.position,
            info: f(self.info),
        }
    }

    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        self.test.for_each_info_mut(f);
        self.consequent.for_each_info_mut(f);
        match &mut self.alternate {
            Some(Alternate::Block(block)) => block.for_each_info_mut(f),
            Some(Alternate::If(stmt)) => stmt.for_each_info_mut(f),
            None => {}
        }
        f(&mut self.info);
    }
}

impl<T> Block<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Block<U> {
        let statements = self
            .statements
            .into_iter()
            .map(|stmt| stmt.map_info(f))
            .collect();
        Block {
            statements,
            position: self.position,
            info: f(self.info),
        }
    }

    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        for stmt in &mut self.statements {
            stmt.for_each_info_mut(f);
        }
        f(&mut self.info);
    }
}
