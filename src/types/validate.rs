use std::collections::HashMap;

use thiserror::Error;

use super::context::{Chapter, Options};
use super::ty::TypeInfo;
use crate::ast::*;

/// Validation errors - structural checks that run before inference
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{location}: return statement outside of a function body")]
    ReturnOutsideFunction { location: Location },

    /// A construct that the chapter doesn't offer yet
    #[error("{location}: {construct} is not available in {chapter}")]
    UnsupportedInChapter {
        construct: &'static str,
        chapter: Chapter,
        location: Location,
    },

    #[error("{location}: name {name} declared twice in the same block")]
    DuplicateDeclaration { name: String, location: Location },

    #[error("{location}: cannot assign to constant {name}")]
    AssignmentToConstant { name: String, location: Location },
}

impl ValidationError {
    pub fn location(&self) -> Location {
        match self {
            ValidationError::ReturnOutsideFunction { location }
            | ValidationError::UnsupportedInChapter { location, .. }
            | ValidationError::DuplicateDeclaration { location, .. }
            | ValidationError::AssignmentToConstant { location, .. } => *location,
        }
    }
}

/// Validate a program and give every node an empty type annotation.
///
/// This checks:
/// 1. `return` only appears inside function bodies
/// 2. `let` and assignment are only used from chapter 3 on
/// 3. no block declares a name twice
/// 4. constants and functions are never assigned to
///
/// All errors are collected, in program order.
pub fn validate_and_annotate(
    program: Program<()>,
    options: &Options,
) -> Result<Program<TypeInfo>, Vec<ValidationError>> {
    let mut validator = Validator {
        chapter: options.chapter,
        scopes: Vec::new(),
        function_depth: 0,
        errors: Vec::new(),
    };
    validator.validate_statements(&program.body);

    if !validator.errors.is_empty() {
        return Err(validator.errors);
    }
    Ok(program.map_info(&mut |()| TypeInfo::default()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Constant,
    Variable,
}

struct Validator {
    chapter: Chapter,
    scopes: Vec<HashMap<String, NameKind>>,
    function_depth: usize,
    errors: Vec<ValidationError>,
}

impl Validator {
    fn resolve(&self, name: &str) -> Option<NameKind> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn require_chapter_three(&mut self, construct: &'static str, location: Location) {
        if self.chapter < Chapter::Three {
            self.errors.push(ValidationError::UnsupportedInChapter {
                construct,
                chapter: self.chapter,
                location,
            });
        }
    }

    /// Walk a block in its own scope, declaring its names up front.
    fn validate_statements(&mut self, statements: &[Statement<()>]) {
        let mut scope = HashMap::new();
        for stmt in statements {
            let kind = match stmt {
                Statement::Let(_) => NameKind::Variable,
                _ => NameKind::Constant,
            };
            if let Some(name) = stmt.declared_name() {
                if scope.insert(name.value.clone(), kind).is_some() {
                    self.errors.push(ValidationError::DuplicateDeclaration {
                        name: name.value.clone(),
                        location: stmt.position(),
                    });
                }
            }
        }

        self.scopes.push(scope);
        for stmt in statements {
            self.validate_statement(stmt);
        }
        self.scopes.pop();
    }

    fn validate_function(&mut self, params: &[Ident<()>], body: &[Statement<()>]) {
        let scope = params
            .iter()
            .map(|param| (param.value.clone(), NameKind::Variable))
            .collect();
        self.scopes.push(scope);
        self.function_depth += 1;
        self.validate_statements(body);
        self.function_depth -= 1;
        self.scopes.pop();
    }

    fn validate_statement(&mut self, stmt: &Statement<()>) {
        match stmt {
            Statement::Const(decl) => self.validate_expression(&decl.init),
            Statement::Let(decl) => {
                self.require_chapter_three("variable declaration", decl.position);
                self.validate_expression(&decl.init);
            }
            Statement::Function(func) => {
                self.validate_function(&func.params, &func.body.statements);
            }
            Statement::Return(ret) => {
                if self.function_depth == 0 {
                    self.errors
                        .push(ValidationError::ReturnOutsideFunction {
                            location: ret.position,
                        });
                }
                if let Some(value) = &ret.value {
                    self.validate_expression(value);
                }
            }
            Statement::If(stmt) => self.validate_if(stmt),
            Statement::Block(block) => self.validate_statements(&block.statements),
            Statement::Expression(expr) => self.validate_expression(expr),
        }
    }

    fn validate_if(&mut self, stmt: &IfStatement<()>) {
        self.validate_expression(&stmt.test);
        self.validate_statements(&stmt.consequent.statements);
        match &stmt.alternate {
            Some(Alternate::Block(block)) => self.validate_statements(&block.statements),
            Some(Alternate::If(inner)) => self.validate_if(inner),
            None => {}
        }
    }

    fn validate_expression(&mut self, expr: &Expression<()>) {
        match expr {
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::Null(_)
            | Expression::Ident(_) => {}
            Expression::UnaryOp(unop) => self.validate_expression(&unop.operand),
            Expression::BinaryOp(binop) => {
                self.validate_expression(&binop.left);
                self.validate_expression(&binop.right);
            }
            Expression::Conditional(cond) => {
                self.validate_expression(&cond.test);
                self.validate_expression(&cond.consequent);
                self.validate_expression(&cond.alternate);
            }
            Expression::FunctionCall(call) => {
                self.validate_expression(&call.func);
                for arg in &call.args {
                    self.validate_expression(arg);
                }
            }
            Expression::Lambda(lambda) => match &lambda.body {
                LambdaBody::Expression(body) => {
                    let scope = lambda
                        .params
                        .iter()
                        .map(|param| (param.value.clone(), NameKind::Variable))
                        .collect();
                    self.scopes.push(scope);
                    self.validate_expression(body);
                    self.scopes.pop();
                }
                LambdaBody::Block(block) => {
                    self.validate_function(&lambda.params, &block.statements)
                }
            },
            Expression::Assignment(assign) => {
                self.require_chapter_three("assignment", assign.position);
                if self.resolve(&assign.name.value) == Some(NameKind::Constant) {
                    self.errors.push(ValidationError::AssignmentToConstant {
                        name: assign.name.value.clone(),
                        location: assign.position,
                    });
                }
                self.validate_expression(&assign.value);
            }
        }
    }
}
