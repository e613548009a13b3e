//! # Type Error Definitions
//!
//! This module defines the diagnostics produced by type inference.
//! Errors never abort inference; they are collected by the
//! [`Context`](super::Context) in the order the offending nodes are visited.
//!
//! ## Error Kinds
//!
//! - `UnboundName` - an identifier that is not declared anywhere in scope
//! - `OperatorTypeMismatch` - operands that don't fit a unary or binary operator
//! - `CallArityMismatch` - a call with the wrong number of arguments
//! - `CallArgumentTypeMismatch` - a call whose arguments don't fit the callee
//! - `ConditionalTestTypeMismatch` - a test that is not a boolean
//! - `BranchTypeMismatch` - two branches producing different types
//! - `OccursCheckFailure` - a type that would have to contain itself
//! - `GeneralUnificationFailure` - any other failed unification
//!
//! ## Rendering
//!
//! The rendered text is consumed by tools and tests, so its wording is fixed:
//!
//! ```text
//! Line 2: A type mismatch was detected in the binary expression:
//!   1 + ""
//! The binary operator (+) expected two operands with types:
//!   number + number
//! but instead it received two operands of types:
//!   number + string
//! ```
//!
//! Every type is printed on its own, with variables numbered from `T1` (and
//! `Addable1`) again. The two types of an occurs check share their numbering,
//! since they talk about the same variable.

use std::fmt;

use thiserror::Error;

use super::ty::{Type, TypeVar};
use crate::ast::Location;
use crate::fmt::TypeNamer;

/// The kind of syntax an error is reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    ConditionalExpression,
    IfStatement,
    FunctionCall,
    BinaryExpression,
    UnaryExpression,
    Assignment,
    FunctionDeclaration,
    ConstantDeclaration,
    VariableDeclaration,
}

impl Construct {
    pub fn name(self) -> &'static str {
        match self {
            Construct::ConditionalExpression => "conditional expression",
            Construct::IfStatement => "if statement",
            Construct::FunctionCall => "function call",
            Construct::BinaryExpression => "binary expression",
            Construct::UnaryExpression => "unary expression",
            Construct::Assignment => "assignment",
            Construct::FunctionDeclaration => "function declaration",
            Construct::ConstantDeclaration => "constant declaration",
            Construct::VariableDeclaration => "variable declaration",
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What went wrong, with the construct's source text and the types involved.
///
/// Types are stored with the substitution applied at the time of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeErrorKind {
    /// Reference to a name that is not declared.
    UnboundName { name: String },

    /// Operands that don't fit an operator. A single expected type means the
    /// operator is unary.
    OperatorTypeMismatch {
        operator: String,
        source: String,
        expected: Vec<Type>,
        found: Vec<Type>,
    },

    /// A call with a different number of arguments than the callee takes.
    CallArityMismatch {
        source: String,
        expected: Vec<Type>,
        found: Vec<Type>,
    },

    /// A call whose arguments cannot be unified with the callee's parameters.
    CallArgumentTypeMismatch {
        source: String,
        expected: Vec<Type>,
        found: Vec<Type>,
    },

    /// The test of a conditional expression or if statement is not a boolean.
    ConditionalTestTypeMismatch {
        construct: Construct,
        source: String,
        found: Type,
    },

    /// The branches of a conditional produce different types.
    BranchTypeMismatch {
        construct: Construct,
        source: String,
        consequent: Type,
        alternate: Type,
    },

    /// A type variable would have to contain itself.
    OccursCheckFailure {
        construct: Construct,
        source: String,
        var: TypeVar,
        ty: Type,
    },

    /// Any other unification failure.
    GeneralUnificationFailure {
        construct: Construct,
        source: String,
        expected: Type,
        found: Type,
    },
}

impl fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeErrorKind::UnboundName { name } => write!(f, "Name {} not declared.", name),
            TypeErrorKind::OperatorTypeMismatch {
                operator,
                source,
                expected,
                found,
            } => {
                if let ([expected], [found]) = (expected.as_slice(), found.as_slice()) {
                    write!(
                        f,
                        "A type mismatch was detected in the unary expression:\n  {}\n\
                         The unary operator ({}) expected its operand to be of type:\n  {}\n\
                         but instead it received an operand of type:\n  {}",
                        source, operator, expected, found
                    )
                } else {
                    write!(
                        f,
                        "A type mismatch was detected in the binary expression:\n  {}\n\
                         The binary operator ({}) expected two operands with types:\n  {}\n\
                         but instead it received two operands of types:\n  {}",
                        source,
                        operator,
                        join(expected, &format!(" {} ", operator)),
                        join(found, &format!(" {} ", operator)),
                    )
                }
            }
            TypeErrorKind::CallArityMismatch {
                source,
                expected,
                found,
            }
            | TypeErrorKind::CallArgumentTypeMismatch {
                source,
                expected,
                found,
            } => write!(
                f,
                "A type mismatch was detected in the function call:\n  {}\n\
                 The function expected {}\n\
                 but instead received {}",
                source,
                describe_arguments(expected),
                describe_arguments(found),
            ),
            TypeErrorKind::ConditionalTestTypeMismatch {
                construct,
                source,
                found,
            } => write!(
                f,
                "Expected the test part of the {}:\n  {}\n\
                 to have type boolean, but instead it is type:\n  {}",
                construct, source, found
            ),
            TypeErrorKind::BranchTypeMismatch {
                construct,
                source,
                consequent,
                alternate,
            } => write!(
                f,
                "The two branches of the {}:\n  {}\n\
                 produce different types!\n\
                 The true branch has type:\n  {}\n\
                 but the false branch has type:\n  {}",
                construct, source, consequent, alternate
            ),
            TypeErrorKind::OccursCheckFailure {
                construct,
                source,
                var,
                ty,
            } => {
                let mut namer = TypeNamer::new();
                let var = namer.render(&Type::Var(var.clone()));
                let ty = namer.render(ty);
                write!(
                    f,
                    "An infinite type was detected in the {}:\n  {}\n\
                     The type variable:\n  {}\n\
                     would have to contain itself in the type:\n  {}",
                    construct, source, var, ty
                )
            }
            TypeErrorKind::GeneralUnificationFailure {
                construct,
                source,
                expected,
                found,
            } => write!(
                f,
                "A type mismatch was detected in the {}:\n  {}\n\
                 Expected type:\n  {}\n\
                 but instead got type:\n  {}",
                construct, source, expected, found
            ),
        }
    }
}

fn join(types: &[Type], separator: &str) -> String {
    types
        .iter()
        .map(Type::pretty)
        .collect::<Vec<_>>()
        .join(separator)
}

fn describe_arguments(types: &[Type]) -> String {
    match types {
        [] => "no arguments,".to_string(),
        [single] => format!("an argument of type:\n  {}", single),
        many => format!("{} arguments of types:\n  {}", many.len(), join(many, ", ")),
    }
}

/// A type error at a location in the program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub location: Location,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, location: Location) -> Self {
        TypeError { kind, location }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

/// Render a list of errors, one after another.
pub fn format_errors(errors: &[TypeError]) -> String {
    errors
        .iter()
        .map(TypeError::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
