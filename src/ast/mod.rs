//! Abstract syntax tree of the Source subset the type checker understands.
//!
//! Every node carries a `position` and an `info: T` annotation slot. Parsers
//! produce `Program<()>`; [`validate_and_annotate`](crate::types::validate_and_annotate)
//! turns it into a `Program<TypeInfo>` for inference to fill in.

use std::fmt;

pub mod build;
pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

/// A position in the source text. Lines start at 1; line 0 means the node
/// has not been located yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Line {}", self.line)
    }
}

#[derive(Debug, Clone)]
pub struct Program<T> {
    pub body: Vec<Statement<T>>,
}

impl<T> Program<T> {
    pub fn map_info<U>(self, f: &mut impl FnMut(T) -> U) -> Program<U> {
        Program {
            body: self.body.into_iter().map(|stmt| stmt.map_info(f)).collect(),
        }
    }

    pub fn for_each_info_mut(&mut self, f: &mut impl FnMut(&mut T)) {
        for stmt in &mut self.body {
            stmt.for_each_info_mut(f);
        }
    }
}
