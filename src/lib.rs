//! # source-inference - Type Inference for the Source Teaching Language
//!
//! A Hindley-Milner type checker for Source, the JavaScript subset used to
//! teach programming. Programs are never rejected for type errors: every
//! problem is reported as a diagnostic with a fixed, student-facing wording
//! and inference carries on past it.
//!
//! ## Pipeline
//!
//! ```text
//! Syntax tree (ast::Program<()>)
//!     ↓
//! [Validator] → Annotated tree (ast::Program<TypeInfo>)
//!     ↓
//! [Inference] → Typed tree + diagnostics (types::Context)
//!     ↓
//! [Printers] → "name: type" lines, error messages
//! ```
//!
//! ## Type System
//!
//! - Primitive types `number`, `string`, `boolean` and `undefined`
//! - Functions of any arity, `(T1, T2) -> T3`
//! - Pairs `[T1, T2]` and lists `List<T1>`, where a list is either the empty
//!   list or a pair whose tail is again a list; the two unify accordingly
//! - Addable type variables, standing for "number or string", give `+` and
//!   the comparison operators their overloaded types
//! - Let-polymorphism for `const` and function declarations, with
//!   mutually recursive functions hoisted per block
//!
//! Which builtins exist depends on the language [`Chapter`](types::Chapter):
//! pairs and lists arrive in chapter 2, `let`, assignment and the pair
//! mutators in chapter 3.
//!
//! ## Example
//!
//! ```
//! use source_inference::ast::build::*;
//! use source_inference::fmt::declaration_types;
//! use source_inference::types::{Options, validate_and_infer};
//!
//! // function id(x) { return x; }
//! // const one = id(1);
//! let program = program(vec![
//!     function(1, "id", &["x"], vec![ret(2, ident("x"))]),
//!     const_decl(4, "one", call_named("id", vec![num(1.0)])),
//! ]);
//! let (typed, ctx) = validate_and_infer(program, Options::default()).unwrap();
//! assert!(ctx.errors().is_empty());
//! assert_eq!(declaration_types(&typed), "id: T1 -> T1\none: number");
//! ```
//!
//! ## Module Structure
//!
//! - [`ast`] - syntax tree, generic over the per-node annotation
//! - [`types`] - validator, unifier, prelude and the inference driver
//! - [`fmt`] - source and type printers used by the diagnostics

pub mod ast;
pub mod fmt;
pub mod types;
