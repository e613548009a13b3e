pub mod context;
pub mod env;
pub mod error;
pub mod infer;
pub mod prelude;
pub mod subst;
pub mod ty;
pub mod unify;
pub mod validate;

pub use context::{Chapter, Context, Options, OptionsError};
pub use env::TypeEnv;
pub use error::{Construct, TypeError, TypeErrorKind, format_errors};
pub use infer::analyse;
pub use subst::Substitution;
pub use ty::{Primitive, Typability, Type, TypeInfo, TypeScheme, TypeVar};
pub use unify::{UnifyError, unify};
pub use validate::{ValidationError, validate_and_annotate};

use crate::ast::Program;

/// Validate a program and run inference over it in a fresh context.
///
/// Validation errors stop the pipeline. Type errors don't: they are
/// collected in the returned context next to the annotated program.
pub fn validate_and_infer(
    program: Program<()>,
    options: Options,
) -> Result<(Program<TypeInfo>, Context), Vec<ValidationError>> {
    let mut program = validate_and_annotate(program, &options)?;
    let mut ctx = Context::new(options);
    analyse(&mut program, &mut ctx);
    Ok((program, ctx))
}
