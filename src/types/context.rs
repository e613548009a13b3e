//! # Inference Context
//!
//! All mutable state of an inference run lives here: the fresh-variable
//! counter, the current substitution, the environment stack (seeded with the
//! prelude of the configured chapter) and the collected diagnostics.
//!
//! A context can be reused for several [`analyse`](super::analyse) calls;
//! errors accumulate and variable ids are never handed out twice.

use std::fmt;

use thiserror::Error;

use super::env::TypeEnv;
use super::error::{TypeError, TypeErrorKind};
use super::prelude;
use super::subst::Substitution;
use super::ty::{Type, TypeScheme, TypeVar};
use super::unify::{UnifyError, unify};
use crate::ast::Location;

/// A chapter of the language. Later chapters include everything the earlier
/// ones offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Chapter {
    One,
    Two,
    Three,
    #[default]
    Four,
}

impl Chapter {
    pub fn number(self) -> u8 {
        match self {
            Chapter::One => 1,
            Chapter::Two => 2,
            Chapter::Three => 3,
            Chapter::Four => 4,
        }
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chapter {}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown chapter {0}, expected a number from 1 to 4")]
    UnknownChapter(u8),
}

impl TryFrom<u8> for Chapter {
    type Error = OptionsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Chapter::One),
            2 => Ok(Chapter::Two),
            3 => Ok(Chapter::Three),
            4 => Ok(Chapter::Four),
            other => Err(OptionsError::UnknownChapter(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub chapter: Chapter,
}

impl Options {
    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapter = chapter;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    options: Options,
    next_var: usize,
    subst: Substitution,
    pub(crate) env: TypeEnv,
    errors: Vec<TypeError>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Context {
    pub fn new(options: Options) -> Self {
        let mut ctx = Context {
            options,
            next_var: 0,
            subst: Substitution::empty(),
            env: TypeEnv::empty(),
            errors: Vec::new(),
        };
        prelude::install(&mut ctx);
        ctx
    }

    pub fn chapter(&self) -> Chapter {
        self.options.chapter
    }

    pub fn env(&self) -> &TypeEnv {
        &self.env
    }

    pub fn substitution(&self) -> &Substitution {
        &self.subst
    }

    pub fn fresh_type_var(&mut self, addable: bool) -> TypeVar {
        let id = self.next_var;
        self.next_var += 1;
        if addable {
            TypeVar::addable(id)
        } else {
            TypeVar::new(id)
        }
    }

    pub fn fresh_var(&mut self) -> Type {
        Type::Var(self.fresh_type_var(false))
    }

    /// Instantiate a type scheme with fresh type variables, keeping the
    /// addable constraint of each quantified variable.
    pub fn instantiate(&mut self, scheme: &TypeScheme) -> Type {
        if scheme.is_monomorphic() {
            return scheme.ty.clone();
        }
        let mut fresh = Substitution::empty();
        for var in &scheme.vars {
            let replacement = self.fresh_type_var(var.addable);
            fresh.insert(var.clone(), Type::Var(replacement));
        }
        fresh.apply(&scheme.ty)
    }

    /// Generalize a type over the variables not free in the environment.
    ///
    /// Quantified variables are ordered by id.
    pub fn generalize(&self, ty: &Type) -> TypeScheme {
        let ty = self.resolve(ty);
        let env_vars = self.env.free_type_vars(&self.subst);
        let vars: Vec<TypeVar> = ty
            .free_type_vars()
            .into_iter()
            .filter(|var| !env_vars.contains(var))
            .collect();
        tracing::debug!(ty = %ty, quantified = vars.len(), "generalized");
        TypeScheme::polymorphic(vars, ty)
    }

    pub fn apply(&self, ty: &Type) -> Type {
        self.subst.apply(ty)
    }

    /// Apply the current substitution and fold cons-of-list chains.
    pub fn resolve(&self, ty: &Type) -> Type {
        self.subst.apply(ty).fold_lists()
    }

    /// Unify two types under the current substitution. The substitution only
    /// changes when unification succeeds.
    pub fn unify(&mut self, t1: &Type, t2: &Type) -> Result<(), UnifyError> {
        let left = self.apply(t1);
        let right = self.apply(t2);
        match unify(&left, &right) {
            Ok(found) => {
                tracing::trace!(left = %left, right = %right, bindings = found.len(), "unified");
                self.subst = self.subst.compose(&found);
                Ok(())
            }
            Err(err) => {
                tracing::trace!(left = %left, right = %right, error = %err, "unification failed");
                Err(err)
            }
        }
    }

    /// Like [`Context::unify`], but only commits when no variable the
    /// environment can see gets bound. Returns whether it committed.
    pub fn unify_unconstrained(&mut self, t1: &Type, t2: &Type) -> bool {
        let left = self.apply(t1);
        let right = self.apply(t2);
        let Ok(found) = unify(&left, &right) else {
            return false;
        };
        let visible = self.env.free_type_vars(&self.subst);
        if found.vars().any(|var| visible.contains(var)) {
            tracing::trace!(left = %left, right = %right, "unification would constrain the environment");
            return false;
        }
        self.subst = self.subst.compose(&found);
        true
    }

    pub fn report(&mut self, kind: TypeErrorKind, location: Location) {
        let error = TypeError::new(kind, location);
        tracing::debug!(%location, "{}", error.kind);
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn take_errors(&mut self) -> Vec<TypeError> {
        std::mem::take(&mut self.errors)
    }
}
