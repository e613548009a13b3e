use std::collections::{BTreeSet, HashMap};

use super::subst::Substitution;
use super::ty::{TypeScheme, TypeVar};

/// A stack of scopes mapping names to type schemes.
///
/// The first scope holds the prelude; lookups go from the innermost scope
/// outwards, so inner bindings shadow outer ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEnv {
    scopes: Vec<HashMap<String, TypeScheme>>,
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::empty()
    }
}

impl TypeEnv {
    pub fn empty() -> Self {
        TypeEnv {
            scopes: vec![HashMap::new()],
        }
    }

    /// An environment whose outermost scope holds `bindings`.
    pub fn with_bindings(bindings: Vec<(String, TypeScheme)>) -> Self {
        TypeEnv {
            scopes: vec![bindings.into_iter().collect()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope. The outermost scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Look a name up in the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&TypeScheme> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    pub fn bind(&mut self, name: impl Into<String>, scheme: TypeScheme) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), scheme);
        }
    }

    /// Drop a binding from the innermost scope, returning it.
    pub fn remove(&mut self, name: &str) -> Option<TypeScheme> {
        self.scopes.last_mut().and_then(|scope| scope.remove(name))
    }

    /// Free variables of every reachable scheme, resolved through `subst`.
    pub fn free_type_vars(&self, subst: &Substitution) -> BTreeSet<TypeVar> {
        let mut free = BTreeSet::new();
        for scope in &self.scopes {
            for scheme in scope.values() {
                free.extend(subst.apply_scheme(scheme).free_type_vars());
            }
        }
        free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn test_empty_env() {
        let env = TypeEnv::empty();
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn test_with_bindings() {
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::monomorphic(Type::number()),
        )]);
        assert_eq!(env.lookup("x").unwrap().ty, Type::number());
    }

    #[test]
    fn test_bind_shadows_in_same_scope() {
        let mut env = TypeEnv::empty();
        env.bind("x", TypeScheme::monomorphic(Type::number()));
        env.bind("x", TypeScheme::monomorphic(Type::string()));
        assert_eq!(env.lookup("x").unwrap().ty, Type::string());
    }

    #[test]
    fn test_inner_scope_shadows_and_pops() {
        let mut env = TypeEnv::empty();
        env.bind("x", TypeScheme::monomorphic(Type::number()));
        env.push_scope();
        env.bind("x", TypeScheme::monomorphic(Type::string()));
        assert_eq!(env.lookup("x").unwrap().ty, Type::string());
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap().ty, Type::number());
    }

    #[test]
    fn test_outer_lookup_from_inner_scope() {
        let mut env = TypeEnv::empty();
        env.bind("x", TypeScheme::monomorphic(Type::boolean()));
        env.push_scope();
        assert_eq!(env.lookup("x").unwrap().ty, Type::boolean());
    }

    #[test]
    fn test_outermost_scope_survives_pop() {
        let mut env = TypeEnv::empty();
        env.bind("x", TypeScheme::monomorphic(Type::number()));
        env.pop_scope();
        assert!(env.lookup("x").is_some());
        env.bind("y", TypeScheme::monomorphic(Type::string()));
        assert!(env.lookup_local("y").is_some());
    }

    #[test]
    fn test_remove_only_touches_innermost_scope() {
        let mut env = TypeEnv::empty();
        env.bind("x", TypeScheme::monomorphic(Type::number()));
        env.push_scope();
        assert!(env.remove("x").is_none());
        env.bind("x", TypeScheme::monomorphic(Type::string()));
        assert!(env.remove("x").is_some());
        assert_eq!(env.lookup("x").unwrap().ty, Type::number());
    }

    #[test]
    fn test_free_type_vars_monomorphic() {
        let var = TypeVar::new(0);
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::monomorphic(Type::Var(var.clone())),
        )]);
        let free = env.free_type_vars(&Substitution::empty());
        assert_eq!(free.len(), 1);
        assert!(free.contains(&var));
    }

    #[test]
    fn test_free_type_vars_polymorphic() {
        let var = TypeVar::new(0);
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::polymorphic(vec![var.clone()], Type::Var(var)),
        )]);
        assert!(env.free_type_vars(&Substitution::empty()).is_empty());
    }

    #[test]
    fn test_free_type_vars_resolved_through_substitution() {
        let a = TypeVar::new(0);
        let b = TypeVar::new(1);
        let env = TypeEnv::with_bindings(vec![(
            "x".to_string(),
            TypeScheme::monomorphic(Type::Var(a.clone())),
        )]);
        let subst = Substitution::singleton(a, Type::list(Type::Var(b.clone())));
        let free: Vec<_> = env.free_type_vars(&subst).into_iter().collect();
        assert_eq!(free, vec![b]);
    }
}
