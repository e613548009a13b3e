use std::collections::HashMap;

use super::ty::{Type, TypeScheme, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(pub HashMap<TypeVar, Type>);

impl Substitution {
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    pub fn singleton(var: TypeVar, ty: Type) -> Self {
        let mut map = HashMap::new();
        map.insert(var, ty);
        Substitution(map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The variables this substitution binds.
    pub fn vars(&self) -> impl Iterator<Item = &TypeVar> {
        self.0.keys()
    }

    /// Apply the substitution, chasing bound variables until none is left.
    ///
    /// Bindings are only ever made after an occurs check, so the chain of
    /// lookups always ends.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Primitive(_) => ty.clone(),
            Type::Var(v) => match self.0.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            Type::Func(params, ret) => Type::func(
                params.iter().map(|p| self.apply(p)).collect(),
                self.apply(ret),
            ),
            Type::Pair(head, tail) => Type::pair(self.apply(head), self.apply(tail)),
            Type::List(element) => Type::list(self.apply(element)),
        }
    }

    pub fn apply_scheme(&self, scheme: &TypeScheme) -> TypeScheme {
        TypeScheme {
            vars: scheme.vars.clone(),
            ty: self.apply(&scheme.ty),
        }
    }

    /// Compose `self` (older) with `newer`.
    ///
    /// Each side is applied over the other's range before merging, so the
    /// result is idempotent whenever both inputs were.
    pub fn compose(&self, newer: &Substitution) -> Substitution {
        let mut result = HashMap::new();

        for (var, ty) in &self.0 {
            result.insert(var.clone(), newer.apply(ty));
        }

        for (var, ty) in &newer.0 {
            if !result.contains_key(var) {
                result.insert(var.clone(), self.apply(ty));
            }
        }

        Substitution(result)
    }

    pub fn insert(&mut self, var: TypeVar, ty: Type) {
        self.0.insert(var, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_substitution() {
        let subst = Substitution::empty();
        let ty = Type::number();
        assert_eq!(subst.apply(&ty), ty);
    }

    #[test]
    fn test_singleton_substitution() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::number());
        assert_eq!(subst.apply(&Type::Var(var)), Type::number());
    }

    #[test]
    fn test_apply_to_function() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::number());
        let ty = Type::func(vec![Type::Var(var)], Type::string());
        assert_eq!(
            subst.apply(&ty),
            Type::func(vec![Type::number()], Type::string())
        );
    }

    #[test]
    fn test_apply_to_pair_and_list() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::boolean());
        let ty = Type::pair(Type::Var(var.clone()), Type::list(Type::Var(var)));
        assert_eq!(
            subst.apply(&ty),
            Type::pair(Type::boolean(), Type::list(Type::boolean()))
        );
    }

    #[test]
    fn test_apply_preserves_unbound_vars() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);
        let subst = Substitution::singleton(var1, Type::number());
        let ty = Type::Var(var2.clone());
        assert_eq!(subst.apply(&ty), Type::Var(var2));
    }

    #[test]
    fn test_apply_chases_chains() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);
        let mut subst = Substitution::singleton(var1.clone(), Type::Var(var2.clone()));
        subst.insert(var2, Type::list(Type::string()));
        assert_eq!(
            subst.apply(&Type::Var(var1)),
            Type::list(Type::string())
        );
    }

    #[test]
    fn test_vars_lists_bound_variables() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);
        let mut subst = Substitution::singleton(var1.clone(), Type::number());
        subst.insert(var2.clone(), Type::string());
        let mut vars: Vec<&TypeVar> = subst.vars().collect();
        vars.sort();
        assert_eq!(vars, vec![&var1, &var2]);
    }

    #[test]
    fn test_compose_substitutions() {
        let var1 = TypeVar::new(0);
        let var2 = TypeVar::new(1);

        let older = Substitution::singleton(var1.clone(), Type::Var(var2.clone()));
        let newer = Substitution::singleton(var2.clone(), Type::number());

        let composed = older.compose(&newer);
        assert_eq!(composed.apply(&Type::Var(var1)), Type::number());
        assert_eq!(composed.apply(&Type::Var(var2)), Type::number());
    }

    #[test]
    fn test_compose_keeps_older_binding_on_conflict() {
        let var = TypeVar::new(0);

        let older = Substitution::singleton(var.clone(), Type::number());
        let newer = Substitution::singleton(var.clone(), Type::string());

        let result = older.compose(&newer);
        assert_eq!(result.apply(&Type::Var(var)), Type::number());
    }

    #[test]
    fn test_substitution_idempotent() {
        let var = TypeVar::new(0);
        let subst = Substitution::singleton(var.clone(), Type::number());
        let ty = Type::Var(var);

        let once = subst.apply(&ty);
        let twice = subst.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_scheme_keeps_quantifiers() {
        let a = TypeVar::new(0);
        let b = TypeVar::new(1);
        let subst = Substitution::singleton(b.clone(), Type::string());
        let scheme = TypeScheme::polymorphic(
            vec![a.clone()],
            Type::func(vec![Type::Var(a.clone())], Type::Var(b)),
        );
        let applied = subst.apply_scheme(&scheme);
        assert_eq!(applied.vars, vec![a.clone()]);
        assert_eq!(
            applied.ty,
            Type::func(vec![Type::Var(a)], Type::string())
        );
    }
}
