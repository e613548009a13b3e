use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A type variable. Identity is the id alone; the `addable` flag is fixed
/// when the variable is created.
#[derive(Debug, Clone)]
pub struct TypeVar {
    pub id: usize,
    pub addable: bool,
}

impl TypeVar {
    pub fn new(id: usize) -> Self {
        Self { id, addable: false }
    }

    /// A variable constrained to `number` or `string`.
    pub fn addable(id: usize) -> Self {
        Self { id, addable: true }
    }
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeVar {}

impl Hash for TypeVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeVar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeVar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Undefined,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Undefined => "undefined",
        }
    }

    pub fn is_addable(self) -> bool {
        matches!(self, Primitive::Number | Primitive::String)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Var(TypeVar),
    Primitive(Primitive),
    Func(Vec<Type>, Box<Type>),
    Pair(Box<Type>, Box<Type>),
    /// The recursive list family; `List(T)` unifies with `Pair(T, List(T))`.
    List(Box<Type>),
}

impl Type {
    pub fn number() -> Self {
        Type::Primitive(Primitive::Number)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::String)
    }

    pub fn boolean() -> Self {
        Type::Primitive(Primitive::Boolean)
    }

    pub fn undefined() -> Self {
        Type::Primitive(Primitive::Undefined)
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Self {
        Type::Func(params, Box::new(ret))
    }

    pub fn pair(head: Type, tail: Type) -> Self {
        Type::Pair(Box::new(head), Box::new(tail))
    }

    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Type::Func(..))
    }

    pub fn free_type_vars(&self) -> BTreeSet<TypeVar> {
        let mut set = BTreeSet::new();
        self.collect_free_type_vars(&mut set);
        set
    }

    fn collect_free_type_vars(&self, set: &mut BTreeSet<TypeVar>) {
        match self {
            Type::Primitive(_) => {}
            Type::Var(v) => {
                set.insert(v.clone());
            }
            Type::Func(params, ret) => {
                for param in params {
                    param.collect_free_type_vars(set);
                }
                ret.collect_free_type_vars(set);
            }
            Type::Pair(head, tail) => {
                head.collect_free_type_vars(set);
                tail.collect_free_type_vars(set);
            }
            Type::List(element) => element.collect_free_type_vars(set),
        }
    }

    /// Check if `var` appears anywhere inside this type.
    pub fn contains_var(&self, var: &TypeVar) -> bool {
        match self {
            Type::Primitive(_) => false,
            Type::Var(v) => v == var,
            Type::Func(params, ret) => {
                params.iter().any(|p| p.contains_var(var)) || ret.contains_var(var)
            }
            Type::Pair(head, tail) => head.contains_var(var) || tail.contains_var(var),
            Type::List(element) => element.contains_var(var),
        }
    }

    /// Rewrite every `Pair(T, List(T))` into `List(T)`, bottom-up.
    ///
    /// Both shapes are interchangeable under unification, the list form is
    /// just the one people expect to read.
    pub fn fold_lists(&self) -> Type {
        match self {
            Type::Pair(head, tail) => {
                let head = head.fold_lists();
                let tail = tail.fold_lists();
                match tail {
                    Type::List(element) if *element == head => Type::List(element),
                    tail => Type::pair(head, tail),
                }
            }
            Type::List(element) => Type::list(element.fold_lists()),
            Type::Func(params, ret) => Type::func(
                params.iter().map(Type::fold_lists).collect(),
                ret.fold_lists(),
            ),
            Type::Var(_) | Type::Primitive(_) => self.clone(),
        }
    }

    pub fn pretty(&self) -> String {
        crate::fmt::type_to_string(self)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScheme {
    pub vars: Vec<TypeVar>,
    pub ty: Type,
}

impl TypeScheme {
    pub fn monomorphic(ty: Type) -> Self {
        TypeScheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn polymorphic(vars: Vec<TypeVar>, ty: Type) -> Self {
        TypeScheme { vars, ty }
    }

    pub fn is_monomorphic(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables of the scheme's type that are not quantified.
    pub fn free_type_vars(&self) -> BTreeSet<TypeVar> {
        let mut free = self.ty.free_type_vars();
        for var in &self.vars {
            free.remove(var);
        }
        free
    }
}

impl fmt::Display for TypeScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}

/// Whether inference managed to give a node a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Typability {
    #[default]
    NotYetTyped,
    Typed,
    Untypable,
}

/// The per-node annotation owned by the inference pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeInfo {
    pub inferred: Option<Type>,
    pub typability: Typability,
}

impl TypeInfo {
    pub fn typed(ty: Type) -> Self {
        TypeInfo {
            inferred: Some(ty),
            typability: Typability::Typed,
        }
    }

    pub fn untypable() -> Self {
        TypeInfo {
            inferred: None,
            typability: Typability::Untypable,
        }
    }

    pub fn is_untypable(&self) -> bool {
        self.typability == Typability::Untypable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_type_vars_concrete() {
        let ty = Type::func(vec![Type::number()], Type::string());
        assert!(ty.free_type_vars().is_empty());
    }

    #[test]
    fn test_free_type_vars_single() {
        let var = TypeVar::new(0);
        let ty = Type::Var(var.clone());
        let free = ty.free_type_vars();
        assert_eq!(free.len(), 1);
        assert!(free.contains(&var));
    }

    #[test]
    fn test_free_type_vars_nested_structures() {
        let a = TypeVar::new(0);
        let b = TypeVar::addable(1);
        let ty = Type::func(
            vec![Type::list(Type::Var(a.clone()))],
            Type::pair(Type::Var(b.clone()), Type::Var(a.clone())),
        );
        let free: Vec<_> = ty.free_type_vars().into_iter().collect();
        assert_eq!(free, vec![a, b]);
    }

    #[test]
    fn test_var_identity_is_id() {
        assert_eq!(TypeVar::new(3), TypeVar::addable(3));
        assert_ne!(TypeVar::new(3), TypeVar::new(4));
    }

    #[test]
    fn test_contains_var() {
        let var = TypeVar::new(0);
        assert!(Type::list(Type::Var(var.clone())).contains_var(&var));
        assert!(!Type::pair(Type::number(), Type::Var(TypeVar::new(1))).contains_var(&var));
    }

    #[test]
    fn test_fold_lists_collapses_cons_of_list() {
        let t = Type::Var(TypeVar::new(0));
        let ty = Type::pair(t.clone(), Type::list(t.clone()));
        assert_eq!(ty.fold_lists(), Type::list(t));
    }

    #[test]
    fn test_fold_lists_keeps_heterogeneous_pair() {
        let ty = Type::pair(Type::string(), Type::list(Type::number()));
        assert_eq!(ty.fold_lists(), ty);
    }

    #[test]
    fn test_scheme_free_vars_excludes_quantified() {
        let a = TypeVar::new(0);
        let b = TypeVar::new(1);
        let scheme = TypeScheme::polymorphic(
            vec![a.clone()],
            Type::func(vec![Type::Var(a)], Type::Var(b.clone())),
        );
        let free: Vec<_> = scheme.free_type_vars().into_iter().collect();
        assert_eq!(free, vec![b]);
    }

    #[test]
    fn test_type_info_default_is_not_yet_typed() {
        let info = TypeInfo::default();
        assert_eq!(info.typability, Typability::NotYetTyped);
        assert!(info.inferred.is_none());
    }
}
