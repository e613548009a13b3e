use thiserror::Error;

use super::subst::Substitution;
use super::ty::{Type, TypeVar};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch { expected: Type, found: Type },
    #[error("arity mismatch: expected {expected}, found {found}")]
    Arity { expected: Type, found: Type },
    #[error("occurs check: cannot construct infinite type {} = {ty}", Type::Var(.var.clone()))]
    OccursCheck { var: TypeVar, ty: Type },
}

impl UnifyError {
    fn mismatch(expected: &Type, found: &Type) -> Self {
        UnifyError::Mismatch {
            expected: expected.clone(),
            found: found.clone(),
        }
    }
}

/// Unify two types, finding a substitution that makes them equal.
///
/// Both types are expected to have the current substitution applied already;
/// the result only contains the bindings discovered here. Unification is
/// all-or-nothing: on error, nothing learned on the way is returned.
///
/// # Rules
///
/// ```text
/// Unify('t0, 't0)               = ∅
/// Unify('t0, number)            = [t0 := number]
/// Unify('t0, 't0 -> number)     = Error (occurs check)
/// Unify(Addable0, number)       = [a0 := number]
/// Unify(Addable0, boolean)      = Error
/// Unify('t0, Addable1)          = [t0 := Addable1]
/// Unify((A, B) -> C, (D) -> E)  = Error (arity)
/// Unify(List<T>, [H, R])        = Unify(T, H) then Unify(List<T>, R)
/// Unify('t0, [H, 't0])          = [t0 := List<H>]  (the list fixpoint)
/// ```
///
/// Components are unified left to right; each partial substitution is applied
/// to the remaining components before they are unified.
pub fn unify(t1: &Type, t2: &Type) -> Result<Substitution, UnifyError> {
    match (t1, t2) {
        (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(Substitution::empty()),

        // Keep the addable constraint on whichever side carries it.
        (Type::Var(v1), Type::Var(v2)) => {
            if v1.addable && !v2.addable {
                Ok(Substitution::singleton(v2.clone(), t1.clone()))
            } else {
                Ok(Substitution::singleton(v1.clone(), t2.clone()))
            }
        }

        (Type::Var(v), t) | (t, Type::Var(v)) => bind(v, t),

        (Type::Primitive(p1), Type::Primitive(p2)) if p1 == p2 => Ok(Substitution::empty()),

        (Type::Func(params1, ret1), Type::Func(params2, ret2)) => {
            if params1.len() != params2.len() {
                return Err(UnifyError::Arity {
                    expected: t1.clone(),
                    found: t2.clone(),
                });
            }
            let mut lefts: Vec<Type> = params1.clone();
            lefts.push((**ret1).clone());
            let mut rights: Vec<Type> = params2.clone();
            rights.push((**ret2).clone());
            unify_pairwise(&lefts, &rights)
        }

        (Type::Pair(head1, tail1), Type::Pair(head2, tail2)) => unify_pairwise(
            &[(**head1).clone(), (**tail1).clone()],
            &[(**head2).clone(), (**tail2).clone()],
        ),

        (Type::List(elem1), Type::List(elem2)) => unify(elem1, elem2),

        (Type::List(elem), Type::Pair(head, tail)) | (Type::Pair(head, tail), Type::List(elem)) => {
            unify_pairwise(
                &[(**elem).clone(), t_list(elem)],
                &[(**head).clone(), (**tail).clone()],
            )
        }

        _ => Err(UnifyError::mismatch(t1, t2)),
    }
}

fn t_list(element: &Type) -> Type {
    Type::list(element.clone())
}

/// Unify two equally long sequences component by component.
fn unify_pairwise(lefts: &[Type], rights: &[Type]) -> Result<Substitution, UnifyError> {
    let mut subst = Substitution::empty();
    for (left, right) in lefts.iter().zip(rights) {
        let step = unify(&subst.apply(left), &subst.apply(right))?;
        subst = subst.compose(&step);
    }
    Ok(subst)
}

fn bind(var: &TypeVar, ty: &Type) -> Result<Substitution, UnifyError> {
    if var.addable {
        return match ty {
            Type::Primitive(p) if p.is_addable() => {
                Ok(Substitution::singleton(var.clone(), ty.clone()))
            }
            _ => Err(UnifyError::mismatch(&Type::Var(var.clone()), ty)),
        };
    }

    if !ty.contains_var(var) {
        return Ok(Substitution::singleton(var.clone(), ty.clone()));
    }

    // 't0 ~ [H, ... 't0 ...] is solved by the list type, as long as the
    // variable only recurs in the tail and the tail then reads as a list.
    if let Type::Pair(head, _) = ty {
        if !head.contains_var(var) {
            let list = t_list(head);
            let first = Substitution::singleton(var.clone(), list.clone());
            if let Ok(rest) = unify(&list, &first.apply(ty)) {
                return Ok(first.compose(&rest));
            }
        }
    }

    Err(UnifyError::OccursCheck {
        var: var.clone(),
        ty: ty.clone(),
    })
}
