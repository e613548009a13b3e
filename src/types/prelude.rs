//! Type schemes of the operators and builtins every program can refer to.
//!
//! Operators are bound under their symbol (unary ones as `unary -` and
//! `unary !`), which no identifier can clash with. The empty list literal is
//! bound as `null`.

use super::context::{Chapter, Context};
use super::env::TypeEnv;
use super::ty::{Type, TypeScheme};
use crate::ast::{BinOpKind, UnaryOpKind};

pub const NULL: &str = "null";

pub fn binary_key(op: BinOpKind) -> &'static str {
    op.symbol()
}

pub fn unary_key(op: UnaryOpKind) -> &'static str {
    match op {
        UnaryOpKind::Minus => "unary -",
        UnaryOpKind::Not => "unary !",
    }
}

const MATH_UNARY: &[&str] = &[
    "math_abs",
    "math_acos",
    "math_acosh",
    "math_asin",
    "math_asinh",
    "math_atan",
    "math_atanh",
    "math_cbrt",
    "math_ceil",
    "math_clz32",
    "math_cos",
    "math_cosh",
    "math_exp",
    "math_expm1",
    "math_floor",
    "math_fround",
    "math_log",
    "math_log1p",
    "math_log2",
    "math_log10",
    "math_round",
    "math_sign",
    "math_sin",
    "math_sinh",
    "math_sqrt",
    "math_tan",
    "math_tanh",
    "math_trunc",
];

const MATH_BINARY: &[&str] = &["math_atan2", "math_imul", "math_pow"];

const NUMBER_CONSTANTS: &[&str] = &[
    "NaN",
    "Infinity",
    "math_E",
    "math_LN2",
    "math_LN10",
    "math_LOG2E",
    "math_LOG10E",
    "math_PI",
    "math_SQRT1_2",
    "math_SQRT2",
];

const PREDICATES: &[&str] = &[
    "is_number",
    "is_string",
    "is_boolean",
    "is_function",
    "is_undefined",
];

/// Give `ctx` a fresh environment whose outermost scope holds the prelude of
/// its chapter.
pub(crate) fn install(ctx: &mut Context) {
    let chapter = ctx.chapter();
    let mut bindings: Vec<(String, TypeScheme)> = Vec::new();
    let mut bind = |name: &str, scheme: TypeScheme| bindings.push((name.to_string(), scheme));

    let number = Type::number;
    let boolean = Type::boolean;

    // operators
    let a = ctx.fresh_type_var(true);
    bind(
        binary_key(BinOpKind::Add),
        TypeScheme::polymorphic(
            vec![a.clone()],
            Type::func(vec![Type::Var(a.clone()), Type::Var(a.clone())], Type::Var(a)),
        ),
    );
    for op in [BinOpKind::Sub, BinOpKind::Mul, BinOpKind::Div, BinOpKind::Mod] {
        bind(
            binary_key(op),
            TypeScheme::monomorphic(Type::func(vec![number(), number()], number())),
        );
    }
    for op in [
        BinOpKind::StrictEq,
        BinOpKind::StrictNotEq,
        BinOpKind::Lt,
        BinOpKind::Gt,
        BinOpKind::LtEq,
        BinOpKind::GtEq,
    ] {
        let a = ctx.fresh_type_var(true);
        bind(
            binary_key(op),
            TypeScheme::polymorphic(
                vec![a.clone()],
                Type::func(vec![Type::Var(a.clone()), Type::Var(a)], boolean()),
            ),
        );
    }
    // `a && b` and `a || b` evaluate to `b` whenever they get to it
    for op in [BinOpKind::And, BinOpKind::Or] {
        let t = ctx.fresh_type_var(false);
        bind(
            binary_key(op),
            TypeScheme::polymorphic(
                vec![t.clone()],
                Type::func(vec![boolean(), Type::Var(t.clone())], Type::Var(t)),
            ),
        );
    }
    bind(
        unary_key(UnaryOpKind::Not),
        TypeScheme::monomorphic(Type::func(vec![boolean()], boolean())),
    );
    bind(
        unary_key(UnaryOpKind::Minus),
        TypeScheme::monomorphic(Type::func(vec![number()], number())),
    );

    // chapter 1
    let t = ctx.fresh_type_var(false);
    bind(
        "display",
        TypeScheme::polymorphic(
            vec![t.clone()],
            Type::func(vec![Type::Var(t.clone())], Type::Var(t)),
        ),
    );
    let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
    bind(
        "error",
        TypeScheme::polymorphic(
            vec![t1.clone(), t2.clone()],
            Type::func(vec![Type::Var(t1)], Type::Var(t2)),
        ),
    );
    let t = ctx.fresh_type_var(false);
    bind(
        "stringify",
        TypeScheme::polymorphic(vec![t.clone()], Type::func(vec![Type::Var(t)], Type::string())),
    );
    bind(
        "prompt",
        TypeScheme::monomorphic(Type::func(vec![Type::string()], Type::string())),
    );
    for &name in PREDICATES {
        let t = ctx.fresh_type_var(false);
        bind(
            name,
            TypeScheme::polymorphic(vec![t.clone()], Type::func(vec![Type::Var(t)], boolean())),
        );
    }
    bind(
        "runtime",
        TypeScheme::monomorphic(Type::func(vec![], number())),
    );
    bind(
        "math_random",
        TypeScheme::monomorphic(Type::func(vec![], number())),
    );
    for &name in MATH_UNARY {
        bind(
            name,
            TypeScheme::monomorphic(Type::func(vec![number()], number())),
        );
    }
    for &name in MATH_BINARY {
        bind(
            name,
            TypeScheme::monomorphic(Type::func(vec![number(), number()], number())),
        );
    }
    bind(
        "parse_int",
        TypeScheme::monomorphic(Type::func(vec![Type::string(), number()], number())),
    );
    bind("undefined", TypeScheme::monomorphic(Type::undefined()));
    for &name in NUMBER_CONSTANTS {
        bind(name, TypeScheme::monomorphic(number()));
    }

    if chapter >= Chapter::Two {
        let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
        bind(
            "pair",
            TypeScheme::polymorphic(
                vec![t1.clone(), t2.clone()],
                Type::func(
                    vec![Type::Var(t1.clone()), Type::Var(t2.clone())],
                    Type::pair(Type::Var(t1), Type::Var(t2)),
                ),
            ),
        );
        let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
        bind(
            "head",
            TypeScheme::polymorphic(
                vec![t1.clone(), t2.clone()],
                Type::func(
                    vec![Type::pair(Type::Var(t1.clone()), Type::Var(t2))],
                    Type::Var(t1),
                ),
            ),
        );
        let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
        bind(
            "tail",
            TypeScheme::polymorphic(
                vec![t1.clone(), t2.clone()],
                Type::func(
                    vec![Type::pair(Type::Var(t1), Type::Var(t2.clone()))],
                    Type::Var(t2),
                ),
            ),
        );
        let t = ctx.fresh_type_var(false);
        bind(
            "is_null",
            TypeScheme::polymorphic(
                vec![t.clone()],
                Type::func(vec![Type::list(Type::Var(t))], boolean()),
            ),
        );
        let t = ctx.fresh_type_var(false);
        bind(
            "is_pair",
            TypeScheme::polymorphic(vec![t.clone()], Type::func(vec![Type::Var(t)], boolean())),
        );
        let t = ctx.fresh_type_var(false);
        bind(
            NULL,
            TypeScheme::polymorphic(vec![t.clone()], Type::list(Type::Var(t))),
        );
    }

    if chapter >= Chapter::Three {
        let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
        bind(
            "set_head",
            TypeScheme::polymorphic(
                vec![t1.clone(), t2.clone()],
                Type::func(
                    vec![
                        Type::pair(Type::Var(t1.clone()), Type::Var(t2)),
                        Type::Var(t1),
                    ],
                    Type::undefined(),
                ),
            ),
        );
        let (t1, t2) = (ctx.fresh_type_var(false), ctx.fresh_type_var(false));
        bind(
            "set_tail",
            TypeScheme::polymorphic(
                vec![t1.clone(), t2.clone()],
                Type::func(
                    vec![
                        Type::pair(Type::Var(t1), Type::Var(t2.clone())),
                        Type::Var(t2),
                    ],
                    Type::undefined(),
                ),
            ),
        );
    }

    ctx.env = TypeEnv::with_bindings(bindings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::context::Options;

    fn context(chapter: Chapter) -> Context {
        Context::new(Options::default().with_chapter(chapter))
    }

    #[test]
    fn test_prelude_schemes_are_closed() {
        let ctx = context(Chapter::Four);
        assert!(
            ctx.env()
                .free_type_vars(ctx.substitution())
                .is_empty()
        );
    }

    #[test]
    fn test_pair_functions_start_in_chapter_two() {
        let ctx = context(Chapter::One);
        assert!(ctx.env().lookup("display").is_some());
        assert!(ctx.env().lookup("pair").is_none());
        assert!(ctx.env().lookup(NULL).is_none());

        let ctx = context(Chapter::Two);
        assert!(ctx.env().lookup("pair").is_some());
        assert!(ctx.env().lookup(NULL).is_some());
        assert!(ctx.env().lookup("set_head").is_none());
    }

    #[test]
    fn test_mutators_start_in_chapter_three() {
        let ctx = context(Chapter::Three);
        assert!(ctx.env().lookup("set_head").is_some());
        assert!(ctx.env().lookup("set_tail").is_some());
    }

    #[test]
    fn test_operator_schemes() {
        let ctx = context(Chapter::One);
        let plus = ctx.env().lookup(binary_key(BinOpKind::Add)).unwrap();
        assert_eq!(plus.to_string(), "(Addable1, Addable1) -> Addable1");
        let minus = ctx.env().lookup(unary_key(UnaryOpKind::Minus)).unwrap();
        assert_eq!(minus.to_string(), "number -> number");
        let eq = ctx.env().lookup(binary_key(BinOpKind::StrictEq)).unwrap();
        assert_eq!(eq.to_string(), "(Addable1, Addable1) -> boolean");
        for op in [BinOpKind::And, BinOpKind::Or] {
            let logical = ctx.env().lookup(binary_key(op)).unwrap();
            assert_eq!(logical.to_string(), "(boolean, T1) -> T1");
        }
    }

    #[test]
    fn test_list_builtins() {
        let ctx = context(Chapter::Two);
        let render = |name: &str| ctx.env().lookup(name).unwrap().to_string();
        assert_eq!(render("pair"), "(T1, T2) -> [T1, T2]");
        assert_eq!(render("head"), "[T1, T2] -> T1");
        assert_eq!(render("tail"), "[T1, T2] -> T2");
        assert_eq!(render("is_null"), "List<T1> -> boolean");
        assert_eq!(render(NULL), "List<T1>");
    }
}
