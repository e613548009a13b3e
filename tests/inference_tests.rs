use indoc::indoc;
use source_inference::ast::build::*;
use source_inference::ast::{BinOpKind, Program, UnaryOpKind};
use source_inference::fmt::declaration_types;
use source_inference::types::{
    Chapter, Context, Options, TypeErrorKind, TypeInfo, format_errors, validate_and_infer,
};

/// Helper to validate and infer a program at the default chapter
fn infer(program: Program<()>) -> (Program<TypeInfo>, Context) {
    infer_at(program, Chapter::Four)
}

fn infer_at(program: Program<()>, chapter: Chapter) -> (Program<TypeInfo>, Context) {
    validate_and_infer(program, Options::default().with_chapter(chapter))
        .expect("validation failed")
}

#[test]
fn test_identity_is_polymorphic() {
    // function id(x) { return x; }
    // const num = id(1);
    // const bool = id(true);
    let (program, ctx) = infer(program(vec![
        function(2, "id", &["x"], vec![ret(2, ident("x"))]),
        const_decl(4, "num", call_named("id", vec![num(1.0)])),
        const_decl(5, "bool", call_named("id", vec![boolean(true)])),
    ]));
    assert_eq!(format_errors(ctx.errors()), "");
    assert_eq!(
        declaration_types(&program),
        "id: T1 -> T1\nnum: number\nbool: boolean"
    );
}

#[test]
fn test_church_numerals() {
    // const zero = f => x => x;
    // const succ = n => f => x => n(f)(f(x));
    // const one = succ(zero);
    // const two = succ(one);
    let (program, ctx) = infer(program(vec![
        const_decl(2, "zero", arrow(&["f"], arrow(&["x"], ident("x")))),
        const_decl(
            3,
            "succ",
            arrow(
                &["n"],
                arrow(
                    &["f"],
                    arrow(
                        &["x"],
                        call(
                            call_named("n", vec![ident("f")]),
                            vec![call_named("f", vec![ident("x")])],
                        ),
                    ),
                ),
            ),
        ),
        const_decl(4, "one", call_named("succ", vec![ident("zero")])),
        const_decl(5, "two", call_named("succ", vec![ident("one")])),
    ]));
    assert_eq!(format_errors(ctx.errors()), "");
    assert_eq!(
        declaration_types(&program),
        indoc! {"
            zero: T1 -> T2 -> T2
            succ: ((T1 -> T2) -> T2 -> T3) -> (T1 -> T2) -> T1 -> T3
            one: (T1 -> T2) -> T1 -> T2
            two: (T1 -> T1) -> T1 -> T1"}
    );
}

#[test]
fn test_compose() {
    // function compose(f, g) { return x => f(g(x)); }
    let (program, ctx) = infer(program(vec![function(
        1,
        "compose",
        &["f", "g"],
        vec![ret(
            2,
            arrow(
                &["x"],
                call_named("f", vec![call_named("g", vec![ident("x")])]),
            ),
        )],
    )]));
    assert!(ctx.errors().is_empty());
    assert_eq!(
        declaration_types(&program),
        "compose: (T1 -> T2, T3 -> T1) -> T3 -> T2"
    );
}

#[test]
fn test_addable_parameters() {
    // function add(a, b) { return a + b; }
    // const s = add("a", "b");
    // const n = add(1, 2);
    // const bad = add(1, "b");
    let (program, ctx) = infer(program(vec![
        function(
            1,
            "add",
            &["a", "b"],
            vec![ret(2, binary(BinOpKind::Add, ident("a"), ident("b")))],
        ),
        const_decl(4, "s", call_named("add", vec![string("a"), string("b")])),
        const_decl(5, "n", call_named("add", vec![num(1.0), num(2.0)])),
        const_decl(6, "bad", call_named("add", vec![num(1.0), string("b")])),
    ]));
    assert_eq!(
        declaration_types(&program),
        indoc! {"
            add: (Addable1, Addable1) -> Addable1
            s: string
            n: number
            bad: Couldn't infer type"}
    );
    assert_eq!(
        format_errors(ctx.errors()),
        indoc! {r#"
            Line 6: A type mismatch was detected in the function call:
              add(1, "b")
            The function expected 2 arguments of types:
              Addable1, Addable1
            but instead received 2 arguments of types:
              number, string"#}
    );
}

#[test]
fn test_mutual_recursion_through_hoisting() {
    // function is_even(n) { return n === 0 ? true : is_odd(n - 1); }
    // function is_odd(n) { return n === 0 ? false : is_even(n - 1); }
    let step = |other: &str, base: bool| {
        cond(
            binary(BinOpKind::StrictEq, ident("n"), num(0.0)),
            boolean(base),
            call_named(other, vec![binary(BinOpKind::Sub, ident("n"), num(1.0))]),
        )
    };
    let (program, ctx) = infer(program(vec![
        function(1, "is_even", &["n"], vec![ret(2, step("is_odd", true))]),
        function(4, "is_odd", &["n"], vec![ret(5, step("is_even", false))]),
    ]));
    assert!(ctx.errors().is_empty());
    assert_eq!(
        declaration_types(&program),
        "is_even: number -> boolean\nis_odd: number -> boolean"
    );
}

#[test]
fn test_recursive_calls_are_monomorphic() {
    // function f(x) {
    //     f(1);
    //     f("a");
    //     return x;
    // }
    let (program, ctx) = infer(program(vec![function(
        1,
        "f",
        &["x"],
        vec![
            expr_stmt(2, call_named("f", vec![num(1.0)])),
            expr_stmt(3, call_named("f", vec![string("a")])),
            ret(4, ident("x")),
        ],
    )]));
    assert_eq!(
        format_errors(ctx.errors()),
        indoc! {r#"
            Line 3: A type mismatch was detected in the function call:
              f("a")
            The function expected an argument of type:
              number
            but instead received an argument of type:
              string"#}
    );
    assert_eq!(declaration_types(&program), "f: Couldn't infer type");
}

#[test]
fn test_use_before_declaration_with_other_arity() {
    // const a = g(1);
    // function g(x, y) { return x; }
    let (program, ctx) = infer(program(vec![
        const_decl(1, "a", call_named("g", vec![num(1.0)])),
        function(2, "g", &["x", "y"], vec![ret(2, ident("x"))]),
    ]));
    assert_eq!(
        format_errors(ctx.errors()),
        indoc! {"
            Line 2: A type mismatch was detected in the function declaration:
              function g(x, y) { ... }
            Expected type:
              number -> T1
            but instead got type:
              (T1, T2) -> T1"}
    );
    assert_eq!(declaration_types(&program), "a: T1\ng: Couldn't infer type");
}

#[test]
fn test_occurs_check() {
    // const f = x => x(x);
    let (program, ctx) = infer(program(vec![const_decl(
        1,
        "f",
        arrow(&["x"], call_named("x", vec![ident("x")])),
    )]));
    assert_eq!(ctx.errors().len(), 1);
    assert!(matches!(
        ctx.errors()[0].kind,
        TypeErrorKind::OccursCheckFailure { .. }
    ));
    assert_eq!(
        format_errors(ctx.errors()),
        indoc! {"
            Line 1: An infinite type was detected in the function call:
              x(x)
            The type variable:
              T1
            would have to contain itself in the type:
              T1 -> T2"}
    );
    assert_eq!(declaration_types(&program), "f: Couldn't infer type");
}

#[test]
fn test_unbound_names() {
    // const a = b;
    // c(1);
    let (program, ctx) = infer(program(vec![
        const_decl(1, "a", ident("b")),
        expr_stmt(2, call_named("c", vec![num(1.0)])),
    ]));
    assert_eq!(
        format_errors(ctx.errors()),
        "Line 1: Name b not declared.\nLine 2: Name c not declared."
    );
    assert_eq!(declaration_types(&program), "a: Couldn't infer type");
}

#[test]
fn test_errors_follow_program_order() {
    // 1 + true;
    // "a" - 1;
    // !1;
    // const late = nowhere;
    let (_, ctx) = infer(program(vec![
        expr_stmt(1, binary(BinOpKind::Add, num(1.0), boolean(true))),
        expr_stmt(2, binary(BinOpKind::Sub, string("a"), num(1.0))),
        expr_stmt(3, unary(UnaryOpKind::Not, num(1.0))),
        const_decl(4, "late", ident("nowhere")),
    ]));
    let lines: Vec<usize> = ctx.errors().iter().map(|err| err.line()).collect();
    assert_eq!(lines, vec![1, 2, 3, 4]);
}

#[test]
fn test_inference_is_deterministic() {
    let build = || {
        program(vec![
            function(
                1,
                "twice",
                &["f", "x"],
                vec![ret(
                    2,
                    call_named("f", vec![call_named("f", vec![ident("x")])]),
                )],
            ),
            const_decl(
                4,
                "bad",
                call_named("twice", vec![arrow(&["y"], string("s")), num(1.0)]),
            ),
            const_decl(5, "worse", binary(BinOpKind::Mul, string("a"), num(2.0))),
        ])
    };
    let (first, first_ctx) = infer(build());
    let (second, second_ctx) = infer(build());
    assert_eq!(ctx_errors(&first_ctx), ctx_errors(&second_ctx));
    assert_eq!(declaration_types(&first), declaration_types(&second));
    assert_eq!(first_ctx.errors().len(), 2);
}

fn ctx_errors(ctx: &Context) -> String {
    format_errors(ctx.errors())
}

#[test]
fn test_if_else_if_chain() {
    // function sign(x) {
    //     if (x > 0) {
    //         return 1;
    //     } else if (x < 0) {
    //         return -1;
    //     } else {
    //         return 0;
    //     }
    // }
    let (program, ctx) = infer(program(vec![function(
        1,
        "sign",
        &["x"],
        vec![if_else_if(
            2,
            binary(BinOpKind::Gt, ident("x"), num(0.0)),
            vec![ret(3, num(1.0))],
            if_else(
                4,
                binary(BinOpKind::Lt, ident("x"), num(0.0)),
                vec![ret(5, unary(UnaryOpKind::Minus, num(1.0)))],
                Some(vec![ret(7, num(0.0))]),
            ),
        )],
    )]));
    assert!(ctx.errors().is_empty());
    assert_eq!(declaration_types(&program), "sign: number -> number");
}

#[test]
fn test_nested_declarations_are_generalized() {
    // function outer(x) {
    //     function inner(y) { return x; }
    //     const a = inner(1);
    //     const b = inner("s");
    //     return a;
    // }
    let (program, ctx) = infer(program(vec![function(
        1,
        "outer",
        &["x"],
        vec![
            function(2, "inner", &["y"], vec![ret(2, ident("x"))]),
            const_decl(3, "a", call_named("inner", vec![num(1.0)])),
            const_decl(4, "b", call_named("inner", vec![string("s")])),
            ret(5, ident("a")),
        ],
    )]));
    assert!(ctx.errors().is_empty());
    assert_eq!(declaration_types(&program), "outer: T1 -> T1");
}

#[test]
fn test_let_and_assignment() {
    // let count = 0;
    // function increment() {
    //     count = count + 1;
    //     return count;
    // }
    // let id = x => x;
    // const a = id(1);
    // const b = id("s");
    let (program, ctx) = infer_at(
        program(vec![
            let_decl(1, "count", num(0.0)),
            function(
                2,
                "increment",
                &[],
                vec![
                    expr_stmt(
                        3,
                        assign("count", binary(BinOpKind::Add, ident("count"), num(1.0))),
                    ),
                    ret(4, ident("count")),
                ],
            ),
            let_decl(6, "id", arrow(&["x"], ident("x"))),
            const_decl(7, "a", call_named("id", vec![num(1.0)])),
            const_decl(8, "b", call_named("id", vec![string("s")])),
        ]),
        Chapter::Three,
    );
    assert_eq!(
        declaration_types(&program),
        indoc! {"
            count: number
            increment: () -> number
            id: number -> number
            a: number
            b: Couldn't infer type"}
    );
    assert_eq!(ctx.errors().len(), 1);
    assert_eq!(ctx.errors()[0].line(), 8);
}

#[test]
fn test_block_scopes_shadow() {
    // const x = 1;
    // {
    //     const x = "a";
    //     x + "b";
    // }
    // const y = x * 2;
    let (program, ctx) = infer(program(vec![
        const_decl(1, "x", num(1.0)),
        block(
            2,
            vec![
                const_decl(3, "x", string("a")),
                expr_stmt(4, binary(BinOpKind::Add, ident("x"), string("b"))),
            ],
        ),
        const_decl(6, "y", binary(BinOpKind::Mul, ident("x"), num(2.0))),
    ]));
    assert!(ctx.errors().is_empty());
    assert_eq!(declaration_types(&program), "x: number\ny: number");
}

#[test]
fn test_pair_mutators_need_chapter_three() {
    let build = || {
        program(vec![
            const_decl(1, "p", call_named("pair", vec![num(1.0), num(2.0)])),
            expr_stmt(2, call_named("set_head", vec![ident("p"), num(3.0)])),
        ])
    };

    let (_, ctx) = infer_at(build(), Chapter::Two);
    assert_eq!(format_errors(ctx.errors()), "Line 2: Name set_head not declared.");

    let (program, ctx) = infer_at(build(), Chapter::Three);
    assert!(ctx.errors().is_empty());
    assert_eq!(declaration_types(&program), "p: [number, number]");
}

#[test]
fn test_prompt_and_math() {
    // const n = parse_int(prompt("n?"), 10);
    // const r = math_sqrt(n) + math_PI;
    let (program, ctx) = infer_at(
        program(vec![
            const_decl(
                1,
                "n",
                call_named(
                    "parse_int",
                    vec![call_named("prompt", vec![string("n?")]), num(10.0)],
                ),
            ),
            const_decl(
                2,
                "r",
                binary(
                    BinOpKind::Add,
                    call_named("math_sqrt", vec![ident("n")]),
                    ident("math_PI"),
                ),
            ),
        ]),
        Chapter::One,
    );
    assert!(ctx.errors().is_empty());
    assert_eq!(declaration_types(&program), "n: number\nr: number");
}

#[test]
fn test_logical_operators_return_their_right_operand() {
    // const a = true && 1;
    // const b = false || "x";
    // const c = 1 || true;
    // function either(p, q) { return p || q; }
    let (program, ctx) = infer(program(vec![
        const_decl(1, "a", binary(BinOpKind::And, boolean(true), num(1.0))),
        const_decl(2, "b", binary(BinOpKind::Or, boolean(false), string("x"))),
        const_decl(3, "c", binary(BinOpKind::Or, num(1.0), boolean(true))),
        function(
            4,
            "either",
            &["p", "q"],
            vec![ret(4, binary(BinOpKind::Or, ident("p"), ident("q")))],
        ),
    ]));
    assert_eq!(
        format_errors(ctx.errors()),
        indoc! {"
            Line 3: A type mismatch was detected in the binary expression:
              1 || true
            The binary operator (||) expected two operands with types:
              boolean || T1
            but instead it received two operands of types:
              number || boolean"}
    );
    assert_eq!(
        declaration_types(&program),
        "a: number\nb: string\nc: Couldn't infer type\neither: (boolean, T1) -> T1"
    );
}
