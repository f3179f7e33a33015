use super::helpers::*;

#[test]
fn test_function_declaration_and_call() {
    let result = execute(vec![
        function("add2", &["a", "b"], vec![ret(add(ident("a"), ident("b")))]),
        expr(call(ident("add2"), vec![int(2), int(3)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(5));
}

#[test]
fn test_function_literal() {
    let result = execute(vec![
        let_("sq", func(&["x"], vec![ret(binary(BinaryOp::Mul, ident("x"), ident("x")))])),
        expr(call(ident("sq"), vec![int(7)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(49));
}

#[test]
fn test_implicit_return_is_nil() {
    let result = execute(vec![
        function("f", &[], vec![let_("x", int(1))]),
        expr(call(ident("f"), vec![])),
    ])
    .unwrap();
    assert_eq!(result, Value::Nil);

    let result = execute(vec![
        function("g", &[], vec![ret_nil(), ret(int(1))]),
        expr(call(ident("g"), vec![])),
    ])
    .unwrap();
    assert_eq!(result, Value::Nil);
}

#[test]
fn test_recursion() {
    let result = execute(vec![
        function(
            "fib",
            &["n"],
            vec![
                if_(lt(ident("n"), int(2)), vec![ret(ident("n"))], vec![]),
                ret(add(
                    call(ident("fib"), vec![sub(ident("n"), int(1))]),
                    call(ident("fib"), vec![sub(ident("n"), int(2))]),
                )),
            ],
        ),
        expr(call(ident("fib"), vec![int(15)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(610));
}

#[test]
fn test_parameters_shadow_function_name() {
    let result = execute(vec![
        function("f", &["f"], vec![ret(ident("f"))]),
        expr(call(ident("f"), vec![int(9)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(9));
}

#[test]
fn test_arity_mismatch() {
    let err = runtime_error(vec![
        function("f", &["a", "b"], vec![]),
        expr(call(ident("f"), vec![int(1)])),
    ]);
    assert_eq!(
        err.kind,
        VmError::Arity {
            expected: 2,
            variadic: false,
            got: 1
        }
    );

    let err = runtime_error(vec![
        function("f", &["a", "b"], vec![]),
        expr(call(ident("f"), vec![int(1), int(2), int(3)])),
    ]);
    assert_eq!(
        err.kind,
        VmError::Arity {
            expected: 2,
            variadic: false,
            got: 3
        }
    );

    let err = runtime_error(vec![
        function("f", &[], vec![]),
        expr(call(ident("f"), vec![int(1)])),
    ]);
    assert!(matches!(err.kind, VmError::Arity { expected: 0, got: 1, .. }));
}

#[test]
fn test_variadic_collects_extra_arguments() {
    let result = execute(vec![
        variadic_function("f", &["first", "rest"], vec![ret(ident("rest"))]),
        expr(call(ident("f"), vec![int(1), int(2), int(3), int(4)])),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![2, 3, 4]);

    let result = execute(vec![
        variadic_function("f", &["first", "rest"], vec![ret(ident("rest"))]),
        expr(call(ident("f"), vec![int(1)])),
    ])
    .unwrap();
    assert!(ints(&result).is_empty());
}

#[test]
fn test_variadic_requires_fixed_arguments() {
    let err = runtime_error(vec![
        variadic_function("f", &["a", "b", "rest"], vec![]),
        expr(call(ident("f"), vec![int(1)])),
    ]);
    assert_eq!(
        err.kind,
        VmError::Arity {
            expected: 2,
            variadic: true,
            got: 1
        }
    );
}

#[test]
fn test_variadic_with_one_fixed_argument() {
    let err = runtime_error(vec![
        variadic_function("f", &["first", "rest"], vec![ret(ident("rest"))]),
        expr(call(ident("f"), vec![])),
    ]);
    assert_eq!(
        err.kind,
        VmError::Arity {
            expected: 1,
            variadic: true,
            got: 0
        }
    );

    let result = execute(vec![
        variadic_function("f", &["first", "rest"], vec![ret(prefix(PrefixOp::Len, ident("rest")))]),
        expr(call(ident("f"), vec![int(1), int(2), int(3), int(4)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn test_spread_call() {
    let result = execute(vec![
        function(
            "sum3",
            &["a", "b", "c"],
            vec![ret(add(add(ident("a"), ident("b")), ident("c")))],
        ),
        let_("rest", list(vec![int(2), int(3)])),
        expr(call_spread(ident("sum3"), vec![int(1), ident("rest")])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(6));
}

#[test]
fn test_spread_into_variadic() {
    let result = execute(vec![
        variadic_function("count", &["xs"], vec![ret(prefix(PrefixOp::Len, ident("xs")))]),
        expr(call_spread(ident("count"), vec![list(vec![int(1), int(2), int(3)])])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn test_spread_requires_list() {
    let err = runtime_error(vec![
        function("f", &["a"], vec![]),
        expr(call_spread(ident("f"), vec![int(1)])),
    ]);
    assert_eq!(err.kind, VmError::SpreadSource("int"));
}

#[test]
fn test_call_non_callable() {
    let err = runtime_error(vec![let_("x", int(3)), expr(call(ident("x"), vec![]))]);
    assert_eq!(err.kind, VmError::NotCallable("int"));
}

#[test]
fn test_native_errors_carry_message() {
    let err = runtime_error(vec![expr(call(ident("len"), vec![int(3)]))]);
    assert_eq!(
        err.kind,
        VmError::Native("operator '#' not defined for int".to_string())
    );
}

#[test]
fn test_higher_order_functions() {
    let result = execute(vec![
        function(
            "apply_twice",
            &["f", "x"],
            vec![ret(call(ident("f"), vec![call(ident("f"), vec![ident("x")])]))],
        ),
        expr(call(
            ident("apply_twice"),
            vec![func(&["n"], vec![ret(add(ident("n"), int(10)))]), int(1)],
        )),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(21));
}

#[test]
fn test_deep_non_tail_recursion_within_limits() {
    let result = execute(vec![
        function(
            "depth",
            &["n"],
            vec![
                if_(eq(ident("n"), int(0)), vec![ret(int(0))], vec![]),
                ret(add(int(1), call(ident("depth"), vec![sub(ident("n"), int(1))]))),
            ],
        ),
        expr(call(ident("depth"), vec![int(500)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(500));
}
