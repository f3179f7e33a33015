use super::helpers::*;

#[test]
fn test_if_else() {
    let program = |cond: Expr| {
        vec![
            let_("r", nil()),
            if_(cond, vec![assign(ident("r"), int(1))], vec![assign(ident("r"), int(2))]),
            expr(ident("r")),
        ]
    };
    assert_eq!(execute(program(boolean(true))).unwrap(), Value::Int(1));
    assert_eq!(execute(program(nil())).unwrap(), Value::Int(2));
    // Zero is truthy
    assert_eq!(execute(program(int(0))).unwrap(), Value::Int(1));
}

#[test]
fn test_if_without_else() {
    let result = execute(vec![
        let_("r", int(0)),
        if_(lt(int(2), int(1)), vec![assign(ident("r"), int(1))], vec![]),
        expr(ident("r")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(0));
}

#[test]
fn test_while_loop() {
    let result = execute(vec![
        let_("i", int(0)),
        let_("sum", int(0)),
        while_(
            lt(ident("i"), int(10)),
            vec![
                assign(ident("i"), add(ident("i"), int(1))),
                assign(ident("sum"), add(ident("sum"), ident("i"))),
            ],
        ),
        expr(ident("sum")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(55));
}

#[test]
fn test_while_break_and_continue() {
    let result = execute(vec![
        let_("i", int(0)),
        let_("out", list(vec![])),
        while_(
            boolean(true),
            vec![
                assign(ident("i"), add(ident("i"), int(1))),
                if_(eq(ident("i"), int(3)), vec![continue_()], vec![]),
                if_(lt(int(5), ident("i")), vec![break_()], vec![]),
                push("out", ident("i")),
            ],
        ),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![1, 2, 4, 5]);
}

#[test]
fn test_for_range() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_range("i", int(0), int(5), Some(int(1)), vec![push("out", ident("i"))]),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![0, 1, 2, 3, 4]);

    let result = execute(vec![
        let_("out", list(vec![])),
        for_range("i", int(0), int(4), None, vec![push("out", ident("i"))]),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![0, 1, 2, 3]);
}

#[test]
fn test_for_range_negative_step() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_range("i", int(5), int(0), Some(int(-2)), vec![push("out", ident("i"))]),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![5, 3, 1]);
}

#[test]
fn test_for_range_empty() {
    let result = execute(vec![
        let_("n", int(0)),
        for_range("i", int(3), int(3), None, vec![assign(ident("n"), int(1))]),
        expr(ident("n")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(0));
}

#[test]
fn test_for_range_variable_is_a_copy() {
    // Reassigning the loop variable does not change the iteration count
    let result = execute(vec![
        let_("n", int(0)),
        for_range(
            "i",
            int(0),
            int(3),
            None,
            vec![
                assign(ident("i"), int(100)),
                assign(ident("n"), add(ident("n"), int(1))),
            ],
        ),
        expr(ident("n")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn test_for_range_break_and_continue() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_range(
            "i",
            int(0),
            int(10),
            None,
            vec![
                if_(eq(binary(BinaryOp::Mod, ident("i"), int(2)), int(1)), vec![continue_()], vec![]),
                if_(eq(ident("i"), int(6)), vec![break_()], vec![]),
                push("out", ident("i")),
            ],
        ),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![0, 2, 4]);
}

#[test]
fn test_for_range_near_overflow_terminates() {
    let result = execute(vec![
        let_("n", int(0)),
        for_range(
            "i",
            int(i64::MAX - 1),
            int(i64::MAX),
            Some(int(3)),
            vec![assign(ident("n"), add(ident("n"), int(1)))],
        ),
        expr(ident("n")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(1));
}

#[test]
fn test_for_range_zero_step() {
    let err = runtime_error(vec![for_range("i", int(0), int(3), Some(int(0)), vec![])]);
    assert_eq!(err.kind, VmError::ZeroStep);
}

#[test]
fn test_for_range_requires_ints() {
    let err = runtime_error(vec![for_range("i", float(0.0), int(3), None, vec![])]);
    assert!(matches!(err.kind, VmError::TypeError { operation: "for", .. }));
}

#[test]
fn test_nested_loops() {
    let result = execute(vec![
        let_("n", int(0)),
        for_range(
            "i",
            int(0),
            int(3),
            None,
            vec![for_range(
                "j",
                int(0),
                int(4),
                None,
                vec![
                    if_(eq(ident("j"), int(2)), vec![break_()], vec![]),
                    assign(ident("n"), add(ident("n"), int(1))),
                ],
            )],
        ),
        expr(ident("n")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(6));
}
