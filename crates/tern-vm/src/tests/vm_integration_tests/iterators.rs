use super::helpers::*;

#[test]
fn test_for_in_list() {
    let result = execute(vec![
        let_("keys", list(vec![])),
        let_("vals", list(vec![])),
        for_in(
            "k",
            Some("v"),
            list(vec![string("a"), string("b")]),
            vec![push("keys", ident("k")), push("vals", ident("v"))],
        ),
        expr(list(vec![ident("keys"), ident("vals")])),
    ])
    .unwrap();
    assert_eq!(result.to_string(), r#"[[0, 1], ["a", "b"]]"#);
}

#[test]
fn test_for_in_map() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_in(
            "k",
            Some("v"),
            object(vec![("x", int(1)), ("y", int(2))]),
            vec![push("out", ident("k")), push("out", ident("v"))],
        ),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(result.to_string(), r#"["x", 1, "y", 2]"#);
}

#[test]
fn test_for_in_string() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_in("i", Some("ch"), string("ab"), vec![push("out", ident("ch"))]),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(result.to_string(), r#"["a", "b"]"#);
}

#[test]
fn test_for_in_integer_range() {
    let result = execute(vec![
        let_("sum", int(0)),
        for_in("i", None, int(5), vec![assign(ident("sum"), add(ident("sum"), ident("i")))]),
        expr(ident("sum")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(10));
}

#[test]
fn test_for_in_sees_appended_elements() {
    let result = execute(vec![
        let_("xs", list(vec![int(1)])),
        let_("n", int(0)),
        for_in(
            "i",
            Some("v"),
            ident("xs"),
            vec![
                assign(ident("n"), add(ident("n"), int(1))),
                if_(lt(ident("v"), int(3)), vec![push("xs", add(ident("v"), int(1)))], vec![]),
            ],
        ),
        expr(ident("n")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn test_for_in_break_and_continue() {
    let result = execute(vec![
        let_("out", list(vec![])),
        for_in(
            "i",
            None,
            int(10),
            vec![
                if_(eq(ident("i"), int(1)), vec![continue_()], vec![]),
                if_(eq(ident("i"), int(4)), vec![break_()], vec![]),
                push("out", ident("i")),
            ],
        ),
        expr(ident("out")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![0, 2, 3]);
}

#[test]
fn test_not_iterable() {
    let err = runtime_error(vec![for_in("k", None, nil(), vec![])]);
    assert_eq!(err.kind, VmError::NotIterable("nil"));
}
