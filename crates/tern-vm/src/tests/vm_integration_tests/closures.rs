use super::helpers::*;

#[test]
fn test_closure_reads_captured_local() {
    let result = execute(vec![
        function(
            "make_adder",
            &["n"],
            vec![ret(func(&["x"], vec![ret(add(ident("x"), ident("n")))]))],
        ),
        let_("add5", call(ident("make_adder"), vec![int(5)])),
        expr(call(ident("add5"), vec![int(10)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(15));
}

#[test]
fn test_capture_is_by_value() {
    let result = execute(vec![
        let_("x", int(1)),
        let_("f", func(&[], vec![ret(ident("x"))])),
        assign(ident("x"), int(2)),
        expr(call(ident("f"), vec![])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(1));
}

#[test]
fn test_captured_collections_are_shared() {
    let result = execute(vec![
        let_("items", list(vec![])),
        let_("add_item", func(&["v"], vec![push("items", ident("v"))])),
        expr(call(ident("add_item"), vec![int(1)])),
        expr(call(ident("add_item"), vec![int(2)])),
        expr(ident("items")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![1, 2]);
}

#[test]
fn test_store_free_persists_in_closure() {
    // Each closure owns its copy; writes stick across its own calls
    let result = execute(vec![
        function(
            "counter",
            &[],
            vec![
                let_("n", int(0)),
                ret(func(
                    &[],
                    vec![
                        assign(ident("n"), add(ident("n"), int(1))),
                        ret(ident("n")),
                    ],
                )),
            ],
        ),
        let_("a", call(ident("counter"), vec![])),
        let_("b", call(ident("counter"), vec![])),
        expr(call(ident("a"), vec![])),
        expr(call(ident("a"), vec![])),
        expr(list(vec![
            call(ident("a"), vec![]),
            call(ident("b"), vec![]),
        ])),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![3, 1]);
}

#[test]
fn test_capture_through_intermediate_function() {
    let result = execute(vec![
        let_("base", int(100)),
        function(
            "outer",
            &[],
            vec![ret(func(&["x"], vec![ret(add(ident("base"), ident("x")))]))],
        ),
        let_("inner", call(ident("outer"), vec![])),
        expr(call(ident("inner"), vec![int(1)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(101));
}

#[test]
fn test_globals_are_not_captured() {
    let result = execute(vec![
        global("g", int(1)),
        let_("f", func(&[], vec![ret(ident("g"))])),
        assign(ident("g"), int(2)),
        expr(call(ident("f"), vec![])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_recursive_closure_via_own_name() {
    let result = execute(vec![
        let_("limit", int(4)),
        function(
            "count",
            &["n"],
            vec![
                if_(eq(ident("n"), ident("limit")), vec![ret(ident("n"))], vec![]),
                ret(call(ident("count"), vec![add(ident("n"), int(1))])),
            ],
        ),
        expr(call(ident("count"), vec![int(0)])),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(4));
}
