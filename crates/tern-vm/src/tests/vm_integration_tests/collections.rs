use super::helpers::*;

#[test]
fn test_list_literal_and_index() {
    let result = execute(vec![
        let_("xs", list(vec![int(10), int(20), int(30)])),
        expr(index(ident("xs"), int(1))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(20));
}

#[test]
fn test_index_with_register_key() {
    let result = execute(vec![
        let_("xs", list(vec![int(10), int(20), int(30)])),
        let_("i", int(2)),
        expr(index(ident("xs"), ident("i"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(30));
}

#[test]
fn test_index_out_of_range() {
    let err = runtime_error(vec![
        let_("xs", list(vec![int(1)])),
        expr(index(ident("xs"), int(3))),
    ]);
    assert_eq!(err.kind, VmError::IndexOutOfRange { index: 3, len: 1 });
}

#[test]
fn test_index_assignment_and_append() {
    let result = execute(vec![
        let_("xs", list(vec![int(1), int(2)])),
        assign(index(ident("xs"), int(0)), int(9)),
        assign(index(ident("xs"), int(2)), int(3)),
        expr(ident("xs")),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![9, 2, 3]);
}

#[test]
fn test_lists_alias() {
    let result = execute(vec![
        let_("a", list(vec![int(1)])),
        let_("b", ident("a")),
        push("b", int(2)),
        expr(prefix(PrefixOp::Len, ident("a"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_object_literal() {
    let result = execute(vec![
        let_("p", object(vec![("x", int(1)), ("y", add(int(1), int(1)))])),
        assign(index(ident("p"), string("z")), int(3)),
        expr(list(vec![
            index(ident("p"), string("y")),
            index(ident("p"), string("z")),
            prefix(PrefixOp::Len, ident("p")),
        ])),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![2, 3, 3]);
}

#[test]
fn test_missing_map_key_is_nil() {
    let result = execute(vec![
        let_("m", object(vec![])),
        expr(index(ident("m"), string("nope"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Nil);
}

#[test]
fn test_object_reassigned_from_itself() {
    let result = execute(vec![
        let_("o", object(vec![("n", int(1))])),
        assign(ident("o"), object(vec![("n", add(index(ident("o"), string("n")), int(1)))])),
        expr(index(ident("o"), string("n"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_map_keys_in_insertion_order() {
    let result = execute(vec![
        let_("m", object(vec![("b", int(1)), ("a", int(2))])),
        expr(call(index(ident("list"), string("keys")), vec![ident("m")])),
    ])
    .unwrap();
    assert_eq!(result.to_string(), r#"["b", "a"]"#);
}

#[test]
fn test_slices() {
    let xs = || list(vec![int(0), int(1), int(2), int(3), int(4)]);

    let result = execute(vec![expr(slice(xs(), Some(int(1)), Some(int(3))))]).unwrap();
    assert_eq!(ints(&result), vec![1, 2]);

    let result = execute(vec![expr(slice(xs(), None, Some(int(2))))]).unwrap();
    assert_eq!(ints(&result), vec![0, 1]);

    let result = execute(vec![expr(slice(xs(), Some(int(3)), None))]).unwrap();
    assert_eq!(ints(&result), vec![3, 4]);

    // Bounds clamp to the length
    let result = execute(vec![expr(slice(xs(), Some(int(-5)), Some(int(99))))]).unwrap();
    assert_eq!(ints(&result), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_slice_is_a_copy() {
    let result = execute(vec![
        let_("xs", list(vec![int(1), int(2)])),
        let_("ys", slice(ident("xs"), None, None)),
        push("ys", int(3)),
        expr(prefix(PrefixOp::Len, ident("xs"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_string_index_and_slice() {
    let result = execute(vec![
        let_("s", string("héllo")),
        expr(list(vec![
            index(ident("s"), int(1)),
            slice(ident("s"), Some(int(1)), Some(int(4))),
        ])),
    ])
    .unwrap();
    assert_eq!(result.to_string(), r#"["é", "éll"]"#);
}

#[test]
fn test_list_concatenation() {
    let result = execute(vec![expr(add(
        list(vec![int(1)]),
        list(vec![int(2), int(3)]),
    ))])
    .unwrap();
    assert_eq!(ints(&result), vec![1, 2, 3]);
}

#[test]
fn test_index_non_indexable() {
    let err = runtime_error(vec![expr(index(int(1), int(0)))]);
    assert!(matches!(err.kind, VmError::Operator(_)));
    assert_eq!(err.kind.to_string(), "int is not indexable");
}

#[test]
fn test_unknown_enum_variant() {
    let err = runtime_error(vec![
        enum_("Dir", &["Up", "Down"]),
        expr(index(ident("Dir"), string("Left"))),
    ]);
    assert_eq!(err.kind.to_string(), "enum Dir has no variant 'Left'");
}
