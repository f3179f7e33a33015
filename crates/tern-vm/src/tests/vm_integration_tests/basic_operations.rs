use super::helpers::*;

#[test]
fn test_literals() {
    assert_eq!(execute(vec![expr(int(42))]).unwrap(), Value::Int(42));
    assert_eq!(execute(vec![expr(float(1.5))]).unwrap(), Value::Float(1.5));
    assert_eq!(execute(vec![expr(boolean(true))]).unwrap(), Value::Bool(true));
    assert_eq!(execute(vec![expr(string("hi"))]).unwrap(), Value::str("hi"));
    assert_eq!(execute(vec![expr(nil())]).unwrap(), Value::Nil);
}

#[test]
fn test_empty_module_is_nil() {
    assert_eq!(execute(vec![]).unwrap(), Value::Nil);
}

#[test]
fn test_module_ending_in_statement_is_nil() {
    let result = execute(vec![let_("x", int(1))]).unwrap();
    assert_eq!(result, Value::Nil);
}

#[test]
fn test_arithmetic() {
    let result = execute(vec![expr(add(
        int(2),
        binary(BinaryOp::Mul, int(3), int(4)),
    ))])
    .unwrap();
    assert_eq!(result, Value::Int(14));

    let result = execute(vec![expr(binary(BinaryOp::Div, int(7), int(2)))]).unwrap();
    assert_eq!(result, Value::Int(3));

    let result = execute(vec![expr(binary(BinaryOp::Pow, int(2), int(10)))]).unwrap();
    assert_eq!(result, Value::Int(1024));
}

#[test]
fn test_mixed_arithmetic_promotes() {
    let result = execute(vec![expr(add(int(1), float(0.5)))]).unwrap();
    assert_eq!(result, Value::Float(1.5));
}

#[test]
fn test_operands_from_locals_and_constants() {
    // Exercises the register/constant operand forms
    let result = execute(vec![
        let_("a", int(10)),
        let_("b", int(3)),
        let_("rr", sub(ident("a"), ident("b"))),
        let_("rk", sub(ident("a"), int(1))),
        let_("kr", sub(int(100), ident("b"))),
        expr(list(vec![ident("rr"), ident("rk"), ident("kr")])),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![7, 9, 97]);
}

#[test]
fn test_operands_from_globals() {
    let result = execute(vec![
        global("g", int(6)),
        global("h", int(7)),
        expr(binary(BinaryOp::Mul, ident("g"), ident("h"))),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(42));
}

#[test]
fn test_string_concatenation() {
    let result = execute(vec![
        let_("s", string("foo")),
        expr(add(ident("s"), string("bar"))),
    ])
    .unwrap();
    assert_eq!(result, Value::str("foobar"));
}

#[test]
fn test_comparison() {
    assert_eq!(execute(vec![expr(lt(int(1), int(2)))]).unwrap(), Value::Bool(true));
    assert_eq!(
        execute(vec![expr(binary(BinaryOp::Ge, int(1), int(2)))]).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn test_equality() {
    assert_eq!(execute(vec![expr(eq(int(2), float(2.0)))]).unwrap(), Value::Bool(true));
    assert_eq!(
        execute(vec![expr(binary(BinaryOp::Ne, string("a"), string("a")))]).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(execute(vec![expr(eq(nil(), boolean(false)))]).unwrap(), Value::Bool(false));
}

#[test]
fn test_collections_compare_by_identity() {
    let result = execute(vec![
        let_("a", list(vec![int(1)])),
        let_("b", ident("a")),
        expr(list(vec![
            eq(ident("a"), ident("b")),
            eq(ident("a"), list(vec![int(1)])),
        ])),
    ])
    .unwrap();
    let flags = result.list_items().unwrap();
    assert_eq!(flags, vec![Value::Bool(true), Value::Bool(false)]);
}

#[test]
fn test_prefix_operators() {
    assert_eq!(execute(vec![expr(prefix(PrefixOp::Neg, int(5)))]).unwrap(), Value::Int(-5));
    assert_eq!(execute(vec![expr(prefix(PrefixOp::Not, nil()))]).unwrap(), Value::Bool(true));
    assert_eq!(execute(vec![expr(prefix(PrefixOp::BitNot, int(0)))]).unwrap(), Value::Int(-1));
    assert_eq!(
        execute(vec![expr(prefix(PrefixOp::Len, string("héllo")))]).unwrap(),
        Value::Int(5)
    );
}

#[test]
fn test_logical_short_circuit() {
    // The right side would fail if evaluated
    let boom = call(nil(), vec![]);
    assert_eq!(execute(vec![expr(and(boolean(false), boom.clone()))]).unwrap(), Value::Bool(false));
    assert_eq!(execute(vec![expr(or(int(1), boom))]).unwrap(), Value::Int(1));
    assert_eq!(execute(vec![expr(or(nil(), int(2)))]).unwrap(), Value::Int(2));
    assert_eq!(execute(vec![expr(and(int(1), int(2)))]).unwrap(), Value::Int(2));
}

#[test]
fn test_logical_assignment_to_self() {
    let result = execute(vec![
        let_("x", nil()),
        assign(ident("x"), or(ident("x"), int(5))),
        assign(ident("x"), and(ident("x"), add(ident("x"), int(1)))),
        expr(ident("x")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(6));
}

#[test]
fn test_global_assignment() {
    let result = execute(vec![
        global("count", int(0)),
        assign(ident("count"), add(ident("count"), int(1))),
        assign(ident("count"), add(ident("count"), int(1))),
        expr(ident("count")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_block_scoping() {
    let result = execute(vec![
        let_("x", int(1)),
        block(vec![let_("x", int(2)), let_("y", ident("x"))]),
        expr(ident("x")),
    ])
    .unwrap();
    assert_eq!(result, Value::Int(1));
}

#[test]
fn test_enum_ordinals() {
    let result = execute(vec![
        enum_("Color", &["Red", "Green", "Blue"]),
        expr(list(vec![
            index(ident("Color"), string("Blue")),
            prefix(PrefixOp::Len, ident("Color")),
        ])),
    ])
    .unwrap();
    assert_eq!(ints(&result), vec![2, 3]);
}

#[test]
fn test_builtin_functions() {
    let result = execute(vec![expr(list(vec![
        call(ident("typeof"), vec![float(1.0)]),
        call(ident("str"), vec![int(12)]),
    ]))])
    .unwrap();
    assert_eq!(result.to_string(), r#"["float", "12"]"#);

    let result = execute(vec![expr(call(ident("len"), vec![list(vec![int(1), int(2)])]))]).unwrap();
    assert_eq!(result, Value::Int(2));
}
