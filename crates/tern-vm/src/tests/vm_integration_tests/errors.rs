use super::helpers::*;

#[test]
fn test_undefined_variable_reports_line() {
    let err = compile(&[
        let_("a", int(1)).at(1),
        expr(add(ident("a"), ident("b"))).at(4),
    ])
    .unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UndefinedVariable("b".to_string()));
    assert_eq!(err.line, 4);
    assert_eq!(err.to_string(), "<test>:4: undefined variable 'b'");
}

#[test]
fn test_undefined_variable_inside_function() {
    let err = compile(&[function(
        "f",
        &[],
        vec![let_("x", int(1)).at(2), ret(ident("y")).at(3)],
    )
    .at(1)])
    .unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::UndefinedVariable("y".to_string()));
    assert_eq!(err.line, 3);
}

#[test]
fn test_block_locals_do_not_leak() {
    let err = compile(&[block(vec![let_("inner", int(1))]), expr(ident("inner"))]).unwrap_err();
    assert_eq!(
        err.kind,
        CompileErrorKind::UndefinedVariable("inner".to_string())
    );
}

#[test]
fn test_break_and_continue_outside_loop() {
    let err = compile(&[break_()]).unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::BreakOutsideLoop);

    // A function body does not see the loop around its declaration
    let err = compile(&[while_(
        boolean(true),
        vec![expr(func(&[], vec![continue_()]))],
    )])
    .unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::ContinueOutsideLoop);
}

#[test]
fn test_invalid_assignment_target() {
    let err = compile(&[assign(int(1), int(2))]).unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::InvalidAssignmentTarget);
}

#[test]
fn test_duplicate_parameter() {
    let err = compile(&[function("f", &["a", "a"], vec![])]).unwrap_err();
    assert_eq!(err.kind, CompileErrorKind::DuplicateParameter("a".to_string()));
}

#[test]
fn test_runtime_error_line_and_pc() {
    let err = runtime_error(vec![
        let_("a", int(1)).at(1),
        let_("b", int(0)).at(2),
        expr(binary(BinaryOp::Div, ident("a"), ident("b"))).at(3),
    ]);
    assert_eq!(err.kind, VmError::DivisionByZero);
    assert_eq!(err.line, 3);
    assert_eq!(err.module, "<test>");
    // LoadK a, LoadK b, then the failing division
    assert_eq!(err.pc, 2);
    assert_eq!(err.to_string(), "<test>:3: division by zero (pc 2)");
}

#[test]
fn test_runtime_error_line_inside_function() {
    let err = runtime_error(vec![
        function(
            "f",
            &["x"],
            vec![
                let_("y", int(1)).at(11),
                ret(binary(BinaryOp::Mul, ident("x"), string("s"))).at(12),
            ],
        )
        .at(10),
        expr(call(ident("f"), vec![int(2)])).at(20),
    ]);
    assert_eq!(err.line, 12);
    assert_eq!(err.kind.to_string(), "operator '*' not defined for int and str");
}

#[test]
fn test_vm_is_reusable_after_error() {
    init_tracing();
    let registry = create_builtin_registry();
    let mut vm = Vm::new();

    let bad = compile(&[expr(call(nil(), vec![]))]).unwrap();
    assert!(vm.execute(&bad, &registry).is_err());

    let good = compile(&[expr(add(int(1), int(2)))]).unwrap();
    assert_eq!(vm.execute(&good, &registry).unwrap(), Value::Int(3));
}

#[test]
fn test_invalid_opcode() {
    init_tracing();
    let mut module = compile(&[expr(int(1))]).unwrap();
    let mut main = (*module.main).clone();
    main.code.insert(0, crate::opcode::instruction::encode(0xFF, 0, 0, 0, 0));
    main.lines.insert(0, 1);
    module.main = std::sync::Arc::new(main);

    let mut vm = Vm::new();
    let err = vm.execute(&module, &create_builtin_registry()).unwrap_err();
    assert_eq!(err.kind, VmError::InvalidOpcode(0xFF));
    assert_eq!(err.pc, 0);
}
