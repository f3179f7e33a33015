//! Helper functions and common imports for integration tests.

pub use crate::builtins::create_builtin_registry;
pub use crate::bytecode::Module;
pub use crate::compiler::Compiler;
pub use crate::config::VmConfig;
pub use crate::error::{CompileError, CompileErrorKind, RuntimeError, VmError};
pub use crate::vm::{Resumed, Vm};
pub use tern_ast::build::*;
pub use tern_ast::{BinaryOp, Expr, PrefixOp, Stmt};
pub use tern_types::{StackTier, ThreadState, Value};

/// Install a subscriber so `RUST_LOG=tern=trace` shows VM events
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn compile(program: &[Stmt]) -> Result<Module, CompileError> {
    let registry = create_builtin_registry();
    Compiler::with_registry("<test>", &registry)?.compile(program)
}

/// Compile and execute a program
pub fn execute(program: Vec<Stmt>) -> Result<Value, String> {
    execute_with(VmConfig::default(), program)
}

/// Compile and execute a program with a custom configuration
pub fn execute_with(config: VmConfig, program: Vec<Stmt>) -> Result<Value, String> {
    init_tracing();
    let module = compile(&program).map_err(|e| format!("Compile error: {}", e))?;
    let registry = create_builtin_registry();
    let mut vm = Vm::with_config(config);
    vm.execute(&module, &registry)
        .map_err(|e| format!("Runtime error: {}", e))
}

/// Compile a program that must fail at runtime and return the diagnostic
pub fn runtime_error(program: Vec<Stmt>) -> RuntimeError {
    runtime_error_with(VmConfig::default(), program)
}

pub fn runtime_error_with(config: VmConfig, program: Vec<Stmt>) -> RuntimeError {
    init_tracing();
    let module = compile(&program).expect("program should compile");
    let registry = create_builtin_registry();
    let mut vm = Vm::with_config(config);
    vm.execute(&module, &registry)
        .expect_err("program should fail at runtime")
}

/// Integers of a list value
pub fn ints(value: &Value) -> Vec<i64> {
    value
        .list_items()
        .expect("expected a list")
        .iter()
        .map(|v| v.as_int().expect("expected an int"))
        .collect()
}

/// `list.push(target, value)` as a statement
pub fn push(target: &str, value: Expr) -> Stmt {
    expr(call(
        index(ident("list"), string("push")),
        vec![ident(target), value],
    ))
}

pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Add, lhs, rhs)
}

pub fn sub(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Sub, lhs, rhs)
}

pub fn lt(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Lt, lhs, rhs)
}

pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Eq, lhs, rhs)
}
