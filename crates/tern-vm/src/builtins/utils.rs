//! Utility functions: type inspection, conversion, length

use super::expect_args;
use tern_ast::PrefixOp;
use tern_types::Value;

/// Get the type name of a value
pub fn vm_typeof(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("typeof", args, 1)?;
    Ok(Value::str(args[0].type_name()))
}

/// Convert a value to its display form
pub fn vm_str(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("str", args, 1)?;
    match &args[0] {
        s @ Value::Str(_) => Ok(s.clone()),
        other => Ok(Value::str(&other.to_string())),
    }
}

/// Length of a string, list, map, byte buffer or enum
pub fn vm_len(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("len", args, 1)?;
    Ok(args[0].prefix_op(PrefixOp::Len)?)
}
