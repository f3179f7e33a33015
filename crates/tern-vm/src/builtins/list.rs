//! `list` library: in-place list operations and map keys

use super::{expect_args, native};
use indexmap::IndexMap;
use tern_types::Value;

/// Library object bound to the `list` global
pub fn library() -> Value {
    let mut entries = IndexMap::new();
    entries.insert("push".to_string(), native("push", vm_push));
    entries.insert("pop".to_string(), native("pop", vm_pop));
    entries.insert("keys".to_string(), native("keys", vm_keys));
    Value::map(entries)
}

/// Append values to a list, returning the list
pub fn vm_push(args: &[Value]) -> anyhow::Result<Value> {
    match args {
        [Value::List(items), rest @ ..] => {
            items.write().extend(rest.iter().cloned());
            Ok(args[0].clone())
        }
        [other, ..] => anyhow::bail!("push() expects a list, got {}", other.type_name()),
        [] => anyhow::bail!("push() expects a list"),
    }
}

/// Remove and return the last element, nil when empty
pub fn vm_pop(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("pop", args, 1)?;
    match &args[0] {
        Value::List(items) => Ok(items.write().pop().unwrap_or(Value::Nil)),
        other => anyhow::bail!("pop() expects a list, got {}", other.type_name()),
    }
}

/// Keys of a map in insertion order
pub fn vm_keys(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("keys", args, 1)?;
    match &args[0] {
        Value::Map(entries) => Ok(Value::list(
            entries.read().keys().map(|k| Value::str(k)).collect(),
        )),
        other => anyhow::bail!("keys() expects a map, got {}", other.type_name()),
    }
}
