//! `thread` library: state queries from inside a program

use super::{expect_args, native};
use indexmap::IndexMap;
use tern_types::{ThreadState, Value};

/// Library object bound to the `thread` global
pub fn library() -> Value {
    let mut entries = IndexMap::new();
    entries.insert("status".to_string(), native("status", vm_status));
    entries.insert("wait".to_string(), native("wait", vm_wait));
    Value::map(entries)
}

pub fn state_name(state: ThreadState) -> &'static str {
    match state {
        ThreadState::Ready => "ready",
        ThreadState::Running => "running",
        ThreadState::Suspended => "suspended",
        ThreadState::Waiting => "waiting",
        ThreadState::Closed => "closed",
    }
}

/// Lifecycle state of a thread as a string
pub fn vm_status(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("status", args, 1)?;
    match &args[0] {
        Value::Thread(thread) => Ok(Value::str(state_name(thread.read().state()))),
        other => anyhow::bail!("status() expects a thread, got {}", other.type_name()),
    }
}

/// Mark a suspended thread as waiting on an external event
pub fn vm_wait(args: &[Value]) -> anyhow::Result<Value> {
    expect_args("wait", args, 1)?;
    match &args[0] {
        Value::Thread(thread) => {
            thread.write().wait()?;
            Ok(Value::Nil)
        }
        other => anyhow::bail!("wait() expects a thread, got {}", other.type_name()),
    }
}
