//! Built-in libraries
//!
//! The VM itself knows nothing about these; they reach a program only through
//! the registry, one global slot per name:
//! - Utils: `typeof`, `str`, `len` (plain native functions)
//! - `list`: push, pop, keys (a map of natives)
//! - `thread`: status, wait

pub mod list;
pub mod registry;
pub mod thread;
pub mod utils;

use registry::BuiltinRegistry;
use tern_types::{NativeFunction, Value};

/// Create and populate the default registry
pub fn create_builtin_registry() -> BuiltinRegistry {
    let mut registry = BuiltinRegistry::new();

    registry.register("typeof", || native("typeof", utils::vm_typeof));
    registry.register("str", || native("str", utils::vm_str));
    registry.register("len", || native("len", utils::vm_len));

    registry.register("list", list::library);
    registry.register("thread", thread::library);

    registry
}

pub(crate) fn native(name: &str, func: fn(&[Value]) -> anyhow::Result<Value>) -> Value {
    Value::Native(NativeFunction::new(name, func))
}

/// Check the argument count of a native call
pub(crate) fn expect_args(name: &str, args: &[Value], count: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.len() == count,
        "{}() expects {} argument(s), got {}",
        name,
        count,
        args.len()
    );
    Ok(())
}
