//! Function templates, closures and host functions

use crate::sync::{Arc, RwLock};
use crate::value::Value;
use std::fmt;

/// Where a closure's captured value comes from when the closure is created.
///
/// `is_local` captures register `index` of the enclosing frame; otherwise it
/// re-exports entry `index` of the enclosing closure's own captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeVarDesc {
    pub is_local: bool,
    pub index: u16,
}

/// Compiled function (immutable once built)
#[derive(Debug, Clone, Default)]
pub struct Prototype {
    /// Function name (for diagnostics)
    pub name: String,

    /// Minimum number of positional arguments
    pub arity: u16,

    /// Arguments past `arity` are collected into a list in register `arity`
    pub variadic: bool,

    /// Size of the register window a call to this function needs
    pub register_count: u32,

    /// Capture descriptors, in capture-array order
    pub free_vars: Vec<FreeVarDesc>,

    /// Instruction words
    pub code: Vec<u64>,

    /// Source line for each instruction word
    pub lines: Vec<u32>,
}

impl Prototype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn free_count(&self) -> usize {
        self.free_vars.len()
    }

    /// Source line of the instruction at `pc`, 0 when unknown
    pub fn line_at(&self, pc: usize) -> u32 {
        self.lines.get(pc).copied().unwrap_or(0)
    }
}

/// A function paired with the values it captured at creation.
///
/// The captured array is a private copy: it is never re-synced with the
/// enclosing scope, and writes through `set_free` stay local to this closure.
#[derive(Debug)]
pub struct Closure {
    pub proto: Arc<Prototype>,
    free: RwLock<Vec<Value>>,
}

impl Closure {
    pub fn new(proto: Arc<Prototype>, free: Vec<Value>) -> Self {
        Self {
            proto,
            free: RwLock::new(free),
        }
    }

    pub fn get_free(&self, idx: usize) -> Option<Value> {
        self.free.read().get(idx).cloned()
    }

    pub fn set_free(&self, idx: usize, value: Value) -> bool {
        match self.free.write().get_mut(idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Signature every host function implements
pub type NativeFn = dyn Fn(&[Value]) -> anyhow::Result<Value>;

/// Host-provided callable
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.func)(args)
    }

    /// Identity comparison
    pub fn same(&self, other: &NativeFunction) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish()
    }
}

/// Enum declaration; indexing it by variant name yields the ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn ordinal(&self, variant: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == variant)
    }
}
