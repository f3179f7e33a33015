use crate::function::{Closure, EnumDef, NativeFunction};
use crate::iter::ValueIter;
use crate::sync::{shared, Arc, Shared};
use crate::thread::ThreadRef;
use indexmap::IndexMap;
use std::fmt;

/// A runtime value.
///
/// Scalars and strings are immutable and copied freely. Lists, maps and byte
/// buffers live behind `Shared`, so `let b = a` aliases the same collection
/// and in-place mutation through either name is visible through both.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Shared<Vec<Value>>),
    /// Keyed mapping; keys are normalised to text, insertion ordered
    Map(Shared<IndexMap<String, Value>>),
    Bytes(Shared<Vec<u8>>),
    Enum(Arc<EnumDef>),
    Closure(Arc<Closure>),
    Native(NativeFunction),
    /// Single-pass cursor over an iterable value
    Iterator(Shared<ValueIter>),
    Thread(ThreadRef),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(shared(items))
    }

    pub fn map(entries: IndexMap<String, Value>) -> Value {
        Value::Map(shared(entries))
    }

    pub fn empty_map() -> Value {
        Value::map(IndexMap::new())
    }

    pub fn bytes(data: Vec<u8>) -> Value {
        Value::Bytes(shared(data))
    }

    /// Only `nil` and `false` are false
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Closure(_) => "function",
            Value::Native(_) => "native",
            Value::Iterator(_) => "iterator",
            Value::Thread(_) => "thread",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Equality used by `==`.
    ///
    /// Scalars compare by value (an int equals a float of the same numeric
    /// value), strings by content, and every heap value by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Bytes(a), Value::Bytes(b)) => Arc::ptr_eq(a, b),
            (Value::Enum(a), Value::Enum(b)) => Arc::ptr_eq(a, b),
            (Value::Closure(a), Value::Closure(b)) => Arc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.same(b),
            (Value::Iterator(a), Value::Iterator(b)) => Arc::ptr_eq(a, b),
            (Value::Thread(a), Value::Thread(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Text form of a map key
    pub fn to_key(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Snapshot of a list's elements, used for spread arguments
    pub fn list_items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.read().clone()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, &mut Vec::new(), false)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(self, f, &mut Vec::new(), true)
    }
}

/// Writes `value`, tracking the collections currently open in `open`.
///
/// A collection that contains itself prints as `[...]` or `{...}` at the
/// point it refers back.
fn write_value(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    open: &mut Vec<*const ()>,
    quoted: bool,
) -> fmt::Result {
    match value {
        Value::Nil => write!(f, "nil"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(n) => write!(f, "{}", n),
        Value::Float(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{:.1}", n),
        Value::Float(n) => write!(f, "{}", n),
        Value::Str(s) if quoted => write!(f, "{:?}", s),
        Value::Str(s) => write!(f, "{}", s),
        Value::List(items) => {
            let id = Arc::as_ptr(items) as *const ();
            if open.contains(&id) {
                return write!(f, "[...]");
            }
            open.push(id);
            write!(f, "[")?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(item, f, open, true)?;
            }
            open.pop();
            write!(f, "]")
        }
        Value::Map(entries) => {
            let id = Arc::as_ptr(entries) as *const ();
            if open.contains(&id) {
                return write!(f, "{{...}}");
            }
            open.push(id);
            write!(f, "{{")?;
            for (i, (key, item)) in entries.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}: ", key)?;
                write_value(item, f, open, true)?;
            }
            open.pop();
            write!(f, "}}")
        }
        Value::Bytes(data) => write!(f, "<bytes len={}>", data.read().len()),
        Value::Enum(def) => write!(f, "<enum {}>", def.name),
        Value::Closure(closure) => write!(f, "<fn {}>", closure.proto.name),
        Value::Native(native) => write!(f, "<native {}>", native.name()),
        Value::Iterator(_) => write!(f, "<iterator>"),
        Value::Thread(thread) => write!(f, "<thread {:?}>", thread.read().state()),
    }
}
