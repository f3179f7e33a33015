//! Bytecode format and data structures

use crate::error::CompileErrorKind;
use std::collections::HashMap;
use std::sync::Arc;
use tern_types::{EnumDef, Prototype, Value};

/// A constant pool entry
#[derive(Debug, Clone)]
pub enum Constant {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Template instantiated by `Fun`
    Function(Arc<Prototype>),
    Enum(Arc<EnumDef>),
}

impl Constant {
    /// Runtime value loaded by `LoadK`. Function templates have none; they
    /// only become values through `Fun`.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Constant::Nil => Some(Value::Nil),
            Constant::Bool(b) => Some(Value::Bool(*b)),
            Constant::Int(n) => Some(Value::Int(*n)),
            Constant::Float(n) => Some(Value::Float(*n)),
            Constant::Str(s) => Some(Value::Str(s.clone())),
            Constant::Enum(def) => Some(Value::Enum(def.clone())),
            Constant::Function(_) => None,
        }
    }
}

/// Module-wide constant pool.
///
/// Strings, booleans, ints and floats are interned by value. Function and
/// enum constants are distinct artifacts and always get a fresh slot.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    items: Vec<Constant>,
    strings: HashMap<Arc<str>, u16>,
    ints: HashMap<i64, u16>,
    /// Keyed by bit pattern so NaN and -0.0 intern consistently
    floats: HashMap<u64, u16>,
    bools: [Option<u16>; 2],
    nil: Option<u16>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of `constant`, appending it unless an equal literal is present
    pub fn index(&mut self, constant: Constant) -> Result<u16, CompileErrorKind> {
        match constant {
            Constant::Nil => {
                if let Some(idx) = self.nil {
                    return Ok(idx);
                }
                let idx = self.push(Constant::Nil)?;
                self.nil = Some(idx);
                Ok(idx)
            }
            Constant::Bool(b) => {
                if let Some(idx) = self.bools[b as usize] {
                    return Ok(idx);
                }
                let idx = self.push(Constant::Bool(b))?;
                self.bools[b as usize] = Some(idx);
                Ok(idx)
            }
            Constant::Int(n) => {
                if let Some(&idx) = self.ints.get(&n) {
                    return Ok(idx);
                }
                let idx = self.push(Constant::Int(n))?;
                self.ints.insert(n, idx);
                Ok(idx)
            }
            Constant::Float(n) => {
                if let Some(&idx) = self.floats.get(&n.to_bits()) {
                    return Ok(idx);
                }
                let idx = self.push(Constant::Float(n))?;
                self.floats.insert(n.to_bits(), idx);
                Ok(idx)
            }
            Constant::Str(s) => {
                if let Some(&idx) = self.strings.get(&s) {
                    return Ok(idx);
                }
                let idx = self.push(Constant::Str(s.clone()))?;
                self.strings.insert(s, idx);
                Ok(idx)
            }
            other @ (Constant::Function(_) | Constant::Enum(_)) => self.push(other),
        }
    }

    pub fn add_str(&mut self, s: &str) -> Result<u16, CompileErrorKind> {
        self.index(Constant::Str(Arc::from(s)))
    }

    fn push(&mut self, constant: Constant) -> Result<u16, CompileErrorKind> {
        let idx = u16::try_from(self.items.len()).map_err(|_| CompileErrorKind::TooManyConstants)?;
        self.items.push(constant);
        Ok(idx)
    }

    pub fn get(&self, idx: usize) -> Option<&Constant> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Freeze the pool into the slice a module carries
    pub fn into_constants(self) -> Arc<[Constant]> {
        self.items.into()
    }
}

/// Compiled module: the only artifact the VM consumes
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name (for diagnostics)
    pub name: String,

    /// Global slot names; builtin libraries occupy the leading slots
    pub global_names: Vec<String>,

    /// Constant pool shared by every function in the module
    pub constants: Arc<[Constant]>,

    /// Entry function
    pub main: Arc<Prototype>,
}
