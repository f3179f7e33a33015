//! Operator, index and slice semantics for runtime values
//!
//! Arithmetic on two ints stays in i64 and wraps; any float operand promotes
//! the operation to f64. `/` and `%` on ints are integer operations and fail
//! on a zero divisor. Iterators accept no operator at all.

use crate::value::Value;
use tern_ast::{BinaryOp, PrefixOp};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    #[error("operator '{op}' not defined for {lhs} and {rhs}")]
    Binary {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("operator '{op}' not defined for {operand}")]
    Prefix {
        op: &'static str,
        operand: &'static str,
    },

    #[error("operation not defined for iterators")]
    Iterator,

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{kind} is not indexable")]
    NotIndexable { kind: &'static str },

    #[error("{kind} does not support index assignment")]
    NotAssignable { kind: &'static str },

    #[error("cannot index {kind} with {index}")]
    InvalidIndex {
        kind: &'static str,
        index: &'static str,
    },

    #[error("{kind} cannot be used as a map key")]
    InvalidKey { kind: &'static str },

    #[error("byte value {0} out of range 0..=255")]
    ByteRange(i64),

    #[error("{kind} cannot be sliced")]
    NotSliceable { kind: &'static str },

    #[error("enum {name} has no variant '{variant}'")]
    UnknownVariant { name: String, variant: String },
}

impl Value {
    pub fn binary_op(&self, op: BinaryOp, rhs: &Value) -> Result<Value, OpError> {
        if matches!(self, Value::Iterator(_)) || matches!(rhs, Value::Iterator(_)) {
            return Err(OpError::Iterator);
        }

        match op {
            BinaryOp::Eq => return Ok(Value::Bool(self.equals(rhs))),
            BinaryOp::Ne => return Ok(Value::Bool(!self.equals(rhs))),
            _ => {}
        }

        let result = match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b)?,
            (Value::Int(a), Value::Float(b)) => float_op(op, *a as f64, *b),
            (Value::Float(a), Value::Int(b)) => float_op(op, *a, *b as f64),
            (Value::Float(a), Value::Float(b)) => float_op(op, *a, *b),
            (Value::Str(a), Value::Str(b)) => match op {
                BinaryOp::Add => {
                    let mut joined = String::with_capacity(a.len() + b.len());
                    joined.push_str(a);
                    joined.push_str(b);
                    Some(Value::str(&joined))
                }
                BinaryOp::Lt => Some(Value::Bool(a < b)),
                BinaryOp::Le => Some(Value::Bool(a <= b)),
                BinaryOp::Gt => Some(Value::Bool(a > b)),
                BinaryOp::Ge => Some(Value::Bool(a >= b)),
                _ => None,
            },
            (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
                let mut joined = a.read().clone();
                joined.extend(b.read().iter().cloned());
                Some(Value::list(joined))
            }
            _ => None,
        };

        result.ok_or(OpError::Binary {
            op: op.symbol(),
            lhs: self.type_name(),
            rhs: rhs.type_name(),
        })
    }

    pub fn prefix_op(&self, op: PrefixOp) -> Result<Value, OpError> {
        let result = match (op, self) {
            (_, Value::Iterator(_)) => return Err(OpError::Iterator),
            (PrefixOp::Not, v) => Some(Value::Bool(!v.is_truthy())),
            (PrefixOp::Neg, Value::Int(n)) => Some(Value::Int(n.wrapping_neg())),
            (PrefixOp::Neg, Value::Float(n)) => Some(Value::Float(-n)),
            (PrefixOp::BitNot, Value::Int(n)) => Some(Value::Int(!n)),
            (PrefixOp::Len, Value::Str(s)) => Some(Value::Int(s.chars().count() as i64)),
            (PrefixOp::Len, Value::List(items)) => Some(Value::Int(items.read().len() as i64)),
            (PrefixOp::Len, Value::Map(entries)) => {
                Some(Value::Int(entries.read().len() as i64))
            }
            (PrefixOp::Len, Value::Bytes(data)) => Some(Value::Int(data.read().len() as i64)),
            (PrefixOp::Len, Value::Enum(def)) => Some(Value::Int(def.variants.len() as i64)),
            _ => None,
        };

        result.ok_or(OpError::Prefix {
            op: op.symbol(),
            operand: self.type_name(),
        })
    }

    /// `self[index]`
    pub fn get_index(&self, index: &Value) -> Result<Value, OpError> {
        match self {
            Value::Iterator(_) => Err(OpError::Iterator),
            Value::List(items) => {
                let items = items.read();
                let pos = position(self, index, items.len())?;
                Ok(items[pos].clone())
            }
            Value::Map(entries) => {
                let key = index.to_key().ok_or(OpError::InvalidKey {
                    kind: index.type_name(),
                })?;
                Ok(entries.read().get(&key).cloned().unwrap_or(Value::Nil))
            }
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let pos = position(self, index, chars.len())?;
                Ok(Value::str(&chars[pos].to_string()))
            }
            Value::Bytes(data) => {
                let data = data.read();
                let pos = position(self, index, data.len())?;
                Ok(Value::Int(data[pos] as i64))
            }
            Value::Enum(def) => match index {
                Value::Str(variant) => def
                    .ordinal(variant)
                    .map(|n| Value::Int(n as i64))
                    .ok_or_else(|| OpError::UnknownVariant {
                        name: def.name.clone(),
                        variant: variant.to_string(),
                    }),
                other => Err(OpError::InvalidIndex {
                    kind: "enum",
                    index: other.type_name(),
                }),
            },
            other => Err(OpError::NotIndexable {
                kind: other.type_name(),
            }),
        }
    }

    /// `self[index] = value`. Assigning one past the end of a list appends.
    pub fn set_index(&self, index: &Value, value: Value) -> Result<(), OpError> {
        match self {
            Value::Iterator(_) => Err(OpError::Iterator),
            Value::List(items) => {
                let mut items = items.write();
                let len = items.len();
                let n = index.as_int().ok_or(OpError::InvalidIndex {
                    kind: "list",
                    index: index.type_name(),
                })?;
                match usize::try_from(n) {
                    Ok(pos) if pos < len => items[pos] = value,
                    Ok(pos) if pos == len => items.push(value),
                    _ => return Err(OpError::IndexOutOfRange { index: n, len }),
                }
                Ok(())
            }
            Value::Map(entries) => {
                let key = index.to_key().ok_or(OpError::InvalidKey {
                    kind: index.type_name(),
                })?;
                entries.write().insert(key, value);
                Ok(())
            }
            Value::Bytes(data) => {
                let mut data = data.write();
                let pos = position(self, index, data.len())?;
                let byte = match value {
                    Value::Int(b) => u8::try_from(b).map_err(|_| OpError::ByteRange(b))?,
                    other => {
                        return Err(OpError::InvalidIndex {
                            kind: "bytes",
                            index: other.type_name(),
                        })
                    }
                };
                data[pos] = byte;
                Ok(())
            }
            other => Err(OpError::NotAssignable {
                kind: other.type_name(),
            }),
        }
    }

    /// `self[lower:upper]`. Bounds are clamped to the value's length and the
    /// result is a fresh copy.
    pub fn slice(&self, lower: Option<&Value>, upper: Option<&Value>) -> Result<Value, OpError> {
        let kind = self.type_name();
        let bound = |b: Option<&Value>, default: usize, len: usize| -> Result<usize, OpError> {
            match b {
                None => Ok(default),
                Some(Value::Int(n)) => Ok((*n).clamp(0, len as i64) as usize),
                Some(other) => Err(OpError::InvalidIndex {
                    kind,
                    index: other.type_name(),
                }),
            }
        };
        let range = |len: usize| -> Result<(usize, usize), OpError> {
            let lo = bound(lower, 0, len)?;
            let hi = bound(upper, len, len)?;
            Ok((lo, hi.max(lo)))
        };

        match self {
            Value::Iterator(_) => Err(OpError::Iterator),
            Value::List(items) => {
                let items = items.read();
                let (lo, hi) = range(items.len())?;
                Ok(Value::list(items[lo..hi].to_vec()))
            }
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let (lo, hi) = range(chars.len())?;
                let text: String = chars[lo..hi].iter().collect();
                Ok(Value::str(&text))
            }
            Value::Bytes(data) => {
                let data = data.read();
                let (lo, hi) = range(data.len())?;
                Ok(Value::bytes(data[lo..hi].to_vec()))
            }
            other => Err(OpError::NotSliceable {
                kind: other.type_name(),
            }),
        }
    }
}

/// Validate an integer index into a sequence of length `len`
fn position(target: &Value, index: &Value, len: usize) -> Result<usize, OpError> {
    let n = index.as_int().ok_or(OpError::InvalidIndex {
        kind: target.type_name(),
        index: index.type_name(),
    })?;
    match usize::try_from(n) {
        Ok(pos) if pos < len => Ok(pos),
        _ => Err(OpError::IndexOutOfRange { index: n, len }),
    }
}

fn int_op(op: BinaryOp, a: i64, b: i64) -> Result<Option<Value>, OpError> {
    let v = match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                return Err(OpError::DivisionByZero);
            }
            Value::Int(a.wrapping_div(b))
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(OpError::DivisionByZero);
            }
            Value::Int(a.wrapping_rem(b))
        }
        BinaryOp::Pow => match u32::try_from(b) {
            Ok(exp) => Value::Int(a.wrapping_pow(exp)),
            Err(_) => Value::Float((a as f64).powf(b as f64)),
        },
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::BitAnd => Value::Int(a & b),
        BinaryOp::BitOr => Value::Int(a | b),
        BinaryOp::BitXor => Value::Int(a ^ b),
        BinaryOp::Shl => Value::Int(a.wrapping_shl(b as u32)),
        BinaryOp::Shr => Value::Int(a.wrapping_shr(b as u32)),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::Ne => Value::Bool(a != b),
    };
    Ok(Some(v))
}

fn float_op(op: BinaryOp, a: f64, b: f64) -> Option<Value> {
    let v = match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Div => Value::Float(a / b),
        BinaryOp::Mod => Value::Float(a % b),
        BinaryOp::Pow => Value::Float(a.powf(b)),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Eq => Value::Bool(a == b),
        BinaryOp::Ne => Value::Bool(a != b),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr => {
            return None
        }
    };
    Some(v)
}
