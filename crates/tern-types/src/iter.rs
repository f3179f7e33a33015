//! Iterator protocol for generic `for k, v in x` loops
//!
//! A `ValueIter` is a single-pass cursor. `advance` moves it and reports
//! whether an element is available; `key` and `value` then read the element
//! it landed on. Restarting means asking the source for a fresh iterator.
//!
//! Lists, maps and byte buffers are read live, so elements appended during
//! iteration are visited. Strings are immutable and pre-split into chars.

use crate::sync::Shared;
use crate::value::Value;
use indexmap::IndexMap;

#[derive(Debug)]
enum Source {
    List(Shared<Vec<Value>>),
    Map(Shared<IndexMap<String, Value>>),
    Str(Vec<char>),
    Bytes(Shared<Vec<u8>>),
    /// Integer range `0..end`
    Range(i64),
}

#[derive(Debug)]
pub struct ValueIter {
    source: Source,
    /// Position of the next element to visit
    next: usize,
    key: Value,
    value: Value,
}

impl ValueIter {
    /// Iterator over `value`, or None when the value is not iterable
    pub fn new(value: &Value) -> Option<Self> {
        let source = match value {
            Value::List(items) => Source::List(items.clone()),
            Value::Map(entries) => Source::Map(entries.clone()),
            Value::Str(s) => Source::Str(s.chars().collect()),
            Value::Bytes(data) => Source::Bytes(data.clone()),
            Value::Int(n) => Source::Range(*n),
            _ => return None,
        };

        Some(Self {
            source,
            next: 0,
            key: Value::Nil,
            value: Value::Nil,
        })
    }

    /// Move to the next element. Returns false once exhausted.
    pub fn advance(&mut self) -> bool {
        let pos = self.next;
        let element = match &self.source {
            Source::List(items) => items
                .read()
                .get(pos)
                .map(|item| (Value::Int(pos as i64), item.clone())),
            Source::Map(entries) => entries
                .read()
                .get_index(pos)
                .map(|(key, value)| (Value::str(key), value.clone())),
            Source::Str(chars) => chars
                .get(pos)
                .map(|ch| (Value::Int(pos as i64), Value::str(&ch.to_string()))),
            Source::Bytes(data) => data
                .read()
                .get(pos)
                .map(|byte| (Value::Int(pos as i64), Value::Int(*byte as i64))),
            Source::Range(end) => {
                if (pos as i64) < *end {
                    Some((Value::Int(pos as i64), Value::Int(pos as i64)))
                } else {
                    None
                }
            }
        };

        match element {
            Some((key, value)) => {
                self.next += 1;
                self.key = key;
                self.value = value;
                true
            }
            None => {
                self.key = Value::Nil;
                self.value = Value::Nil;
                false
            }
        }
    }

    /// Key of the current element (index for sequences, key for maps)
    pub fn key(&self) -> Value {
        self.key.clone()
    }

    /// Value of the current element
    pub fn value(&self) -> Value {
        self.value.clone()
    }
}
