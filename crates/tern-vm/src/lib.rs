//! Tern Virtual Machine
//!
//! This crate implements a register-based bytecode virtual machine for the
//! tern language, together with the compiler that lowers a `tern-ast` tree
//! into the VM's instruction stream.
//!
//! # Architecture
//!
//! - Fixed-width 64-bit instruction words (`[op:8|A:16|B:16|C:16|T:8]`)
//! - Up to 65535 registers per call frame, all frames of one execution
//!   context sharing a single register arena
//! - Closures capture by value at creation time
//! - Self tail calls reuse the running frame
//! - Cooperative threads, each with its own frame and register stacks
//!
//! # Modules
//!
//! - `opcode`: Instruction set and word layout
//! - `assembler`: One emitter per opcode
//! - `bytecode`: Constant pool and compiled module
//! - `compiler`: Syntax tree to bytecode
//! - `vm`: Dispatch loop, calls and thread switching
//! - `builtins`: Builtin library registry and default libraries
//! - `config`: VM configuration
//! - `error`: Error types for VM and compiler

#![allow(clippy::result_large_err)]

pub mod assembler;
pub mod builtins;
pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod error;
pub mod opcode;
pub mod vm;

// Re-export main types
pub use builtins::create_builtin_registry;
pub use builtins::registry::BuiltinRegistry;
pub use bytecode::{Constant, Module};
pub use compiler::Compiler;
pub use config::VmConfig;
pub use error::{CompileError, CompileErrorKind, RuntimeError, VmError};
pub use opcode::OpCode;
pub use vm::{Resumed, Vm};

#[cfg(test)]
mod tests;
