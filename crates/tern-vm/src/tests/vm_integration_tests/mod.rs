//! VM integration tests, split by topic.
//!
//! Programs are built with the `tern_ast::build` constructors, compiled
//! against the default builtin registry and run on a fresh VM.

pub(super) mod helpers;

mod basic_operations;
mod closures;
mod collections;
mod control_flow;
mod errors;
mod functions;
mod iterators;
