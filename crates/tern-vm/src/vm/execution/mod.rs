//! Instruction execution handlers

mod arithmetic;
mod collections;
mod control;
mod functions;
mod iterators;
mod threads;
mod variables;

pub(crate) use functions::bind_args;
