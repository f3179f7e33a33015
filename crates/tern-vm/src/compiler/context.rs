//! Compilation context types

use super::registers::RegisterAllocator;
use crate::assembler::CodeBuffer;
use tern_types::{FreeVarDesc, Prototype};

/// Loop context for break/continue
#[derive(Debug, Default)]
pub(crate) struct LoopContext {
    /// Break jumps, patched to the loop exit
    pub(crate) breaks: Vec<usize>,

    /// Continue jumps, patched to the loop's step or condition
    pub(crate) continues: Vec<usize>,
}

/// State of one function being compiled
#[derive(Debug)]
pub(crate) struct FunctionState {
    pub(crate) name: String,
    pub(crate) code: CodeBuffer,
    pub(crate) registers: RegisterAllocator,
    pub(crate) loops: Vec<LoopContext>,
}

impl FunctionState {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: CodeBuffer::new(),
            registers: RegisterAllocator::new(),
            loops: Vec::new(),
        }
    }

    /// Seal the function into its template
    pub(crate) fn into_prototype(
        self,
        arity: u16,
        variadic: bool,
        free_vars: Vec<FreeVarDesc>,
    ) -> Prototype {
        let register_count = self.registers.max_used() as u32;
        let (code, lines) = self.code.finish();
        Prototype {
            name: self.name,
            arity,
            variadic,
            register_count,
            free_vars,
            code,
            lines,
        }
    }
}
