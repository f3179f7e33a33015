//! Register allocation

use crate::error::CompileErrorKind;
use crate::opcode::Src;

/// Highest usable register index
const MAX_REGISTER: usize = u16::MAX as usize - 1;

/// Where a compiled sub-expression can be read from without a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Operand {
    pub(crate) src: Src,
    pub(crate) index: u16,
}

impl Operand {
    pub(crate) fn local(index: u16) -> Self {
        Self {
            src: Src::Local,
            index,
        }
    }

    pub(crate) fn constant(index: u16) -> Self {
        Self {
            src: Src::Const,
            index,
        }
    }

    pub(crate) fn global(index: u16) -> Self {
        Self {
            src: Src::Global,
            index,
        }
    }

    pub(crate) fn free(index: u16) -> Self {
        Self {
            src: Src::Free,
            index,
        }
    }

    pub(crate) fn is_local(&self) -> bool {
        self.src == Src::Local
    }

    pub(crate) fn pair(&self) -> (Src, u16) {
        (self.src, self.index)
    }
}

/// Stack-discipline allocator for one function.
///
/// Registers are handed out from the top and released by rewinding to a
/// mark, which keeps argument runs contiguous and locals below temporaries.
#[derive(Debug, Default)]
pub(crate) struct RegisterAllocator {
    /// Next available register
    next_free: usize,

    /// Maximum registers used
    max_used: usize,
}

impl RegisterAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocate a new register
    pub(crate) fn allocate(&mut self) -> Result<u16, CompileErrorKind> {
        self.allocate_many(1)
    }

    /// Allocate `count` consecutive registers, returning the first
    pub(crate) fn allocate_many(&mut self, count: usize) -> Result<u16, CompileErrorKind> {
        let first = self.next_free;
        let end = first + count;
        if end > MAX_REGISTER + 1 {
            return Err(CompileErrorKind::TooManyRegisters);
        }
        self.next_free = end;
        self.max_used = self.max_used.max(end);
        Ok(first as u16)
    }

    /// Current top; pass it back to `free_to` to release everything above
    pub(crate) fn top(&self) -> u16 {
        self.next_free as u16
    }

    /// Release every register at or above `mark`
    pub(crate) fn free_to(&mut self, mark: u16) {
        self.next_free = self.next_free.min(mark as usize);
    }

    /// Window size the function needs
    pub(crate) fn max_used(&self) -> usize {
        self.max_used
    }
}
