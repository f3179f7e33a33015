//! Instruction encoder
//!
//! One emit method per opcode. Nothing here validates operands; the compiler
//! is trusted to pass registers inside the function's window and indices
//! that exist. Each word is appended together with the source line of the
//! statement being compiled.

use crate::error::CompileErrorKind;
use crate::opcode::{instruction::*, OpCode, Src};
use tern_ast::{BinaryOp, PrefixOp};

/// Code and line map of the function being written
#[derive(Debug, Default)]
pub struct CodeBuffer {
    code: Vec<u64>,
    lines: Vec<u32>,
    line: u32,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line recorded for subsequent instructions
    pub fn set_line(&mut self, line: u32) {
        self.line = line;
    }

    /// Append a raw word and return its position
    pub fn emit(&mut self, word: u64) -> usize {
        self.code.push(word);
        self.lines.push(self.line);
        self.code.len() - 1
    }

    fn op(&mut self, op: OpCode, a: u16, b: u16, c: u16, t: u8) -> usize {
        self.emit(encode(op.as_u8(), a, b, c, t))
    }

    /// Position the next instruction will occupy, as a jump target
    pub fn label(&self) -> Result<u16, CompileErrorKind> {
        u16::try_from(self.code.len()).map_err(|_| CompileErrorKind::CodeTooLarge)
    }

    /// Point the jump at `pos` to `target`
    pub fn patch(&mut self, pos: usize, target: u16) {
        if let Some(word) = self.code.get_mut(pos) {
            let field = OpCode::from_u8(decode_opcode(*word)).and_then(OpCode::jump_field);
            if let Some(field) = field {
                *word = with_field(*word, field, target);
            }
        }
    }

    /// Point the jump at `pos` to the next instruction
    pub fn patch_here(&mut self, pos: usize) -> Result<(), CompileErrorKind> {
        let target = self.label()?;
        self.patch(pos, target);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn finish(self) -> (Vec<u64>, Vec<u32>) {
        (self.code, self.lines)
    }

    // ===== Loads & Stores =====

    pub fn load_k(&mut self, dst: u16, k: u16) -> usize {
        self.op(OpCode::LoadK, dst, k, 0, 0)
    }

    pub fn mov(&mut self, dst: u16, src: u16) -> usize {
        self.op(OpCode::Move, dst, src, 0, 0)
    }

    pub fn load_global(&mut self, dst: u16, slot: u16) -> usize {
        self.op(OpCode::LoadGlobal, dst, slot, 0, 0)
    }

    pub fn store_global(&mut self, slot: u16, src: Src, idx: u16) -> usize {
        self.op(OpCode::StoreGlobal, slot, idx, 0, src.as_u8())
    }

    pub fn load_free(&mut self, dst: u16, slot: u16) -> usize {
        self.op(OpCode::LoadFree, dst, slot, 0, 0)
    }

    pub fn store_free(&mut self, slot: u16, src: Src, idx: u16) -> usize {
        self.op(OpCode::StoreFree, slot, idx, 0, src.as_u8())
    }

    // ===== Jumps =====

    /// Jump to `target` when the truth of `reg` equals `when`
    pub fn check(&mut self, reg: u16, target: u16, when: bool) -> usize {
        self.op(OpCode::Check, reg, target, 0, when as u8)
    }

    pub fn jump(&mut self, target: u16) -> usize {
        self.op(OpCode::Jump, target, 0, 0, 0)
    }

    // ===== Operators =====

    /// `variant` is one of the four `Bin*` opcodes
    pub fn binary(&mut self, variant: OpCode, dst: u16, lhs: u16, rhs: u16, op: BinaryOp) -> usize {
        self.op(variant, dst, lhs, rhs, op.as_u8())
    }

    pub fn eq(&mut self, dst: u16, lhs: (Src, u16), rhs: (Src, u16), negate: bool) -> usize {
        let mut tag = pack_tag(lhs.0, rhs.0);
        if negate {
            tag |= NEQ_FLAG;
        }
        self.op(OpCode::Eq, dst, lhs.1, rhs.1, tag)
    }

    pub fn prefix(&mut self, dst: u16, src: u16, op: PrefixOp) -> usize {
        self.op(OpCode::Prefix, dst, src, 0, op.as_u8())
    }

    // ===== Collections =====

    pub fn get_index(&mut self, dst: u16, target: u16, key: (Src, u16)) -> usize {
        self.op(OpCode::GetIndex, dst, target, key.1, key.0.as_u8())
    }

    pub fn set_index(&mut self, target: u16, key: (Src, u16), value: (Src, u16)) -> usize {
        self.op(OpCode::SetIndex, target, key.1, value.1, pack_tag(key.0, value.0))
    }

    /// `bounds` and `bounds + 1` hold the lower and upper bound
    pub fn slice(&mut self, dst: u16, target: u16, bounds: u16, lower: bool, upper: bool) -> usize {
        let mut mode = 0;
        if lower {
            mode |= SLICE_LOWER;
        }
        if upper {
            mode |= SLICE_UPPER;
        }
        self.op(OpCode::Slice, dst, target, bounds, mode)
    }

    pub fn list(&mut self, dst: u16, base: u16, count: u16) -> usize {
        self.op(OpCode::List, dst, base, count, 0)
    }

    pub fn object(&mut self, dst: u16) -> usize {
        self.op(OpCode::Object, dst, 0, 0, 0)
    }

    // ===== Loops =====

    pub fn for_loop(&mut self, base: u16, body: u16) -> usize {
        self.op(OpCode::For, base, body, 0, 0)
    }

    pub fn iter(&mut self, dst: u16, src: u16) -> usize {
        self.op(OpCode::Iter, dst, src, 0, 0)
    }

    pub fn ifor(&mut self, base: u16, body: u16) -> usize {
        self.op(OpCode::IFor, base, body, 0, 0)
    }

    // ===== Functions =====

    pub fn fun(&mut self, dst: u16, k: u16) -> usize {
        self.op(OpCode::Fun, dst, k, 0, 0)
    }

    pub fn load_self(&mut self, dst: u16) -> usize {
        self.op(OpCode::LoadSelf, dst, 0, 0, 0)
    }

    pub fn call(&mut self, dst: u16, base: u16, argc: u16, spread: bool) -> usize {
        let tag = if spread { SPREAD_FLAG } else { 0 };
        self.op(OpCode::Call, dst, base, argc, tag)
    }

    pub fn ret(&mut self, src: u16) -> usize {
        self.op(OpCode::Return, src, 0, 0, 0)
    }

    pub fn ret_nil(&mut self) -> usize {
        self.op(OpCode::Return, 0, 0, 0, RETURN_NIL)
    }

    // ===== Threads =====

    pub fn spawn(&mut self, dst: u16, func: u16, tier: Option<u8>) -> usize {
        let tier = tier.map(u16::from).unwrap_or(DEFAULT_TIER);
        self.op(OpCode::Spawn, dst, func, tier, 0)
    }

    pub fn resume(&mut self, dst: u16, base: u16, argc: u16) -> usize {
        self.op(OpCode::Resume, dst, base, argc, 0)
    }

    pub fn yield_value(&mut self, dst: u16, src: u16) -> usize {
        self.op(OpCode::Yield, dst, src, 0, 0)
    }

    pub fn end(&mut self) -> usize {
        self.op(OpCode::End, 0, 0, 0, 0)
    }
}
