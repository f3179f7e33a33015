//! Variable and constant instruction execution

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode, Src};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;

impl Vm {
    /// Execute loads, moves and stores
    pub(crate) fn execute_variables(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);

        match opcode {
            OpCode::LoadK => {
                let value = self.constant_value(b)?;
                self.ctx.set(a, value)?;
            }

            OpCode::Move => {
                let value = self.ctx.get(b)?;
                self.ctx.set(a, value)?;
            }

            OpCode::LoadGlobal => {
                let value = self.read(Src::Global, b)?;
                self.ctx.set(a, value)?;
            }

            OpCode::StoreGlobal => {
                let value = self.read(tag_lo(decode_t(instruction)), b)?;
                self.set_global(a, value)?;
            }

            OpCode::LoadFree => {
                let value = self.read(Src::Free, b)?;
                self.ctx.set(a, value)?;
            }

            OpCode::StoreFree => {
                // Writes the closure's own copy; the captured binding is not
                // shared with the enclosing frame
                let value = self.read(tag_lo(decode_t(instruction)), b)?;
                if !self.ctx.frame()?.closure.set_free(a as usize, value) {
                    return Err(VmError::InvalidOperand {
                        kind: "free variable",
                        index: a as usize,
                    });
                }
            }

            _ => return Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
        Ok(ExecutionResult::Continue)
    }
}
