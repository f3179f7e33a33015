//! Indexing, slicing and collection construction

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use tern_types::Value;

impl Vm {
    pub(crate) fn execute_collections(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);
        let c = decode_c(instruction);
        let t = decode_t(instruction);

        match opcode {
            OpCode::GetIndex => {
                let target = self.ctx.get(b)?;
                let key = self.read(tag_lo(t), c)?;
                let value = target.get_index(&key)?;
                self.ctx.set(a, value)?;
            }

            OpCode::SetIndex => {
                let target = self.ctx.get(a)?;
                let key = self.read(tag_hi(t), b)?;
                let value = self.read(tag_lo(t), c)?;
                target.set_index(&key, value)?;
            }

            OpCode::Slice => {
                let target = self.ctx.get(b)?;
                let lower = if t & SLICE_LOWER != 0 {
                    Some(self.ctx.get(c)?)
                } else {
                    None
                };
                let upper = if t & SLICE_UPPER != 0 {
                    Some(self.ctx.get(c.wrapping_add(1))?)
                } else {
                    None
                };
                let value = target.slice(lower.as_ref(), upper.as_ref())?;
                self.ctx.set(a, value)?;
            }

            OpCode::List => {
                let items = self.ctx.run(b, c)?;
                self.ctx.set(a, Value::list(items))?;
            }

            OpCode::Object => {
                self.ctx.set(a, Value::empty_map())?;
            }

            _ => return Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
        Ok(ExecutionResult::Continue)
    }
}
