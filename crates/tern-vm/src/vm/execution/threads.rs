//! Thread instruction execution

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use tern_types::{StackTier, Value};

impl Vm {
    pub(crate) fn execute_threads(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);
        let c = decode_c(instruction);

        match opcode {
            OpCode::Spawn => {
                let func = self.ctx.get(b)?;
                let tier = if c == DEFAULT_TIER {
                    self.config.thread_tier
                } else {
                    u8::try_from(c)
                        .ok()
                        .and_then(StackTier::from_u8)
                        .ok_or(VmError::InvalidOperand {
                            kind: "stack tier",
                            index: c as usize,
                        })?
                };
                let thread = self.spawn(&func, tier)?;
                self.ctx.set(a, thread)?;
                Ok(ExecutionResult::Continue)
            }

            OpCode::Resume => {
                let thread = self.ctx.get(b)?;
                let args = self.ctx.run(b.wrapping_add(1), c)?;
                self.resume_thread(&thread, args, Some(a))?;
                Ok(ExecutionResult::Continue)
            }

            OpCode::Yield => {
                if self.ctx.thread.is_none() {
                    return Err(VmError::YieldOutsideThread);
                }
                let value = self.ctx.get(b)?;
                self.ctx.yield_dest = Some(a);
                Ok(ExecutionResult::Yield(value))
            }

            _ => Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
    }
}
