//! Control flow instruction execution

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use tern_types::Value;

impl Vm {
    /// Execute jumps, returns and end
    pub(crate) fn execute_control(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);

        match opcode {
            OpCode::Check => {
                let when = decode_t(instruction) != 0;
                if self.ctx.get(a)?.is_truthy() == when {
                    self.ctx.jump(decode_b(instruction))?;
                }
                Ok(ExecutionResult::Continue)
            }

            OpCode::Jump => {
                self.ctx.jump(a)?;
                Ok(ExecutionResult::Continue)
            }

            OpCode::Return => {
                if decode_t(instruction) == RETURN_NIL {
                    return Ok(ExecutionResult::Return(Value::Nil));
                }
                Ok(ExecutionResult::Return(self.ctx.get(a)?))
            }

            OpCode::End => Ok(ExecutionResult::Halt),

            _ => Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
    }
}
