//! Operator instruction execution

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode, Src};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use tern_ast::{BinaryOp, PrefixOp};

impl Vm {
    /// Execute binary, equality and prefix operators
    pub(crate) fn execute_arithmetic(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);
        let c = decode_c(instruction);
        let t = decode_t(instruction);

        let result = match opcode {
            OpCode::BinRR | OpCode::BinRK | OpCode::BinKR | OpCode::BinGG => {
                let (lhs_src, rhs_src) = match opcode {
                    OpCode::BinRR => (Src::Local, Src::Local),
                    OpCode::BinRK => (Src::Local, Src::Const),
                    OpCode::BinKR => (Src::Const, Src::Local),
                    _ => (Src::Global, Src::Global),
                };
                let op = BinaryOp::from_u8(t).ok_or(VmError::InvalidOperand {
                    kind: "operator",
                    index: t as usize,
                })?;
                let lhs = self.read(lhs_src, b)?;
                let rhs = self.read(rhs_src, c)?;
                lhs.binary_op(op, &rhs)?
            }

            OpCode::Eq => {
                let lhs = self.read(tag_hi(t), b)?;
                let rhs = self.read(tag_lo(t), c)?;
                let equal = lhs.binary_op(BinaryOp::Eq, &rhs)?.is_truthy();
                (equal != (t & NEQ_FLAG != 0)).into()
            }

            OpCode::Prefix => {
                let op = PrefixOp::from_u8(t).ok_or(VmError::InvalidOperand {
                    kind: "operator",
                    index: t as usize,
                })?;
                self.ctx.get(b)?.prefix_op(op)?
            }

            _ => return Err(VmError::InvalidOpcode(opcode.as_u8())),
        };

        self.ctx.set(a, result)?;
        Ok(ExecutionResult::Continue)
    }
}
