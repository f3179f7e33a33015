//! Loop instruction execution: numeric ranges and the iterator protocol

use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use tern_types::sync::shared;
use tern_types::{Value, ValueIter};

impl Vm {
    pub(crate) fn execute_iterators(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);

        match opcode {
            OpCode::For => self.for_step(a, b)?,

            OpCode::Iter => {
                let source = self.ctx.get(b)?;
                let iter = match source {
                    // Already an iterator: keep consuming it
                    Value::Iterator(_) => source,
                    other => ValueIter::new(&other)
                        .map(|iter| Value::Iterator(shared(iter)))
                        .ok_or(VmError::NotIterable(other.type_name()))?,
                };
                self.ctx.set(a, iter)?;
            }

            OpCode::IFor => {
                let iter = match self.ctx.get(a)? {
                    Value::Iterator(iter) => iter,
                    other => {
                        return Err(VmError::TypeError {
                            operation: "for-in",
                            expected: "iterator",
                            got: other.type_name(),
                        })
                    }
                };
                let element = {
                    let mut iter = iter.write();
                    iter.advance().then(|| (iter.key(), iter.value()))
                };
                if let Some((key, value)) = element {
                    self.ctx.set(a.wrapping_add(1), key)?;
                    self.ctx.set(a.wrapping_add(2), value)?;
                    self.ctx.jump(b)?;
                }
            }

            _ => return Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
        Ok(ExecutionResult::Continue)
    }

    /// One step of a numeric loop over R[a] = current, R[a+1] = limit,
    /// R[a+2] = step. While in range, exposes the current value in R[a+3],
    /// advances R[a] and jumps to `body`.
    fn for_step(&mut self, a: u16, body: u16) -> Result<(), VmError> {
        let mut bounds = [0i64; 3];
        for (offset, slot) in bounds.iter_mut().enumerate() {
            match self.ctx.get(a.wrapping_add(offset as u16))? {
                Value::Int(n) => *slot = n,
                other => {
                    return Err(VmError::TypeError {
                        operation: "for",
                        expected: "int",
                        got: other.type_name(),
                    })
                }
            }
        }
        let [current, limit, step] = bounds;

        if step == 0 {
            return Err(VmError::ZeroStep);
        }

        let in_range = if step > 0 {
            current < limit
        } else {
            current > limit
        };
        if in_range {
            // On overflow the next test sees the limit and stops
            let next = current.checked_add(step).unwrap_or(limit);
            self.ctx.set(a.wrapping_add(3), Value::Int(current))?;
            self.ctx.set(a, Value::Int(next))?;
            self.ctx.jump(body)?;
        }
        Ok(())
    }
}
