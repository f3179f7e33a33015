//! Function and closure instruction execution

use crate::bytecode::Constant;
use crate::error::VmError;
use crate::opcode::{instruction::*, OpCode};
use crate::vm::result::ExecutionResult;
use crate::vm::Vm;
use std::sync::Arc;
use tern_types::{Closure, Prototype, Value};

impl Vm {
    pub(crate) fn execute_functions(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        let a = decode_a(instruction);
        let b = decode_b(instruction);

        match opcode {
            OpCode::Fun => {
                let closure = self.instantiate(b)?;
                self.ctx.set(a, Value::Closure(closure))?;
            }

            OpCode::LoadSelf => {
                let current = self.ctx.frame()?.closure.clone();
                self.ctx.set(a, Value::Closure(current))?;
            }

            OpCode::Call => {
                let argc = decode_c(instruction);
                let spread = decode_t(instruction) & SPREAD_FLAG != 0;
                self.call(a, b, argc, spread)?;
            }

            _ => return Err(VmError::InvalidOpcode(opcode.as_u8())),
        }
        Ok(ExecutionResult::Continue)
    }

    /// Create a closure from function constant `k`, copying each captured
    /// value out of the current frame or the current closure
    fn instantiate(&self, k: u16) -> Result<Arc<Closure>, VmError> {
        let Constant::Function(proto) = self.constant(k)? else {
            return Err(VmError::InvalidConstant(k as usize));
        };

        let frame = self.ctx.frame()?;
        let free = proto
            .free_vars
            .iter()
            .map(|desc| {
                if desc.is_local {
                    self.ctx.get(desc.index)
                } else {
                    frame
                        .closure
                        .get_free(desc.index as usize)
                        .ok_or(VmError::InvalidOperand {
                            kind: "free variable",
                            index: desc.index as usize,
                        })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Arc::new(Closure::new(proto.clone(), free)))
    }

    /// R[dst] = R[base](R[base+1] .. R[base+argc])
    fn call(&mut self, dst: u16, base: u16, argc: u16, spread: bool) -> Result<(), VmError> {
        let callee = self.ctx.get(base)?;
        let mut args = self.ctx.run(base.wrapping_add(1), argc)?;

        if spread {
            let last = args.pop().unwrap_or(Value::Nil);
            match last.list_items() {
                Some(items) => args.extend(items),
                None => return Err(VmError::SpreadSource(last.type_name())),
            }
        }

        match callee {
            Value::Native(native) => {
                let value = native
                    .call(&args)
                    .map_err(|err| VmError::Native(format!("{:#}", err)))?;
                self.ctx.set(dst, value)
            }

            Value::Closure(closure) => {
                let args = bind_args(&closure.proto, args)?;
                if self.is_tail_call(&closure, dst)? {
                    tracing::trace!(
                        target: "tern::vm",
                        function = %closure.proto.name,
                        depth = self.ctx.depth(),
                        "tail call reuses frame"
                    );
                    return self.ctx.reuse_frame(args);
                }
                self.ctx.push_frame(closure, args, Some(dst))
            }

            other => Err(VmError::NotCallable(other.type_name())),
        }
    }

    /// A call is a tail call when the callee is the running closure and the
    /// next instruction returns the call's result
    fn is_tail_call(&self, callee: &Arc<Closure>, dst: u16) -> Result<bool, VmError> {
        let frame = self.ctx.frame()?;
        if !Arc::ptr_eq(&frame.closure, callee) {
            return Ok(false);
        }
        Ok(match frame.closure.proto.code.get(frame.ip) {
            Some(&next) => {
                decode_opcode(next) == OpCode::Return.as_u8()
                    && decode_a(next) == dst
                    && decode_t(next) != RETURN_NIL
            }
            None => false,
        })
    }
}

/// Check `args` against the function's arity, collecting extra arguments of
/// a variadic function into a trailing list
pub(crate) fn bind_args(proto: &Prototype, mut args: Vec<Value>) -> Result<Vec<Value>, VmError> {
    let arity = proto.arity as usize;
    let arity_error = |got| VmError::Arity {
        expected: proto.arity,
        variadic: proto.variadic,
        got,
    };

    if proto.variadic {
        if args.len() < arity {
            return Err(arity_error(args.len()));
        }
        let rest = args.split_off(arity);
        args.push(Value::list(rest));
    } else if args.len() != arity {
        return Err(arity_error(args.len()));
    }
    Ok(args)
}
