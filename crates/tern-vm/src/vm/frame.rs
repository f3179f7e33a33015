//! Call frames and execution contexts
//!
//! An `ExecContext` is one independently stacked line of execution: the main
//! program or a thread. All of its frames share a single register arena;
//! each frame owns the window `[base, base + size)` and register operands
//! are offsets into it. A callee's window starts where its caller's ends.

use crate::error::VmError;
use std::sync::Arc;
use tern_types::{Closure, ThreadRef, Value};

/// Call frame (function activation record)
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Function being executed
    pub closure: Arc<Closure>,

    /// Instruction pointer (next instruction to fetch)
    pub ip: usize,

    /// First arena slot of this frame's window
    pub base: usize,

    /// Window length
    pub size: usize,

    /// Caller register receiving the return value; None for the entry frame
    pub ret_dest: Option<u16>,
}

#[derive(Debug)]
pub(crate) struct ExecContext {
    pub(crate) frames: Vec<CallFrame>,
    registers: Vec<Value>,
    frame_cap: usize,
    reg_cap: usize,

    /// Thread this context belongs to; None for the main program
    pub(crate) thread: Option<ThreadRef>,

    /// Register of the pending `Yield` that receives the next resume value
    pub(crate) yield_dest: Option<u16>,
}

/// A context parked while the thread it resumed runs
#[derive(Debug)]
pub(crate) struct Resumer {
    pub(crate) ctx: ExecContext,

    /// Register receiving the thread's yield or return value; None when the
    /// host called `resume` directly
    pub(crate) dest: Option<u16>,
}

impl ExecContext {
    pub(crate) fn new(frame_cap: usize, reg_cap: usize, thread: Option<ThreadRef>) -> Self {
        Self {
            frames: Vec::with_capacity(frame_cap.min(64)),
            registers: Vec::new(),
            frame_cap,
            reg_cap,
            thread,
            yield_dest: None,
        }
    }

    /// Placeholder left behind while contexts are being moved around
    pub(crate) fn empty() -> Self {
        Self::new(0, 0, None)
    }

    pub(crate) fn frame(&self) -> Result<&CallFrame, VmError> {
        self.frames.last().ok_or(VmError::StackUnderflow)
    }

    pub(crate) fn frame_mut(&mut self) -> Result<&mut CallFrame, VmError> {
        self.frames.last_mut().ok_or(VmError::StackUnderflow)
    }

    /// Arena slot of register `reg` in the current window
    #[inline]
    fn slot(&self, reg: u16) -> Result<usize, VmError> {
        let frame = self.frame()?;
        if (reg as usize) < frame.size {
            Ok(frame.base + reg as usize)
        } else {
            Err(VmError::InvalidOperand {
                kind: "register",
                index: reg as usize,
            })
        }
    }

    #[inline]
    pub(crate) fn get(&self, reg: u16) -> Result<Value, VmError> {
        let slot = self.slot(reg)?;
        Ok(self.registers[slot].clone())
    }

    #[inline]
    pub(crate) fn set(&mut self, reg: u16, value: Value) -> Result<(), VmError> {
        let slot = self.slot(reg)?;
        self.registers[slot] = value;
        Ok(())
    }

    /// Copy of `count` registers starting at `first`
    pub(crate) fn run(&self, first: u16, count: u16) -> Result<Vec<Value>, VmError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let start = self.slot(first)?;
        let last = first as usize + count as usize - 1;
        if last > u16::MAX as usize {
            return Err(VmError::InvalidOperand {
                kind: "register",
                index: last,
            });
        }
        let end = self.slot(last as u16)? + 1;
        Ok(self.registers[start..end].to_vec())
    }

    #[inline]
    pub(crate) fn jump(&mut self, target: u16) -> Result<(), VmError> {
        self.frame_mut()?.ip = target as usize;
        Ok(())
    }

    /// Push a frame for `closure` with already-bound arguments.
    ///
    /// The new window is cleared to nil before the arguments are copied in,
    /// so stale values from earlier calls are never visible.
    pub(crate) fn push_frame(
        &mut self,
        closure: Arc<Closure>,
        args: Vec<Value>,
        ret_dest: Option<u16>,
    ) -> Result<(), VmError> {
        if self.frames.len() >= self.frame_cap {
            return Err(VmError::StackOverflow);
        }

        let base = self.frames.last().map_or(0, |f| f.base + f.size);
        let size = (closure.proto.register_count as usize).max(args.len());
        let end = base + size;
        if end > self.reg_cap {
            return Err(VmError::StackOverflow);
        }

        self.registers.truncate(base);
        self.registers.extend(args);
        self.registers.resize(end, Value::Nil);

        tracing::trace!(
            target: "tern::vm",
            function = %closure.proto.name,
            depth = self.frames.len() + 1,
            base,
            size,
            "push frame"
        );

        self.frames.push(CallFrame {
            closure,
            ip: 0,
            base,
            size,
            ret_dest,
        });
        Ok(())
    }

    /// Restart the current frame with new arguments (self tail call)
    pub(crate) fn reuse_frame(&mut self, args: Vec<Value>) -> Result<(), VmError> {
        let frame = self.frames.last_mut().ok_or(VmError::StackUnderflow)?;
        frame.ip = 0;
        let (base, size) = (frame.base, frame.size.max(args.len()));
        frame.size = size;
        if base + size > self.reg_cap {
            return Err(VmError::StackOverflow);
        }

        self.registers.truncate(base);
        self.registers.extend(args);
        self.registers.resize(base + size, Value::Nil);
        Ok(())
    }

    /// Pop the current frame, releasing its window
    pub(crate) fn pop_frame(&mut self) -> Option<CallFrame> {
        let frame = self.frames.pop()?;
        self.registers.truncate(frame.base);
        Some(frame)
    }

    /// Drop every frame and register
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.registers.clear();
        self.yield_dest = None;
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}
