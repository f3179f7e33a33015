//! Virtual Machine implementation
//!
//! A single dispatch loop drives whichever `ExecContext` currently holds the
//! execution cursor. Resuming a thread parks the caller's context on the
//! resumer stack and swaps the thread's context in; a yield or the thread's
//! final return swaps back. Threads only ever change hands at those points.

use crate::builtins::registry::BuiltinRegistry;
use crate::bytecode::{Constant, Module};
use crate::config::VmConfig;
use crate::error::{RuntimeError, VmError};
use crate::opcode::{instruction::*, OpCode, Src};
use std::sync::Arc;
use tern_types::{Closure, StackTier, Thread, ThreadState, Value};

// Module structure
mod execution;
mod frame;
mod result;

// Re-export public types
pub use frame::CallFrame;
pub use result::Resumed;

// Internal imports
use frame::{ExecContext, Resumer};
use result::{ExecutionResult, Exit};

/// Virtual Machine
pub struct Vm {
    config: VmConfig,

    /// Name of the loaded module (for diagnostics)
    module_name: String,

    /// Constant pool of the loaded module
    constants: Arc<[Constant]>,

    /// Global slots, shared by the main program and every thread
    globals: Vec<Value>,

    global_names: Vec<String>,

    /// Context holding the execution cursor
    pub(crate) ctx: ExecContext,

    /// Contexts waiting on the thread they resumed, innermost last
    resumers: Vec<Resumer>,
}

impl Vm {
    /// Create a VM with the default configuration
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            module_name: String::new(),
            constants: Arc::from(Vec::new()),
            globals: Vec::new(),
            global_names: Vec::new(),
            ctx: ExecContext::empty(),
            resumers: Vec::new(),
        }
    }

    /// Run a module's body to completion.
    ///
    /// Each builtin factory in `registry` fills the global slot of the same
    /// name before the first instruction runs. Returns the body's result.
    pub fn execute(&mut self, module: &Module, registry: &BuiltinRegistry) -> Result<Value, RuntimeError> {
        self.load(module, registry);
        tracing::debug!(
            target: "tern::vm",
            module = %self.module_name,
            globals = self.globals.len(),
            constants = self.constants.len(),
            "execute module"
        );

        let main = Arc::new(Closure::new(module.main.clone(), Vec::new()));
        self.ctx = ExecContext::new(self.config.max_frames, self.config.max_registers, None);
        self.resumers.clear();
        if let Err(kind) = self.ctx.push_frame(main, Vec::new(), None) {
            return Err(self.fail(kind));
        }

        let value = match self.run()? {
            Exit::Finished(value) | Exit::Returned(value) | Exit::Yielded(value) => value,
        };
        tracing::debug!(target: "tern::vm", module = %self.module_name, "module finished");
        Ok(value)
    }

    fn load(&mut self, module: &Module, registry: &BuiltinRegistry) {
        self.module_name = module.name.clone();
        self.constants = module.constants.clone();
        self.global_names = module.global_names.clone();
        self.globals = module
            .global_names
            .iter()
            .map(|name| registry.make(name).unwrap_or(Value::Nil))
            .collect();
    }

    // ===== Host API =====

    /// Create a thread running `func` with the given stack tier
    pub fn spawn(&mut self, func: &Value, tier: StackTier) -> Result<Value, VmError> {
        match func {
            Value::Closure(closure) => {
                tracing::debug!(
                    target: "tern::thread",
                    function = %closure.proto.name,
                    ?tier,
                    "spawn"
                );
                Ok(Value::Thread(Thread::new_ref(closure.clone(), tier)))
            }
            other => Err(VmError::NotCallable(other.type_name())),
        }
    }

    /// Run a thread until it yields or returns.
    ///
    /// A ready thread starts with `args` as its arguments; a suspended or
    /// waiting one receives the first argument as the value of its pending
    /// yield.
    pub fn resume(&mut self, thread: &Value, args: &[Value]) -> Result<Resumed, RuntimeError> {
        if let Err(kind) = self.resume_thread(thread, args.to_vec(), None) {
            return Err(self.fail(kind));
        }
        Ok(match self.run()? {
            Exit::Yielded(value) => Resumed::Yielded(value),
            Exit::Returned(value) | Exit::Finished(value) => Resumed::Returned(value),
        })
    }

    /// Lifecycle state of a thread value (no side effects)
    pub fn thread_state(&self, thread: &Value) -> Option<ThreadState> {
        match thread {
            Value::Thread(thread) => Some(thread.read().state()),
            _ => None,
        }
    }

    /// Current value of a global by name
    pub fn global(&self, name: &str) -> Option<Value> {
        let slot = self.global_names.iter().position(|n| n == name)?;
        self.globals.get(slot).cloned()
    }

    // ===== Dispatch =====

    /// Main execution loop
    fn run(&mut self) -> Result<Exit, RuntimeError> {
        loop {
            match self.step() {
                Ok(None) => {}
                Ok(Some(exit)) => return Ok(exit),
                Err(kind) => return Err(self.fail(kind)),
            }
        }
    }

    /// Execute one instruction and apply its effect on frames and contexts
    fn step(&mut self) -> Result<Option<Exit>, VmError> {
        let fetched = {
            let frame = self.ctx.frame_mut()?;
            let word = frame.closure.proto.code.get(frame.ip).copied();
            if word.is_some() {
                frame.ip += 1;
            }
            word
        };
        let Some(instruction) = fetched else {
            // Falling off the end returns nil
            return self.do_return(Value::Nil);
        };

        let opcode_byte = decode_opcode(instruction);
        let opcode = OpCode::from_u8(opcode_byte).ok_or(VmError::InvalidOpcode(opcode_byte))?;

        match self.execute_instruction(opcode, instruction)? {
            ExecutionResult::Continue => Ok(None),
            ExecutionResult::Return(value) => self.do_return(value),
            ExecutionResult::Yield(value) => self.do_yield(value),
            ExecutionResult::Halt => self.complete(Value::Nil),
        }
    }

    /// Execute a single instruction
    fn execute_instruction(
        &mut self,
        opcode: OpCode,
        instruction: u64,
    ) -> Result<ExecutionResult, VmError> {
        match opcode {
            // Variable and constant operations
            OpCode::LoadK
            | OpCode::Move
            | OpCode::LoadGlobal
            | OpCode::StoreGlobal
            | OpCode::LoadFree
            | OpCode::StoreFree => self.execute_variables(opcode, instruction),

            // Operators
            OpCode::BinRR
            | OpCode::BinRK
            | OpCode::BinKR
            | OpCode::BinGG
            | OpCode::Eq
            | OpCode::Prefix => self.execute_arithmetic(opcode, instruction),

            // Control flow
            OpCode::Check | OpCode::Jump | OpCode::Return | OpCode::End => {
                self.execute_control(opcode, instruction)
            }

            // Collections
            OpCode::GetIndex
            | OpCode::SetIndex
            | OpCode::Slice
            | OpCode::List
            | OpCode::Object => self.execute_collections(opcode, instruction),

            // Loops
            OpCode::For | OpCode::Iter | OpCode::IFor => self.execute_iterators(opcode, instruction),

            // Functions and closures
            OpCode::Fun | OpCode::LoadSelf | OpCode::Call => {
                self.execute_functions(opcode, instruction)
            }

            // Threads
            OpCode::Spawn | OpCode::Resume | OpCode::Yield => {
                self.execute_threads(opcode, instruction)
            }
        }
    }

    // ===== Helper methods =====

    /// Read an operand by provenance
    pub(crate) fn read(&self, src: Src, index: u16) -> Result<Value, VmError> {
        match src {
            Src::Local => self.ctx.get(index),
            Src::Const => self.constant_value(index),
            Src::Global => self
                .globals
                .get(index as usize)
                .cloned()
                .ok_or(VmError::InvalidOperand {
                    kind: "global",
                    index: index as usize,
                }),
            Src::Free => self.ctx.frame()?.closure.get_free(index as usize).ok_or(
                VmError::InvalidOperand {
                    kind: "free variable",
                    index: index as usize,
                },
            ),
        }
    }

    pub(crate) fn constant(&self, index: u16) -> Result<&Constant, VmError> {
        self.constants
            .get(index as usize)
            .ok_or(VmError::InvalidConstant(index as usize))
    }

    pub(crate) fn constant_value(&self, index: u16) -> Result<Value, VmError> {
        self.constant(index)?
            .to_value()
            .ok_or(VmError::InvalidConstant(index as usize))
    }

    pub(crate) fn set_global(&mut self, slot: u16, value: Value) -> Result<(), VmError> {
        let entry = self
            .globals
            .get_mut(slot as usize)
            .ok_or(VmError::InvalidOperand {
                kind: "global",
                index: slot as usize,
            })?;
        *entry = value;
        Ok(())
    }

    /// Perform return from function
    fn do_return(&mut self, value: Value) -> Result<Option<Exit>, VmError> {
        let frame = self.ctx.pop_frame().ok_or(VmError::StackUnderflow)?;
        if self.ctx.frames.is_empty() {
            return self.complete(value);
        }
        if let Some(dest) = frame.ret_dest {
            self.ctx.set(dest, value)?;
        }
        Ok(None)
    }

    /// The current context ran to completion with `value`
    fn complete(&mut self, value: Value) -> Result<Option<Exit>, VmError> {
        self.ctx.clear();
        match self.ctx.thread.take() {
            None => Ok(Some(Exit::Finished(value))),
            Some(thread) => {
                let prev = thread.write().transition(ThreadState::Closed)?;
                tracing::debug!(target: "tern::thread", from = ?prev, to = ?ThreadState::Closed, "thread returned");
                self.hand_back(value, Exit::Returned)
            }
        }
    }

    /// Suspend the running thread, handing `value` to its resumer
    fn do_yield(&mut self, value: Value) -> Result<Option<Exit>, VmError> {
        let prev = match &self.ctx.thread {
            Some(thread) => thread.write().transition(ThreadState::Suspended)?,
            None => return Err(VmError::YieldOutsideThread),
        };
        tracing::debug!(target: "tern::thread", from = ?prev, to = ?ThreadState::Suspended, "thread yielded");

        let resumer = self.resumers.pop().ok_or(VmError::StackUnderflow)?;
        let mut suspended = std::mem::replace(&mut self.ctx, resumer.ctx);
        // The saved context must not own its thread; resume reattaches it
        let thread = suspended.thread.take().ok_or(VmError::YieldOutsideThread)?;
        thread.write().save_context(Box::new(suspended));
        self.deliver(resumer.dest, value, Exit::Yielded)
    }

    /// Return control to the context that resumed the current one
    fn hand_back(&mut self, value: Value, exit: fn(Value) -> Exit) -> Result<Option<Exit>, VmError> {
        let resumer = self.resumers.pop().ok_or(VmError::StackUnderflow)?;
        self.ctx = resumer.ctx;
        self.deliver(resumer.dest, value, exit)
    }

    fn deliver(
        &mut self,
        dest: Option<u16>,
        value: Value,
        exit: fn(Value) -> Exit,
    ) -> Result<Option<Exit>, VmError> {
        match dest {
            Some(dest) => {
                self.ctx.set(dest, value)?;
                Ok(None)
            }
            None => Ok(Some(exit(value))),
        }
    }

    /// Give the execution cursor to `thread`.
    ///
    /// Fails without switching when the thread is not resumable or cannot
    /// start; the error then belongs to the caller's instruction.
    pub(crate) fn resume_thread(
        &mut self,
        thread: &Value,
        args: Vec<Value>,
        dest: Option<u16>,
    ) -> Result<(), VmError> {
        let Value::Thread(handle) = thread else {
            return Err(VmError::TypeError {
                operation: "resume",
                expected: "thread",
                got: thread.type_name(),
            });
        };

        let (prev, entry, tier, saved) = {
            let mut record = handle.write();
            let prev = record.transition(ThreadState::Running)?;
            (prev, record.entry().clone(), record.tier(), record.take_context())
        };
        tracing::debug!(target: "tern::thread", from = ?prev, to = ?ThreadState::Running, "thread resumed");

        let started = match prev {
            ThreadState::Ready => {
                let mut ctx = ExecContext::new(tier.frames(), tier.registers(), Some(handle.clone()));
                execution::bind_args(&entry.proto, args)
                    .and_then(|args| ctx.push_frame(entry, args, None))
                    .map(|_| ctx)
            }
            _ => saved
                .and_then(|saved| saved.downcast::<ExecContext>().ok())
                .ok_or(VmError::thread_state(prev, ThreadState::Running))
                .and_then(|saved| {
                    let mut ctx = *saved;
                    ctx.thread = Some(handle.clone());
                    if let Some(reg) = ctx.yield_dest.take() {
                        ctx.set(reg, args.into_iter().next().unwrap_or(Value::Nil))?;
                    }
                    Ok(ctx)
                }),
        };

        let ctx = match started {
            Ok(ctx) => ctx,
            Err(err) => {
                if let Err(rejected) = handle.write().transition(ThreadState::Closed) {
                    tracing::warn!(target: "tern::thread", error = %rejected, "could not close thread after failed resume");
                }
                return Err(err);
            }
        };

        let caller = std::mem::replace(&mut self.ctx, ctx);
        self.resumers.push(Resumer { ctx: caller, dest });
        Ok(())
    }

    /// Build the terminal diagnostic for `kind` and unwind every context.
    ///
    /// The failing context and any threads waiting on it are closed; the
    /// bottom context is left empty.
    fn fail(&mut self, kind: VmError) -> RuntimeError {
        let (line, pc) = match self.ctx.frame() {
            Ok(frame) => {
                let pc = frame.ip.saturating_sub(1);
                (frame.closure.proto.line_at(pc), pc)
            }
            Err(_) => (0, 0),
        };
        tracing::debug!(
            target: "tern::vm",
            module = %self.module_name,
            line,
            pc,
            error = %kind,
            "execution failed"
        );

        let mut ctx = std::mem::replace(&mut self.ctx, ExecContext::empty());
        loop {
            if let Some(thread) = ctx.thread.take() {
                if thread.write().transition(ThreadState::Closed).is_ok() {
                    tracing::debug!(target: "tern::thread", to = ?ThreadState::Closed, "thread failed");
                }
            }
            match self.resumers.pop() {
                Some(resumer) => ctx = resumer.ctx,
                None => break,
            }
        }
        ctx.clear();
        self.ctx = ctx;

        RuntimeError {
            module: self.module_name.clone(),
            line,
            pc,
            kind,
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
