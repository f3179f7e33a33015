//! Bytecode compiler (syntax tree to bytecode)
//!
//! One pass over the tree. Every function body, the module body included,
//! gets its own code buffer and register allocator; nested functions become
//! `Constant::Function` entries in the shared pool and are instantiated at
//! runtime by `Fun`.

use crate::builtins::registry::BuiltinRegistry;
use crate::bytecode::{Constant, ConstantPool, Module};
use crate::error::{CompileError, CompileErrorKind};
use crate::opcode::Src;
use std::sync::Arc;
use tern_ast::{Stmt, StmtKind};

// Module structure
mod context;
mod expressions;
mod functions;
pub(crate) mod registers;
mod statements;
pub(crate) mod symbols;

// Internal imports
use context::FunctionState;
use registers::Operand;
use symbols::Resolver;

/// Name of the module body's prototype
const MAIN_NAME: &str = "<main>";

/// Bytecode compiler
pub struct Compiler {
    module: String,

    /// Constant pool shared by every function of the module
    pub(crate) pool: ConstantPool,

    pub(crate) resolver: Resolver,

    /// Function currently being compiled; enclosing ones live on the Rust
    /// stack while a nested body is compiled
    pub(crate) current: FunctionState,

    /// Line of the statement being compiled
    pub(crate) line: u32,
}

impl Compiler {
    /// Create a compiler whose leading global slots are `builtins`, in order.
    ///
    /// Fails with `TooManyGlobals` when the names do not fit the slot range.
    pub fn new<I, S>(module: &str, builtins: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiler = Self {
            module: module.to_string(),
            pool: ConstantPool::new(),
            resolver: Resolver::new(),
            current: FunctionState::new(MAIN_NAME),
            line: 0,
        };
        for name in builtins {
            compiler
                .resolver
                .declare_global(name.as_ref())
                .map_err(|kind| compiler.error(kind))?;
        }
        Ok(compiler)
    }

    /// Create a compiler reserving one global slot per registered builtin
    pub fn with_registry(module: &str, registry: &BuiltinRegistry) -> Result<Self, CompileError> {
        Self::new(module, registry.names())
    }

    /// Compile a module body.
    ///
    /// When the last statement is an expression its value becomes the
    /// module's result; otherwise the module ends with nil.
    pub fn compile(mut self, program: &[Stmt]) -> Result<Module, CompileError> {
        if let Err(kind) = self.module_body(program) {
            return Err(self.error(kind));
        }

        let state = std::mem::replace(&mut self.current, FunctionState::new(MAIN_NAME));
        let main = state.into_prototype(0, false, Vec::new());

        tracing::debug!(
            target: "tern::compiler",
            module = %self.module,
            constants = self.pool.len(),
            globals = self.resolver.global_names().len(),
            "module compiled"
        );

        Ok(Module {
            name: self.module,
            global_names: self.resolver.global_names().to_vec(),
            constants: self.pool.into_constants(),
            main: Arc::new(main),
        })
    }

    fn module_body(&mut self, program: &[Stmt]) -> Result<(), CompileErrorKind> {
        let Some((last, rest)) = program.split_last() else {
            self.current.code.end();
            return Ok(());
        };

        for stmt in rest {
            self.statement(stmt)?;
        }

        match &last.kind {
            StmtKind::Expr(expr) => {
                self.set_line(last.line);
                let reg = self.expr_reg(expr)?;
                self.current.code.ret(reg);
            }
            _ => {
                self.statement(last)?;
                self.current.code.end();
            }
        }
        Ok(())
    }

    // ===== Helper methods =====

    fn error(&self, kind: CompileErrorKind) -> CompileError {
        CompileError {
            module: self.module.clone(),
            line: self.line,
            kind,
        }
    }

    pub(crate) fn set_line(&mut self, line: u32) {
        self.line = line;
        self.current.code.set_line(line);
    }

    pub(crate) fn alloc(&mut self) -> Result<u16, CompileErrorKind> {
        self.current.registers.allocate()
    }

    pub(crate) fn alloc_many(&mut self, count: usize) -> Result<u16, CompileErrorKind> {
        self.current.registers.allocate_many(count)
    }

    pub(crate) fn mark(&self) -> u16 {
        self.current.registers.top()
    }

    pub(crate) fn free_to(&mut self, mark: u16) {
        self.current.registers.free_to(mark);
    }

    pub(crate) fn constant(&mut self, constant: Constant) -> Result<u16, CompileErrorKind> {
        self.pool.index(constant)
    }

    /// Bring an operand into a register, reusing it when already local
    pub(crate) fn materialize(&mut self, operand: Operand) -> Result<u16, CompileErrorKind> {
        if operand.is_local() {
            return Ok(operand.index);
        }
        let reg = self.alloc()?;
        self.load_operand(reg, operand);
        Ok(reg)
    }

    /// Copy an operand into `dst`
    pub(crate) fn load_operand(&mut self, dst: u16, operand: Operand) {
        let code = &mut self.current.code;
        match operand.src {
            Src::Local => {
                if operand.index != dst {
                    code.mov(dst, operand.index);
                }
            }
            Src::Const => {
                code.load_k(dst, operand.index);
            }
            Src::Global => {
                code.load_global(dst, operand.index);
            }
            Src::Free => {
                code.load_free(dst, operand.index);
            }
        }
    }
}
