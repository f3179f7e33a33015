//! Expression compilation
//!
//! Two entry points: `expr_to` writes a value into a given register, and
//! `operand` yields wherever the value can be read from (a local register,
//! a constant, a global or a captured slot) so instructions with provenance
//! tags can skip the move. Temporaries allocated along the way are released
//! before `expr_to` returns; `operand` and `expr_reg` leave them to the
//! caller's mark.

mod access;
mod calls;
mod operators;

use crate::bytecode::Constant;
use crate::compiler::registers::Operand;
use crate::compiler::symbols::Resolved;
use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use std::sync::Arc;
use tern_ast::Expr;

impl Compiler {
    /// Compile `expr` into register `dst`
    pub(crate) fn expr_to(&mut self, expr: &Expr, dst: u16) -> Result<(), CompileErrorKind> {
        let mark = self.mark();
        match expr {
            Expr::Nil | Expr::Bool(_) | Expr::Int(_) | Expr::Float(_) | Expr::Str(_) => {
                let k = self.literal(expr)?;
                self.current.code.load_k(dst, k);
            }
            Expr::Ident(name) => {
                let operand = self.variable(name)?;
                self.load_operand(dst, operand);
            }
            Expr::Prefix { op, operand } => self.compile_prefix(*op, operand, dst)?,
            Expr::Binary { op, lhs, rhs } => self.compile_binary(*op, lhs, rhs, dst)?,
            Expr::Logical { op, lhs, rhs } => self.compile_logical(*op, lhs, rhs, dst)?,
            Expr::Call {
                callee,
                args,
                spread,
            } => self.compile_call(callee, args, *spread, dst)?,
            Expr::Index { target, index } => self.compile_index(target, index, dst)?,
            Expr::Slice {
                target,
                lower,
                upper,
            } => self.compile_slice(target, lower.as_deref(), upper.as_deref(), dst)?,
            Expr::List(items) => self.compile_list(items, dst)?,
            Expr::Object(fields) => self.compile_object(fields, dst)?,
            Expr::Function(decl) => {
                let k = self.function(None, decl)?;
                self.current.code.fun(dst, k);
            }
            Expr::Spawn { func, tier } => self.compile_spawn(func, *tier, dst)?,
            Expr::Resume { thread, args } => self.compile_resume(thread, args, dst)?,
            Expr::Yield(value) => self.compile_yield(value, dst)?,
        }
        self.free_to(mark);
        Ok(())
    }

    /// Where the value of `expr` can be read from.
    ///
    /// Identifiers and literals need no code; anything else is compiled into
    /// a fresh temporary.
    pub(crate) fn operand(&mut self, expr: &Expr) -> Result<Operand, CompileErrorKind> {
        match expr {
            Expr::Nil | Expr::Bool(_) | Expr::Int(_) | Expr::Float(_) | Expr::Str(_) => {
                Ok(Operand::constant(self.literal(expr)?))
            }
            Expr::Ident(name) => self.variable(name),
            _ => {
                let reg = self.alloc()?;
                self.expr_to(expr, reg)?;
                Ok(Operand::local(reg))
            }
        }
    }

    /// Register holding the value of `expr`; locals are used in place
    pub(crate) fn expr_reg(&mut self, expr: &Expr) -> Result<u16, CompileErrorKind> {
        let operand = self.operand(expr)?;
        self.materialize(operand)
    }

    fn variable(&mut self, name: &str) -> Result<Operand, CompileErrorKind> {
        Ok(match self.resolver.resolve(name)? {
            Resolved::Local(reg) => Operand::local(reg),
            Resolved::Free(idx) => Operand::free(idx),
            Resolved::Global(slot) => Operand::global(slot),
        })
    }

    fn literal(&mut self, expr: &Expr) -> Result<u16, CompileErrorKind> {
        let constant = match expr {
            Expr::Bool(b) => Constant::Bool(*b),
            Expr::Int(n) => Constant::Int(*n),
            Expr::Float(n) => Constant::Float(*n),
            Expr::Str(s) => Constant::Str(Arc::from(s.as_str())),
            _ => Constant::Nil,
        };
        self.constant(constant)
    }
}
