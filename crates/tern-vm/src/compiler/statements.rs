//! Statement compilation

use crate::bytecode::Constant;
use crate::compiler::context::LoopContext;
use crate::compiler::symbols::Resolved;
use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use std::sync::Arc;
use tern_ast::{Expr, Stmt, StmtKind};
use tern_types::EnumDef;

impl Compiler {
    /// Compile a statement. Temporaries it allocates are released before
    /// returning; declared locals stay until their scope closes.
    pub(crate) fn statement(&mut self, stmt: &Stmt) -> Result<(), CompileErrorKind> {
        let outer = self.line;
        self.set_line(stmt.line);

        match &stmt.kind {
            StmtKind::Let { name, value } => {
                let reg = self.alloc()?;
                self.expr_to(value, reg)?;
                self.resolver.declare_local(name, reg);
            }
            StmtKind::Global { name, value } => {
                let slot = self.resolver.declare_global(name)?;
                let mark = self.mark();
                let value = self.operand(value)?;
                self.current.code.store_global(slot, value.src, value.index);
                self.free_to(mark);
            }
            StmtKind::Assign { target, value } => self.assign(target, value)?,
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.compile_if(cond, then_branch, else_branch)?,
            StmtKind::While { cond, body } => self.compile_while(cond, body)?,
            StmtKind::ForRange {
                var,
                start,
                limit,
                step,
                body,
            } => self.compile_for_range(var, start, limit, step.as_ref(), body)?,
            StmtKind::ForIn {
                key,
                value,
                iterable,
                body,
            } => self.compile_for_in(key, value.as_deref(), iterable, body)?,
            StmtKind::Function { name, func } => {
                let reg = self.alloc()?;
                let k = self.function(Some(name), func)?;
                self.current.code.fun(reg, k);
                self.resolver.declare_local(name, reg);
            }
            StmtKind::Enum { name, variants } => {
                let def = EnumDef {
                    name: name.clone(),
                    variants: variants.clone(),
                };
                let k = self.constant(Constant::Enum(Arc::new(def)))?;
                let reg = self.alloc()?;
                self.current.code.load_k(reg, k);
                self.resolver.declare_local(name, reg);
            }
            StmtKind::Return(None) => {
                self.current.code.ret_nil();
            }
            StmtKind::Return(Some(value)) => {
                // A returned call lands in a fresh register, so `Call; Return`
                // stay adjacent for tail-call detection
                let mark = self.mark();
                let reg = self.expr_reg(value)?;
                self.current.code.ret(reg);
                self.free_to(mark);
            }
            StmtKind::Break => {
                let jump = self.current.code.jump(0);
                match self.current.loops.last_mut() {
                    Some(ctx) => ctx.breaks.push(jump),
                    None => return Err(CompileErrorKind::BreakOutsideLoop),
                }
            }
            StmtKind::Continue => {
                let jump = self.current.code.jump(0);
                match self.current.loops.last_mut() {
                    Some(ctx) => ctx.continues.push(jump),
                    None => return Err(CompileErrorKind::ContinueOutsideLoop),
                }
            }
            StmtKind::Block(body) => self.block(body)?,
            StmtKind::Expr(expr) => {
                let mark = self.mark();
                self.expr_reg(expr)?;
                self.free_to(mark);
            }
        }

        self.set_line(outer);
        Ok(())
    }

    /// Compile statements in their own scope
    pub(crate) fn block(&mut self, body: &[Stmt]) -> Result<(), CompileErrorKind> {
        self.resolver.enter_scope();
        for stmt in body {
            self.statement(stmt)?;
        }
        if let Some(lowest) = self.resolver.exit_scope() {
            self.free_to(lowest);
        }
        Ok(())
    }

    fn assign(&mut self, target: &Expr, value: &Expr) -> Result<(), CompileErrorKind> {
        let mark = self.mark();
        match target {
            Expr::Ident(name) => match self.resolver.resolve(name)? {
                Resolved::Local(reg) => {
                    // These write `dst` before they finish reading their
                    // operands, which may include the target itself
                    if matches!(value, Expr::Logical { .. } | Expr::Object(_)) {
                        let tmp = self.alloc()?;
                        self.expr_to(value, tmp)?;
                        self.current.code.mov(reg, tmp);
                    } else {
                        self.expr_to(value, reg)?;
                    }
                }
                Resolved::Global(slot) => {
                    let value = self.operand(value)?;
                    self.current.code.store_global(slot, value.src, value.index);
                }
                Resolved::Free(idx) => {
                    let value = self.operand(value)?;
                    self.current.code.store_free(idx, value.src, value.index);
                }
            },
            Expr::Index { target, index } => {
                let target = self.expr_reg(target)?;
                let key = self.operand(index)?;
                let value = self.operand(value)?;
                self.current
                    .code
                    .set_index(target, key.pair(), value.pair());
            }
            _ => return Err(CompileErrorKind::InvalidAssignmentTarget),
        }
        self.free_to(mark);
        Ok(())
    }

    fn compile_if(
        &mut self,
        cond: &Expr,
        then_branch: &[Stmt],
        else_branch: &[Stmt],
    ) -> Result<(), CompileErrorKind> {
        let mark = self.mark();
        let cond = self.expr_reg(cond)?;
        let skip_then = self.current.code.check(cond, 0, false);
        self.free_to(mark);

        self.block(then_branch)?;

        if else_branch.is_empty() {
            self.current.code.patch_here(skip_then)?;
        } else {
            let skip_else = self.current.code.jump(0);
            self.current.code.patch_here(skip_then)?;
            self.block(else_branch)?;
            self.current.code.patch_here(skip_else)?;
        }
        Ok(())
    }

    fn compile_while(&mut self, cond: &Expr, body: &[Stmt]) -> Result<(), CompileErrorKind> {
        let start = self.current.code.label()?;

        let mark = self.mark();
        let cond = self.expr_reg(cond)?;
        let exit = self.current.code.check(cond, 0, false);
        self.free_to(mark);

        let ctx = self.loop_body(body)?;
        for pos in ctx.continues {
            self.current.code.patch(pos, start);
        }
        self.current.code.jump(start);

        self.current.code.patch_here(exit)?;
        self.patch_breaks(ctx.breaks)
    }

    /// `for var in start..limit step s`.
    ///
    /// Layout: R[base] = current, R[base+1] = limit, R[base+2] = step,
    /// R[base+3] = the loop variable. The loop enters at its `For`, which
    /// tests the first value before the body runs.
    fn compile_for_range(
        &mut self,
        var: &str,
        start: &Expr,
        limit: &Expr,
        step: Option<&Expr>,
        body: &[Stmt],
    ) -> Result<(), CompileErrorKind> {
        let mark = self.mark();
        let base = self.alloc_many(4)?;
        self.expr_to(start, base)?;
        self.expr_to(limit, base + 1)?;
        match step {
            Some(step) => self.expr_to(step, base + 2)?,
            None => {
                let one = self.constant(Constant::Int(1))?;
                self.current.code.load_k(base + 2, one);
            }
        }

        self.resolver.enter_scope();
        self.resolver.declare_local(var, base + 3);

        let enter = self.current.code.jump(0);
        let body_start = self.current.code.label()?;
        let ctx = self.loop_body(body)?;

        for pos in ctx.continues.into_iter().chain(std::iter::once(enter)) {
            self.current.code.patch_here(pos)?;
        }
        self.current.code.for_loop(base, body_start);
        self.patch_breaks(ctx.breaks)?;

        self.resolver.exit_scope();
        self.free_to(mark);
        Ok(())
    }

    /// `for key, value in iterable`.
    ///
    /// Layout: R[base] = iterator, R[base+1] = key, R[base+2] = value.
    fn compile_for_in(
        &mut self,
        key: &str,
        value: Option<&str>,
        iterable: &Expr,
        body: &[Stmt],
    ) -> Result<(), CompileErrorKind> {
        let mark = self.mark();
        let base = self.alloc_many(3)?;
        self.expr_to(iterable, base)?;
        self.current.code.iter(base, base);

        self.resolver.enter_scope();
        self.resolver.declare_local(key, base + 1);
        if let Some(value) = value {
            self.resolver.declare_local(value, base + 2);
        }

        let enter = self.current.code.jump(0);
        let body_start = self.current.code.label()?;
        let ctx = self.loop_body(body)?;

        for pos in ctx.continues.into_iter().chain(std::iter::once(enter)) {
            self.current.code.patch_here(pos)?;
        }
        self.current.code.ifor(base, body_start);
        self.patch_breaks(ctx.breaks)?;

        self.resolver.exit_scope();
        self.free_to(mark);
        Ok(())
    }

    /// Compile a loop body, returning its pending break and continue jumps
    fn loop_body(&mut self, body: &[Stmt]) -> Result<LoopContext, CompileErrorKind> {
        self.current.loops.push(LoopContext::default());
        let result = self.block(body);
        let ctx = self.current.loops.pop().unwrap_or_default();
        result.map(|_| ctx)
    }

    fn patch_breaks(&mut self, breaks: Vec<usize>) -> Result<(), CompileErrorKind> {
        for pos in breaks {
            self.current.code.patch_here(pos)?;
        }
        Ok(())
    }
}
