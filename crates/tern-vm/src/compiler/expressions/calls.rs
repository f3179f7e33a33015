//! Calls and thread operations
//!
//! Calls and resumes evaluate into a contiguous run: the callee (or thread)
//! at `base`, then each argument in order.

use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use tern_ast::Expr;

impl Compiler {
    /// Evaluate `head` and `args` into a fresh run, returning its base
    fn argument_run(&mut self, head: &Expr, args: &[Expr]) -> Result<u16, CompileErrorKind> {
        if args.len() >= u16::MAX as usize {
            return Err(CompileErrorKind::TooManyRegisters);
        }
        let base = self.alloc_many(args.len() + 1)?;
        self.expr_to(head, base)?;
        for (i, arg) in args.iter().enumerate() {
            self.expr_to(arg, base + 1 + i as u16)?;
        }
        Ok(base)
    }

    pub(crate) fn compile_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        spread: bool,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let base = self.argument_run(callee, args)?;
        self.current
            .code
            .call(dst, base, args.len() as u16, spread && !args.is_empty());
        Ok(())
    }

    pub(crate) fn compile_spawn(
        &mut self,
        func: &Expr,
        tier: Option<u8>,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let func = self.expr_reg(func)?;
        self.current.code.spawn(dst, func, tier);
        Ok(())
    }

    pub(crate) fn compile_resume(
        &mut self,
        thread: &Expr,
        args: &[Expr],
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let base = self.argument_run(thread, args)?;
        self.current.code.resume(dst, base, args.len() as u16);
        Ok(())
    }

    pub(crate) fn compile_yield(&mut self, value: &Expr, dst: u16) -> Result<(), CompileErrorKind> {
        let src = self.expr_reg(value)?;
        self.current.code.yield_value(dst, src);
        Ok(())
    }
}
