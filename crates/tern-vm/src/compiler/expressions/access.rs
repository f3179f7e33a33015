//! Indexing, slicing and collection literals

use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use tern_ast::Expr;

impl Compiler {
    pub(crate) fn compile_index(
        &mut self,
        target: &Expr,
        index: &Expr,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let target = self.expr_reg(target)?;
        let key = self.operand(index)?;
        self.current.code.get_index(dst, target, key.pair());
        Ok(())
    }

    /// Bounds go in two adjacent registers; absent ones are flagged in the
    /// mode byte and left unset
    pub(crate) fn compile_slice(
        &mut self,
        target: &Expr,
        lower: Option<&Expr>,
        upper: Option<&Expr>,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let target = self.expr_reg(target)?;
        let bounds = self.alloc_many(2)?;
        if let Some(lower) = lower {
            self.expr_to(lower, bounds)?;
        }
        if let Some(upper) = upper {
            self.expr_to(upper, bounds + 1)?;
        }
        self.current
            .code
            .slice(dst, target, bounds, lower.is_some(), upper.is_some());
        Ok(())
    }

    pub(crate) fn compile_list(&mut self, items: &[Expr], dst: u16) -> Result<(), CompileErrorKind> {
        let base = self.alloc_many(items.len())?;
        for (i, item) in items.iter().enumerate() {
            self.expr_to(item, base + i as u16)?;
        }
        self.current.code.list(dst, base, items.len() as u16);
        Ok(())
    }

    pub(crate) fn compile_object(
        &mut self,
        fields: &[(Expr, Expr)],
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        self.current.code.object(dst);
        for (key, value) in fields {
            let mark = self.mark();
            let key = self.operand(key)?;
            let value = self.operand(value)?;
            self.current.code.set_index(dst, key.pair(), value.pair());
            self.free_to(mark);
        }
        Ok(())
    }
}
