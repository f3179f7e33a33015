//! Binary, prefix and short-circuit operator compilation

use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use crate::opcode::{OpCode, Src};
use tern_ast::{BinaryOp, Expr, LogicalOp, PrefixOp};

impl Compiler {
    pub(crate) fn compile_prefix(
        &mut self,
        op: PrefixOp,
        operand: &Expr,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let src = self.expr_reg(operand)?;
        self.current.code.prefix(dst, src, op);
        Ok(())
    }

    /// Compile a binary operation, picking the variant that reads both
    /// operands in place where one exists
    pub(crate) fn compile_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        let left = self.operand(lhs)?;
        let right = self.operand(rhs)?;

        if op.is_equality() {
            self.current
                .code
                .eq(dst, left.pair(), right.pair(), op == BinaryOp::Ne);
            return Ok(());
        }

        let (variant, b, c) = match (left.src, right.src) {
            (Src::Local, Src::Local) => (OpCode::BinRR, left.index, right.index),
            (Src::Local, Src::Const) => (OpCode::BinRK, left.index, right.index),
            (Src::Const, Src::Local) => (OpCode::BinKR, left.index, right.index),
            (Src::Global, Src::Global) => (OpCode::BinGG, left.index, right.index),
            (_, Src::Const) => (OpCode::BinRK, self.materialize(left)?, right.index),
            (Src::Const, _) => (OpCode::BinKR, left.index, self.materialize(right)?),
            _ => {
                let b = self.materialize(left)?;
                let c = self.materialize(right)?;
                (OpCode::BinRR, b, c)
            }
        };
        self.current.code.binary(variant, dst, b, c, op);
        Ok(())
    }

    /// `a && b` leaves `a` in `dst` when it is falsy, otherwise `b`;
    /// `a || b` mirrors it
    pub(crate) fn compile_logical(
        &mut self,
        op: LogicalOp,
        lhs: &Expr,
        rhs: &Expr,
        dst: u16,
    ) -> Result<(), CompileErrorKind> {
        self.expr_to(lhs, dst)?;
        let skip = self.current.code.check(dst, 0, op == LogicalOp::Or);
        self.expr_to(rhs, dst)?;
        self.current.code.patch_here(skip)
    }
}
