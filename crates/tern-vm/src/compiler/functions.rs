//! Function bodies
//!
//! A nested function gets a fresh `FunctionState` and resolver level. The
//! enclosing state is parked on the Rust stack for the duration and restored
//! whether or not the body compiled.

use crate::bytecode::Constant;
use crate::compiler::context::FunctionState;
use crate::compiler::Compiler;
use crate::error::CompileErrorKind;
use std::collections::HashSet;
use std::sync::Arc;
use tern_ast::FunctionDecl;

const ANONYMOUS: &str = "<anonymous>";

impl Compiler {
    /// Compile a function body into a `Constant::Function`, returning its
    /// pool index. A named function can refer to itself by that name.
    pub(crate) fn function(
        &mut self,
        name: Option<&str>,
        decl: &FunctionDecl,
    ) -> Result<u16, CompileErrorKind> {
        let mut seen = HashSet::new();
        for param in &decl.params {
            if !seen.insert(param.as_str()) {
                return Err(CompileErrorKind::DuplicateParameter(param.clone()));
            }
        }

        let fixed = if decl.variadic {
            decl.params.len().saturating_sub(1)
        } else {
            decl.params.len()
        };
        let arity = u16::try_from(fixed)
            .ok()
            .filter(|&n| n < u16::MAX)
            .ok_or(CompileErrorKind::TooManyParameters)?;

        let outer = std::mem::replace(
            &mut self.current,
            FunctionState::new(name.unwrap_or(ANONYMOUS)),
        );
        self.current.code.set_line(self.line);
        self.resolver.enter_function();

        let body = self.function_body(name, decl);

        let free_vars = self.resolver.exit_function();
        let state = std::mem::replace(&mut self.current, outer);
        self.current.code.set_line(self.line);
        body?;

        let proto = state.into_prototype(arity, decl.variadic, free_vars);
        tracing::debug!(
            target: "tern::compiler",
            function = %proto.name,
            arity = proto.arity,
            variadic = proto.variadic,
            registers = proto.register_count,
            free_vars = proto.free_count(),
            "function compiled"
        );

        self.constant(Constant::Function(Arc::new(proto)))
    }

    fn function_body(
        &mut self,
        name: Option<&str>,
        decl: &FunctionDecl,
    ) -> Result<(), CompileErrorKind> {
        // Parameters occupy registers 0..n; a variadic function without
        // named parameters still receives its rest list in register 0
        let slots = decl.params.len().max(decl.variadic as usize);
        self.alloc_many(slots)?;

        if let Some(name) = name {
            let reg = self.alloc()?;
            self.current.code.load_self(reg);
            self.resolver.declare_local(name, reg);
        }
        for (reg, param) in decl.params.iter().enumerate() {
            self.resolver.declare_local(param, reg as u16);
        }

        for stmt in &decl.body {
            self.statement(stmt)?;
        }
        self.current.code.ret_nil();
        Ok(())
    }
}
