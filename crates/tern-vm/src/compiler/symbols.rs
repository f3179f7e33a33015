//! Symbol resolution: locals, globals and free-variable capture chains
//!
//! Locals live in one append-only history shared by every function being
//! compiled. Each record remembers the compiler level (function nesting
//! depth) and scope depth it was declared at, so a lookup can tell a direct
//! local from a binding that belongs to an enclosing function.
//!
//! Referencing an enclosing function's local threads a capture descriptor
//! through every level in between. Each level keeps its own descriptor list
//! plus a name memo, so a name is captured at most once per level and
//! descriptor indices never move once assigned.

use crate::error::CompileErrorKind;
use std::collections::HashMap;
use tern_types::FreeVarDesc;

/// Where an identifier lives, from the point of view of the current function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    Local(u16),
    Free(u16),
    Global(u16),
}

#[derive(Debug)]
struct Binding {
    name: String,
    level: usize,
    scope: usize,
    register: u16,
}

/// Capture descriptors of one compiler level
#[derive(Debug, Default)]
pub(crate) struct FreeContext {
    descs: Vec<FreeVarDesc>,
    by_name: HashMap<String, u16>,
}

#[derive(Debug, Default)]
pub(crate) struct Resolver {
    history: Vec<Binding>,
    /// One entry per compiler level, innermost last
    levels: Vec<FreeContext>,
    /// Current scope depth per compiler level
    scopes: Vec<usize>,
    globals: HashMap<String, u16>,
    global_names: Vec<String>,
}

impl Resolver {
    /// Resolver positioned at level 0 (the module body)
    pub(crate) fn new() -> Self {
        let mut resolver = Self::default();
        resolver.enter_function();
        resolver
    }

    fn level(&self) -> usize {
        self.levels.len() - 1
    }

    fn scope(&self) -> usize {
        self.scopes.last().copied().unwrap_or(0)
    }

    // ===== Levels & Scopes =====

    pub(crate) fn enter_function(&mut self) {
        self.levels.push(FreeContext::default());
        self.scopes.push(0);
    }

    /// Close the innermost level, returning its capture descriptors
    pub(crate) fn exit_function(&mut self) -> Vec<FreeVarDesc> {
        let level = self.level();
        let keep = self
            .history
            .iter()
            .rposition(|b| b.level != level)
            .map_or(0, |i| i + 1);
        self.history.truncate(keep);
        self.scopes.pop();
        self.levels.pop().map(|ctx| ctx.descs).unwrap_or_default()
    }

    pub(crate) fn enter_scope(&mut self) {
        if let Some(depth) = self.scopes.last_mut() {
            *depth += 1;
        }
    }

    /// Close the innermost scope. Returns the lowest register it released.
    pub(crate) fn exit_scope(&mut self) -> Option<u16> {
        let (level, scope) = (self.level(), self.scope());
        let mut lowest = None;
        while let Some(b) = self.history.last() {
            if b.level != level || b.scope != scope {
                break;
            }
            lowest = Some(lowest.map_or(b.register, |r: u16| r.min(b.register)));
            self.history.pop();
        }
        if let Some(depth) = self.scopes.last_mut() {
            *depth = depth.saturating_sub(1);
        }
        lowest
    }

    // ===== Declarations =====

    pub(crate) fn declare_local(&mut self, name: &str, register: u16) {
        self.history.push(Binding {
            name: name.to_string(),
            level: self.level(),
            scope: self.scope(),
            register,
        });
    }

    /// Slot of global `name`, creating it on first declaration
    pub(crate) fn declare_global(&mut self, name: &str) -> Result<u16, CompileErrorKind> {
        if let Some(&slot) = self.globals.get(name) {
            return Ok(slot);
        }
        let slot =
            u16::try_from(self.global_names.len()).map_err(|_| CompileErrorKind::TooManyGlobals)?;
        self.globals.insert(name.to_string(), slot);
        self.global_names.push(name.to_string());
        Ok(slot)
    }

    pub(crate) fn global_names(&self) -> &[String] {
        &self.global_names
    }

    // ===== Lookup =====

    pub(crate) fn resolve(&mut self, name: &str) -> Result<Resolved, CompileErrorKind> {
        let level = self.level();
        let found = self
            .history
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| (b.level, b.register));

        match found {
            Some((owner, register)) if owner == level => Ok(Resolved::Local(register)),
            Some((owner, register)) => self
                .capture(level, name, owner, register)
                .map(Resolved::Free),
            None => self
                .globals
                .get(name)
                .map(|&slot| Resolved::Global(slot))
                .ok_or_else(|| CompileErrorKind::UndefinedVariable(name.to_string())),
        }
    }

    /// Capture index of `name` at `level`, threading descriptors down from
    /// `owner` (the level whose local `register` holds the binding)
    fn capture(
        &mut self,
        level: usize,
        name: &str,
        owner: usize,
        register: u16,
    ) -> Result<u16, CompileErrorKind> {
        if let Some(&idx) = self.levels[level].by_name.get(name) {
            return Ok(idx);
        }

        let parent = level - 1;
        let desc = if parent == owner {
            FreeVarDesc {
                is_local: true,
                index: register,
            }
        } else {
            FreeVarDesc {
                is_local: false,
                index: self.capture(parent, name, owner, register)?,
            }
        };

        let ctx = &mut self.levels[level];
        let idx = u16::try_from(ctx.descs.len()).map_err(|_| CompileErrorKind::TooManyFreeVars)?;
        ctx.descs.push(desc);
        ctx.by_name.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Capture descriptors of the current level so far
    #[cfg(test)]
    pub(crate) fn free_vars(&self) -> &[FreeVarDesc] {
        &self.levels[self.level()].descs
    }
}
