//! Shorthand constructors for building trees by hand
//!
//! Front ends and tests use these instead of spelling out boxed variants.
//! Statements default to line 1; chain [`Stmt::at`] to set a real line.

use crate::{BinaryOp, Expr, FunctionDecl, LogicalOp, PrefixOp, Stmt, StmtKind};

impl Stmt {
    /// Same statement, reported at `line`
    pub fn at(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt::new(1, kind)
}

pub fn nil() -> Expr {
    Expr::Nil
}

pub fn boolean(b: bool) -> Expr {
    Expr::Bool(b)
}

pub fn int(n: i64) -> Expr {
    Expr::Int(n)
}

pub fn float(n: f64) -> Expr {
    Expr::Float(n)
}

pub fn string(s: &str) -> Expr {
    Expr::Str(s.to_string())
}

pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

pub fn prefix(op: PrefixOp, operand: Expr) -> Expr {
    Expr::Prefix {
        op,
        operand: Box::new(operand),
    }
}

pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn and(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::And,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn or(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::Or,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
        spread: false,
    }
}

pub fn call_spread(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
        spread: true,
    }
}

pub fn index(target: Expr, idx: Expr) -> Expr {
    Expr::Index {
        target: Box::new(target),
        index: Box::new(idx),
    }
}

pub fn slice(target: Expr, lower: Option<Expr>, upper: Option<Expr>) -> Expr {
    Expr::Slice {
        target: Box::new(target),
        lower: lower.map(Box::new),
        upper: upper.map(Box::new),
    }
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

pub fn object(fields: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(
        fields
            .into_iter()
            .map(|(key, value)| (string(key), value))
            .collect(),
    )
}

pub fn func(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(decl(params, false, body)))
}

pub fn variadic_func(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Function(Box::new(decl(params, true, body)))
}

pub fn spawn(function: Expr) -> Expr {
    Expr::Spawn {
        func: Box::new(function),
        tier: None,
    }
}

pub fn spawn_tier(function: Expr, tier: u8) -> Expr {
    Expr::Spawn {
        func: Box::new(function),
        tier: Some(tier),
    }
}

pub fn resume(thread: Expr, args: Vec<Expr>) -> Expr {
    Expr::Resume {
        thread: Box::new(thread),
        args,
    }
}

pub fn yield_(value: Expr) -> Expr {
    Expr::Yield(Box::new(value))
}

pub fn decl(params: &[&str], variadic: bool, body: Vec<Stmt>) -> FunctionDecl {
    FunctionDecl {
        params: params.iter().map(|p| p.to_string()).collect(),
        variadic,
        body,
    }
}

pub fn let_(name: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Let {
        name: name.to_string(),
        value,
    })
}

pub fn global(name: &str, value: Expr) -> Stmt {
    stmt(StmtKind::Global {
        name: name.to_string(),
        value,
    })
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    stmt(StmtKind::Assign { target, value })
}

pub fn if_(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        cond,
        then_branch,
        else_branch,
    })
}

pub fn while_(cond: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While { cond, body })
}

pub fn for_range(var: &str, start: Expr, limit: Expr, step: Option<Expr>, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::ForRange {
        var: var.to_string(),
        start,
        limit,
        step,
        body,
    })
}

pub fn for_in(key: &str, value: Option<&str>, iterable: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::ForIn {
        key: key.to_string(),
        value: value.map(str::to_string),
        iterable,
        body,
    })
}

pub fn function(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Function {
        name: name.to_string(),
        func: decl(params, false, body),
    })
}

pub fn variadic_function(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Function {
        name: name.to_string(),
        func: decl(params, true, body),
    })
}

pub fn enum_(name: &str, variants: &[&str]) -> Stmt {
    stmt(StmtKind::Enum {
        name: name.to_string(),
        variants: variants.iter().map(|v| v.to_string()).collect(),
    })
}

pub fn ret(value: Expr) -> Stmt {
    stmt(StmtKind::Return(Some(value)))
}

pub fn ret_nil() -> Stmt {
    stmt(StmtKind::Return(None))
}

pub fn break_() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn continue_() -> Stmt {
    stmt(StmtKind::Continue)
}

pub fn block(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(body))
}

pub fn expr(e: Expr) -> Stmt {
    stmt(StmtKind::Expr(e))
}
