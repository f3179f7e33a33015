//! Tern syntax tree
//!
//! The node types the bytecode compiler consumes. Producing them (lexing and
//! parsing source text) happens outside this workspace; a parser hands the
//! compiler a `Vec<Stmt>` for one module. Nodes are serde-serializable so a
//! front end in another process can ship a tree as JSON.
//!
//! Statements carry the source line they started on. The compiler copies it
//! into the per-function line map so runtime diagnostics can point back at
//! the source.

use serde::{Deserialize, Serialize};

pub mod build;

/// A statement with the source line it starts on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub line: u32,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(line: u32, kind: StmtKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// `let name = value` (local to the enclosing scope)
    Let { name: String, value: Expr },
    /// `global name = value` (module-wide slot)
    Global { name: String, value: Expr },
    /// `target = value`, target is an identifier or an index expression
    Assign { target: Expr, value: Expr },
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    While { cond: Expr, body: Vec<Stmt> },
    /// `for var in start..limit step s`
    ForRange {
        var: String,
        start: Expr,
        limit: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// `for key, value in iterable`
    ForIn {
        key: String,
        value: Option<String>,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    /// `fn name(params) { body }`
    Function { name: String, func: FunctionDecl },
    /// `enum Name { A, B, C }`
    Enum { name: String, variants: Vec<String> },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Vec<Stmt>),
    Expr(Expr),
}

/// Parameter list and body shared by declarations and literals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub params: Vec<String>,
    /// Extra arguments are collected into a trailing list parameter
    pub variadic: bool,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Short-circuit `&&` / `||`
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `callee(args...)`; with `spread`, the last argument is a list whose
    /// elements are passed individually
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        spread: bool,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target[lower:upper]`, either bound may be omitted
    Slice {
        target: Box<Expr>,
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
    },
    List(Vec<Expr>),
    Object(Vec<(Expr, Expr)>),
    Function(Box<FunctionDecl>),
    /// `spawn f` / `spawn(f, tier)`
    Spawn {
        func: Box<Expr>,
        tier: Option<u8>,
    },
    /// `resume(thread, args...)`
    Resume {
        thread: Box<Expr>,
        args: Vec<Expr>,
    },
    Yield(Box<Expr>),
}

/// Binary operators. The discriminant is the operator code packed into
/// instruction words, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BinaryOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Mod = 4,
    Pow = 5,
    Lt = 6,
    Le = 7,
    Gt = 8,
    Ge = 9,
    BitAnd = 10,
    BitOr = 11,
    BitXor = 12,
    Shl = 13,
    Shr = 14,
    Eq = 15,
    Ne = 16,
}

impl BinaryOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => BinaryOp::Add,
            1 => BinaryOp::Sub,
            2 => BinaryOp::Mul,
            3 => BinaryOp::Div,
            4 => BinaryOp::Mod,
            5 => BinaryOp::Pow,
            6 => BinaryOp::Lt,
            7 => BinaryOp::Le,
            8 => BinaryOp::Gt,
            9 => BinaryOp::Ge,
            10 => BinaryOp::BitAnd,
            11 => BinaryOp::BitOr,
            12 => BinaryOp::BitXor,
            13 => BinaryOp::Shl,
            14 => BinaryOp::Shr,
            15 => BinaryOp::Eq,
            16 => BinaryOp::Ne,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }

    /// `==` and `!=` compile to the equality instruction instead of a
    /// binary-operator dispatch
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PrefixOp {
    Not = 0,
    Neg = 1,
    BitNot = 2,
    Len = 3,
}

impl PrefixOp {
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => PrefixOp::Not,
            1 => PrefixOp::Neg,
            2 => PrefixOp::BitNot,
            3 => PrefixOp::Len,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
            PrefixOp::BitNot => "~",
            PrefixOp::Len => "#",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}
