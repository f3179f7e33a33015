//! Error types for the VM and compiler

use tern_types::{OpError, ThreadState, TransitionError};

/// What went wrong during compilation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("too many registers in one function (max 65535)")]
    TooManyRegisters,

    #[error("too many constants (max 65536)")]
    TooManyConstants,

    #[error("too many globals (max 65536)")]
    TooManyGlobals,

    #[error("too many captured variables in one function (max 65536)")]
    TooManyFreeVars,

    #[error("too many parameters (max 65534)")]
    TooManyParameters,

    #[error("code too large (jump target past 65535)")]
    CodeTooLarge,

    #[error("break statement outside loop")]
    BreakOutsideLoop,

    #[error("continue statement outside loop")]
    ContinueOutsideLoop,

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),
}

/// Compile failure with the module and source line it happened at
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{module}:{line}: {kind}")]
pub struct CompileError {
    pub module: String,
    pub line: u32,
    pub kind: CompileErrorKind,
}

/// VM runtime errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VmError {
    #[error("type error in {operation}: expected {expected}, got {got}")]
    TypeError {
        operation: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{0} is not iterable")]
    NotIterable(&'static str),

    #[error("{0} is not callable")]
    NotCallable(&'static str),

    #[error("{} {expected} argument(s), got {got}", arity_bound(.variadic))]
    Arity {
        expected: u16,
        variadic: bool,
        got: usize,
    },

    #[error("for loop step is zero")]
    ZeroStep,

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("spread argument must be a list, got {0}")]
    SpreadSource(&'static str),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("operation not defined for iterators")]
    IteratorOperation,

    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),

    #[error("invalid constant index: {0}")]
    InvalidConstant(usize),

    #[error("invalid {kind} operand: {index}")]
    InvalidOperand { kind: &'static str, index: usize },

    #[error("thread state: {0}")]
    ThreadState(#[from] TransitionError),

    #[error("yield outside of a thread")]
    YieldOutsideThread,

    #[error("native error: {0}")]
    Native(String),

    #[error(transparent)]
    Operator(OpError),
}

impl From<OpError> for VmError {
    fn from(err: OpError) -> Self {
        match err {
            OpError::DivisionByZero => VmError::DivisionByZero,
            OpError::IndexOutOfRange { index, len } => VmError::IndexOutOfRange { index, len },
            OpError::Iterator => VmError::IteratorOperation,
            other => VmError::Operator(other),
        }
    }
}

fn arity_bound(variadic: &bool) -> &'static str {
    if *variadic {
        "expected at least"
    } else {
        "expected"
    }
}

impl VmError {
    pub(crate) fn thread_state(from: ThreadState, to: ThreadState) -> Self {
        VmError::ThreadState(TransitionError { from, to })
    }
}

/// Terminal diagnostic of a failed run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{module}:{line}: {kind} (pc {pc})")]
pub struct RuntimeError {
    pub module: String,
    pub line: u32,
    pub pc: usize,
    pub kind: VmError,
}
