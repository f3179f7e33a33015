//! Execution result types

use tern_types::Value;

/// Result of instruction execution
#[derive(Debug)]
pub(crate) enum ExecutionResult {
    /// Continue to next instruction
    Continue,
    /// Return from the current frame
    Return(Value),
    /// Suspend the running thread
    Yield(Value),
    /// End of the module body
    Halt,
}

/// Why the dispatch loop handed control back to the host
#[derive(Debug)]
pub(crate) enum Exit {
    /// The main program completed
    Finished(Value),
    /// A thread resumed by the host yielded
    Yielded(Value),
    /// A thread resumed by the host returned
    Returned(Value),
}

/// Outcome of resuming a thread from the host
#[derive(Debug, Clone, PartialEq)]
pub enum Resumed {
    Yielded(Value),
    Returned(Value),
}
