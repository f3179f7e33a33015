//! Runtime values for the tern VM
//!
//! Shared between the compiler (function templates, literals) and the VM
//! (registers, captured variables, threads).

pub mod function;
pub mod iter;
pub mod ops;
pub mod sync;
pub mod thread;
pub mod value;

// Re-exports
pub use function::{Closure, EnumDef, FreeVarDesc, NativeFunction, Prototype};
pub use iter::ValueIter;
pub use ops::OpError;
pub use thread::{StackTier, Thread, ThreadRef, ThreadState, TransitionError};
pub use value::Value;
