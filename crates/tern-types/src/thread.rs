//! Thread (coroutine) records
//!
//! A thread is a function plus its own frame and register stacks. The VM owns
//! the execution machinery; this record only tracks lifecycle state and holds
//! the suspended execution context while the thread is not running. The
//! context is stored type-erased so this crate does not depend on the VM.

use crate::function::Closure;
use crate::sync::{shared, Arc, Shared};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreadState {
    /// Created, never run
    Ready,
    /// Holds the execution cursor
    Running,
    /// Yielded, resumable
    Suspended,
    /// Blocked on something outside the VM, resumable
    Waiting,
    /// Returned, failed or closed; terminal
    Closed,
}

impl ThreadState {
    pub fn can_transition(self, to: ThreadState) -> bool {
        use ThreadState::*;
        matches!(
            (self, to),
            (Ready, Running)
                | (Ready, Closed)
                | (Running, Suspended)
                | (Running, Waiting)
                | (Running, Closed)
                | (Suspended, Running)
                | (Suspended, Waiting)
                | (Suspended, Closed)
                | (Waiting, Running)
                | (Waiting, Closed)
        )
    }

    pub fn is_resumable(self) -> bool {
        matches!(
            self,
            ThreadState::Ready | ThreadState::Suspended | ThreadState::Waiting
        )
    }
}

/// Stack size classes a thread can be spawned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl StackTier {
    /// Frame stack capacity
    pub fn frames(self) -> usize {
        match self {
            StackTier::Small => 64,
            StackTier::Medium => 256,
            StackTier::Large => 1024,
        }
    }

    /// Register stack capacity
    pub fn registers(self) -> usize {
        match self {
            StackTier::Small => 1024,
            StackTier::Medium => 8192,
            StackTier::Large => 65535,
        }
    }

    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(StackTier::Small),
            1 => Some(StackTier::Medium),
            2 => Some(StackTier::Large),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            StackTier::Small => 0,
            StackTier::Medium => 1,
            StackTier::Large => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move thread from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: ThreadState,
    pub to: ThreadState,
}

pub struct Thread {
    state: ThreadState,
    tier: StackTier,
    entry: Arc<Closure>,
    saved: Option<Box<dyn Any>>,
}

/// Shared handle stored in `Value::Thread`
pub type ThreadRef = Shared<Thread>;

impl Thread {
    pub fn new(entry: Arc<Closure>, tier: StackTier) -> Self {
        Self {
            state: ThreadState::Ready,
            tier,
            entry,
            saved: None,
        }
    }

    pub fn new_ref(entry: Arc<Closure>, tier: StackTier) -> ThreadRef {
        shared(Self::new(entry, tier))
    }

    /// Current lifecycle state (no side effects)
    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn tier(&self) -> StackTier {
        self.tier
    }

    pub fn entry(&self) -> &Arc<Closure> {
        &self.entry
    }

    /// Move to `to`, returning the previous state
    pub fn transition(&mut self, to: ThreadState) -> Result<ThreadState, TransitionError> {
        let from = self.state;
        if !from.can_transition(to) {
            return Err(TransitionError { from, to });
        }
        self.state = to;
        if to == ThreadState::Closed {
            self.saved = None;
        }
        Ok(from)
    }

    /// Mark a suspended thread as blocked on an external event
    pub fn wait(&mut self) -> Result<(), TransitionError> {
        if self.state != ThreadState::Suspended {
            return Err(TransitionError {
                from: self.state,
                to: ThreadState::Waiting,
            });
        }
        self.transition(ThreadState::Waiting).map(|_| ())
    }

    /// Park the VM's execution context while the thread is off the cursor
    pub fn save_context(&mut self, context: Box<dyn Any>) {
        self.saved = Some(context);
    }

    pub fn take_context(&mut self) -> Option<Box<dyn Any>> {
        self.saved.take()
    }
}

impl fmt::Debug for Thread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thread")
            .field("state", &self.state)
            .field("tier", &self.tier)
            .field("entry", &self.entry.proto.name)
            .finish()
    }
}
