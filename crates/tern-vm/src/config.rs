//! VM configuration

use serde::{Deserialize, Serialize};
use tern_types::StackTier;

/// Stack limits for the main context and the default tier for threads.
///
/// Loadable from JSON; missing fields keep their defaults:
///
/// ```json
/// { "max_frames": 512, "thread_tier": "small" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    /// Frame stack capacity of the main context
    pub max_frames: usize,

    /// Register stack capacity of the main context
    pub max_registers: usize,

    /// Tier used by `spawn` when none is named
    pub thread_tier: StackTier,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_frames: 1024,
            max_registers: 65535,
            thread_tier: StackTier::Medium,
        }
    }
}

impl VmConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
