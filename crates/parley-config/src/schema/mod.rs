//! Configuration schema types for Parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod model;
mod system;

pub use chat::*;
pub use model::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Parley.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParleyConfig {
    pub model: ModelConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}
