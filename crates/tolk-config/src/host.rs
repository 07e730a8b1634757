use serde::{Deserialize, Serialize};

use crate::{Lookup, override_parsed};

fn default_request_capacity() -> usize {
    64
}

fn default_message_capacity() -> usize {
    256
}

/// Native messaging host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Buffered requests coming from the extension
    #[serde(default = "default_request_capacity")]
    pub request_capacity: usize,
    /// Buffered messages going to the extension, sized for bursts of page chunks
    #[serde(default = "default_message_capacity")]
    pub message_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            request_capacity: default_request_capacity(),
            message_capacity: default_message_capacity(),
        }
    }
}

impl HostConfig {
    pub fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        override_parsed(lookup, "TOLK_MESSAGE_CAPACITY", &mut self.message_capacity);
    }
}
