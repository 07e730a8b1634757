use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Lookup, override_parsed};

fn default_separator() -> String {
    "[[[SEP]]]".to_string()
}

fn default_max_chars() -> usize {
    3500
}

fn default_max_items_per_chunk() -> usize {
    40
}

fn default_chunks_per_pass() -> usize {
    8
}

fn default_inter_call_delay_ms() -> u64 {
    250
}

fn default_max_depth() -> usize {
    3
}

fn default_request_timeout_seconds() -> u64 {
    60
}

/// Limits and pacing of the batch translation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sentinel placed between fragments of a joined request
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_max_items_per_chunk")]
    pub max_items_per_chunk: usize,
    #[serde(default = "default_chunks_per_pass")]
    pub chunks_per_pass: usize,
    /// Pause between consecutive provider calls
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,
    /// Bisection depth before falling back to per-item translation
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            max_chars: default_max_chars(),
            max_items_per_chunk: default_max_items_per_chunk(),
            chunks_per_pass: default_chunks_per_pass(),
            inter_call_delay_ms: default_inter_call_delay_ms(),
            max_depth: default_max_depth(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl PipelineConfig {
    /// Replace the fields whose variable is set
    pub fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        if let Some(separator) = lookup("TOLK_SEPARATOR").filter(|v| !v.is_empty()) {
            self.separator = separator;
        }

        override_parsed(lookup, "TOLK_MAX_CHARS", &mut self.max_chars);
        override_parsed(lookup, "TOLK_MAX_ITEMS", &mut self.max_items_per_chunk);
        override_parsed(lookup, "TOLK_CHUNKS_PER_PASS", &mut self.chunks_per_pass);
        override_parsed(lookup, "TOLK_DELAY_MS", &mut self.inter_call_delay_ms);
        override_parsed(lookup, "TOLK_MAX_DEPTH", &mut self.max_depth);
        override_parsed(lookup, "TOLK_TIMEOUT_SECONDS", &mut self.request_timeout_seconds);
    }

    pub fn inter_call_delay(&self) -> Duration {
        Duration::from_millis(self.inter_call_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
