use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::host::HostConfig;
use self::pipeline::PipelineConfig;
use self::translator::TranslationSettings;

pub mod host;
pub mod pipeline;
pub mod translator;

pub use translator::Provider;

/// Source of `TOLK_*` override values, the process environment outside tests
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Parse `name` into `field` when it is set; unparsable values are ignored with a warning
pub(crate) fn override_parsed<T: FromStr>(lookup: Lookup<'_>, name: &str, field: &mut T) {
    let Some(value) = lookup(name) else {
        return;
    };

    match value.trim().parse() {
        Ok(parsed) => *field = parsed,
        Err(_) => tracing::warn!("Ignoring {}={}: not a valid value", name, value),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    /// Settings used when a request does not carry its own
    pub translator: TranslationSettings,
    pub host: HostConfig,
}

impl Config {
    /// Apply `TOLK_*` environment variables on top of a loaded config
    pub fn apply_env(&mut self) {
        self.apply_overrides(&env_lookup);
    }

    pub fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        self.pipeline.apply_overrides(lookup);
        self.translator.apply_overrides(lookup);
        self.host.apply_overrides(lookup);
    }

    /// Load a config file, fields missing from the file keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
