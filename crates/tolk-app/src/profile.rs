use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tolk_config::Config;

/// `TOLK_HOME`, or `~/.config/tolk`
pub fn tolk_root() -> anyhow::Result<PathBuf> {
    if let Ok(home) = env::var("TOLK_HOME") {
        return Ok(PathBuf::from(home));
    }

    let home = env::var("HOME").context("Neither TOLK_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".config").join("tolk"))
}

fn profiles_dir(root: &Path) -> PathBuf {
    root.join("profiles")
}

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let profile: Profile =
        serde_json::from_str(&data).with_context(|| format!("Invalid profile {}", path.display()))?;
    Ok(profile.value)
}

/// Create the profiles folder and a main profile from the built-in defaults if missing.
///
/// The seed never includes environment overrides, so credentials from `TOLK_*` stay off disk.
pub fn init_user_config(root: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(profiles_dir(root))?;

    let main_profile = profiles_dir(root).join("main.json");

    if !main_profile.exists() {
        let profile = Profile {
            name: "main".into(),
            value: Config::default(),
        };
        fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
        tracing::info!("Created main profile at {}", main_profile.display());
    }

    Ok(())
}

/// Load a user profile by name, defaulting to main, then to built-in defaults
pub fn load_user_profile(root: &Path, name: &str) -> anyhow::Result<Config> {
    let profile_file = profiles_dir(root).join(format!("{name}.json"));

    if profile_file.exists() {
        return read_profile(&profile_file);
    }

    tracing::warn!("Profile {name} not found, falling back to main profile or defaults");
    let main_file = profiles_dir(root).join("main.json");
    if main_file.exists() {
        read_profile(&main_file)
    } else {
        Ok(Config::default())
    }
}

/// Config for this run: an explicit file wins over the named profile, `TOLK_*` variables win over both
pub fn load_config(config_file: Option<&Path>, profile: &str) -> anyhow::Result<Config> {
    let mut config = load_stored_config(config_file, profile)?;
    config.apply_env();
    Ok(config)
}

fn load_stored_config(config_file: Option<&Path>, profile: &str) -> anyhow::Result<Config> {
    if let Some(path) = config_file {
        return Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()));
    }

    let root = tolk_root()?;
    if let Err(e) = init_user_config(&root) {
        tracing::warn!("Could not initialize profiles in {}: {}", root.display(), e);
    }
    load_user_profile(&root, profile)
}
