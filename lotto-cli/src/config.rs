use anyhow::Context;
use lotto_core::LotteryConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "lotto.json";

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lotto")
}

/// An explicit `--config` path must exist; otherwise `<data_dir>/lotto.json`
/// is used when present, and defaults when not.
pub fn load_config(data_dir: &Path, explicit: Option<&Path>) -> anyhow::Result<LotteryConfig> {
    match explicit {
        Some(path) => LotteryConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let path = data_dir.join(CONFIG_FILE);
            LotteryConfig::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
    }
}
