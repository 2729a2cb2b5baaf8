use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crease_ledger::Ledger;
use crease_types::{MatchConfig, MatchId};

/// On-disk form of one match: its configuration and its ledger, together.
///
/// The ledger is the source of truth; everything else is refolded from it
/// on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFile {
    pub config: MatchConfig,
    pub ledger: Ledger,
}

impl MatchFile {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            ledger: Ledger::new(MatchId::new()),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading match file {}", path.display()))?;
        let file: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing match file {}", path.display()))?;
        Ok(file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).context("serializing match file")?;
        fs::write(path, raw).with_context(|| format!("writing match file {}", path.display()))?;
        Ok(())
    }
}

/// Load a [`MatchConfig`] from TOML.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<MatchConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: MatchConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
