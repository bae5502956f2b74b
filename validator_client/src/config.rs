use serde_derive::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_HTTP_SERVER: &str = "http://localhost:5052/";
/// Path to the slashing protection database within the datadir.
pub const SLASHING_PROTECTION_FILENAME: &str = "slashing_protection.sqlite";

/// Core configuration for a validator instance. Populating this from a CLI/YAML layer is an
/// external-collaborator concern (`spec.md` §1) — callers build one directly or via
/// `Default::default()` plus field assignment.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the slashing-protection database and any other per-validator state.
    pub data_dir: PathBuf,
    /// The http endpoint of the beacon node's validator API.
    pub http_server: String,
    /// If true, the duties engine keeps polling even while the beacon node reports `syncing`.
    pub allow_unsynced_beacon_node: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            http_server: DEFAULT_HTTP_SERVER.to_string(),
            allow_unsynced_beacon_node: false,
        }
    }
}

impl Config {
    pub fn slashing_protection_path(&self) -> PathBuf {
        self.data_dir.join(SLASHING_PROTECTION_FILENAME)
    }
}
