//! Experiment settings loaded from an optional TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::global_variables::{
    DEFAULT_EXECUTABLE, DEFAULT_FIGURES_DIR, DEFAULT_NETWORK, DEFAULT_RESULTS_DIR,
    DEFAULT_SETTINGS_FILE,
};

/// A channel model swept by the per-channel BER experiment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChannelModel {
    /// Model file copied onto `channel.xml` before its runs
    pub file: String,
    /// Legend text
    pub label: String,
    /// Number used in the data directory name (`CM<id>`)
    pub id: u32,
}

impl ChannelModel {
    fn new(id: u32, label: &str) -> Self {
        Self {
            file: format!("channel-CM{}.xml", id),
            label: label.to_string(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub results_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub executable: String,
    pub network: String,
    pub nb_packets: u32,
    pub runs_per_config: u32,
    pub payload_size: u32,
    pub distances: Vec<u32>,
    pub phy_rngs: u32,
    pub mac_rngs: u32,
    pub app_rngs: u32,
    pub nb_sources: u32,
    /// Hosts declared by the multi-user runs file
    pub mui_hosts: u32,
    pub channels: Vec<ChannelModel>,
    /// Simulation runs in flight at once during the run step
    pub jobs: usize,
    /// Seed for random node placement
    pub seed: u64,
    pub plot_width: u32,
    pub plot_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            figures_dir: PathBuf::from(DEFAULT_FIGURES_DIR),
            executable: DEFAULT_EXECUTABLE.to_string(),
            network: DEFAULT_NETWORK.to_string(),
            nb_packets: 5,
            runs_per_config: 2,
            payload_size: 100,
            distances: vec![7, 50, 100],
            phy_rngs: 6,
            mac_rngs: 1,
            app_rngs: 1,
            nb_sources: 5,
            mui_hosts: 11,
            channels: vec![
                ChannelModel::new(1, "CM1 Residential LOS"),
                ChannelModel::new(2, "CM2 - Residential NLOS"),
                ChannelModel::new(3, "CM3 - Office LOS"),
                ChannelModel::new(5, "CM5 - Outdoor LOS"),
                ChannelModel::new(6, "CM6 - Outdoor NLOS"),
                ChannelModel::new(7, "CM7 - Open Outdoor NLOS"),
            ],
            jobs: 1,
            seed: 13,
            plot_width: 1600,
            plot_height: 1200,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    /// An explicit file must exist; otherwise `analysis.toml` in the working
    /// directory is used when present, and built-in defaults when not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_SETTINGS_FILE);
                if default_path.exists() {
                    log::info!("Using settings from {}", default_path.display());
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn rngs_per_node(&self) -> u32 {
        self.phy_rngs + self.mac_rngs + self.app_rngs
    }
}
