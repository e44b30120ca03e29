//! INI fragments consumed by the UWB-IR example's `omnetpp.ini`.
//!
//! The channel sweep and multi-user experiments get an RNG mapping and a
//! list of runs; interference experiments get a node placement.

pub mod positions;
pub mod rng;
pub mod runs;

use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::Experiment;
use crate::error::{Error, Result};
use crate::settings::Settings;
pub use positions::PositionParams;
use rng::RngLayout;

pub const RNG_FILE: &str = "omnetpp_rng.ini";
pub const RUNS_FILE: &str = "omnetpp_runs.ini";

/// Node placement written to `<config>_positions.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// Interferers on a circle of swept radius
    Circle,
    /// Nodes on a line, one every step
    Line,
    /// Interferers drawn uniformly over a disc
    Disc,
}

impl Layout {
    /// Placement used by a configuration when none is asked for.
    pub fn for_config(config: &str) -> Option<Layout> {
        match config {
            "MAICircleR" => Some(Layout::Circle),
            "cmpPCM1D" => Some(Layout::Line),
            "MAIUnif" => Some(Layout::Disc),
            _ => None,
        }
    }
}

pub fn positions_file(config: &str) -> String {
    format!("{}_positions.ini", config)
}

fn write(path: PathBuf, content: &str) -> Result<PathBuf> {
    fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
    log::info!("Wrote {}", path.display());
    Ok(path)
}

fn rng_layout(settings: &Settings) -> RngLayout {
    RngLayout {
        phy: settings.phy_rngs,
        mac: settings.mac_rngs,
        app: settings.app_rngs,
    }
}

/// Write the files configuration `config` needs into `out_dir` and return
/// their paths.
pub fn generate(
    config: &str,
    layout: Option<Layout>,
    params: &PositionParams,
    settings: &Settings,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| Error::io(out_dir, e))?;
    let net = &settings.network;
    match config.parse::<Experiment>() {
        Ok(Experiment::BerChannels) => Ok(vec![
            write(out_dir.join(RNG_FILE), &rng::rng_ini(net, 2, rng_layout(settings)))?,
            write(out_dir.join(RUNS_FILE), &runs::distance_runs_ini(settings))?,
        ]),
        Ok(Experiment::Mui) => Ok(vec![
            write(
                out_dir.join(RNG_FILE),
                &rng::rng_ini(net, settings.nb_sources + 1, rng_layout(settings)),
            )?,
            write(out_dir.join(RUNS_FILE), &runs::mui_runs_ini(settings))?,
        ]),
        _ => {
            let layout = layout.or_else(|| Layout::for_config(config)).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "nothing to generate for {}; choose a placement with --layout",
                    config
                ))
            })?;
            let content = match layout {
                Layout::Circle => positions::mai_circle_r(config, net, params)?,
                Layout::Line => positions::pcm_1d(config, net, params)?,
                Layout::Disc => positions::uniform_disc(config, net, params, settings.seed)?,
            };
            Ok(vec![write(out_dir.join(positions_file(config)), &content)?])
        }
    }
}
