// analysis/experiment.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;
use crate::results::scalar::{BitCountMode, IterationVar, RunHeader};

/// Receiver label used when a file does not name its receiver.
const DEFAULT_RECEIVER: &str = "3dB";

/// Experiments configured in the UWB-IR example's `omnetpp.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Experiment {
    /// BER against distance, one line per receiver and channel
    BerDistance,
    /// BER against distance, one line per receiver sensitivity
    Sensitivity,
    /// BER against the number of interferers placed on a circle
    MaiCircleN,
    /// BER against the radius of the interferer circle
    MaiCircleR,
    /// BER against the number of uniformly placed interferers
    MaiUnif,
    /// Multi-user interference: all runs in a single scalar file
    Mui,
    /// BER against distance, one data directory per channel model
    BerChannels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    LogLog,
    SemiLogY,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotStyle {
    pub title: Option<&'static str>,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub scale: Scale,
}

impl Experiment {
    pub const ALL: [Experiment; 7] = [
        Experiment::BerDistance,
        Experiment::Sensitivity,
        Experiment::MaiCircleN,
        Experiment::MaiCircleR,
        Experiment::MaiUnif,
        Experiment::Mui,
        Experiment::BerChannels,
    ];

    /// Configuration name, also the prefix of its result files.
    pub fn name(self) -> &'static str {
        match self {
            Experiment::BerDistance => "BERDistance",
            Experiment::Sensitivity => "Sensitivity",
            Experiment::MaiCircleN => "MAICircleN",
            Experiment::MaiCircleR => "MAICircleR",
            Experiment::MaiUnif => "MAIUnif",
            Experiment::Mui => "MUI",
            Experiment::BerChannels => "BERChannels",
        }
    }

    /// Iteration variables each result file must carry.
    pub fn required_vars(self) -> &'static [IterationVar] {
        use IterationVar::*;
        match self {
            Experiment::BerDistance => &[Distance, Channel, Repetition],
            Experiment::Sensitivity => &[Distance, Channel, Receiver, Repetition],
            Experiment::MaiCircleN | Experiment::MaiCircleR => {
                &[NbNodes, Range, Channel, Receiver, Repetition]
            }
            Experiment::MaiUnif => &[NbNodes, Channel, Receiver, Repetition],
            Experiment::Mui | Experiment::BerChannels => &[],
        }
    }

    /// The distance sweep logs a counter pair on every node and counts
    /// them all; the others read the receiver's pair only.
    pub fn bit_count_mode(self) -> BitCountMode {
        match self {
            Experiment::BerDistance => BitCountMode::Sum,
            _ => BitCountMode::FirstPair,
        }
    }

    /// Whether results are one `<name>-*.sca` file per run, found by globbing.
    pub fn uses_run_files(self) -> bool {
        !matches!(self, Experiment::Mui | Experiment::BerChannels)
    }

    /// X coordinate of a run described by `header`.
    pub fn x_of(self, header: &RunHeader) -> Option<u32> {
        match self {
            Experiment::BerDistance | Experiment::Sensitivity => header.distance,
            // the receiver is one of the nodes
            Experiment::MaiCircleN | Experiment::MaiUnif => {
                header.nb_nodes.map(|n| n.saturating_sub(1))
            }
            Experiment::MaiCircleR => header.range,
            Experiment::Mui | Experiment::BerChannels => None,
        }
    }

    /// Legend label of the series a run belongs to.
    pub fn series_of(self, header: &RunHeader) -> String {
        let receiver = header.receiver.as_deref().unwrap_or(DEFAULT_RECEIVER);
        let channel = header.channel.as_deref().unwrap_or("");
        match self {
            Experiment::Sensitivity => receiver.to_string(),
            _ => format!("{} {}", receiver, channel).trim_end().to_string(),
        }
    }

    pub fn plot_style(self) -> PlotStyle {
        let (x_label, scale) = match self {
            Experiment::BerDistance | Experiment::Sensitivity | Experiment::BerChannels => {
                ("Distance", Scale::LogLog)
            }
            Experiment::MaiCircleN | Experiment::MaiUnif => ("Active nodes", Scale::SemiLogY),
            Experiment::MaiCircleR => ("Distance of interferers", Scale::SemiLogY),
            Experiment::Mui => ("Concurrent transmissions", Scale::SemiLogY),
        };
        PlotStyle {
            title: match self {
                Experiment::Mui => Some("Robustness to Multiple Access Interference"),
                _ => None,
            },
            x_label,
            y_label: "Bit Error Rate",
            scale,
        }
    }

    pub fn results_pattern(self, results_dir: &Path) -> String {
        results_dir
            .join(format!("{}-*.sca", self.name()))
            .to_string_lossy()
            .into_owned()
    }

    pub fn figure_dir(self, figures_dir: &Path) -> PathBuf {
        figures_dir.join(self.name())
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Experiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Experiment::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownExperiment(s.to_string()))
    }
}
