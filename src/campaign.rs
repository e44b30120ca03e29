//! Batch execution of simulation runs for the `-r` step of `veins_analyze`.
//!
//! Every run gets its own scalar file through `--output-scalar-file`, so
//! several runs of the same variant can execute concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::analysis::{channel_data_dir, mui_data_dir, Experiment, DATA_FILE_PREFIX};
use crate::error::{Error, Result};
use crate::generate::runs::{distance_run_count, mui_run_count};
use crate::settings::Settings;

/// File the simulation reads its channel model from.
pub const CHANNEL_TARGET: &str = "channel.xml";

/// A set of runs executed after copying `copy_from` onto `copy_to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub label: String,
    pub copy_from: PathBuf,
    pub copy_to: PathBuf,
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub executable: String,
    pub extra_args: Vec<String>,
    /// Number of runs of every variant
    pub runs: u32,
    /// `[Run N]` sections count from 1, the runs of an iterated
    /// configuration from 0.
    pub first_run: u32,
    pub file_prefix: String,
    pub jobs: usize,
    /// Relative paths are taken from here; the simulation also runs here.
    pub working_dir: PathBuf,
    /// Used when there are no variants.
    pub data_dir: PathBuf,
    /// Empty the data directory before the first run.
    pub clean: bool,
    pub variants: Vec<Variant>,
}

impl Campaign {
    /// Campaign running the runs of `experiment` in the current directory.
    /// Experiments without a generated runs file need `runs`.
    pub fn for_experiment(
        experiment: Experiment,
        settings: &Settings,
        runs: Option<u32>,
        jobs: Option<usize>,
    ) -> Result<Self> {
        let mut campaign = Campaign {
            executable: settings.executable.clone(),
            extra_args: Vec::new(),
            runs: 0,
            first_run: 1,
            file_prefix: DATA_FILE_PREFIX.to_string(),
            jobs: jobs.unwrap_or(settings.jobs),
            working_dir: PathBuf::from("."),
            data_dir: settings.results_dir.clone(),
            clean: true,
            variants: Vec::new(),
        };

        match experiment {
            Experiment::BerChannels => {
                campaign.runs = runs.unwrap_or_else(|| distance_run_count(settings));
                campaign.variants = settings
                    .channels
                    .iter()
                    .map(|channel| Variant {
                        label: channel.label.clone(),
                        copy_from: PathBuf::from(&channel.file),
                        copy_to: PathBuf::from(CHANNEL_TARGET),
                        data_dir: channel_data_dir(&settings.results_dir, channel.id),
                    })
                    .collect();
            }
            Experiment::Mui => {
                campaign.runs = runs.unwrap_or_else(|| mui_run_count(settings));
                campaign.data_dir = mui_data_dir(&settings.results_dir);
            }
            _ => {
                campaign.runs = runs.ok_or_else(|| {
                    Error::InvalidParameter(format!("{} needs the number of runs (--runs)", experiment))
                })?;
                campaign.extra_args = vec![
                    "-c".to_string(),
                    experiment.name().to_string(),
                    "-u".to_string(),
                    "Cmdenv".to_string(),
                ];
                campaign.file_prefix = experiment.name().to_string();
                campaign.first_run = 0;
                // shared with the other experiments
                campaign.clean = false;
            }
        }
        Ok(campaign)
    }

    /// Run numbers passed to `-r`, in order.
    pub fn run_numbers(&self) -> std::ops::Range<u32> {
        self.first_run..self.first_run + self.runs
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.working_dir.join(path)
    }

    /// Scalar file written by `run`.
    pub fn output_file(&self, data_dir: &Path, run: u32) -> PathBuf {
        self.resolve(data_dir)
            .join(format!("{}-{}.sca", self.file_prefix, run))
    }

    fn command_for(&self, data_dir: &Path, run: u32) -> Vec<String> {
        let mut args = vec!["-r".to_string(), run.to_string()];
        args.extend(self.extra_args.iter().cloned());
        args.push(format!(
            "--output-scalar-file={}",
            self.output_file(data_dir, run).display()
        ));
        args
    }
}

fn prepare_data_dir(dir: &Path, clean: bool) -> Result<()> {
    if clean && dir.exists() {
        log::info!("Removing previous results in {}", dir.display());
        fs::remove_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

fn failure(command: &str, status: std::io::Result<ExitStatus>) -> Option<Error> {
    let reason = match status {
        Ok(status) if status.success() => return None,
        Ok(status) => format!("exited with {}", status),
        Err(e) => e.to_string(),
    };
    Some(Error::CommandFailed {
        command: command.to_string(),
        reason,
    })
}

/// Execute every run of `campaign.run_numbers()` into `data_dir`, at most `jobs` at a time.
/// The first failure cancels the remaining runs.
async fn run_batch(campaign: &Campaign, data_dir: &Path) -> Result<Vec<PathBuf>> {
    prepare_data_dir(&campaign.resolve(data_dir), campaign.clean)?;

    let semaphore = Arc::new(Semaphore::new(campaign.jobs.max(1)));
    let mut set = JoinSet::new();
    let mut produced = Vec::new();

    for (done, run) in campaign.run_numbers().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| Error::CommandFailed {
                command: campaign.executable.clone(),
                reason: e.to_string(),
            })?;

        // Reap finished runs so a failure stops the batch early.
        while let Some(joined) = set.try_join_next() {
            check_joined(joined)?;
        }

        let args = campaign.command_for(data_dir, run);
        let rendered = format!("{} {}", campaign.executable, args.join(" "));
        log::info!("Run {}/{}: {}", done + 1, campaign.runs, rendered);

        let mut cmd = Command::new(&campaign.executable);
        cmd.args(&args)
            .current_dir(&campaign.working_dir)
            .kill_on_drop(true);
        set.spawn(async move {
            let status = cmd.status().await;
            drop(permit);
            (rendered, status)
        });
        produced.push(campaign.output_file(data_dir, run));
    }

    while let Some(joined) = set.join_next().await {
        check_joined(joined)?;
    }
    Ok(produced)
}

fn check_joined(
    joined: std::result::Result<(String, std::io::Result<ExitStatus>), tokio::task::JoinError>,
) -> Result<()> {
    let (command, status) = joined.map_err(|e| Error::CommandFailed {
        command: "simulation run".to_string(),
        reason: e.to_string(),
    })?;
    match failure(&command, status) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Execute the whole campaign, variants strictly one after the other,
/// and return the scalar files written.
pub async fn run_campaign(campaign: &Campaign) -> Result<Vec<PathBuf>> {
    if campaign.variants.is_empty() {
        return run_batch(campaign, &campaign.data_dir).await;
    }

    let mut produced = Vec::new();
    for variant in &campaign.variants {
        let from = campaign.resolve(&variant.copy_from);
        let to = campaign.resolve(&variant.copy_to);
        log::info!("{}: copying {} to {}", variant.label, from.display(), to.display());
        fs::copy(&from, &to).map_err(|e| Error::io(&from, e))?;
        produced.extend(run_batch(campaign, &variant.data_dir).await?);
    }
    Ok(produced)
}
