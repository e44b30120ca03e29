use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

use veins_toolkit::analysis::{analyze, Experiment};
use veins_toolkit::campaign::{run_campaign, Campaign};
use veins_toolkit::generate::{generate, Layout, PositionParams};
use veins_toolkit::results::VectorFile;
use veins_toolkit::settings::Settings;
use veins_toolkit::Result;

/// Generate, run and analyze the IEEE 802.15.4A UWB-IR experiments.
///
/// Without -g, -r or -a the results are analyzed.
#[derive(Parser, Debug)]
#[command(name = "veins_analyze", version)]
struct Cli {
    /// Generate the ini files of the selected configuration
    #[arg(short, long)]
    generate: bool,

    /// Execute the simulation runs
    #[arg(short, long)]
    run: bool,

    /// Analyze the simulation results
    #[arg(short, long)]
    analyze: bool,

    /// Configuration to work on, as named in omnetpp.ini
    #[arg(short, long, value_name = "EXPERIMENT", required_unless_present = "vectors")]
    config: Option<String>,

    /// Experiment settings (default: analysis.toml when present)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[arg(short, long, value_name = "N", default_value_t = 0)]
    nb_nodes: u32,

    #[arg(short = 'm', long, value_name = "METERS", default_value_t = 0)]
    rmin: u32,

    #[arg(short = 'M', long, value_name = "METERS", default_value_t = 0)]
    rmax: u32,

    #[arg(short, long, value_name = "METERS", default_value_t = 0)]
    step: u32,

    /// Node placement (default depends on the configuration)
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// Directory receiving the generated ini files
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Number of runs, for configurations without a generated runs file
    #[arg(long)]
    runs: Option<u32>,

    /// Simulations running at once
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Summarize the vectors of a .vec file
    #[arg(long, value_name = "FILE")]
    vectors: Option<PathBuf>,
}

fn summarize_vectors(path: &Path) -> Result<()> {
    let file = VectorFile::read(path)?;
    println!("{} vectors in {}", file.vectors.len(), path.display());
    for series in file.vectors.values() {
        match series.summary() {
            Some(s) => println!(
                "  [{}] {} {}: count={} mean={:.6} min={:.6} max={:.6}",
                series.id, series.module, series.name, s.count, s.mean, s.min, s.max
            ),
            None => println!("  [{}] {} {}: no samples", series.id, series.module, series.name),
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.vectors {
        summarize_vectors(path)?;
    }
    let Some(config) = cli.config.as_deref() else {
        return Ok(());
    };

    let settings = Settings::discover(cli.settings.as_deref())?;
    let analyze_only = !(cli.generate || cli.run || cli.analyze);

    if cli.generate {
        let params = PositionParams {
            nb_nodes: cli.nb_nodes,
            rmin: cli.rmin,
            rmax: cli.rmax,
            step: cli.step,
        };
        for path in generate(config, cli.layout, &params, &settings, &cli.output_dir)? {
            println!("Generated {}", path.display());
        }
    }

    if cli.run {
        let experiment: Experiment = config.parse()?;
        let campaign = Campaign::for_experiment(experiment, &settings, cli.runs, cli.jobs)?;
        let files = run_campaign(&campaign).await?;
        println!("{} runs of {} completed", files.len(), experiment);
    }

    if cli.analyze || analyze_only {
        let experiment: Experiment = config.parse()?;
        let report = analyze(experiment, &settings)?;
        println!("Table saved to {}", report.csv.display());
        for figure in &report.figures {
            println!("Figure saved to {}", figure.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
