use clap::Parser;
use std::path::PathBuf;
use std::process;

use veins_toolkit::global_variables::CONFIG_FILE;
use veins_toolkit::runner::{build_command_line, exec, format_command_line, RunOptions, Tool};
use veins_toolkit::shared_data::RunConfig;
use veins_toolkit::{Error, Result};

/// Run a Veins simulation with the paths found by veins_configure.
#[derive(Parser, Debug)]
#[command(name = "veins_run", version)]
struct Cli {
    /// Run the debug build (opp_run_dbg)
    #[arg(short, long)]
    debug: bool,

    /// Wrap the simulation in a debugger or profiler
    #[arg(short, long, value_enum)]
    tool: Option<Tool>,

    /// Print the command line before running it
    #[arg(short, long)]
    verbose: bool,

    /// Print the command line and exit
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Run configuration (default: <root>/out/config.py)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Arguments passed on to the simulation
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(|| cli.root.join(CONFIG_FILE));
    let config = RunConfig::load(&config_path).map_err(|e| match e {
        Error::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
            Error::Io {
                path,
                source: std::io::Error::new(
                    source.kind(),
                    "run configuration not found, run veins_configure first",
                ),
            }
        }
        other => other,
    })?;

    let options = RunOptions {
        debug: cli.debug,
        tool: cli.tool,
        verbose: cli.verbose,
        args: cli.args,
    };
    let cmdline = build_command_line(&config.resolve(&cli.root), &options);

    if options.verbose || cli.dry_run {
        println!("Running with command line arguments: {}", format_command_line(&cmdline));
    }
    if cli.dry_run {
        return Ok(());
    }
    log::debug!("exec {:?}", cmdline);
    exec(&cmdline)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
