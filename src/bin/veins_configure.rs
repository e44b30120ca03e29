use clap::Parser;
use std::path::PathBuf;
use std::process;

use veins_toolkit::configure::{configure, ConfigureOptions};
use veins_toolkit::global_variables::EXPECTED_INET_VERSION;

/// Create the Makefile of the Veins sources and the run configuration.
#[derive(Parser, Debug)]
#[command(name = "veins_configure", version)]
struct Cli {
    /// Link with a version of the INET Framework
    #[arg(long, value_name = "DIR")]
    with_inet: Option<PathBuf>,

    /// Abort instead of warning when the INET version differs
    #[arg(long)]
    strict_version: bool,

    #[arg(long, value_name = "VERSION", default_value = EXPECTED_INET_VERSION)]
    expected_inet_version: String,

    /// Only write the run configuration, do not call opp_makemake
    #[arg(long)]
    no_makemake: bool,

    /// Project root holding src/ and images/
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = ConfigureOptions {
        inet: cli.with_inet,
        strict_version: cli.strict_version,
        expected_inet_version: cli.expected_inet_version,
        skip_makemake: cli.no_makemake,
        ..ConfigureOptions::new(cli.root)
    };

    match configure(&options) {
        Ok(outcome) => {
            println!("Makemake flags: {}", outcome.flags.to_args().join(" "));
            println!("Run configuration written to {}", outcome.config_path.display());
            println!("Configure done. You can now run \"make\".");
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
