// global_variables.rs

// Generated configuration record, relative to the project root
pub const CONFIG_FILE: &str = "out/config.py";

// Project layout
pub const SOURCE_DIR: &str = "src";
pub const OWN_LIB: &str = "src/veins";
pub const OWN_NEDS: &str = "src/veins";
pub const OWN_IMAGES: &str = "images";

// INET dependency
pub const INET_VERSION_FILE: &str = "Version";
pub const EXPECTED_INET_VERSION: &str = "inet-4.2.1";
pub const INET_DEFINITIONS: [&str; 2] = ["-DINET_IMPORT", "-DWITH_INET"];

// opp_makemake invocation
pub const MAKEMAKE: &str = "opp_makemake";
pub const MAKEMAKE_BASE_FLAGS: [&str; 12] = [
    "-f",
    "--deep",
    "--no-deep-includes",
    "--make-so",
    "-I",
    ".",
    "-o",
    "veins",
    "-O",
    "out",
    "-p",
    "VEINS",
];

// Simulation executables
pub const OPP_RUN: &str = "opp_run";
pub const OPP_RUN_DEBUG: &str = "opp_run_dbg";

// Analysis defaults
pub const DEFAULT_SETTINGS_FILE: &str = "analysis.toml";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_FIGURES_DIR: &str = "figures";
pub const DEFAULT_EXECUTABLE: &str = "./ieee802154a";
pub const DEFAULT_NETWORK: &str = "phySim";
