// runner/command_line.rs

use std::process::Command;

use crate::error::{Error, Result};
use crate::global_variables::{OPP_RUN, OPP_RUN_DEBUG};
use crate::runner::tool::Tool;
use crate::shared_data::RunConfig;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub debug: bool,
    pub tool: Option<Tool>,
    pub verbose: bool,
    pub args: Vec<String>,
}

/// Full command line: wrapping tool, simulation executable, library and
/// model path flags, then the pass-through arguments.
pub fn build_command_line(config: &RunConfig, options: &RunOptions) -> Vec<String> {
    let mut cmdline: Vec<String> = options
        .tool
        .map(|t| t.prefix().iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    cmdline.push(if options.debug { OPP_RUN_DEBUG } else { OPP_RUN }.to_string());
    cmdline.extend(config.run_libs.iter().map(|lib| format!("-l{}", lib)));
    cmdline.push(format!("-n{}", config.run_neds.join(";")));
    if !config.run_imgs.is_empty() {
        cmdline.push(format!("--image-path={}", config.run_imgs.join(";")));
    }

    let passthrough = match options.args.first() {
        Some(first) if first == "--" => &options.args[1..],
        _ => &options.args[..],
    };
    cmdline.extend(passthrough.iter().cloned());
    cmdline
}

pub fn format_command_line(cmdline: &[String]) -> String {
    cmdline
        .iter()
        .map(|arg| format!("\"{}\"", arg))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace the current process with `env <cmdline>`. Only returns on failure.
#[cfg(unix)]
pub fn exec(cmdline: &[String]) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let err = Command::new("env").args(cmdline).exec();
    Err(Error::CommandFailed {
        command: cmdline.join(" "),
        reason: err.to_string(),
    })
}

/// Run `cmdline` to completion and leave with its exit status.
#[cfg(not(unix))]
pub fn exec(cmdline: &[String]) -> Result<()> {
    let (program, rest) = cmdline.split_first().ok_or_else(|| Error::CommandFailed {
        command: String::new(),
        reason: "empty command line".to_string(),
    })?;
    let status = Command::new(program)
        .args(rest)
        .status()
        .map_err(|e| Error::CommandFailed {
            command: cmdline.join(" "),
            reason: e.to_string(),
        })?;
    std::process::exit(status.code().unwrap_or(1));
}
