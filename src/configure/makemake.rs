// configure/makemake.rs

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::global_variables::{INET_DEFINITIONS, MAKEMAKE, MAKEMAKE_BASE_FLAGS};

/// Link settings for an INET checkout, all relative to the makefile directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InetLink {
    pub root: String,
    pub header_dirs: Vec<String>,
}

/// Flags handed to `opp_makemake`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakemakeFlags {
    includes: Vec<String>,
    link: Vec<String>,
    definitions: Vec<String>,
}

impl MakemakeFlags {
    pub fn new(inet: Option<&InetLink>) -> Self {
        let mut flags = MakemakeFlags {
            includes: Vec::new(),
            link: Vec::new(),
            definitions: Vec::new(),
        };
        if let Some(inet) = inet {
            flags.includes = inet.header_dirs.iter().map(|d| format!("-I{}", d)).collect();
            flags.link = vec![
                format!("-L{}/src", inet.root),
                "-lINET$(D)".to_string(),
                format!("-KINET_PROJ={}", inet.root),
            ];
            flags.definitions = INET_DEFINITIONS.iter().map(|d| d.to_string()).collect();
        }
        flags
    }

    /// Preprocessor definitions only.
    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    pub fn to_args(&self) -> Vec<String> {
        MAKEMAKE_BASE_FLAGS
            .iter()
            .map(|f| f.to_string())
            .chain(self.includes.iter().cloned())
            .chain(self.link.iter().cloned())
            .chain(self.definitions.iter().cloned())
            .collect()
    }
}

/// Generate the makefile by running `opp_makemake` inside `src_dir`.
pub fn run_makemake(src_dir: &Path, flags: &MakemakeFlags) -> Result<()> {
    let args = flags.to_args();
    let rendered = format!("env {} {}", MAKEMAKE, args.join(" "));
    log::info!("Running {} in {}", rendered, src_dir.display());

    let status = Command::new("env")
        .arg(MAKEMAKE)
        .args(&args)
        .current_dir(src_dir)
        .status()
        .map_err(|e| Error::CommandFailed {
            command: rendered.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::CommandFailed {
            command: rendered,
            reason: status.to_string(),
        });
    }
    Ok(())
}
