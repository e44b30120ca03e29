//! Configuration step: locate the optional INET dependency, assemble the
//! makefile flags and persist the run path lists.

pub mod inet;
pub mod makemake;

use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::global_variables::{
    CONFIG_FILE, EXPECTED_INET_VERSION, OWN_IMAGES, OWN_LIB, OWN_NEDS, SOURCE_DIR,
};
use crate::shared_data::RunConfig;
use makemake::{InetLink, MakemakeFlags};

#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    pub project_root: PathBuf,
    pub inet: Option<PathBuf>,
    pub strict_version: bool,
    pub expected_inet_version: String,
    pub skip_makemake: bool,
}

impl ConfigureOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            inet: None,
            strict_version: false,
            expected_inet_version: EXPECTED_INET_VERSION.to_string(),
            skip_makemake: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigureOutcome {
    pub run_config: RunConfig,
    pub flags: MakemakeFlags,
    pub config_path: PathBuf,
}

/// Compute flags and path lists, write the configuration record and
/// (unless skipped) generate the makefile.
pub fn configure(options: &ConfigureOptions) -> Result<ConfigureOutcome> {
    let root = absolute(&options.project_root);
    let src_dir = root.join(SOURCE_DIR);

    let mut run_config = RunConfig {
        run_libs: vec![OWN_LIB.to_string()],
        run_neds: vec![OWN_NEDS.to_string()],
        run_imgs: vec![OWN_IMAGES.to_string()],
    };
    let mut inet_link = None;

    if let Some(inet) = &options.inet {
        let inet_root = normalize(&root.join(inet));
        let version = inet::read_version(&inet_root)?;
        inet::check_version(&version, &options.expected_inet_version, options.strict_version)?;

        let header_dirs = inet::collect_header_dirs(&inet_root, &src_dir)?;
        inet_link = Some(InetLink {
            root: relative_path(&inet_root, &src_dir)
                .to_string_lossy()
                .into_owned(),
            header_dirs,
        });

        let from_root = relative_path(&inet_root, &root);
        let join = |sub: &str| from_root.join(sub).to_string_lossy().into_owned();
        run_config.run_libs.insert(0, join("src/INET"));
        run_config.run_neds.insert(0, join("src"));
        run_config.run_imgs.insert(0, join("images"));
    }

    let flags = MakemakeFlags::new(inet_link.as_ref());
    let config_path = root.join(CONFIG_FILE);
    run_config.save(&config_path)?;
    log::info!("Wrote {}", config_path.display());

    if options.skip_makemake {
        log::info!("Skipping makefile generation");
    } else {
        makemake::run_makemake(&src_dir, &flags)?;
    }

    Ok(ConfigureOutcome {
        run_config,
        flags,
        config_path,
    })
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        normalize(&cwd.join(path))
    }
}

/// Lexically remove `.` and resolve `..` components.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `target` as seen from `base`; both must be absolute or both
/// relative to the same directory.
pub(crate) fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target = normalize(target);
    let base = normalize(base);
    let t: Vec<_> = target.components().collect();
    let b: Vec<_> = base.components().collect();
    let common = t.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();

    let mut out = PathBuf::new();
    for _ in common..b.len() {
        out.push("..");
    }
    for c in &t[common..] {
        out.push(c.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
