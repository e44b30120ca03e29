// src/shared_data.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Path lists produced by the configure step and consumed by every run.
///
/// Persisted as assignment statements, one per key:
///
/// ```text
/// run_libs = ["../inet/src/INET","src/veins"]
/// run_neds = ["../inet/src","src/veins"]
/// run_imgs = ["../inet/images","images"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub run_libs: Vec<String>,
    pub run_neds: Vec<String>,
    pub run_imgs: Vec<String>,
}

impl RunConfig {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, values) in [
            ("run_libs", &self.run_libs),
            ("run_neds", &self.run_neds),
            ("run_imgs", &self.run_imgs),
        ] {
            // A Vec<String> always serializes.
            let list = serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string());
            out.push_str(&format!("{} = {}\n", key, list));
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut libs = None;
        let mut neds = None;
        let mut imgs = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| Error::MalformedConfig {
                line: idx + 1,
                message: "expected `key = [...]`".to_string(),
            })?;
            let key = key.trim();
            let values: Vec<String> =
                serde_json::from_str(value.trim()).map_err(|e| Error::MalformedConfig {
                    line: idx + 1,
                    message: format!("value of `{}` is not a list of strings ({})", key, e),
                })?;
            match key {
                "run_libs" => libs = Some(values),
                "run_neds" => neds = Some(values),
                "run_imgs" => imgs = Some(values),
                other => log::warn!("Ignoring unknown configuration key `{}`", other),
            }
        }

        Ok(RunConfig {
            run_libs: libs.ok_or(Error::MissingConfigKey("run_libs"))?,
            run_neds: neds.ok_or(Error::MissingConfigKey("run_neds"))?,
            run_imgs: imgs.unwrap_or_default(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }
        fs::write(path, self.render()).map_err(|e| Error::io(path, e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text)
    }

    /// Join every relative entry onto `root`, leaving absolute entries as they are.
    pub fn resolve(&self, root: &Path) -> RunConfig {
        let join = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|v| {
                    let p = PathBuf::from(v);
                    if p.is_absolute() {
                        v.clone()
                    } else {
                        root.join(p).to_string_lossy().into_owned()
                    }
                })
                .collect()
        };
        RunConfig {
            run_libs: join(&self.run_libs),
            run_neds: join(&self.run_neds),
            run_imgs: join(&self.run_imgs),
        }
    }
}
