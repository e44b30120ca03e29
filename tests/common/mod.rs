use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A Veins checkout next to an optional INET checkout, in a temp dir.
pub struct Workspace {
    _tmp: TempDir,
    pub veins: PathBuf,
    pub inet: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let veins = tmp.path().join("veins");
        fs::create_dir_all(veins.join("src/veins")).unwrap();
        fs::create_dir_all(veins.join("images")).unwrap();
        let inet = tmp.path().join("inet");
        Self {
            _tmp: tmp,
            veins,
            inet,
        }
    }

    /// INET tree with a version marker and a few source directories.
    pub fn with_inet(self, version: &str) -> Self {
        for dir in ["src/inet/common", "src/inet/mobility/base", "src/inet/physical"] {
            fs::create_dir_all(self.inet.join(dir)).unwrap();
        }
        fs::write(self.inet.join("Version"), format!("{}\n", version)).unwrap();
        self
    }

    pub fn config_file(&self) -> PathBuf {
        self.veins.join("out/config.py")
    }

    pub fn cmd(&self, bin: &str) -> Command {
        let mut cmd = Command::cargo_bin(bin).unwrap();
        cmd.current_dir(&self.veins).env("RUST_LOG", "warn");
        cmd
    }
}

pub fn scalar_file(vars: &str, received: u64, erroneous: u64) -> String {
    format!(
        "version 2\nrun r-0\nattr iterationvars2 \"{}\"\n\
         scalar phySim.node[1].nic.phy \tTotal received bits \t{}\n\
         scalar phySim.node[1].nic.phy \tErroneous bits \t{}\n",
        vars, received, erroneous
    )
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
