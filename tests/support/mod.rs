#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "LOCALE_MERGE_ROOT",
    "LOCALE_MERGE_LOCALES_DIR",
    "LOCALE_MERGE_OVERRIDES_DIR",
    "LOCALE_MERGE_GLOSSARY_DIR",
    "LOCALE_MERGE_FALLBACK",
    "LOCALE_MERGE_LANGUAGES",
    "LOCALE_MERGE_LOG_JSON",
];

// A throwaway documentation site with assets/locales and an overrides tree.
pub struct TempSite {
    dir: TempDir,
}

impl TempSite {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("failed to create temp site")?;
        fs::create_dir_all(dir.path().join("assets/locales/overrides"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn locales_dir(&self) -> PathBuf {
        self.root().join("assets/locales")
    }

    pub fn locale_path(&self, code: &str) -> PathBuf {
        self.locales_dir().join(format!("{code}.json"))
    }

    pub fn write_locale(&self, code: &str, value: &Value) -> Result<PathBuf> {
        let path = self.locale_path(code);
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    pub fn write_raw_locale(&self, code: &str, contents: &str) -> Result<PathBuf> {
        let path = self.locale_path(code);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_override(&self, set: &str, language: &str, value: &Value) -> Result<PathBuf> {
        let dir = self.locales_dir().join("overrides").join(set);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{language}.json"));
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    pub fn write_glossary(&self, language: &str, value: &Value) -> Result<PathBuf> {
        let dir = self.locales_dir().join("glossary");
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{language}.json"));
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(path)
    }

    pub fn read_locale(&self, code: &str) -> Result<Value> {
        read_value(&self.locale_path(code))
    }

    /// The binary with a clean environment and `--root` pointing here.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(bin_path());
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("LOCALE_MERGE_LOG", "warn")
            .current_dir(self.root())
            .arg("--root")
            .arg(self.root());
        cmd
    }
}

pub fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_locale-merge"))
}

pub fn read_value(path: &Path) -> Result<Value> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&data)?)
}

pub fn run_command(cmd: Command) -> Result<Output> {
    let mut cmd = cmd;
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
