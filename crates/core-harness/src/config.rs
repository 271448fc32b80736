//! Sweep parameters: defaults, optional TOML file, `RSA_BENCH_*` env overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const ENV_KEY_SIZES: &str = "RSA_BENCH_KEY_SIZES";
pub const ENV_BASELINE_BITS: &str = "RSA_BENCH_BASELINE_BITS";
pub const ENV_PAYLOAD_SIZES: &str = "RSA_BENCH_PAYLOAD_SIZES";
pub const ENV_FIXED_PAYLOAD: &str = "RSA_BENCH_FIXED_PAYLOAD";
pub const ENV_SAMPLE_DIR: &str = "RSA_BENCH_SAMPLE_DIR";

/// A named external payload, resolved against the sample directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub label: String,
    pub file: PathBuf,
}

impl CategorySpec {
    pub fn new(label: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self { label: label.into(), file: file.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Key-strength sweep values, ascending.
    pub key_strengths: Vec<usize>,
    /// Key strength pinned for the payload-size and category sweeps.
    pub baseline_strength: usize,
    /// Payload length pinned for the key-strength sweep.
    pub fixed_payload_len: usize,
    /// Payload-size sweep values, ascending.
    pub payload_sizes: Vec<usize>,
    /// Byte repeated to build synthetic payloads.
    pub filler: char,
    pub sample_dir: PathBuf,
    pub categories: Vec<CategorySpec>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            key_strengths: vec![1024, 2048, 3072, 4096],
            baseline_strength: 2048,
            fixed_payload_len: 32,
            payload_sizes: vec![32, 100, 500],
            filler: 'A',
            sample_dir: PathBuf::from("."),
            categories: vec![
                CategorySpec::new("txt", "small_sample.txt"),
                CategorySpec::new("png", "small_sample.png"),
                CategorySpec::new("pdf", "small_sample.pdf"),
            ],
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Applies `RSA_BENCH_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an explicit lookup.
    /// Values that fail to parse are logged and ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_KEY_SIZES) {
            match parse_list(&v) {
                Some(list) => self.key_strengths = list,
                None => warn!(var = ENV_KEY_SIZES, value = %v, "ignoring unparsable override"),
            }
        }
        if let Some(v) = lookup(ENV_PAYLOAD_SIZES) {
            match parse_list(&v) {
                Some(list) => self.payload_sizes = list,
                None => warn!(var = ENV_PAYLOAD_SIZES, value = %v, "ignoring unparsable override"),
            }
        }
        if let Some(v) = lookup(ENV_BASELINE_BITS) {
            match v.trim().parse() {
                Ok(n) => self.baseline_strength = n,
                Err(_) => {
                    warn!(var = ENV_BASELINE_BITS, value = %v, "ignoring unparsable override")
                }
            }
        }
        if let Some(v) = lookup(ENV_FIXED_PAYLOAD) {
            match v.trim().parse() {
                Ok(n) => self.fixed_payload_len = n,
                Err(_) => {
                    warn!(var = ENV_FIXED_PAYLOAD, value = %v, "ignoring unparsable override")
                }
            }
        }
        if let Some(v) = lookup(ENV_SAMPLE_DIR) {
            self.sample_dir = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_strengths.is_empty() {
            return Err(ConfigError::Invalid("key_strengths is empty".into()));
        }
        if self.payload_sizes.is_empty() {
            return Err(ConfigError::Invalid("payload_sizes is empty".into()));
        }
        if self.baseline_strength == 0 || self.key_strengths.contains(&0) {
            return Err(ConfigError::Invalid("key strength must be non-zero".into()));
        }
        if !self.filler.is_ascii() {
            let msg = format!("filler {:?} is not a single byte", self.filler);
            return Err(ConfigError::Invalid(msg));
        }
        Ok(())
    }

    /// Synthetic payload of `len` filler bytes.
    pub fn filler_payload(&self, len: usize) -> Vec<u8> {
        vec![self.filler as u8; len]
    }

    pub fn category_path(&self, category: &CategorySpec) -> PathBuf {
        self.sample_dir.join(&category.file)
    }
}

fn parse_list(s: &str) -> Option<Vec<usize>> {
    let list = s
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<Vec<usize>>>()?;
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
