//! Shared fixtures for the end-to-end scenarios.

use core_harness::{samples, HarnessConfig};
use tempfile::TempDir;

/// A config over `dir` with small key sizes so RSA key generation stays quick.
pub fn quick_config(dir: &TempDir) -> HarnessConfig {
    HarnessConfig {
        key_strengths: vec![1024, 2048],
        sample_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

/// Temp directory populated with the default sample files.
pub fn sample_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    samples::ensure_sample_files(dir.path()).expect("sample files");
    dir
}
