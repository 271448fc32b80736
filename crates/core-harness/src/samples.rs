//! Default sample files for the payload-category sweep.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/// File name and contents of each default sample.
pub fn default_samples() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("small_sample.txt", b"This is a small text file for RSA testing.".to_vec()),
        ("small_sample.png", b"SmallPNG".repeat(10)),
        ("small_sample.pdf", b"SmallPDF".repeat(10)),
    ]
}

/// Writes any default sample missing from `dir` and returns the paths it
/// created. Existing files are left untouched.
pub fn ensure_sample_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut created = Vec::new();
    for (name, contents) in default_samples() {
        let path = dir.join(name);
        if path.exists() {
            continue;
        }
        std::fs::write(&path, &contents)?;
        info!(path = %path.display(), bytes = contents.len(), "created sample file");
        created.push(path);
    }
    Ok(created)
}
