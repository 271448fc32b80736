//! Process CPU and resident-memory sampling.
//!
//! The OS query sits behind [`ProcessProbe`] so tests can replace it with a
//! scripted sequence. [`ResourceSampler`] never fails: a probe error yields
//! the last good reading (zero before the first one).

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, System};
use thiserror::Error;
use tracing::warn;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("current process id unavailable: {0}")]
    NoPid(String),
    #[error("process {0} not found")]
    ProcessGone(String),
}

/// Raw figures as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawUsage {
    pub cpu_percent: f32,
    pub rss_bytes: u64,
}

pub trait ProcessProbe {
    fn probe(&mut self) -> Result<RawUsage, SampleError>;
}

/// Probe backed by `sysinfo`, refreshing only the current process.
pub struct SysinfoProbe {
    system: System,
    pid: Result<Pid, SampleError>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid().map_err(|e| SampleError::NoPid(e.to_string()));
        Self { system: System::new(), pid }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProbe {
    fn probe(&mut self) -> Result<RawUsage, SampleError> {
        let pid = self.pid.clone()?;
        // cpu_usage is relative to the previous refresh, so the first reading is 0
        if !self.system.refresh_process(pid) {
            return Err(SampleError::ProcessGone(pid.to_string()));
        }
        let process = self
            .system
            .process(pid)
            .ok_or_else(|| SampleError::ProcessGone(pid.to_string()))?;
        Ok(RawUsage { cpu_percent: process.cpu_usage(), rss_bytes: process.memory() })
    }
}

/// One CPU/memory reading. Memory is in MB rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

impl ResourceSample {
    /// Figure reported for an operation bracketed by `pre` and `post`:
    /// the higher CPU reading and the post-operation memory.
    pub fn peak(pre: ResourceSample, post: ResourceSample) -> Self {
        Self { cpu_percent: pre.cpu_percent.max(post.cpu_percent), memory_mb: post.memory_mb }
    }
}

impl From<RawUsage> for ResourceSample {
    fn from(raw: RawUsage) -> Self {
        let mb = raw.rss_bytes as f64 / BYTES_PER_MB;
        Self { cpu_percent: f64::from(raw.cpu_percent), memory_mb: (mb * 100.0).round() / 100.0 }
    }
}

pub struct ResourceSampler<P> {
    probe: P,
    last: ResourceSample,
}

impl ResourceSampler<SysinfoProbe> {
    pub fn for_current_process() -> Self {
        Self::new(SysinfoProbe::new())
    }
}

impl<P: ProcessProbe> ResourceSampler<P> {
    pub fn new(probe: P) -> Self {
        Self { probe, last: ResourceSample::default() }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn sample(&mut self) -> ResourceSample {
        match self.probe.probe() {
            Ok(raw) => {
                self.last = raw.into();
                self.last
            }
            Err(e) => {
                warn!(error = %e, "resource probe failed; reusing last sample");
                self.last
            }
        }
    }
}
