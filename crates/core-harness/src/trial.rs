//! Trial records: one observation per swept parameter value.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TrialError;
use crate::sampler::ResourceSample;

/// Outcome of a trial. Exactly one per trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    CorrectnessFailure,
    SizeLimitExceeded,
    ResourceNotFound,
    RuntimeError,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Ok,
        Status::CorrectnessFailure,
        Status::SizeLimitExceeded,
        Status::ResourceNotFound,
        Status::RuntimeError,
    ];

    /// Short code printed in the status column.
    pub fn code(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::CorrectnessFailure => "FAIL",
            Status::SizeLimitExceeded => "TOO_LARGE",
            Status::ResourceNotFound => "NOT_FOUND",
            Status::RuntimeError => "ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The swept value a trial was run for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    KeyBits(usize),
    PayloadBytes(usize),
    Category { label: String, path: PathBuf },
}

impl Parameter {
    /// Numeric x-axis value, if the parameter has one.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Parameter::KeyBits(b) => Some(*b as f64),
            Parameter::PayloadBytes(n) => Some(*n as f64),
            Parameter::Category { .. } => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::KeyBits(b) => write!(f, "{}", b),
            Parameter::PayloadBytes(n) => write!(f, "{} B", n),
            Parameter::Category { label, path } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                write!(f, "{} ({})", label, name)
            }
        }
    }
}

/// Timing and resource figures of a completed round trip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub encryption: Duration,
    pub decryption: Duration,
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

impl Measurement {
    pub fn new(encryption: Duration, decryption: Duration, usage: ResourceSample) -> Self {
        Self {
            encryption,
            decryption,
            cpu_percent: usage.cpu_percent,
            memory_mb: usage.memory_mb,
        }
    }
}

/// One finalized observation. Fields are private so a trial cannot be
/// altered once the controller has built it, and a measurement can only
/// exist together with a status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    parameter: Parameter,
    payload_len: usize,
    keygen: Option<Duration>,
    measurement: Option<Measurement>,
    status: Status,
    detail: Option<String>,
}

impl Trial {
    /// A trial whose round trip ran to completion; `status` is either OK
    /// or a correctness failure.
    pub fn measured(
        parameter: Parameter,
        payload_len: usize,
        measurement: Measurement,
        status: Status,
    ) -> Self {
        let detail = match status {
            Status::CorrectnessFailure => Some("decrypted payload differs from input".to_string()),
            _ => None,
        };
        Self {
            parameter,
            payload_len,
            keygen: None,
            measurement: Some(measurement),
            status,
            detail,
        }
    }

    /// A trial that stopped before producing a measurement.
    pub fn failed(parameter: Parameter, payload_len: usize, err: &TrialError) -> Self {
        Self {
            parameter,
            payload_len,
            keygen: None,
            measurement: None,
            status: err.status(),
            detail: Some(err.to_string()),
        }
    }

    pub fn with_keygen(mut self, keygen: Duration) -> Self {
        self.keygen = Some(keygen);
        self
    }

    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }
    pub fn keygen(&self) -> Option<Duration> {
        self.keygen
    }
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_crypto::CryptoError;

    #[test]
    fn parameter_labels() {
        assert_eq!(Parameter::KeyBits(2048).to_string(), "2048");
        assert_eq!(Parameter::PayloadBytes(32).to_string(), "32 B");
        let p = Parameter::Category { label: "png".into(), path: PathBuf::from("data/small_sample.png") };
        assert_eq!(p.to_string(), "png (small_sample.png)");
        assert_eq!(p.numeric(), None);
        assert_eq!(Parameter::KeyBits(1024).numeric(), Some(1024.0));
    }

    #[test]
    fn failed_trial_has_no_measurement() {
        let err = TrialError::SizeLimit { len: 1000, max: 190 };
        let t = Trial::failed(Parameter::PayloadBytes(1000), 1000, &err);
        assert_eq!(t.status(), Status::SizeLimitExceeded);
        assert!(t.measurement().is_none());
        assert_eq!(t.detail(), Some("payload of 1000 bytes exceeds the 190-byte bound"));

        let err = TrialError::Crypto(CryptoError::Decryption("bad padding".into()));
        let t = Trial::failed(Parameter::KeyBits(1024), 32, &err);
        assert_eq!(t.status(), Status::RuntimeError);
        assert_eq!(t.detail(), Some("decryption failed: bad padding"));
    }

    #[test]
    fn status_codes_are_distinct() {
        let mut codes: Vec<_> = Status::ALL.iter().map(|s| s.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Status::ALL.len());
    }
}
