//! Sweep controller: iterates one parameter with the others pinned and
//! turns every outcome, good or bad, into exactly one [`Trial`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use core_crypto::{transport, Cipher, KeyPair};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::classify;
use crate::config::HarnessConfig;
use crate::error::TrialError;
use crate::executor::round_trip;
use crate::report::Report;
use crate::sampler::{ProcessProbe, ResourceSampler, SysinfoProbe};
use crate::trial::{Measurement, Parameter, Status, Trial};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    KeyStrength,
    PayloadSize,
    PayloadCategory,
}

impl SweepKind {
    pub fn title(self) -> &'static str {
        match self {
            SweepKind::KeyStrength => "Key size",
            SweepKind::PayloadSize => "Input data size",
            SweepKind::PayloadCategory => "File type",
        }
    }

    /// Axis / column label for the swept parameter.
    pub fn parameter_label(self) -> &'static str {
        match self {
            SweepKind::KeyStrength => "Key size (bits)",
            SweepKind::PayloadSize => "Input size",
            SweepKind::PayloadCategory => "Type (file)",
        }
    }
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// An ordered run of trials varying one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sweep {
    kind: SweepKind,
    /// What was held fixed, e.g. "payload 32 B".
    pinned: String,
    trials: Vec<Trial>,
}

impl Sweep {
    pub fn kind(&self) -> SweepKind {
        self.kind
    }
    pub fn pinned(&self) -> &str {
        &self.pinned
    }
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }
    pub fn count(&self, status: Status) -> usize {
        self.trials.iter().filter(|t| t.status() == status).count()
    }
}

/// Runs `trial` once per parameter, in order. The closure owns all failure
/// handling; the loop never stops early and never retries.
pub fn run_sweep<T>(
    kind: SweepKind,
    pinned: impl Into<String>,
    params: &[T],
    mut trial: impl FnMut(&T) -> Trial,
) -> Sweep {
    let pinned = pinned.into();
    info!(sweep = %kind, %pinned, params = params.len(), "sweep starting");
    let mut trials = Vec::with_capacity(params.len());
    for p in params {
        let t = trial(p);
        log_trial(kind, &t);
        trials.push(t);
    }
    Sweep { kind, pinned, trials }
}

fn log_trial(kind: SweepKind, t: &Trial) {
    match (t.status(), t.measurement()) {
        (Status::Ok, Some(m)) => info!(
            sweep = %kind,
            parameter = %t.parameter(),
            len = t.payload_len(),
            enc_s = m.encryption.as_secs_f64(),
            dec_s = m.decryption.as_secs_f64(),
            cpu = m.cpu_percent,
            mem_mb = m.memory_mb,
            "trial ok"
        ),
        (status, _) => warn!(
            sweep = %kind,
            parameter = %t.parameter(),
            len = t.payload_len(),
            %status,
            detail = t.detail().unwrap_or(""),
            "trial not ok"
        ),
    }
}

/// Round trip of an in-memory payload compared byte for byte.
fn synthetic_trial<C: Cipher, P: ProcessProbe>(
    cipher: &C,
    sampler: &mut ResourceSampler<P>,
    keys: &KeyPair<C::PublicKey, C::PrivateKey>,
    parameter: Parameter,
    payload: &[u8],
) -> Trial {
    match round_trip(cipher, sampler, keys, payload) {
        Ok(rt) => {
            let status = classify(payload, Ok(rt.decrypted_payload.as_slice()));
            let m = Measurement::new(rt.enc_duration, rt.dec_duration, rt.usage);
            Trial::measured(parameter, payload.len(), m, status)
        }
        Err(e) => Trial::failed(parameter, payload.len(), &e),
    }
}

/// Opens a sample file. Runs before anything cryptographic so a missing
/// file is always reported as such.
fn open_sample(path: &Path) -> Result<File, TrialError> {
    File::open(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: io::Error) -> TrialError {
    match source.kind() {
        io::ErrorKind::NotFound => TrialError::ResourceMissing { path: path.to_path_buf() },
        _ => TrialError::Io { path: path.to_path_buf(), source },
    }
}

/// Reads at most one byte past what fits under `max` once encoded. The
/// reported length is checked first; the bounded read covers files that
/// report 0, such as character devices.
fn read_bounded(file: File, path: &Path, max: usize) -> Result<Vec<u8>, (usize, TrialError)> {
    let reported = file.metadata().map_err(|e| (0, io_error(path, e)))?.len();
    let reported = usize::try_from(reported).unwrap_or(usize::MAX);
    let encoded = transport::encoded_len(reported);
    if encoded > max {
        return Err((reported, TrialError::SizeLimit { len: encoded, max }));
    }

    let limit = transport::max_raw_len(max);
    let mut bytes = Vec::with_capacity(reported.min(limit + 1));
    file.take(limit as u64 + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| (0, io_error(path, e)))?;
    if bytes.len() > limit {
        let len = transport::encoded_len(bytes.len());
        return Err((bytes.len(), TrialError::SizeLimit { len, max }));
    }
    Ok(bytes)
}

/// Round trip of a file's bytes in transport form. The size ceiling is
/// applied to the encoded length, which is what the cipher actually sees.
fn file_trial<C: Cipher, P: ProcessProbe>(
    cipher: &C,
    sampler: &mut ResourceSampler<P>,
    keys: &KeyPair<C::PublicKey, C::PrivateKey>,
    parameter: Parameter,
    path: &Path,
    file: File,
) -> Trial {
    let max = cipher.max_plaintext_len(&keys.public);
    let original = match read_bounded(file, path, max) {
        Ok(bytes) => bytes,
        Err((len, err)) => return Trial::failed(parameter, len, &err),
    };
    let encoded = transport::encode(&original);

    match round_trip(cipher, sampler, keys, encoded.as_bytes()) {
        Ok(rt) => {
            let recovered = std::str::from_utf8(&rt.decrypted_payload)
                .ok()
                .and_then(|text| transport::decode(text).ok());
            let status = match recovered {
                Some(bytes) => classify(&original, Ok(bytes.as_slice())),
                None => Status::CorrectnessFailure,
            };
            let m = Measurement::new(rt.enc_duration, rt.dec_duration, rt.usage);
            Trial::measured(parameter, original.len(), m, status)
        }
        Err(e) => Trial::failed(parameter, original.len(), &e),
    }
}

/// Owns the cipher, the sampler and the sweep parameters for one run.
pub struct Harness<C, P> {
    cipher: C,
    sampler: ResourceSampler<P>,
    config: HarnessConfig,
}

impl<C: Cipher> Harness<C, SysinfoProbe> {
    /// Harness sampling the current process through `sysinfo`.
    pub fn for_current_process(cipher: C, config: HarnessConfig) -> Self {
        Self::new(cipher, ResourceSampler::for_current_process(), config)
    }
}

impl<C: Cipher, P: ProcessProbe> Harness<C, P> {
    pub fn new(cipher: C, sampler: ResourceSampler<P>, config: HarnessConfig) -> Self {
        Self { cipher, sampler, config }
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Varies key strength with a fixed filler payload. Each strength gets
    /// a fresh key pair; its generation time is kept on the trial.
    pub fn key_strength_sweep(&mut self) -> Sweep {
        let payload = self.config.filler_payload(self.config.fixed_payload_len);
        let cipher = &self.cipher;
        let sampler = &mut self.sampler;
        run_sweep(
            SweepKind::KeyStrength,
            format!("payload {} B", payload.len()),
            &self.config.key_strengths,
            |&bits| {
                let parameter = Parameter::KeyBits(bits);
                let start = Instant::now();
                let keys = match cipher.generate_keypair(bits) {
                    Ok(keys) => keys,
                    Err(e) => {
                        let err = TrialError::KeyGeneration(e);
                        return Trial::failed(parameter, payload.len(), &err);
                    }
                };
                let keygen = start.elapsed();
                synthetic_trial(cipher, sampler, &keys, parameter, &payload).with_keygen(keygen)
            },
        )
    }

    /// Varies synthetic payload length under one baseline key pair. Sizes
    /// above the key's bound are recorded without a round trip.
    pub fn payload_size_sweep(&mut self) -> Sweep {
        let bits = self.config.baseline_strength;
        let keys = self.cipher.generate_keypair(bits).map_err(TrialError::KeyGeneration);
        let cipher = &self.cipher;
        let sampler = &mut self.sampler;
        let config = &self.config;
        run_sweep(
            SweepKind::PayloadSize,
            format!("key {} bits", bits),
            &config.payload_sizes,
            |&size| {
                let parameter = Parameter::PayloadBytes(size);
                let keys = match &keys {
                    Ok(keys) => keys,
                    Err(e) => return Trial::failed(parameter, size, e),
                };
                let max = cipher.max_plaintext_len(&keys.public);
                if size > max {
                    let err = TrialError::SizeLimit { len: size, max };
                    return Trial::failed(parameter, size, &err);
                }
                synthetic_trial(cipher, sampler, keys, parameter, &config.filler_payload(size))
            },
        )
    }

    /// Round-trips each configured sample file under one baseline key pair.
    pub fn payload_category_sweep(&mut self) -> Sweep {
        let bits = self.config.baseline_strength;
        let keys = self.cipher.generate_keypair(bits).map_err(TrialError::KeyGeneration);
        let cipher = &self.cipher;
        let sampler = &mut self.sampler;
        let config = &self.config;
        run_sweep(
            SweepKind::PayloadCategory,
            format!("key {} bits", bits),
            &config.categories,
            |category| {
                let path = config.category_path(category);
                let parameter =
                    Parameter::Category { label: category.label.clone(), path: path.clone() };
                let file = match open_sample(&path) {
                    Ok(file) => file,
                    Err(e) => return Trial::failed(parameter, 0, &e),
                };
                match &keys {
                    Ok(keys) => file_trial(cipher, sampler, keys, parameter, &path, file),
                    Err(e) => Trial::failed(parameter, 0, e),
                }
            },
        )
    }

    /// All three sweeps in report order.
    pub fn run_all(&mut self) -> Report {
        info!(cipher = self.cipher.name(), "benchmark run starting");
        let sweeps = vec![
            self.key_strength_sweep(),
            self.payload_size_sweep(),
            self.payload_category_sweep(),
        ];
        Report::new(self.cipher.name(), sweeps)
    }
}
