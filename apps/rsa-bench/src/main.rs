use std::io::Write;
use std::{fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use core_crypto::{Cipher, RsaOaep};
use core_harness::{
    classify, round_trip, samples, Harness, HarnessConfig, ResourceSampler, Status, TrialError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Characters of the encoded ciphertext echoed by `roundtrip`
const CIPHERTEXT_PREVIEW: usize = 100;

#[derive(Parser, Debug)]
#[command(
    name = "rsa-bench",
    version,
    about = "Measure RSA-OAEP latency, CPU and memory across key, payload and file sweeps"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt and decrypt one message and print the measurements
    Roundtrip(RoundtripArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// TOML file overriding the default sweep parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the payload-category sample files
    #[arg(long)]
    sample_dir: Option<PathBuf>,
    /// Do not create missing sample files before the run
    #[arg(long, default_value_t = false)]
    no_samples: bool,
    /// Write the per-sweep chart series as JSON to this path
    #[arg(long)]
    series_out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RoundtripArgs {
    /// Message to encrypt
    message: String,
    /// RSA modulus size in bits
    #[arg(long, default_value_t = 2048)]
    bits: usize,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the report; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Roundtrip(args)) => roundtrip_cmd(args, &mut std::io::stdout().lock()),
        None => run_cmd(cli.run),
    }
}

fn load_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut cfg = match &args.config {
        Some(path) => HarnessConfig::load(path).with_context(|| format!("load config {:?}", path))?,
        None => HarnessConfig::default(),
    };
    cfg.apply_env();
    if let Some(dir) = &args.sample_dir {
        cfg.sample_dir = dir.clone();
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let cfg = load_config(&args)?;
    info!(
        keys = ?cfg.key_strengths,
        sizes = ?cfg.payload_sizes,
        dir = %cfg.sample_dir.display(),
        "config loaded"
    );

    if !args.no_samples {
        samples::ensure_sample_files(&cfg.sample_dir)
            .with_context(|| format!("create sample files in {:?}", cfg.sample_dir))?;
    }

    let mut harness = Harness::for_current_process(RsaOaep, cfg);
    let report = harness.run_all();
    print!("{}", report);

    if let Some(out) = &args.series_out {
        let json = serde_json::to_string_pretty(&report.chart_series())?;
        fs::write(out, json).with_context(|| format!("write {:?}", out))?;
        info!(path = %out.display(), "chart series written");
    }
    Ok(())
}

/// A failed round trip is reported with its status code, not as an error
/// exit; only writing the output can fail.
fn roundtrip_cmd(args: RoundtripArgs, out: &mut impl Write) -> Result<()> {
    let cipher = RsaOaep;
    writeln!(out, "Generating RSA-{} key pair...", args.bits)?;
    let start = Instant::now();
    let keys = match cipher.generate_keypair(args.bits) {
        Ok(keys) => keys,
        Err(e) => return report_failure(out, &TrialError::KeyGeneration(e)),
    };
    writeln!(out, "Key generation completed in {:.4} seconds", start.elapsed().as_secs_f64())?;

    let message = args.message.as_bytes();
    writeln!(out, "Original message: {}", args.message)?;
    writeln!(out, "Message length: {} bytes", message.len())?;

    let mut sampler = ResourceSampler::for_current_process();
    let rt = match round_trip(&cipher, &mut sampler, &keys, message) {
        Ok(rt) => rt,
        Err(e) => return report_failure(out, &e),
    };
    let preview: String = rt.ciphertext_encoded.chars().take(CIPHERTEXT_PREVIEW).collect();
    writeln!(out, "Encrypted message (base64): {}...", preview)?;
    writeln!(out, "Encryption time: {:.6} seconds", rt.enc_duration.as_secs_f64())?;
    writeln!(out, "Decrypted message: {}", String::from_utf8_lossy(&rt.decrypted_payload))?;
    writeln!(out, "Decryption time: {:.6} seconds", rt.dec_duration.as_secs_f64())?;
    writeln!(out, "CPU Usage: {:.2}%", rt.usage.cpu_percent)?;
    writeln!(out, "Memory Usage: {:.2} MB", rt.usage.memory_mb)?;

    match classify(message, Ok(rt.decrypted_payload.as_slice())) {
        Status::Ok => writeln!(out, "Encryption/Decryption test: PASSED")?,
        status => writeln!(out, "Encryption/Decryption test: FAILED ({})", status)?,
    }
    Ok(())
}

fn report_failure(out: &mut impl Write, err: &TrialError) -> Result<()> {
    warn!(status = %err.status(), error = %err, "round trip failed");
    writeln!(out, "Encryption/Decryption test: FAILED ({}: {})", err.status(), err)?;
    Ok(())
}
