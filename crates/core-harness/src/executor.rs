//! One encrypt-then-decrypt cycle with timing and resource sampling.

use std::time::{Duration, Instant};

use core_crypto::{transport, Cipher, KeyPair};
use tracing::debug;

use crate::error::TrialError;
use crate::sampler::{ProcessProbe, ResourceSample, ResourceSampler};

#[derive(Debug, Clone, PartialEq)]
pub struct RoundTripResult {
    /// Ciphertext in transport (base64) form, as it travelled between phases.
    pub ciphertext_encoded: String,
    pub enc_duration: Duration,
    pub dec_duration: Duration,
    pub decrypted_payload: Vec<u8>,
    /// Peak CPU across the cycle and post-cycle memory.
    pub usage: ResourceSample,
}

/// Runs one round trip of `payload` under `keys`.
///
/// A payload above the cipher's bound is rejected before any sampling or
/// cipher call. Only the `encrypt` and `decrypt` calls themselves are
/// timed; the transport encode/decode in between is not.
pub fn round_trip<C, P>(
    cipher: &C,
    sampler: &mut ResourceSampler<P>,
    keys: &KeyPair<C::PublicKey, C::PrivateKey>,
    payload: &[u8],
) -> Result<RoundTripResult, TrialError>
where
    C: Cipher,
    P: ProcessProbe,
{
    let max = cipher.max_plaintext_len(&keys.public);
    if payload.len() > max {
        return Err(TrialError::SizeLimit { len: payload.len(), max });
    }

    let pre = sampler.sample();

    let start = Instant::now();
    let ciphertext = cipher.encrypt(&keys.public, payload)?;
    let enc_duration = start.elapsed();

    let ciphertext_encoded = transport::encode(&ciphertext);
    let wire = transport::decode(&ciphertext_encoded)?;

    let start = Instant::now();
    let decrypted_payload = cipher.decrypt(&keys.private, &wire)?;
    let dec_duration = start.elapsed();

    let post = sampler.sample();
    debug!(
        cipher = cipher.name(),
        bits = keys.strength_bits,
        len = payload.len(),
        ct_len = ciphertext.len(),
        "round trip complete"
    );

    Ok(RoundTripResult {
        ciphertext_encoded,
        enc_duration,
        dec_duration,
        decrypted_payload,
        usage: ResourceSample::peak(pre, post),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{RawUsage, SampleError};
    use crate::testing::{Fault, FakeCipher, ScriptedProbe};
    use crate::trial::Status;
    use core_crypto::CryptoError;

    #[test]
    fn round_trip_reports_peak_cpu_and_post_memory() {
        let cipher = FakeCipher::new();
        let keys = cipher.generate_keypair(2048).unwrap();
        let mut sampler = ResourceSampler::new(ScriptedProbe::new(vec![
            Ok(RawUsage { cpu_percent: 75.0, rss_bytes: 1024 * 1024 }),
            Ok(RawUsage { cpu_percent: 10.0, rss_bytes: 3 * 1024 * 1024 }),
        ]));
        let out = round_trip(&cipher, &mut sampler, &keys, &[b'A'; 32]).unwrap();
        assert_eq!(out.decrypted_payload, vec![b'A'; 32]);
        assert_eq!(out.usage, ResourceSample { cpu_percent: 75.0, memory_mb: 3.0 });
        assert_eq!(transport::decode(&out.ciphertext_encoded).unwrap().len(), 32);
    }

    #[test]
    fn boundary_lengths_round_trip() {
        let cipher = FakeCipher::new();
        let keys = cipher.generate_keypair(2048).unwrap();
        let mut sampler = ResourceSampler::new(ScriptedProbe::constant(0.0, 0));
        for len in [0usize, 1, 190] {
            let payload = vec![0x33; len];
            let out = round_trip(&cipher, &mut sampler, &keys, &payload).unwrap();
            assert_eq!(out.decrypted_payload, payload);
        }
    }

    #[test]
    fn oversized_payload_never_reaches_cipher_or_sampler() {
        let cipher = FakeCipher::new();
        let keys = cipher.generate_keypair(2048).unwrap();
        let mut sampler = ResourceSampler::new(ScriptedProbe::constant(0.0, 0));
        let err = round_trip(&cipher, &mut sampler, &keys, &[0u8; 191]).unwrap_err();
        assert!(matches!(err, TrialError::SizeLimit { len: 191, max: 190 }));
        assert_eq!(err.status(), Status::SizeLimitExceeded);
        assert_eq!(cipher.encrypt_calls(), 0);
        assert_eq!(cipher.decrypt_calls(), 0);
        assert_eq!(sampler.probe().calls(), 0);
    }

    #[test]
    fn cipher_errors_propagate_with_message() {
        let cipher = FakeCipher::new().with_fault(Fault::FailDecrypt);
        let keys = cipher.generate_keypair(1024).unwrap();
        let mut sampler = ResourceSampler::new(ScriptedProbe::constant(0.0, 0));
        let err = round_trip(&cipher, &mut sampler, &keys, b"abc").unwrap_err();
        assert!(matches!(&err, TrialError::Crypto(CryptoError::Decryption(m)) if m == "scripted failure"));
        assert_eq!(err.status(), Status::RuntimeError);
    }

    #[test]
    fn sampler_failure_does_not_affect_outcome() {
        let cipher = FakeCipher::new();
        let keys = cipher.generate_keypair(1024).unwrap();
        let mut sampler = ResourceSampler::new(ScriptedProbe::new(vec![Err(SampleError::NoPid(
            "unsupported".into(),
        ))]));
        let out = round_trip(&cipher, &mut sampler, &keys, b"payload").unwrap();
        assert_eq!(out.decrypted_payload, b"payload");
        assert_eq!(out.usage, ResourceSample::default());
    }
}
