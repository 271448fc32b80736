//! Deterministic stand-ins for the OS probe and the cipher capability.

use std::cell::Cell;
use std::collections::VecDeque;

use core_crypto::oaep::oaep_sha256_max_plaintext;
use core_crypto::{Cipher, CryptoError, KeyPair};

use crate::sampler::{ProcessProbe, RawUsage, SampleError};

/// Replays a fixed script of probe results, then keeps failing.
pub struct ScriptedProbe {
    steps: VecDeque<Result<RawUsage, SampleError>>,
    calls: usize,
}

impl ScriptedProbe {
    pub fn new(steps: Vec<Result<RawUsage, SampleError>>) -> Self {
        Self { steps: steps.into(), calls: 0 }
    }

    /// Same reading on every call, for as many calls as a test needs.
    pub fn constant(cpu_percent: f32, rss_bytes: u64) -> Self {
        Self::new(vec![Ok(RawUsage { cpu_percent, rss_bytes }); 1024])
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ProcessProbe for ScriptedProbe {
    fn probe(&mut self) -> Result<RawUsage, SampleError> {
        self.calls += 1;
        self.steps
            .pop_front()
            .unwrap_or_else(|| Err(SampleError::ProcessGone("script exhausted".into())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
    #[default]
    None,
    /// Decryption returns a payload that differs from the input.
    CorruptPlaintext,
    FailEncrypt,
    FailDecrypt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeKey {
    pub bits: usize,
}

/// Reversible byte scramble with the same size bound as OAEP/SHA-256.
#[derive(Debug, Default)]
pub struct FakeCipher {
    fault: Fault,
    failing_keygen: Vec<usize>,
    encrypt_calls: Cell<usize>,
    decrypt_calls: Cell<usize>,
}

impl FakeCipher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }

    pub fn failing_keygen_for(mut self, bits: usize) -> Self {
        self.failing_keygen.push(bits);
        self
    }

    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.get()
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.get()
    }
}

impl Cipher for FakeCipher {
    type PublicKey = FakeKey;
    type PrivateKey = FakeKey;

    fn name(&self) -> &'static str {
        "fake"
    }

    fn generate_keypair(&self, bits: usize) -> Result<KeyPair<FakeKey, FakeKey>, CryptoError> {
        if self.failing_keygen.contains(&bits) {
            return Err(CryptoError::KeyGeneration { bits, reason: "scripted failure".into() });
        }
        Ok(KeyPair { strength_bits: bits, public: FakeKey { bits }, private: FakeKey { bits } })
    }

    fn max_plaintext_len(&self, public: &FakeKey) -> usize {
        oaep_sha256_max_plaintext(public.bits)
    }

    fn encrypt(&self, public: &FakeKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_calls.set(self.encrypt_calls.get() + 1);
        let max = self.max_plaintext_len(public);
        if plaintext.len() > max {
            return Err(CryptoError::MessageTooLong { len: plaintext.len(), max });
        }
        if self.fault == Fault::FailEncrypt {
            return Err(CryptoError::Encryption("scripted failure".into()));
        }
        Ok(plaintext.iter().rev().map(|b| b ^ 0x5a).collect())
    }

    fn decrypt(&self, _private: &FakeKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.decrypt_calls.set(self.decrypt_calls.get() + 1);
        if self.fault == Fault::FailDecrypt {
            return Err(CryptoError::Decryption("scripted failure".into()));
        }
        let mut out: Vec<u8> = ciphertext.iter().rev().map(|b| b ^ 0x5a).collect();
        if self.fault == Fault::CorruptPlaintext {
            match out.first_mut() {
                Some(b) => *b ^= 0x01,
                None => out.push(0),
            }
        }
        Ok(out)
    }
}
