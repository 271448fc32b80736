//! Asymmetric cipher capability (RSA-OAEP over the `rsa` crate) and the
//! text codec used to move ciphertext through the benchmark harness.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("key generation failed for {bits}-bit key: {reason}")]
    KeyGeneration { bits: usize, reason: String },

    #[error("message too long: {len} bytes exceeds the {max}-byte bound")]
    MessageTooLong { len: usize, max: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("transport decode failed: {0}")]
    Codec(String),
}

/// A generated key pair. The strength is kept next to the keys so callers
/// can report it without asking the cipher again.
#[derive(Debug, Clone)]
pub struct KeyPair<Pk, Sk> {
    pub strength_bits: usize,
    pub public: Pk,
    pub private: Sk,
}

/// The opaque capability the harness drives. Implementations must be
/// deterministic in their size bound: `max_plaintext_len` is the exact
/// length above which `encrypt` rejects input.
pub trait Cipher {
    type PublicKey;
    type PrivateKey;

    fn name(&self) -> &'static str;

    fn generate_keypair(
        &self,
        bits: usize,
    ) -> Result<KeyPair<Self::PublicKey, Self::PrivateKey>, CryptoError>;

    fn max_plaintext_len(&self, public: &Self::PublicKey) -> usize;

    fn encrypt(&self, public: &Self::PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn decrypt(
        &self,
        private: &Self::PrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

pub mod oaep {
    use rand::rngs::OsRng;
    use rsa::traits::PublicKeyParts;
    use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
    use sha2::Sha256;

    use super::{Cipher, CryptoError, KeyPair};

    const SHA256_LEN: usize = 32;

    /// Largest plaintext OAEP/SHA-256 accepts for a modulus of `bits` bits.
    pub fn oaep_sha256_max_plaintext(bits: usize) -> usize {
        (bits / 8).saturating_sub(2 * SHA256_LEN + 2)
    }

    /// RSA with OAEP padding, SHA-256 for both the label hash and MGF1.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RsaOaep;

    impl Cipher for RsaOaep {
        type PublicKey = RsaPublicKey;
        type PrivateKey = RsaPrivateKey;

        fn name(&self) -> &'static str {
            "RSA-OAEP-SHA256"
        }

        fn generate_keypair(
            &self,
            bits: usize,
        ) -> Result<KeyPair<RsaPublicKey, RsaPrivateKey>, CryptoError> {
            let private = RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| {
                CryptoError::KeyGeneration { bits, reason: e.to_string() }
            })?;
            let public = RsaPublicKey::from(&private);
            Ok(KeyPair { strength_bits: bits, public, private })
        }

        fn max_plaintext_len(&self, public: &RsaPublicKey) -> usize {
            public.size().saturating_sub(2 * SHA256_LEN + 2)
        }

        fn encrypt(&self, public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
            let max = self.max_plaintext_len(public);
            public
                .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
                .map_err(|e| match e {
                    rsa::Error::MessageTooLong => {
                        CryptoError::MessageTooLong { len: plaintext.len(), max }
                    }
                    other => CryptoError::Encryption(other.to_string()),
                })
        }

        fn decrypt(
            &self,
            private: &RsaPrivateKey,
            ciphertext: &[u8],
        ) -> Result<Vec<u8>, CryptoError> {
            private
                .decrypt(Oaep::new::<Sha256>(), ciphertext)
                .map_err(|e| CryptoError::Decryption(e.to_string()))
        }
    }
}

/// Binary-to-text codec for ciphertext and file payloads (standard base64,
/// padded).
pub mod transport {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use super::CryptoError;

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
        STANDARD.decode(text).map_err(|e| CryptoError::Codec(e.to_string()))
    }

    /// Length of `encode` output for `raw_len` input bytes, saturating at
    /// `usize::MAX`.
    pub fn encoded_len(raw_len: usize) -> usize {
        raw_len.div_ceil(3).saturating_mul(4)
    }

    /// Largest input whose `encode` output fits in `encoded_max` bytes.
    pub fn max_raw_len(encoded_max: usize) -> usize {
        encoded_max / 4 * 3
    }
}

pub use oaep::RsaOaep;
