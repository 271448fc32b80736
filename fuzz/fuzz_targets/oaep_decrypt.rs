#![no_main]
use arbitrary::Arbitrary;
use core_crypto::{transport, Cipher, KeyPair, RsaOaep};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use rsa::{RsaPrivateKey, RsaPublicKey};

static KEYS: Lazy<KeyPair<RsaPublicKey, RsaPrivateKey>> =
    Lazy::new(|| RsaOaep.generate_keypair(1024).expect("keygen"));

#[derive(Debug, Arbitrary)]
struct Input {
    /// Raw ciphertext candidate
    data: Vec<u8>,
    /// Transport text candidate
    text: String,
}

fuzz_target!(|inp: Input| {
    // Untrusted ciphertext must yield Ok or a CryptoError, never a panic.
    let _ = RsaOaep.decrypt(&KEYS.private, &inp.data);

    if let Ok(bytes) = transport::decode(&inp.text) {
        let _ = RsaOaep.decrypt(&KEYS.private, &bytes);
    }
});
