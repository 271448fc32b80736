use core_crypto::oaep::oaep_sha256_max_plaintext;
use core_crypto::{transport, Cipher, RsaOaep};
use core_harness::testing::ScriptedProbe;
use core_harness::{round_trip, ResourceSample, ResourceSampler, Status, TrialError};

// Round-trip identity at the edges of the OAEP bound, through the executor
#[test]
fn identity_at_zero_one_and_max() {
    let cipher = RsaOaep;
    let keys = cipher.generate_keypair(2048).expect("keygen");
    let max = cipher.max_plaintext_len(&keys.public);
    assert_eq!(max, oaep_sha256_max_plaintext(2048));

    let mut sampler = ResourceSampler::for_current_process();
    for len in [0usize, 1, max] {
        let payload = vec![b'A'; len];
        let rt = round_trip(&cipher, &mut sampler, &keys, &payload).expect("round trip");
        assert_eq!(rt.decrypted_payload, payload);
        assert_eq!(transport::decode(&rt.ciphertext_encoded).unwrap().len(), 256);
        assert!(rt.usage.memory_mb > 0.0);
    }
}

#[test]
fn over_bound_is_rejected_before_sampling() {
    let cipher = RsaOaep;
    let keys = cipher.generate_keypair(1024).expect("keygen");
    let mut sampler = ResourceSampler::new(ScriptedProbe::constant(5.0, 1 << 20));
    let err = round_trip(&cipher, &mut sampler, &keys, &[0u8; 63]).unwrap_err();
    assert!(matches!(err, TrialError::SizeLimit { len: 63, max: 62 }));
    assert_eq!(err.status(), Status::SizeLimitExceeded);
    assert_eq!(sampler.probe().calls(), 0);
}

#[test]
fn failing_probe_leaves_result_intact() {
    let cipher = RsaOaep;
    let keys = cipher.generate_keypair(1024).expect("keygen");
    let mut sampler = ResourceSampler::new(ScriptedProbe::failing());
    let rt = round_trip(&cipher, &mut sampler, &keys, b"AAAA").expect("round trip");
    assert_eq!(rt.decrypted_payload, b"AAAA");
    assert_eq!(rt.usage, ResourceSample::default());
}
