use core_crypto::{Cipher, RsaOaep};
use core_harness::testing::ScriptedProbe;
use core_harness::{
    round_trip, CategorySpec, Harness, HarnessConfig, Parameter, ResourceSampler, Status, SweepKind,
};
use scenarios::{quick_config, sample_dir};

#[test]
fn key_strength_sweep_1024_and_2048_both_ok() {
    let dir = sample_dir();
    let mut harness = Harness::for_current_process(RsaOaep, quick_config(&dir));
    let sweep = harness.key_strength_sweep();

    assert_eq!(sweep.kind(), SweepKind::KeyStrength);
    assert_eq!(sweep.trials().len(), 2);
    let params: Vec<_> = sweep.trials().iter().map(|t| t.parameter().clone()).collect();
    assert_eq!(params, vec![Parameter::KeyBits(1024), Parameter::KeyBits(2048)]);
    for t in sweep.trials() {
        assert_eq!(t.status(), Status::Ok, "{:?}", t.detail());
        assert_eq!(t.payload_len(), 32);
        assert!(t.keygen().is_some());
        let m = t.measurement().expect("measured");
        assert!(m.encryption.as_nanos() > 0);
        assert!(m.decryption.as_nanos() > 0);
    }

    // The filler payload itself survives a real round trip unchanged
    let cipher = RsaOaep;
    let keys = cipher.generate_keypair(1024).unwrap();
    let mut sampler = ResourceSampler::for_current_process();
    let rt = round_trip(&cipher, &mut sampler, &keys, &[b'A'; 32]).unwrap();
    assert_eq!(rt.decrypted_payload, "A".repeat(32).into_bytes());
}

#[test]
fn payload_size_sweep_marks_oversized_without_timings() {
    let dir = sample_dir();
    let config = HarnessConfig { payload_sizes: vec![32, 190, 191, 1000], ..quick_config(&dir) };
    let mut harness = Harness::for_current_process(RsaOaep, config);
    let sweep = harness.payload_size_sweep();

    let statuses: Vec<_> = sweep.trials().iter().map(|t| t.status()).collect();
    assert_eq!(
        statuses,
        vec![Status::Ok, Status::Ok, Status::SizeLimitExceeded, Status::SizeLimitExceeded]
    );
    let big = &sweep.trials()[3];
    assert_eq!(big.payload_len(), 1000);
    assert!(big.measurement().is_none());
    assert_eq!(big.detail(), Some("payload of 1000 bytes exceeds the 190-byte bound"));
}

#[test]
fn missing_category_does_not_stop_the_sweep() {
    let dir = sample_dir();
    let config = HarnessConfig {
        categories: vec![
            CategorySpec::new("txt", "small_sample.txt"),
            CategorySpec::new("doc", "does_not_exist.doc"),
            CategorySpec::new("png", "small_sample.png"),
            CategorySpec::new("pdf", "small_sample.pdf"),
        ],
        ..quick_config(&dir)
    };
    let mut harness = Harness::for_current_process(RsaOaep, config);
    let sweep = harness.payload_category_sweep();

    assert_eq!(sweep.trials().len(), 4);
    let statuses: Vec<_> = sweep.trials().iter().map(|t| t.status()).collect();
    assert_eq!(statuses, vec![Status::Ok, Status::ResourceNotFound, Status::Ok, Status::Ok]);
    assert_eq!(sweep.trials()[2].payload_len(), 80);
    assert!(sweep.trials()[1].measurement().is_none());
}

#[test]
fn file_over_encoded_bound_is_too_large() {
    let dir = sample_dir();
    // 150 raw bytes encode to 200, above the 190-byte bound of a 2048-bit key
    std::fs::write(dir.path().join("medium.bin"), vec![0xAB; 150]).unwrap();
    let config = HarnessConfig {
        categories: vec![CategorySpec::new("bin", "medium.bin")],
        ..quick_config(&dir)
    };
    let mut harness = Harness::for_current_process(RsaOaep, config);
    let sweep = harness.payload_category_sweep();
    assert_eq!(sweep.trials()[0].status(), Status::SizeLimitExceeded);
    assert_eq!(sweep.trials()[0].payload_len(), 150);
}

#[test]
fn multi_gigabyte_file_is_too_large_not_an_error() {
    let dir = sample_dir();
    std::fs::File::create(dir.path().join("disk.img")).unwrap().set_len(4 << 30).unwrap();
    let config = HarnessConfig {
        categories: vec![
            CategorySpec::new("img", "disk.img"),
            CategorySpec::new("txt", "small_sample.txt"),
        ],
        ..quick_config(&dir)
    };
    let mut harness = Harness::for_current_process(RsaOaep, config);
    let sweep = harness.payload_category_sweep();
    let statuses: Vec<_> = sweep.trials().iter().map(|t| t.status()).collect();
    assert_eq!(statuses, vec![Status::SizeLimitExceeded, Status::Ok]);
    assert_eq!(sweep.trials()[0].payload_len() as u64, 4 << 30);
}

#[test]
fn sampler_failure_leaves_statuses_untouched() {
    let dir = sample_dir();
    let config = HarnessConfig { key_strengths: vec![1024], ..quick_config(&dir) };
    let sampler = ResourceSampler::new(ScriptedProbe::failing());
    let mut harness = Harness::new(RsaOaep, sampler, config);
    let report = harness.run_all();

    let ks = &report.sweeps()[0];
    assert_eq!(ks.trials()[0].status(), Status::Ok);
    let m = ks.trials()[0].measurement().unwrap();
    assert_eq!(m.cpu_percent, 0.0);
    assert_eq!(m.memory_mb, 0.0);
}

#[test]
fn full_run_report_shape() {
    let dir = sample_dir();
    let mut harness = Harness::for_current_process(RsaOaep, quick_config(&dir));
    let report = harness.run_all();

    // 2 key sizes, 3 payload sizes, 3 sample files
    assert_eq!(report.total_trials(), 8);
    let sizes = &report.sweeps()[1];
    assert_eq!(sizes.count(Status::Ok), 2);
    assert_eq!(sizes.count(Status::SizeLimitExceeded), 1);
    assert_eq!(report.sweeps()[2].count(Status::Ok), 3);

    let text = report.to_string();
    assert!(text.starts_with("RSA-OAEP-SHA256 performance report"));
    assert_eq!(text.matches("[ Varying Condition").count(), 3);
    assert!(text.contains("500 B"));
    assert!(text.contains("TOO_LARGE"));

    let series = report.chart_series();
    assert_eq!(series[0].x, vec![1024.0, 2048.0]);
    assert_eq!(series[1].x, vec![32.0, 100.0]);
    assert_eq!(series[2].labels.len(), 3);
}
