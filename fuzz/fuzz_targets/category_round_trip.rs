#![no_main]
use core_harness::testing::{FakeCipher, ScriptedProbe};
use core_harness::{CategorySpec, Harness, HarnessConfig, ResourceSampler, Status};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|contents: Vec<u8>| {
    // Any file contents end as exactly one trial that is OK or TOO_LARGE.
    let dir = std::env::temp_dir().join(format!("rsa-bench-fuzz-{}", std::process::id()));
    if std::fs::create_dir_all(&dir).is_err() || std::fs::write(dir.join("input.bin"), &contents).is_err() {
        return;
    }
    let config = HarnessConfig {
        sample_dir: dir,
        categories: vec![CategorySpec::new("bin", "input.bin")],
        ..Default::default()
    };
    let sampler = ResourceSampler::new(ScriptedProbe::failing());
    let mut harness = Harness::new(FakeCipher::new(), sampler, config);
    let sweep = harness.payload_category_sweep();
    assert_eq!(sweep.trials().len(), 1);
    assert!(matches!(sweep.trials()[0].status(), Status::Ok | Status::SizeLimitExceeded));
});
