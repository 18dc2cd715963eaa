#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let sig = spamsum::hash_bytes(data);
    assert!(sig.hash1().len() <= 64);
    assert!(sig.hash2().len() <= 32);
    let score = spamsum::compare(&sig, &sig);
    assert!(score <= 100);
});
