#![no_main]
use libfuzzer_sys::fuzz_target;

use spamsum::SpamSumSignature;

fuzz_target!(|text: &str| {
    if let Ok(sig) = text.parse::<SpamSumSignature>() {
        // Whatever parses must compare against itself without panicking.
        let _ = spamsum::compare(&sig, &sig);
        let reparsed: SpamSumSignature = sig.to_string().parse().unwrap();
        assert_eq!(reparsed, sig);
    }
});
