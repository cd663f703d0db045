#![no_main]

use libfuzzer_sys::fuzz_target;

use moebench_cli::output::{format_vectors, parse_vectors};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(vectors) = parse_vectors(text) {
        if let Some(first) = vectors.first() {
            assert!(vectors.iter().all(|v| v.len() == first.len()));
        }
        // Non-empty rows of finite values survive a write and re-read.
        let writable = vectors.iter().all(|v| !v.is_empty())
            && vectors.iter().flatten().all(|x| x.is_finite());
        if writable {
            let again = parse_vectors(&format_vectors(&vectors)).unwrap();
            assert_eq!(again, vectors);
        }
    }
});
