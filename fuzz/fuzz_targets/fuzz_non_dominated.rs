#![no_main]

use libfuzzer_sys::fuzz_target;

use moebench_core::dominance::{dominates, non_dominated, TiePolicy};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let dim = 2 + usize::from(data[0] % 3);
    let points: Vec<Vec<f64>> = data[1..]
        .chunks_exact(dim)
        .map(|c| {
            c.iter()
                .map(|&b| {
                    let v = f64::from(b % 16);
                    // high bit flips the sign, so -0.0 shows up too
                    if b & 0x80 == 0 { v } else { -v }
                })
                .collect()
        })
        .collect();

    for ties in [TiePolicy::KeepAll, TiePolicy::Deduplicate] {
        let front = non_dominated(&points, ties);
        assert_eq!(non_dominated(&front, ties), front);
        for p in &front {
            assert!(!points.iter().any(|q| dominates(q, p)));
        }
        for p in &points {
            assert!(front.iter().any(|f| f == p || dominates(f, p)));
        }
    }
});
