#![no_main]

use libfuzzer_sys::fuzz_target;

use moebench_core::hypervolume::hypervolume;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks 2..=4 objectives, the rest are coordinates in [0, 1].
    let dim = 2 + usize::from(data[0] % 3);
    let points: Vec<Vec<f64>> = data[1..]
        .chunks_exact(dim)
        .take(24)
        .map(|c| c.iter().map(|&b| f64::from(b) / 255.0).collect())
        .collect();
    if points.is_empty() {
        return;
    }
    let reference = vec![1.1; dim];
    let hv = hypervolume(&points, &reference);
    assert!(hv.is_finite() && hv >= 0.0, "hv = {hv}");
    assert!(hv <= 1.1_f64.powi(dim as i32) + 1e-9, "hv exceeds box: {hv}");

    // A copy of a point moved away from the ideal adds nothing.
    let mut extended = points.clone();
    extended.push(points[0].iter().map(|x| (x + 0.05).min(1.1)).collect());
    let hv2 = hypervolume(&extended, &reference);
    assert!((hv - hv2).abs() < 1e-9, "{hv} != {hv2}");
});
