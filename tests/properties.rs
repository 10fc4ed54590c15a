mod common;

use common::{checkerboard, init_logging, mean_abs_error, ramp_gray, std_dev, textured_rgba};
use imagelab::filters::convolve::{convolve, Boundary, Kernel};
use imagelab::filters::edge::{detect_edges, EdgeOperator};
use imagelab::filters::laplacian::{laplacian, laplacian_of_gaussian, sharpen, LaplacianKernel};
use imagelab::filters::noise::{add_salt_and_pepper, mean_filter, median_filter};
use imagelab::filters::point::{apply_point_transform, PointTransform};
use imagelab::frequency::{centered_dft, dft, idft, shift};
use imagelab::grid::Plane;
use imagelab::histogram::{
    adaptive_equalize, equalization_map, equalize, match_histograms, AdaptiveEqualization,
    Histogram,
};
use ndarray::{Array3, Axis};

#[test]
fn every_filter_preserves_shape_and_alpha() {
    init_logging();
    let img = textured_rgba(11, 7);
    let alpha = img.index_axis(Axis(2), 3).to_owned();

    let mut results: Vec<Array3<u8>> = Vec::new();
    for op in EdgeOperator::ALL {
        results.push(detect_edges(img.view(), op, None).unwrap());
    }
    for kind in LaplacianKernel::ALL {
        results.push(laplacian(img.view(), kind).unwrap());
        results.push(laplacian_of_gaussian(img.view(), kind).unwrap());
        results.push(sharpen(img.view(), kind).unwrap());
    }
    results.push(mean_filter(img.view(), 5).unwrap());
    results.push(median_filter(img.view(), 3).unwrap());
    results.push(equalize(img.view()).unwrap());
    let params = AdaptiveEqualization::default();
    results.push(adaptive_equalize(img.view(), &params).unwrap());
    let log = PointTransform::Log { c: 1.0, base: 2.0 };
    results.push(apply_point_transform(img.view(), &log).unwrap());

    for result in results {
        assert_eq!(result.dim(), img.dim());
        assert_eq!(result.index_axis(Axis(2), 3), alpha);
    }
}

#[test]
fn zero_sum_kernels_keep_shape_and_ignore_flat_regions() {
    let plane = Plane::from_elem((9, 13), 42.0);
    for op in EdgeOperator::ALL {
        for kernel in op.kernels() {
            let out = convolve(plane.view(), &kernel, Boundary::Replicate).unwrap();
            assert_eq!(out.dim(), (9, 13));
            assert!(out.iter().all(|v| v.abs() < 1e-9));
        }
    }
    let larger = Kernel::new(ndarray::Array2::from_elem((5, 3), 1.0)).unwrap();
    let out = convolve(plane.view(), &larger, Boundary::Reflect).unwrap();
    assert_eq!(out.dim(), (9, 13));
    assert!((out[[4, 6]] - 15.0 * 42.0).abs() < 1e-9);
}

#[test]
fn shift_is_an_involution() {
    let plane = Plane::from_shape_fn((6, 8), |(y, x)| (y * 8 + x) as f64);
    let once = shift(plane.view()).unwrap();
    assert_ne!(once, plane);
    assert_eq!(shift(once.view()).unwrap(), plane);
}

#[test]
fn inverse_transform_recovers_plane() {
    for (m, n) in [(1, 1), (3, 7), (8, 8), (6, 5)] {
        let plane = Plane::from_shape_fn((m, n), |(y, x)| ((y * 31 + x * 11) % 256) as f64);
        let back = idft(dft(plane.view()).unwrap().view()).unwrap();
        for (a, b) in plane.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-6, "{}x{}: {} vs {}", m, n, a, b);
        }
    }
}

#[test]
fn centered_transform_equals_shifted_transform() {
    let plane = Plane::from_shape_fn((8, 6), |(y, x)| ((y * y + 3 * x) % 50) as f64);
    let centered = centered_dft(plane.view()).unwrap();
    let shifted = shift(dft(plane.view()).unwrap().view()).unwrap();
    for (a, b) in centered.iter().zip(shifted.iter()) {
        assert!((a - b).norm() < 1e-6);
    }
}

#[test]
fn equalization_is_monotone_and_idempotent() {
    let img = textured_rgba(16, 12);
    for c in 0..3 {
        let map = equalization_map(&Histogram::of_image(img.view(), c).unwrap());
        assert!(map.is_monotonic());
    }
    let once = equalize(img.view()).unwrap();
    let twice = equalize(once.view()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn matching_an_image_to_itself_is_identity() {
    let img = textured_rgba(10, 9);
    assert_eq!(match_histograms(img.view(), img.view()).unwrap(), img);
}

#[test]
fn matching_reproduces_reference_distribution() {
    let src = ramp_gray(16, 4, 16);
    let reference = checkerboard(8, 8, 2);
    let result = match_histograms(src.view(), reference.view()).unwrap();
    // Half dark, half bright, like the checkerboard
    let dark = result.iter().filter(|&&v| v == 32).count();
    let bright = result.iter().filter(|&&v| v == 220).count();
    assert_eq!(dark, 32);
    assert_eq!(bright, 32);
}

#[test]
fn median_beats_mean_on_salt_and_pepper() {
    init_logging();
    let clean = ramp_gray(48, 48, 4);
    let noisy = add_salt_and_pepper(clean.view(), 0.05, 0.05, 2024).unwrap();

    let median = median_filter(noisy.view(), 3).unwrap();
    let mean = mean_filter(noisy.view(), 3).unwrap();

    let median_error = mean_abs_error(&median, &clean);
    let mean_error = mean_abs_error(&mean, &clean);
    assert!(
        median_error < mean_error,
        "median {} vs mean {}",
        median_error,
        mean_error
    );
    assert!(median_error < mean_abs_error(&noisy, &clean));
    assert!(std_dev(&median) < std_dev(&noisy));
}

#[test]
fn median_reduces_spread_more_than_mean() {
    init_logging();
    // On a flat field all spread comes from the outliers
    let clean = Array3::<u8>::from_elem((32, 32, 1), 128);
    let noisy = add_salt_and_pepper(clean.view(), 0.05, 0.05, 7).unwrap();

    let noisy_std = std_dev(&noisy);
    let median_std = std_dev(&median_filter(noisy.view(), 3).unwrap());
    let mean_std = std_dev(&mean_filter(noisy.view(), 3).unwrap());

    assert!(noisy_std > 20.0, "noise too sparse: {}", noisy_std);
    assert!(mean_std < noisy_std);
    assert!(
        median_std < mean_std,
        "median std {} vs mean std {}",
        median_std,
        mean_std
    );
}

#[test]
fn adaptive_equalization_leaves_constant_image_unchanged() {
    let img = Array3::<u8>::from_elem((9, 9, 1), 17);
    let result = adaptive_equalize(img.view(), &AdaptiveEqualization::default()).unwrap();
    assert_eq!(result, img);
}

#[test]
fn adaptive_equalization_only_touches_gated_pixels() {
    init_logging();
    let img = Array3::from_shape_fn((16, 16, 1), |(y, x, _)| {
        if x < 8 && y < 8 {
            ((x + y) % 3) as u8
        } else {
            (100 + (x * y) % 50) as u8
        }
    });
    let params = AdaptiveEqualization::default();
    let result = adaptive_equalize(img.view(), &params).unwrap();

    let plane = img.index_axis(Axis(2), 0).mapv(f64::from);
    let n = plane.len() as f64;
    let m = plane.sum() / n;
    let var = plane.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n;

    let mut enhanced = 0;
    for y in 0..16 {
        for x in 0..16 {
            let mut window = Vec::new();
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    let sy = Boundary::Reflect.resolve(y as isize + dy, 16).unwrap();
                    let sx = Boundary::Reflect.resolve(x as isize + dx, 16).unwrap();
                    window.push(plane[[sy, sx]]);
                }
            }
            let lm = window.iter().sum::<f64>() / 9.0;
            let lv = window.iter().map(|v| (v - lm) * (v - lm)).sum::<f64>() / 9.0;
            let near_gate =
                (lm - params.k1 * m).abs() < 1e-6 || (lv - params.k3 * var).abs() < 1e-6;
            if near_gate {
                continue;
            }
            let eligible = lm >= params.k0 * m
                && lm <= params.k1 * m
                && lv >= params.k2 * var
                && lv <= params.k3 * var;
            let v = img[[y, x, 0]];
            if eligible {
                let expected = (params.gain * v as f64).round().min(255.0) as u8;
                assert_eq!(result[[y, x, 0]], expected, "({}, {})", y, x);
                enhanced += 1;
            } else {
                assert_eq!(result[[y, x, 0]], v, "({}, {})", y, x);
            }
        }
    }
    assert!(enhanced > 0);
}

#[test]
fn presets_deserialize_from_json() {
    let params: AdaptiveEqualization =
        serde_json::from_str(r#"{"window": 5, "gain": 8.0}"#).unwrap();
    assert_eq!(params.window, 5);
    assert_eq!(params.gain, 8.0);
    assert_eq!(params.k1, 0.25);

    let t: PointTransform =
        serde_json::from_str(r#"{"op": "gamma", "c": 1.0, "gamma": 2.2}"#).unwrap();
    assert_eq!(t, PointTransform::Gamma { c: 1.0, gamma: 2.2 });
    let t: PointTransform = serde_json::from_str(r#"{"op": "invert"}"#).unwrap();
    assert_eq!(t, PointTransform::Invert);

    let op: EdgeOperator = serde_json::from_str(r#""kirsch""#).unwrap();
    assert_eq!(op, EdgeOperator::Kirsch);
    let kind: LaplacianKernel = serde_json::from_str(r#""eight_positive""#).unwrap();
    assert_eq!(kind, LaplacianKernel::EightPositive);
    let boundary: Boundary = serde_json::from_str(r#""reflect""#).unwrap();
    assert_eq!(boundary, Boundary::Reflect);

    let round = serde_json::to_string(&PointTransform::Log { c: 2.0, base: 10.0 }).unwrap();
    assert!(round.contains(r#""op":"log""#));
}
