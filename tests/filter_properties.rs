use approx::assert_relative_eq;
use ndarray::{s, Array3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uniform_filter::{filter_tiled, uniform_filter, FilterError, NoopMonitor, Strategy};

const STRATEGIES: [Strategy; 2] = [Strategy::Naive, Strategy::Separable];

fn random_raster(rng: &mut StdRng, bands: usize, rows: usize, cols: usize) -> Array3<f32> {
    Array3::from_shape_simple_fn((bands, rows, cols), || rng.gen_range(-1000.0f32..1000.0))
}

fn assert_close(a: &Array3<f32>, b: &Array3<f32>) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-3, max_relative = 1e-4);
    }
}

#[test]
fn test_strategies_agree_on_random_rasters() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..25 {
        let bands = rng.gen_range(1..4);
        let rows = rng.gen_range(1..24);
        let cols = rng.gen_range(1..24);
        let half = rng.gen_range(0..12);
        let input = random_raster(&mut rng, bands, rows, cols);

        let naive = uniform_filter(&input, half, Strategy::Naive).unwrap();
        let separable = uniform_filter(&input, half, Strategy::Separable).unwrap();
        assert_close(&naive, &separable);
    }
}

#[test]
fn test_shape_preserved_and_float32() {
    let input = Array3::<u16>::from_elem((3, 7, 11), 500);
    for strategy in STRATEGIES {
        let out: Array3<f32> = uniform_filter(&input, 2, strategy).unwrap();
        assert_eq!(out.dim(), input.dim());
        assert!(out.iter().all(|&v| v == 500.0));
    }
}

#[test]
fn test_all_ones_with_large_window() {
    let input = Array3::<f32>::ones((1, 5, 5));
    for strategy in STRATEGIES {
        let out = uniform_filter(&input, 3, strategy).unwrap();
        for &v in out.iter() {
            assert_relative_eq!(v, 1.0);
        }
    }
}

#[test]
fn test_edges_are_clamped_not_zero_padded() {
    // Zero padding would pull the border mean of a constant raster below 10
    let input = Array3::from_elem((1, 6, 4), 10.0f32);
    for strategy in STRATEGIES {
        let out = uniform_filter(&input, 2, strategy).unwrap();
        assert_relative_eq!(out[[0, 0, 0]], 10.0);
        assert_relative_eq!(out[[0, 5, 3]], 10.0);
    }
}

#[test]
fn test_zero_half_size_is_identity() {
    let mut rng = StdRng::seed_from_u64(5);
    let input = random_raster(&mut rng, 2, 9, 13);
    for strategy in STRATEGIES {
        assert_eq!(uniform_filter(&input, 0, strategy).unwrap(), input);
    }
}

#[test]
fn test_band_permutation_commutes() {
    let mut rng = StdRng::seed_from_u64(11);
    let input = random_raster(&mut rng, 3, 10, 8);
    let order = [2, 0, 1];
    let permuted = input.select(Axis(0), &order);

    for strategy in STRATEGIES {
        let out = uniform_filter(&input, 2, strategy).unwrap();
        let out_permuted = uniform_filter(&permuted, 2, strategy).unwrap();
        assert_eq!(out.select(Axis(0), &order), out_permuted);
    }
}

#[test]
fn test_single_band_in_isolation() {
    let mut rng = StdRng::seed_from_u64(99);
    let input = random_raster(&mut rng, 4, 12, 9);

    for strategy in STRATEGIES {
        let all = uniform_filter(&input, 3, strategy).unwrap();
        for band in 0..4 {
            let alone = uniform_filter(&input.slice(s![band..=band, .., ..]), 3, strategy).unwrap();
            assert_eq!(alone.index_axis(Axis(0), 0), all.index_axis(Axis(0), band));
        }
    }
}

#[test]
fn test_tiled_agrees_with_naive() {
    let mut rng = StdRng::seed_from_u64(3);
    let input = random_raster(&mut rng, 2, 31, 17);
    let naive = uniform_filter(&input, 4, Strategy::Naive).unwrap();
    let tiled = filter_tiled(&input, 4, Strategy::Separable, 8, &NoopMonitor).unwrap();
    assert_close(&naive, &tiled);
}

#[test]
fn test_rejections() {
    let input = Array3::<f32>::ones((2, 4, 4));
    let empty = Array3::<f32>::zeros((2, 0, 4));
    for strategy in STRATEGIES {
        assert!(matches!(
            uniform_filter(&input, -1, strategy),
            Err(FilterError::InvalidHalfSize(-1))
        ));
        assert!(matches!(
            uniform_filter(&empty, 1, strategy),
            Err(FilterError::InvalidDimensions { rows: 0, .. })
        ));
        assert!(matches!(
            filter_tiled(&input, -1, strategy, 2, &NoopMonitor),
            Err(FilterError::InvalidHalfSize(-1))
        ));
    }
}
