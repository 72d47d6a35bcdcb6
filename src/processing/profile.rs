use ndarray::{Array1, ArrayView2, Axis};
use rayon::prelude::*;

use super::smoothing::gaussian_filter1d;
use crate::config::RevolveConfig;
use crate::error::{RevolveError, RevolveResult};

/// Per-row radius of the revolved surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusProfile {
    /// Mean of each smoothed-mask row.
    pub row_mean: Array1<f64>,
    /// Radius before the profile is smoothed.
    pub raw: Array1<f64>,
    /// Smoothed radius, one value per image row.
    pub radius: Array1<f64>,
}

impl RadiusProfile {
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.radius.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.radius.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Mean of every row, rows reduced in parallel.
pub fn row_means(arr: ArrayView2<f64>) -> Array1<f64> {
    let means: Vec<f64> = arr
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| row.mean().unwrap_or(0.0))
        .collect();
    Array1::from(means)
}

/// Turns mask density into a radius:
/// `raw[i] = row_mean[i] / 255 * (cols / 2) + base_radius`, then smooths the
/// sequence with `profile_sigma`. `cols / 2` is integer division.
pub fn extract_radius_profile(
    smoothed_mask: ArrayView2<f64>,
    config: &RevolveConfig,
) -> RevolveResult<RadiusProfile> {
    let (rows, cols) = smoothed_mask.dim();
    if rows == 0 || cols == 0 {
        return Err(RevolveError::EmptyInput { rows, cols });
    }

    let half_width = (cols / 2) as f64;
    let row_mean = row_means(smoothed_mask);
    let raw = row_mean.mapv(|m| m / 255.0 * half_width + config.base_radius);
    let radius = gaussian_filter1d(raw.view(), config.profile_sigma, config.truncate)?;

    Ok(RadiusProfile {
        row_mean,
        raw,
        radius,
    })
}

#[cfg(test)]
mod profile_tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn test_zero_mask_gives_base_radius() {
        let smoothed = Array2::<f64>::zeros((30, 17));
        let profile = extract_radius_profile(smoothed.view(), &RevolveConfig::default()).unwrap();
        assert_eq!(profile.len(), 30);
        for r in profile.radius.iter() {
            assert_relative_eq!(*r, 20.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_full_mask_reaches_half_width_plus_base() {
        let smoothed = Array2::from_elem((25, 41), 255.0);
        let profile = extract_radius_profile(smoothed.view(), &RevolveConfig::default()).unwrap();
        // 41 / 2 == 20 with integer division
        for r in profile.radius.iter() {
            assert_relative_eq!(*r, 40.0, epsilon = 1e-9);
        }
        assert_relative_eq!(profile.max(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_raw_radius_follows_row_mean() {
        let smoothed = Array2::from_shape_fn((4, 10), |(i, _)| (i as f64) * 51.0);
        let config = RevolveConfig::default();
        let profile = extract_radius_profile(smoothed.view(), &config).unwrap();
        for i in 0..4 {
            assert_relative_eq!(profile.row_mean[i], i as f64 * 51.0, epsilon = 1e-12);
            assert_relative_eq!(profile.raw[i], i as f64 * 0.2 * 5.0 + 20.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_profile_never_drops_below_base() {
        let smoothed = Array2::from_shape_fn((60, 32), |(i, j)| if i > 20 && i < 35 && j > 10 { 255.0 } else { 0.0 });
        let profile = extract_radius_profile(smoothed.view(), &RevolveConfig::default()).unwrap();
        assert!(profile.radius.iter().all(|&r| r >= 20.0 - 1e-9));
        // smoothing spreads the bump into neighbouring rows
        assert!(profile.radius[18] > 20.0);
        assert!(profile.radius[28] < profile.raw[28]);
    }

    #[test]
    fn test_custom_base_radius_is_respected() {
        let smoothed = Array2::<f64>::zeros((5, 5));
        let config = RevolveConfig {
            base_radius: 3.0,
            ..RevolveConfig::default()
        };
        let profile = extract_radius_profile(smoothed.view(), &config).unwrap();
        assert_relative_eq!(profile.min(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_mask_is_rejected() {
        let smoothed = Array2::<f64>::zeros((0, 5));
        assert!(extract_radius_profile(smoothed.view(), &RevolveConfig::default()).is_err());
    }
}
