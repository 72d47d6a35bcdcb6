use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::config::RevolveConfig;
use crate::error::{RevolveError, RevolveResult};

/// Per-vertex color of the revolved surface.
///
/// Every channel is a per-row scalar broadcast over all angular samples, so
/// the color is rotationally invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorField {
    /// Mean X-ray brightness of each row, in [0, 1].
    pub intensity: Array1<f64>,
    /// Fraction of each row's mask pixels above the lesion threshold.
    pub lesion_density: Array1<f64>,
    pub r: Array2<f64>,
    pub g: Array2<f64>,
    pub b: Array2<f64>,
}

impl ColorField {
    /// Builds the `rows x samples` color grid.
    ///
    /// `r = clamp(intensity + density * red_amplification, 0, 1)` and
    /// `g = b = intensity * (1 - density)`, so lesion rows lean towards red.
    /// The mask must already have the image's shape.
    pub fn synthesize(
        image: ArrayView2<u8>,
        mask: ArrayView2<u8>,
        samples: usize,
        config: &RevolveConfig,
    ) -> RevolveResult<Self> {
        let (rows, cols) = image.dim();
        if rows == 0 || cols == 0 {
            return Err(RevolveError::EmptyInput { rows, cols });
        }
        if mask.dim() != image.dim() {
            return Err(RevolveError::ShapeMismatch {
                expected: image.dim(),
                actual: mask.dim(),
            });
        }
        if samples == 0 {
            return Err(RevolveError::InvalidParameter {
                name: "angular_samples",
                value: 0.0,
            });
        }

        let intensity = per_row(image, |row| {
            row.iter().map(|&v| v as f64).sum::<f64>() / row.len() as f64 / 255.0
        });
        let threshold = config.mask_threshold;
        let lesion_density = per_row(mask, |row| {
            row.iter().filter(|&&v| v > threshold).count() as f64 / row.len() as f64
        });

        let amp = config.red_amplification;
        let r = Array2::from_shape_fn((rows, samples), |(i, _)| {
            (intensity[i] + lesion_density[i] * amp).clamp(0.0, 1.0)
        });
        let g = Array2::from_shape_fn((rows, samples), |(i, _)| {
            intensity[i] * (1.0 - lesion_density[i])
        });
        let b = g.clone();

        Ok(Self {
            intensity,
            lesion_density,
            r,
            g,
            b,
        })
    }

    pub fn rows(&self) -> usize {
        self.r.nrows()
    }

    pub fn samples(&self) -> usize {
        self.r.ncols()
    }

    pub fn rgb(&self, i: usize, j: usize) -> [f64; 3] {
        [self.r[(i, j)], self.g[(i, j)], self.b[(i, j)]]
    }

    /// 8-bit form of a vertex color; channels are truncated, not rounded.
    pub fn rgb8(&self, i: usize, j: usize) -> [u8; 3] {
        self.rgb(i, j).map(|c| (c * 255.0) as u8)
    }

    /// Mean of the three channels, for renderers that color a surface by one
    /// scalar through a colorscale.
    ///
    /// This is lossy: a bright healthy row and a lesion row can share the same
    /// mean. The full RGB field is kept for the texture output.
    pub fn surface_color(&self) -> Array2<f64> {
        (&self.r + &self.g + &self.b) / 3.0
    }

    /// Number of rows with any lesion pixel.
    pub fn lesion_rows(&self) -> usize {
        self.lesion_density.iter().filter(|&&d| d > 0.0).count()
    }
}

fn per_row<F>(arr: ArrayView2<u8>, f: F) -> Array1<f64>
where
    F: Fn(ndarray::ArrayView1<u8>) -> f64 + Sync + Send,
{
    let values: Vec<f64> = arr.axis_iter(Axis(0)).into_par_iter().map(f).collect();
    Array1::from(values)
}
