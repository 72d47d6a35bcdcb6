//! The pure part of the pipeline: mask smoothing, radius profile, revolution
//! mesh and surface color. Nothing here touches the filesystem.

pub mod color;
pub mod mesh;
pub mod profile;
pub mod smoothing;

use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::config::RevolveConfig;
use crate::error::{RevolveError, RevolveResult};
use crate::io::input::ensure_non_empty;
use color::ColorField;
use mesh::{RevolutionMesh, SeamLayout};
use profile::{extract_radius_profile, RadiusProfile};
use smoothing::gaussian_filter;

/// Every intermediate product of one revolve run.
#[derive(Debug, Clone, PartialEq)]
pub struct RevolveArtifacts {
    pub smoothed_mask: Array2<f64>,
    pub profile: RadiusProfile,
    pub mesh: RevolutionMesh,
    pub colors: ColorField,
}

/// Runs smoother, profile extractor, mesh builder and color synthesizer on an
/// X-ray and a mask of the same shape.
pub fn revolve(
    xray: ArrayView2<u8>,
    mask: ArrayView2<u8>,
    config: &RevolveConfig,
) -> RevolveResult<RevolveArtifacts> {
    config.validate()?;
    ensure_non_empty(xray.dim())?;
    if mask.dim() != xray.dim() {
        return Err(RevolveError::ShapeMismatch {
            expected: xray.dim(),
            actual: mask.dim(),
        });
    }

    let mask_f = mask.mapv(f64::from);
    let smoothed_mask = gaussian_filter(mask_f.view(), config.mask_sigma, config.truncate)?;
    let profile = extract_radius_profile(smoothed_mask.view(), config)?;
    debug!(
        rows = profile.len(),
        min = profile.min(),
        max = profile.max(),
        "radius profile extracted"
    );

    let seam = SeamLayout::from_deduplicate(config.deduplicate_seam);
    let mesh = RevolutionMesh::build(profile.radius.view(), config.angular_samples, seam)?;
    let colors = ColorField::synthesize(xray, mask, config.angular_samples, config)?;

    Ok(RevolveArtifacts {
        smoothed_mask,
        profile,
        mesh,
        colors,
    })
}
