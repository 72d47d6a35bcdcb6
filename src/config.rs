use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RevolveError, RevolveResult};

/// Tunable parameters of the revolve pipeline.
///
/// Every field has a default, so a TOML file only needs the keys it wants to
/// override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevolveConfig {
    /// Number of angular samples per ring (T).
    pub angular_samples: usize,
    /// Gaussian sigma applied to the mask before the radius is derived.
    pub mask_sigma: f64,
    /// Gaussian sigma applied to the per-row radius sequence.
    pub profile_sigma: f64,
    /// Mask values strictly above this count as lesion pixels.
    pub mask_threshold: u8,
    /// Weight of the lesion density added to the red channel.
    pub red_amplification: f64,
    /// Minimum radius added to every row.
    pub base_radius: f64,
    /// Gaussian kernels are cut off at `truncate * sigma`.
    pub truncate: f64,
    /// `false` samples the closed interval [0, 2π] so the last column repeats
    /// angle 0; `true` samples [0, 2π) and the mesh wraps around instead.
    pub deduplicate_seam: bool,
    /// Opacity of the mask layer in the 2D overlay.
    pub overlay_alpha: f64,
}

impl Default for RevolveConfig {
    fn default() -> Self {
        Self {
            angular_samples: 200,
            mask_sigma: 10.0,
            profile_sigma: 5.0,
            mask_threshold: 127,
            red_amplification: 1.5,
            base_radius: 20.0,
            truncate: 4.0,
            deduplicate_seam: false,
            overlay_alpha: 0.5,
        }
    }
}

impl RevolveConfig {
    pub fn from_toml_str(text: &str) -> RevolveResult<Self> {
        let config: RevolveConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> RevolveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> RevolveResult<()> {
        if self.angular_samples == 0 {
            return Err(RevolveError::InvalidParameter {
                name: "angular_samples",
                value: 0.0,
            });
        }
        positive("mask_sigma", self.mask_sigma)?;
        positive("profile_sigma", self.profile_sigma)?;
        positive("truncate", self.truncate)?;
        if !self.red_amplification.is_finite() || self.red_amplification < 0.0 {
            return Err(RevolveError::InvalidParameter {
                name: "red_amplification",
                value: self.red_amplification,
            });
        }
        if !self.base_radius.is_finite() || self.base_radius < 0.0 {
            return Err(RevolveError::InvalidParameter {
                name: "base_radius",
                value: self.base_radius,
            });
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(RevolveError::InvalidParameter {
                name: "overlay_alpha",
                value: self.overlay_alpha,
            });
        }
        Ok(())
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> RevolveResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RevolveError::InvalidParameter { name, value })
    }
}

/// One (X-ray, mask) pair together with where its outputs go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSpec {
    /// Prefix of every written file.
    pub name: String,
    pub xray_path: PathBuf,
    pub mask_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub config: RevolveConfig,
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    #[serde(default, rename = "case")]
    cases: Vec<CaseSpec>,
}

impl CaseSpec {
    pub fn new(
        name: impl Into<String>,
        xray_path: impl Into<PathBuf>,
        mask_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: RevolveConfig,
    ) -> Self {
        Self {
            name: name.into(),
            xray_path: xray_path.into(),
            mask_path: mask_path.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Parses a list of `[[case]]` tables. Each case is validated.
    pub fn list_from_toml_str(text: &str) -> RevolveResult<Vec<CaseSpec>> {
        let file: CaseFile = toml::from_str(text)?;
        for case in &file.cases {
            case.config.validate()?;
        }
        Ok(file.cases)
    }

    pub fn list_from_toml_file<P: AsRef<Path>>(path: P) -> RevolveResult<Vec<CaseSpec>> {
        let text = std::fs::read_to_string(path)?;
        Self::list_from_toml_str(&text)
    }
}
