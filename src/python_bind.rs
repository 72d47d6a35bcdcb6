// File: src/python_bind.rs
use ndarray::Array2;
use pyo3::prelude::*;

use crate::config::RevolveConfig;
use crate::entry::CaseSummary;
use crate::io::output::nested;
use crate::io::ImagePair;
use crate::processing::RevolveArtifacts;

#[pyclass]
#[derive(Debug, Clone)]
pub struct PyCaseSummary {
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub rows: usize,
    #[pyo3(get)]
    pub cols: usize,
    #[pyo3(get)]
    pub angular_samples: usize,
    #[pyo3(get)]
    pub radius_min: f64,
    #[pyo3(get)]
    pub radius_max: f64,
    #[pyo3(get)]
    pub lesion_rows: usize,
    #[pyo3(get)]
    pub mask_resized_from: Option<(usize, usize)>,
    #[pyo3(get)]
    pub obj_path: String,
    #[pyo3(get)]
    pub overlay_path: String,
    #[pyo3(get)]
    pub scene_path: String,
}

#[pymethods]
impl PyCaseSummary {
    fn __repr__(&self) -> String {
        format!(
            "CaseSummary(name={}, shape=({}, {}), T={}, radius=[{:.2}, {:.2}], lesion_rows={})",
            self.name,
            self.rows,
            self.cols,
            self.angular_samples,
            self.radius_min,
            self.radius_max,
            self.lesion_rows
        )
    }
}

impl From<CaseSummary> for PyCaseSummary {
    fn from(summary: CaseSummary) -> Self {
        Self {
            name: summary.name,
            rows: summary.rows,
            cols: summary.cols,
            angular_samples: summary.angular_samples,
            radius_min: summary.radius_min,
            radius_max: summary.radius_max,
            lesion_rows: summary.lesion_rows,
            mask_resized_from: summary.mask_resized_from,
            obj_path: summary.files.obj.display().to_string(),
            overlay_path: summary.files.overlay.display().to_string(),
            scene_path: summary.files.scene.display().to_string(),
        }
    }
}

/// Pipeline output as nested Python lists.
#[pyclass]
#[derive(Debug, Clone)]
pub struct PyRevolution {
    #[pyo3(get)]
    pub radius: Vec<f64>,
    #[pyo3(get)]
    pub x: Vec<Vec<f64>>,
    #[pyo3(get)]
    pub y: Vec<Vec<f64>>,
    #[pyo3(get)]
    pub z: Vec<Vec<f64>>,
    #[pyo3(get)]
    pub surface_color: Vec<Vec<f64>>,
    #[pyo3(get)]
    pub rgb: Vec<Vec<(u8, u8, u8)>>,
}

#[pymethods]
impl PyRevolution {
    fn __repr__(&self) -> String {
        let cols = self.x.first().map_or(0, |row| row.len());
        format!("Revolution(rows={}, samples={})", self.x.len(), cols)
    }
}

impl From<&RevolveArtifacts> for PyRevolution {
    fn from(artifacts: &RevolveArtifacts) -> Self {
        let colors = &artifacts.colors;
        let rgb = (0..colors.rows())
            .map(|i| {
                (0..colors.samples())
                    .map(|j| {
                        let [r, g, b] = colors.rgb8(i, j);
                        (r, g, b)
                    })
                    .collect()
            })
            .collect();
        Self {
            radius: artifacts.profile.radius.to_vec(),
            x: nested(&artifacts.mesh.x),
            y: nested(&artifacts.mesh.y),
            z: nested(&artifacts.mesh.z),
            surface_color: nested(&colors.surface_color()),
            rgb,
        }
    }
}

/// Rectangular nested list to an array; ragged rows are a shape error.
pub fn rows_to_array(rows: Vec<Vec<u8>>) -> PyResult<Array2<u8>> {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().find(|r| r.len() != width) {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "ragged image: expected rows of length {}, found {}",
            width,
            bad.len()
        )));
    }
    let flat: Vec<u8> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

pub fn image_pair_from_rows(xray: Vec<Vec<u8>>, mask: Vec<Vec<u8>>) -> PyResult<ImagePair> {
    ImagePair::from_arrays(rows_to_array(xray)?, rows_to_array(mask)?)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[allow(clippy::too_many_arguments)]
pub fn config_from_args(
    angular_samples: usize,
    mask_sigma: f64,
    profile_sigma: f64,
    mask_threshold: u8,
    red_amplification: f64,
    base_radius: f64,
    deduplicate_seam: bool,
) -> PyResult<RevolveConfig> {
    let config = RevolveConfig {
        angular_samples,
        mask_sigma,
        profile_sigma,
        mask_threshold,
        red_amplification,
        base_radius,
        deduplicate_seam,
        ..RevolveConfig::default()
    };
    config
        .validate()
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod python_bind_tests {
    use super::*;
    use pyo3::exceptions::{PyRuntimeError, PyValueError};

    fn is_value_error(err: &PyErr) -> bool {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| err.is_instance_of::<PyValueError>(py))
    }

    #[test]
    fn test_rectangular_rows_become_array() {
        let arr = rows_to_array(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(arr.dim(), (2, 3));
        assert_eq!(arr[(1, 2)], 6);
    }

    #[test]
    fn test_ragged_rows_are_value_error() {
        let err = rows_to_array(vec![vec![1, 2, 3], vec![4, 5]]).unwrap_err();
        assert!(is_value_error(&err));
    }

    #[test]
    fn test_bad_parameters_are_value_error() {
        let err = config_from_args(200, 0.0, 5.0, 127, 1.5, 20.0, false).unwrap_err();
        assert!(is_value_error(&err));
        let err = config_from_args(0, 10.0, 5.0, 127, 1.5, 20.0, false).unwrap_err();
        assert!(is_value_error(&err));

        let config = config_from_args(64, 10.0, 5.0, 127, 1.5, 20.0, true).unwrap();
        assert_eq!(config.angular_samples, 64);
        assert!(config.deduplicate_seam);
    }

    #[test]
    fn test_empty_image_is_runtime_error() {
        let err = image_pair_from_rows(Vec::new(), vec![vec![0]]).unwrap_err();
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| assert!(err.is_instance_of::<PyRuntimeError>(py)));
    }
}
