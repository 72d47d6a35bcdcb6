pub mod config;
pub mod entry;
pub mod error;
pub mod io;
pub mod processing;
pub mod texture;
mod utils;

#[cfg(feature = "python")]
mod python_bind;

pub use config::{CaseSpec, RevolveConfig};
pub use entry::{run_case, run_cases, run_cases_from_toml, CaseSummary};
pub use error::{RevolveError, RevolveResult};
pub use processing::{revolve, RevolveArtifacts};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::wrap_pyfunction;
#[cfg(feature = "python")]
use python_bind::{config_from_args, image_pair_from_rows, PyCaseSummary, PyRevolution};

/// Runs one X-ray/mask pair from disk and writes every output into
/// `output_dir`.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(
    signature = (
        xray_path,
        mask_path,
        output_dir = "output",
        case_name = "case",
        // pipeline parameters
        angular_samples = 200usize,
        mask_sigma = 10.0f64,
        profile_sigma = 5.0f64,
        mask_threshold = 127u8,
        red_amplification = 1.5f64,
        base_radius = 20.0f64,
        deduplicate_seam = false
    )
)]
#[allow(clippy::too_many_arguments)]
fn revolve_case(
    xray_path: &str,
    mask_path: &str,
    output_dir: &str,
    case_name: &str,
    angular_samples: usize,
    mask_sigma: f64,
    profile_sigma: f64,
    mask_threshold: u8,
    red_amplification: f64,
    base_radius: f64,
    deduplicate_seam: bool,
) -> PyResult<PyCaseSummary> {
    let config = config_from_args(
        angular_samples,
        mask_sigma,
        profile_sigma,
        mask_threshold,
        red_amplification,
        base_radius,
        deduplicate_seam,
    )?;
    let case = CaseSpec::new(case_name, xray_path, mask_path, output_dir, config);
    let summary =
        run_case(&case).map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(format!("{:#}", e)))?;
    Ok(summary.into())
}

/// Same pipeline on in-memory images given as nested lists of 8-bit rows.
/// Nothing is written to disk.
#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (
    xray,
    mask,
    angular_samples = 200usize,
    mask_sigma = 10.0f64,
    profile_sigma = 5.0f64,
    mask_threshold = 127u8,
    red_amplification = 1.5f64,
    base_radius = 20.0f64,
    deduplicate_seam = false
))]
#[allow(clippy::too_many_arguments)]
fn revolve_arrays(
    xray: Vec<Vec<u8>>,
    mask: Vec<Vec<u8>>,
    angular_samples: usize,
    mask_sigma: f64,
    profile_sigma: f64,
    mask_threshold: u8,
    red_amplification: f64,
    base_radius: f64,
    deduplicate_seam: bool,
) -> PyResult<PyRevolution> {
    let config = config_from_args(
        angular_samples,
        mask_sigma,
        profile_sigma,
        mask_threshold,
        red_amplification,
        base_radius,
        deduplicate_seam,
    )?;
    let pair = image_pair_from_rows(xray, mask)?;
    let artifacts = revolve(pair.xray.view(), pair.mask.view(), &config)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))?;
    Ok(PyRevolution::from(&artifacts))
}

/// Runs every `[[case]]` of a TOML case list, one thread per case.
#[cfg(feature = "python")]
#[pyfunction]
fn revolve_config_toml(path: &str) -> PyResult<Vec<PyCaseSummary>> {
    let summaries = run_cases_from_toml(path)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(format!("{:#}", e)))?;
    Ok(summaries.into_iter().map(Into::into).collect())
}

/// This is the module importable from Python:
///
/// ```python
/// import revolvex as rx
/// summary = rx.revolve_case("xray.png", "mask.png", "out", "patient_01")
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn revolvex(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add_function(wrap_pyfunction!(revolve_case, m)?)?;
    m.add_function(wrap_pyfunction!(revolve_arrays, m)?)?;
    m.add_function(wrap_pyfunction!(revolve_config_toml, m)?)?;

    m.add_class::<PyCaseSummary>()?;
    m.add_class::<PyRevolution>()?;
    Ok(())
}
