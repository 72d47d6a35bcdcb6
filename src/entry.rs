use anyhow::{anyhow, Context, Result};
use crossbeam::thread;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{CaseSpec, RevolveConfig};
use crate::io::output::{write_obj_mesh, write_profile_csv, write_scene_json, SurfaceScene};
use crate::io::ImagePair;
use crate::processing::{revolve, RevolveArtifacts};
use crate::texture::texture::create_overlay;
use crate::texture::{write_mtl_revolution, LESION_MATERIAL};

/// Files written for one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFiles {
    pub overlay: PathBuf,
    pub texture: PathBuf,
    pub mtl: PathBuf,
    pub obj: PathBuf,
    pub scene: PathBuf,
    pub profile: PathBuf,
}

impl OutputFiles {
    fn new(output_dir: &Path, case_name: &str) -> Self {
        Self {
            overlay: output_dir.join(format!("{}_overlay.png", case_name)),
            texture: output_dir.join(format!("{}_texture.png", case_name)),
            mtl: output_dir.join(format!("{}.mtl", case_name)),
            obj: output_dir.join(format!("{}.obj", case_name)),
            scene: output_dir.join(format!("{}_scene.json", case_name)),
            profile: output_dir.join(format!("{}_profile.csv", case_name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub angular_samples: usize,
    pub radius_min: f64,
    pub radius_max: f64,
    pub lesion_rows: usize,
    pub mask_resized_from: Option<(usize, usize)>,
    pub files: OutputFiles,
}

/// Writes the overlay, texture + MTL, OBJ, scene JSON and profile CSV of one
/// case into `output_dir`.
pub fn write_case_outputs(
    case_name: &str,
    pair: &ImagePair,
    artifacts: &RevolveArtifacts,
    output_dir: &Path,
    config: &RevolveConfig,
) -> Result<OutputFiles> {
    std::fs::create_dir_all(output_dir).context(format!(
        "Could not create output directory: {:?}",
        output_dir
    ))?;
    let files = OutputFiles::new(output_dir, case_name);

    create_overlay(
        pair.xray.view(),
        pair.mask.view(),
        config.overlay_alpha,
        &files.overlay,
    )?;

    let uv_coords = write_mtl_revolution(&artifacts.colors, output_dir, case_name)?;
    let mtl_name = format!("{}.mtl", case_name);
    write_obj_mesh(
        &artifacts.mesh,
        &uv_coords,
        &files.obj,
        &mtl_name,
        LESION_MATERIAL,
    )
    .map_err(|e| anyhow!("Failed [{}]: {}", files.obj.display(), e))?;

    let scene = SurfaceScene::new(&artifacts.mesh, &artifacts.colors);
    write_scene_json(&scene, &files.scene)?;
    write_profile_csv(&artifacts.profile, &artifacts.colors, &files.profile)?;

    Ok(files)
}

/// Loads one X-ray/mask pair, revolves it and writes every output.
pub fn run_case(case: &CaseSpec) -> Result<CaseSummary> {
    info!(case = %case.name, xray = %case.xray_path.display(), mask = %case.mask_path.display(), "starting case");

    let pair = ImagePair::load(&case.xray_path, &case.mask_path)
        .with_context(|| format!("Failed to load images for case {}", case.name))?;
    let (rows, cols) = pair.shape();

    let artifacts = revolve(pair.xray.view(), pair.mask.view(), &case.config)
        .with_context(|| format!("revolve({}) failed", case.name))?;
    info!(
        case = %case.name,
        x_shape = ?artifacts.mesh.x.dim(),
        surfacecolor_shape = ?artifacts.colors.surface_color().dim(),
        "surface synthesized"
    );

    let files = write_case_outputs(&case.name, &pair, &artifacts, &case.output_dir, &case.config)
        .with_context(|| format!("writing outputs for case {} failed", case.name))?;
    info!(case = %case.name, dir = %case.output_dir.display(), "outputs written");

    Ok(CaseSummary {
        name: case.name.clone(),
        rows,
        cols,
        angular_samples: artifacts.mesh.samples(),
        radius_min: artifacts.profile.min(),
        radius_max: artifacts.profile.max(),
        lesion_rows: artifacts.colors.lesion_rows(),
        mask_resized_from: pair.mask_resized_from,
        files,
    })
}

/// Runs every case on its own scoped thread. Summaries come back in input
/// order; the first failing case aborts the batch with its name attached.
pub fn run_cases(cases: &[CaseSpec]) -> Result<Vec<CaseSummary>> {
    let results = thread::scope(|s| {
        let handles: Vec<_> = cases
            .iter()
            .map(|case| s.spawn(move |_| run_case(case)))
            .collect();
        handles
            .into_iter()
            .zip(cases)
            .map(|(handle, case)| {
                handle
                    .join()
                    .map_err(|payload| anyhow!("case {} panicked: {:?}", case.name, payload))?
                    .with_context(|| format!("case {} failed", case.name))
            })
            .collect::<Vec<Result<CaseSummary>>>()
    })
    .map_err(|panic_payload| anyhow!("Parallel processing threads panicked: {:?}", panic_payload))?;

    results.into_iter().collect()
}

/// Reads a `[[case]]` list from TOML and runs it.
pub fn run_cases_from_toml<P: AsRef<Path>>(path: P) -> Result<Vec<CaseSummary>> {
    let path = path.as_ref();
    let cases = CaseSpec::list_from_toml_file(path)
        .with_context(|| format!("Failed to read case list {}", path.display()))?;
    info!(count = cases.len(), "loaded case list");
    run_cases(&cases)
}
