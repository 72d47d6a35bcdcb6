use anyhow::{anyhow, bail, Context};
use csv::Writer;
use ndarray::Array2;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::processing::color::ColorField;
use crate::processing::mesh::{RevolutionMesh, SeamLayout};
use crate::processing::profile::RadiusProfile;

/// Writes the revolution mesh as a Wavefront OBJ with UVs, radial normals
/// and two triangles per grid quad.
pub fn write_obj_mesh(
    mesh: &RevolutionMesh,
    uv_coords: &[(f64, f64)],
    filename: &Path,
    mtl_filename: &str,
    material: &str,
) -> anyhow::Result<()> {
    if mesh.rows() < 2 {
        bail!("Need at least two rings to create a mesh, got {}.", mesh.rows());
    }
    // a closed seam with two columns puts both at angle 0
    if mesh.seam == SeamLayout::Closed && mesh.samples() < 3 {
        bail!(
            "Need at least three angular samples for a closed seam, got {}.",
            mesh.samples()
        );
    }
    let faces = mesh.faces();
    if faces.is_empty() {
        bail!(
            "Mesh with {} rings and {} angular samples has no faces.",
            mesh.rows(),
            mesh.samples()
        );
    }
    if uv_coords.len() != mesh.vertex_count() {
        return Err(anyhow!(
            "UV coordinates must match the number of vertices. Expected {}, got {}.",
            mesh.vertex_count(),
            uv_coords.len()
        ));
    }

    let file = File::create(filename)
        .with_context(|| format!("Could not create {}", filename.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "mtllib {}", mtl_filename)?;
    writeln!(writer, "usemtl {}", material)?;

    for i in 0..mesh.rows() {
        for j in 0..mesh.samples() {
            let [x, y, z] = mesh.vertex(i, j);
            writeln!(writer, "v {} {} {}", x, y, z)?;
        }
    }

    for (u, v) in uv_coords {
        writeln!(writer, "vt {} {}", u, v)?;
    }

    // one normal per vertex keeps the f a/b/c indices identical
    for _ in 0..mesh.rows() {
        for j in 0..mesh.samples() {
            let [nx, ny, nz] = mesh.normal(j);
            writeln!(writer, "vn {} {} {}", nx, ny, nz)?;
        }
    }

    for [a, b, c] in faces {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {0}/{0}/{0} {1}/{1}/{1} {2}/{2}/{2}", a, b, c)?;
    }

    writer.flush()?;
    Ok(())
}

/// Surface trace for renderers that color a surface through one scalar.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceTrace {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
    pub surfacecolor: Vec<Vec<f64>>,
    pub colorscale: Vec<(f64, String)>,
    pub showscale: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerAnnotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub text: String,
    pub color: String,
    pub size: u32,
}

/// Renderer-agnostic description of the 3D view.
#[derive(Debug, Clone, Serialize)]
pub struct SurfaceScene {
    pub title: String,
    pub axis_titles: [String; 3],
    pub surface: SurfaceTrace,
    pub annotation: MarkerAnnotation,
}

pub(crate) fn nested(arr: &Array2<f64>) -> Vec<Vec<f64>> {
    arr.outer_iter().map(|row| row.to_vec()).collect()
}

impl SurfaceScene {
    /// Surface colored gray to red by the scalar proxy, with a lesion marker
    /// on the axis at half height.
    pub fn new(mesh: &RevolutionMesh, colors: &ColorField) -> Self {
        let surface = SurfaceTrace {
            x: nested(&mesh.x),
            y: nested(&mesh.y),
            z: nested(&mesh.z),
            surfacecolor: nested(&colors.surface_color()),
            colorscale: vec![(0.0, "gray".to_string()), (1.0, "red".to_string())],
            showscale: true,
            opacity: 0.9,
        };
        let annotation = MarkerAnnotation {
            x: 0.0,
            y: 0.0,
            z: (mesh.rows() / 2) as f64,
            text: "TB Lesion Highlighted".to_string(),
            color: "red".to_string(),
            size: 5,
        };
        Self {
            title: "3D Revolved X-ray with TB Lesion Highlight".to_string(),
            axis_titles: ["X".to_string(), "Y".to_string(), "Height".to_string()],
            surface,
            annotation,
        }
    }
}

pub fn write_scene_json(scene: &SurfaceScene, filename: &Path) -> anyhow::Result<()> {
    let file = File::create(filename)
        .with_context(|| format!("Could not create {}", filename.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, scene)
        .with_context(|| format!("Failed to serialize scene to {}", filename.display()))?;
    writer.flush()?;
    Ok(())
}

/// One line per image row with the profile and the row color inputs.
pub fn write_profile_csv(
    profile: &RadiusProfile,
    colors: &ColorField,
    filename: &Path,
) -> anyhow::Result<()> {
    if profile.len() != colors.rows() {
        bail!(
            "Profile has {} rows but the color field has {}.",
            profile.len(),
            colors.rows()
        );
    }
    let mut wtr = Writer::from_path(filename)
        .with_context(|| format!("Could not create {}", filename.display()))?;

    wtr.write_record([
        "row",
        "row_mean",
        "raw_radius",
        "radius",
        "intensity",
        "lesion_density",
    ])?;
    for i in 0..profile.len() {
        wtr.write_record(&[
            i.to_string(),
            profile.row_mean[i].to_string(),
            profile.raw[i].to_string(),
            profile.radius[i].to_string(),
            colors.intensity[i].to_string(),
            colors.lesion_density[i].to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
