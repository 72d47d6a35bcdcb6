pub mod texture;

use anyhow::Context;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::processing::color::ColorField;
use texture::{compute_uv_coordinates, create_color_texture};

/// Name of the material every revolved surface uses.
pub const LESION_MATERIAL: &str = "lesion_material";

/// Writes the color field as `<case>_texture.png` plus a `<case>.mtl` that
/// maps it onto the surface, and returns the per-vertex UV coordinates.
pub fn write_mtl_revolution(
    colors: &ColorField,
    output_dir: &Path,
    case_name: &str,
) -> anyhow::Result<Vec<(f64, f64)>> {
    let tex_filename = format!("{}_texture.png", case_name);
    let texture_path = output_dir.join(&tex_filename);
    create_color_texture(colors, &texture_path)?;

    let mtl_path = output_dir.join(format!("{}.mtl", case_name));
    let mut mtl_file = File::create(&mtl_path)
        .with_context(|| format!("Could not create {}", mtl_path.display()))?;
    writeln!(
        mtl_file,
        "newmtl {}\nKa 1 1 1\nKd 1 1 1\nd 0.9\nmap_Kd {}",
        LESION_MATERIAL, tex_filename
    )?;

    Ok(compute_uv_coordinates(colors.rows(), colors.samples()))
}

#[cfg(test)]
mod mtl_tests {
    use super::*;
    use crate::config::RevolveConfig;
    use crate::utils::test_utils::constant_image;

    #[test]
    fn test_mtl_references_texture() {
        let dir = tempfile::tempdir().expect("tempdir");
        let xray = constant_image(5, 3, 60);
        let colors =
            ColorField::synthesize(xray.view(), xray.view(), 7, &RevolveConfig::default()).unwrap();
        let uvs = write_mtl_revolution(&colors, dir.path(), "case").unwrap();
        assert_eq!(uvs.len(), 35);

        let mtl = std::fs::read_to_string(dir.path().join("case.mtl")).unwrap();
        assert!(mtl.starts_with("newmtl lesion_material"));
        assert!(mtl.contains("map_Kd case_texture.png"));
        assert!(dir.path().join("case_texture.png").exists());
    }
}
