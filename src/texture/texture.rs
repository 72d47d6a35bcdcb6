use anyhow::Context;
use image::{ImageBuffer, Rgb, RgbImage};
use ndarray::ArrayView2;
use std::path::Path;

use crate::processing::color::ColorField;

/// Matplotlib "Reds" sequential colormap, 9 evenly spaced stops.
const REDS: [[u8; 3]; 9] = [
    [255, 245, 240],
    [254, 224, 210],
    [252, 187, 161],
    [252, 146, 114],
    [251, 106, 74],
    [239, 59, 44],
    [203, 24, 29],
    [165, 15, 21],
    [103, 0, 13],
];

/// One UV pair per vertex, row-major, sampling texel centers.
pub fn compute_uv_coordinates(rows: usize, samples: usize) -> Vec<(f64, f64)> {
    let mut uvs = Vec::with_capacity(rows * samples);
    for i in 0..rows {
        let v = (i as f64 + 0.5) / rows as f64;
        for j in 0..samples {
            let u = (j as f64 + 0.5) / samples as f64;
            uvs.push((u, v));
        }
    }
    uvs
}

/// The RGB color field as a `samples x rows` texture. Rows are flipped so
/// that mesh row 0 sits at V = 0 (the bottom of the image).
pub fn color_field_texture(colors: &ColorField) -> RgbImage {
    let width = colors.samples() as u32;
    let height = colors.rows() as u32;
    ImageBuffer::from_fn(width, height, |x, y| {
        let row = (height - 1 - y) as usize;
        Rgb(colors.rgb8(row, x as usize))
    })
}

pub fn create_color_texture(colors: &ColorField, filename: &Path) -> anyhow::Result<()> {
    color_field_texture(colors)
        .save(filename)
        .with_context(|| format!("Failed to write texture {}", filename.display()))
}

/// Samples the "Reds" colormap at `t` in [0, 1].
pub fn reds(t: f64) -> [f64; 3] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (REDS.len() - 1) as f64;
    let lo = (pos.floor() as usize).min(REDS.len() - 2);
    let frac = pos - lo as f64;
    let (a, b) = (REDS[lo], REDS[lo + 1]);
    [0, 1, 2].map(|c| a[c] as f64 + (b[c] as f64 - a[c] as f64) * frac)
}

/// Min-max normalisation to [0, 1]; a flat image maps to 0.
fn normalized(arr: ArrayView2<u8>) -> impl Fn(u8) -> f64 {
    let min = arr.iter().copied().min().unwrap_or(0) as f64;
    let max = arr.iter().copied().max().unwrap_or(0) as f64;
    let span = max - min;
    move |v| {
        if span > 0.0 {
            (v as f64 - min) / span
        } else {
            0.0
        }
    }
}

/// Gray X-ray with the mask painted on top through the "Reds" colormap.
///
/// Both layers are min-max normalised first, then
/// `out = (1 - alpha) * gray + alpha * reds(mask)`.
pub fn overlay_image(xray: ArrayView2<u8>, mask: ArrayView2<u8>, alpha: f64) -> RgbImage {
    let (rows, cols) = xray.dim();
    let gray = normalized(xray);
    let lesion = normalized(mask);
    ImageBuffer::from_fn(cols as u32, rows as u32, |x, y| {
        let (i, j) = (y as usize, x as usize);
        let base = gray(xray[(i, j)]) * 255.0;
        let top = reds(lesion(mask[(i, j)]));
        Rgb(top.map(|c| ((1.0 - alpha) * base + alpha * c).round().clamp(0.0, 255.0) as u8))
    })
}

pub fn create_overlay(
    xray: ArrayView2<u8>,
    mask: ArrayView2<u8>,
    alpha: f64,
    filename: &Path,
) -> anyhow::Result<()> {
    overlay_image(xray, mask, alpha)
        .save(filename)
        .with_context(|| format!("Failed to write overlay {}", filename.display()))
}

#[cfg(test)]
mod texture_tests {
    use super::*;
    use crate::config::RevolveConfig;
    use crate::utils::test_utils::constant_image;
    use approx::assert_relative_eq;

    #[test]
    fn test_uv_coordinates_cover_texel_centers() {
        let uvs = compute_uv_coordinates(2, 4);
        assert_eq!(uvs.len(), 8);
        assert_eq!(uvs[0], (0.125, 0.25));
        assert_eq!(uvs[7], (0.875, 0.75));
    }

    #[test]
    fn test_texture_flips_rows() {
        let xray = constant_image(3, 5, 0);
        let mut mask = constant_image(3, 5, 0);
        mask[(0, 0)] = 255;
        let colors = ColorField::synthesize(xray.view(), mask.view(), 6, &RevolveConfig::default()).unwrap();
        let tex = color_field_texture(&colors);
        assert_eq!(tex.dimensions(), (6, 3));
        // row 0 has the lesion and lands at the bottom of the image
        assert!(tex.get_pixel(0, 2).0[0] > 0);
        assert_eq!(tex.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_reds_endpoints() {
        assert_eq!(reds(0.0), [255.0, 245.0, 240.0]);
        assert_eq!(reds(1.0), [103.0, 0.0, 13.0]);
        let mid = reds(0.5);
        assert_relative_eq!(mid[0], 251.0);
        assert_relative_eq!(mid[1], 106.0);
        assert_eq!(reds(f64::NAN), reds(0.0));
    }

    #[test]
    fn test_overlay_blends_half_and_half() {
        let mut xray = constant_image(2, 2, 0);
        xray[(0, 1)] = 200;
        let mut mask = constant_image(2, 2, 0);
        mask[(1, 1)] = 255;
        let img = overlay_image(xray.view(), mask.view(), 0.5);
        assert_eq!(img.dimensions(), (2, 2));
        // black pixel under empty mask: half of the lightest red
        assert_eq!(img.get_pixel(0, 0).0, [128, 123, 120]);
        // brightest pixel under empty mask
        assert_eq!(img.get_pixel(1, 0).0, [255, 250, 248]);
        // black pixel under full mask: half of the darkest red
        assert_eq!(img.get_pixel(1, 1).0, [52, 0, 7]);
    }

    #[test]
    fn test_create_texture_and_overlay_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let xray = constant_image(4, 4, 90);
        let mask = constant_image(4, 4, 255);
        let colors = ColorField::synthesize(xray.view(), mask.view(), 8, &RevolveConfig::default()).unwrap();

        let tex_path = dir.path().join("tex.png");
        create_color_texture(&colors, &tex_path).unwrap();
        let overlay_path = dir.path().join("overlay.png");
        create_overlay(xray.view(), mask.view(), 0.5, &overlay_path).unwrap();

        let tex = image::open(&tex_path).unwrap().to_rgb8();
        assert_eq!(tex.dimensions(), (8, 4));
        assert_eq!(tex.get_pixel(3, 1).0, [255, 0, 0]);
        assert!(overlay_path.exists());
    }
}
