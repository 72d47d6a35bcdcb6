use image::imageops::FilterType;
use image::{GrayImage, Luma};
use ndarray::{Array2, ArrayView2};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RevolveError, RevolveResult};

/// Decodes any raster `image` understands and collapses it to 8-bit gray.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> RevolveResult<Array2<u8>> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|source| RevolveError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    let gray = decoded.to_luma8();
    debug!(
        path = %path.display(),
        width = gray.width(),
        height = gray.height(),
        "decoded grayscale image"
    );
    Ok(gray_image_to_array(&gray))
}

/// Row-major `(rows, cols)` copy of a `GrayImage`.
pub fn gray_image_to_array(img: &GrayImage) -> Array2<u8> {
    let (width, height) = img.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(i, j)| {
        img.get_pixel(j as u32, i as u32).0[0]
    })
}

pub fn array_to_gray_image(arr: ArrayView2<u8>) -> GrayImage {
    let (rows, cols) = arr.dim();
    let mut img = GrayImage::new(cols as u32, rows as u32);
    for ((i, j), &v) in arr.indexed_iter() {
        img.put_pixel(j as u32, i as u32, Luma([v]));
    }
    img
}

/// Resamples `mask` to `(rows, cols)` with a bilinear filter. Returns the
/// input untouched when it already has that shape.
pub fn resize_to_match(mask: Array2<u8>, (rows, cols): (usize, usize)) -> RevolveResult<Array2<u8>> {
    if mask.dim() == (rows, cols) {
        return Ok(mask);
    }
    ensure_non_empty(mask.dim())?;
    ensure_non_empty((rows, cols))?;

    let img = array_to_gray_image(mask.view());
    let resized = image::imageops::resize(&img, cols as u32, rows as u32, FilterType::Triangle);
    let out = gray_image_to_array(&resized);
    if out.dim() != (rows, cols) {
        return Err(RevolveError::ShapeMismatch {
            expected: (rows, cols),
            actual: out.dim(),
        });
    }
    Ok(out)
}

pub(crate) fn ensure_non_empty((rows, cols): (usize, usize)) -> RevolveResult<()> {
    if rows == 0 || cols == 0 {
        Err(RevolveError::EmptyInput { rows, cols })
    } else {
        Ok(())
    }
}

/// An X-ray and its lesion mask, guaranteed to share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    pub xray: Array2<u8>,
    pub mask: Array2<u8>,
    /// Original mask shape when it had to be resampled.
    pub mask_resized_from: Option<(usize, usize)>,
}

impl ImagePair {
    /// Reads both files and aligns the mask to the X-ray.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(xray_path: P, mask_path: Q) -> RevolveResult<Self> {
        let xray = load_grayscale(xray_path)?;
        let mask = load_grayscale(mask_path)?;
        Self::from_arrays(xray, mask)
    }

    pub fn from_arrays(xray: Array2<u8>, mask: Array2<u8>) -> RevolveResult<Self> {
        ensure_non_empty(xray.dim())?;
        let target = xray.dim();
        let original = mask.dim();
        let mask_resized_from = if original != target {
            info!(from = ?original, to = ?target, "resizing mask to X-ray shape");
            Some(original)
        } else {
            None
        };
        let mask = resize_to_match(mask, target)?;
        Ok(Self {
            xray,
            mask,
            mask_resized_from,
        })
    }

    /// `(rows, cols)` shared by both images.
    pub fn shape(&self) -> (usize, usize) {
        self.xray.dim()
    }
}
