use ndarray::Array2;
use rand::Rng;

/// Image filled with one gray value.
pub fn constant_image(rows: usize, cols: usize, value: u8) -> Array2<u8> {
    Array2::from_elem((rows, cols), value)
}

/// Uniformly random 8-bit image.
pub fn random_image<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Array2<u8> {
    Array2::from_shape_fn((rows, cols), |_| rng.random::<u8>())
}

/// Binary mask (0 / 255) with a filled disc at `center` = (row, col).
pub fn disc_mask(rows: usize, cols: usize, center: (f64, f64), radius: f64) -> Array2<u8> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let di = i as f64 - center.0;
        let dj = j as f64 - center.1;
        if di * di + dj * dj <= radius * radius {
            255
        } else {
            0
        }
    })
}
