use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{RevolveError, RevolveResult};

/// How the angular samples treat the 2π seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeamLayout {
    /// `T` samples over [0, 2π]; the last column repeats angle 0.
    Closed,
    /// `T` samples over [0, 2π); faces wrap from the last column to the first.
    Open,
}

impl SeamLayout {
    pub fn from_deduplicate(deduplicate_seam: bool) -> Self {
        if deduplicate_seam {
            SeamLayout::Open
        } else {
            SeamLayout::Closed
        }
    }
}

/// Angles of the `samples` columns of a ring.
pub fn ring_angles(samples: usize, seam: SeamLayout) -> RevolveResult<Array1<f64>> {
    if samples == 0 {
        return Err(RevolveError::InvalidParameter {
            name: "angular_samples",
            value: 0.0,
        });
    }
    let angles = match seam {
        SeamLayout::Closed if samples == 1 => Array1::zeros(1),
        SeamLayout::Closed => {
            let step = TAU / (samples - 1) as f64;
            Array1::from_shape_fn(samples, |j| j as f64 * step)
        }
        SeamLayout::Open => Array1::from_shape_fn(samples, |j| TAU * j as f64 / samples as f64),
    };
    Ok(angles)
}

/// Solid of revolution sampled on a `rows x samples` grid.
///
/// Row `i` is a circle of radius `radius[i]` around the z axis at height `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RevolutionMesh {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
    pub z: Array2<f64>,
    pub theta: Array1<f64>,
    pub radius: Array1<f64>,
    pub seam: SeamLayout,
}

impl RevolutionMesh {
    pub fn build(radius: ArrayView1<f64>, samples: usize, seam: SeamLayout) -> RevolveResult<Self> {
        let rows = radius.len();
        if rows == 0 {
            return Err(RevolveError::EmptyInput {
                rows: 0,
                cols: samples,
            });
        }
        let theta = ring_angles(samples, seam)?;
        let (cos, sin): (Vec<f64>, Vec<f64>) = theta.iter().map(|t| (t.cos(), t.sin())).unzip();

        let x = Array2::from_shape_fn((rows, samples), |(i, j)| radius[i] * cos[j]);
        let y = Array2::from_shape_fn((rows, samples), |(i, j)| radius[i] * sin[j]);
        let z = Array2::from_shape_fn((rows, samples), |(i, _)| i as f64);

        Ok(Self {
            x,
            y,
            z,
            theta,
            radius: radius.to_owned(),
            seam,
        })
    }

    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn samples(&self) -> usize {
        self.x.ncols()
    }

    pub fn vertex_count(&self) -> usize {
        self.rows() * self.samples()
    }

    /// Row-major vertex index of grid cell `(i, j)`.
    #[inline]
    pub fn vertex_index(&self, i: usize, j: usize) -> usize {
        i * self.samples() + j
    }

    pub fn vertex(&self, i: usize, j: usize) -> [f64; 3] {
        [self.x[(i, j)], self.y[(i, j)], self.z[(i, j)]]
    }

    /// Outward radial unit normal; it does not depend on the row.
    pub fn normal(&self, j: usize) -> [f64; 3] {
        let t = self.theta[j];
        [t.cos(), t.sin(), 0.0]
    }

    /// Triangles joining consecutive rings, as zero-based vertex indices.
    ///
    /// With a closed seam the duplicated last column already meets the first,
    /// so column `T - 1` is not joined back to column 0.
    pub fn faces(&self) -> Vec<[usize; 3]> {
        let rows = self.rows();
        let samples = self.samples();
        let columns = match self.seam {
            SeamLayout::Closed => samples.saturating_sub(1),
            SeamLayout::Open if samples < 3 => 0,
            SeamLayout::Open => samples,
        };

        let mut faces = Vec::with_capacity(2 * rows.saturating_sub(1) * columns);
        for i in 0..rows.saturating_sub(1) {
            for j in 0..columns {
                let j_next = (j + 1) % samples;
                let v1 = self.vertex_index(i, j);
                let v2 = self.vertex_index(i, j_next);
                let v3 = self.vertex_index(i + 1, j);
                let v4 = self.vertex_index(i + 1, j_next);
                faces.push([v1, v2, v3]);
                faces.push([v3, v2, v4]);
            }
        }
        faces
    }
}

#[cfg(test)]
mod mesh_tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn test_closed_angles_include_both_ends() {
        let theta = ring_angles(4, SeamLayout::Closed).unwrap();
        assert_eq!(theta.len(), 4);
        assert_relative_eq!(theta[0], 0.0);
        assert_relative_eq!(theta[1], 2.0 * PI / 3.0, epsilon = 1e-12);
        assert_relative_eq!(theta[2], 4.0 * PI / 3.0, epsilon = 1e-12);
        assert_relative_eq!(theta[3], 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_open_angles_stop_before_full_turn() {
        let theta = ring_angles(4, SeamLayout::Open).unwrap();
        assert_relative_eq!(theta[1], PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(theta[3], 3.0 * PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_sample_and_zero_samples() {
        assert_eq!(ring_angles(1, SeamLayout::Closed).unwrap(), array![0.0]);
        assert!(matches!(
            ring_angles(0, SeamLayout::Open),
            Err(RevolveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_every_ring_is_a_circle_of_its_radius() {
        let radius = array![20.0, 25.5, 31.0, 22.25];
        let mesh = RevolutionMesh::build(radius.view(), 200, SeamLayout::Closed).unwrap();
        assert_eq!(mesh.x.dim(), (4, 200));
        for i in 0..mesh.rows() {
            for j in 0..mesh.samples() {
                let [x, y, z] = mesh.vertex(i, j);
                assert_relative_eq!(x * x + y * y, radius[i] * radius[i], epsilon = 1e-9);
                assert_eq!(z, i as f64);
            }
        }
    }

    #[test]
    fn test_closed_seam_duplicates_first_column() {
        let mesh = RevolutionMesh::build(array![5.0, 6.0].view(), 8, SeamLayout::Closed).unwrap();
        for i in 0..2 {
            assert_relative_eq!(mesh.x[(i, 0)], mesh.x[(i, 7)], epsilon = 1e-12);
            assert_relative_eq!(mesh.y[(i, 0)], mesh.y[(i, 7)], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_face_counts_depend_on_seam() {
        let radius = array![1.0, 1.0, 1.0];
        let closed = RevolutionMesh::build(radius.view(), 6, SeamLayout::Closed).unwrap();
        assert_eq!(closed.faces().len(), 2 * 2 * 5);
        let open = RevolutionMesh::build(radius.view(), 6, SeamLayout::Open).unwrap();
        let faces = open.faces();
        assert_eq!(faces.len(), 2 * 2 * 6);
        // last quad of the first strip wraps to column 0
        assert_eq!(faces[10], [5, 0, 11]);
        assert!(faces.iter().flatten().all(|&v| v < open.vertex_count()));
    }

    #[test]
    fn test_normals_point_outwards() {
        let mesh = RevolutionMesh::build(array![3.0].view(), 5, SeamLayout::Open).unwrap();
        for j in 0..mesh.samples() {
            let [nx, ny, nz] = mesh.normal(j);
            let [x, y, _] = mesh.vertex(0, j);
            assert_relative_eq!(nx * 3.0, x, epsilon = 1e-12);
            assert_relative_eq!(ny * 3.0, y, epsilon = 1e-12);
            assert_eq!(nz, 0.0);
        }
    }

    #[test]
    fn test_empty_profile_is_rejected() {
        let radius = Array1::<f64>::zeros(0);
        assert!(matches!(
            RevolutionMesh::build(radius.view(), 10, SeamLayout::Closed),
            Err(RevolveError::EmptyInput { .. })
        ));
    }
}
