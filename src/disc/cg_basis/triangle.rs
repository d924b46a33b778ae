use ndarray::{Array1, Array2, ArrayView1, array};

use crate::disc::cg_basis::CGBasis2D;

/// Linear Lagrange basis on the reference triangle (0,0), (1,0), (0,1)
///
/// N0 = 1 - r - s  (node (0,0))
/// N1 = r          (node (1,0))
/// N2 = s          (node (0,1))
pub struct TriangleP1Basis;

impl TriangleP1Basis {
    /// Reference gradients (dN/dr, dN/ds), constant over the element
    pub const REF_GRADS: [[f64; 2]; 3] = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];

    pub fn shape(i: usize, r: f64, s: f64) -> f64 {
        Self::barycentric(r, s)[i]
    }
    pub fn barycentric(r: f64, s: f64) -> [f64; 3] {
        [1.0 - r - s, r, s]
    }
}

impl CGBasis2D for TriangleP1Basis {
    fn shape_functions(r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let npts = r.len();
        let mut phi = Array2::<f64>::zeros((npts, Self::num_nodes()));
        for pt in 0..npts {
            let l = Self::barycentric(r[pt], s[pt]);
            for (i, &li) in l.iter().enumerate() {
                phi[[pt, i]] = li;
            }
        }
        phi
    }

    fn grad_shape_functions(r: ArrayView1<f64>, _s: ArrayView1<f64>) -> (Array2<f64>, Array2<f64>) {
        let npts = r.len();
        let mut dphi_dr = Array2::<f64>::zeros((npts, Self::num_nodes()));
        let mut dphi_ds = Array2::<f64>::zeros((npts, Self::num_nodes()));
        for pt in 0..npts {
            for (i, grad) in Self::REF_GRADS.iter().enumerate() {
                dphi_dr[[pt, i]] = grad[0];
                dphi_ds[[pt, i]] = grad[1];
            }
        }
        (dphi_dr, dphi_ds)
    }

    fn nodes2d() -> (Array1<f64>, Array1<f64>) {
        (array![0.0, 1.0, 0.0], array![0.0, 0.0, 1.0])
    }

    fn num_nodes() -> usize {
        3
    }
}
