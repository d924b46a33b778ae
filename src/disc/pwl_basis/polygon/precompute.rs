use log::debug;
use nalgebra::Vector2;
use ndarray::{Array1, Array2, Array3};

use super::{PolygonFEView, Precomputation, PrecomputedData};
use crate::disc::{
    cg_basis::{CGBasis2D, triangle::TriangleP1Basis},
    error::PwlError,
};

/// Local shape data at quadrature points, indexed `[side, local_dof, qp]`.
#[derive(Clone, Debug, PartialEq)]
pub struct QpShapeCache {
    pub shape_qp: Array3<f64>,
    pub shape_qp_surf: Array3<f64>,
    pub gradshape_x_qp: Array3<f64>,
    pub gradshape_y_qp: Array3<f64>,
}
impl QpShapeCache {
    pub fn gradshape(&self, s: usize, i: usize, qp: usize) -> Vector2<f64> {
        Vector2::new(self.gradshape_x_qp[[s, i, qp]], self.gradshape_y_qp[[s, i, qp]])
    }
}

/// Cell integral tables.
///
/// `int_si_*` tables are side-local (`[side, local_i, local_j]`, local index
/// 2 is the centroid). All other tables are in cell dofs over the folded PWL
/// basis. Indexing:
/// - `int_s_shape_i` is `[i, f]`
/// - `int_s_shape_i_shape_j` and `int_s_shape_i_grad_shape_j` are `[f, i, j]`
#[derive(Clone, Debug, PartialEq)]
pub struct CellIntegrals {
    pub int_v_shape_i: Array1<f64>,
    pub int_v_grad_shape_i: Vec<Vector2<f64>>,
    pub int_v_shape_i_shape_j: Array2<f64>,
    pub int_v_grad_shape_i_grad_shape_j: Array2<f64>,
    pub int_v_shape_i_grad_shape_j: Array2<Vector2<f64>>,
    pub int_si_shape_i_shape_j: Array3<f64>,
    pub int_si_shape_i_grad_shape_j: Array3<Vector2<f64>>,
    pub int_s_shape_i: Array2<f64>,
    pub int_s_shape_i_shape_j: Array3<f64>,
    pub int_s_shape_i_grad_shape_j: Array3<Vector2<f64>>,
}

// Side-local volume integrals of the three linear functions, detJ applied.
struct SideVolumeIntegrals {
    shape: [f64; 3],
    grad: [Vector2<f64>; 3],
    shape_shape: [[f64; 3]; 3],
    grad_grad: [[f64; 3]; 3],
    shape_grad: [[Vector2<f64>; 3]; 3],
}

impl PolygonFEView<'_> {
    /// Fills the quadrature-point cache and the cell integral tables.
    ///
    /// Each call rebuilds everything from the side geometry, so repeated
    /// calls give bit-identical tables.
    pub fn precompute(&mut self) {
        let qp_data = self.compute_qp_data();
        let integrals = self.compute_integrals(&qp_data);
        debug!(
            "cell {}: precomputed {} sides x {} volume / {} surface quadrature points",
            self.cell_index,
            self.num_of_subtris,
            self.vol_quadrature.len(),
            self.surf_quadrature.len()
        );
        self.state = Precomputation::Precomputed(Box::new(PrecomputedData { qp_data, integrals }));
    }

    fn compute_qp_data(&self) -> QpShapeCache {
        let vol = self.vol_quadrature;
        let surf = self.surf_quadrature;
        let nsides = self.num_of_subtris;
        let (nvol, nsurf) = (vol.len(), surf.len());

        let phi_vol = TriangleP1Basis::shape_functions(vol.r.view(), vol.s.view());
        let (dphi_dr, dphi_ds) = TriangleP1Basis::grad_shape_functions(vol.r.view(), vol.s.view());
        // the boundary edge is the reference edge s = 0
        let edge_s = Array1::<f64>::zeros(nsurf);
        let phi_surf = TriangleP1Basis::shape_functions(surf.points.view(), edge_s.view());

        let mut shape_qp = Array3::<f64>::zeros((nsides, 3, nvol));
        let mut shape_qp_surf = Array3::<f64>::zeros((nsides, 3, nsurf));
        let mut gradshape_x_qp = Array3::<f64>::zeros((nsides, 3, nvol));
        let mut gradshape_y_qp = Array3::<f64>::zeros((nsides, 3, nvol));
        for (s, side) in self.sides.iter().enumerate() {
            for i in 0..3 {
                for qp in 0..nvol {
                    shape_qp[[s, i, qp]] = phi_vol[[qp, i]];
                    let grad = side.map_ref_grad(dphi_dr[[qp, i]], dphi_ds[[qp, i]]);
                    gradshape_x_qp[[s, i, qp]] = grad.x;
                    gradshape_y_qp[[s, i, qp]] = grad.y;
                }
                for qp in 0..nsurf {
                    shape_qp_surf[[s, i, qp]] = phi_surf[[qp, i]];
                }
            }
        }
        QpShapeCache {
            shape_qp,
            shape_qp_surf,
            gradshape_x_qp,
            gradshape_y_qp,
        }
    }

    fn compute_side_volume_integrals(&self, qp_data: &QpShapeCache, s: usize) -> SideVolumeIntegrals {
        let weights = &self.vol_quadrature.weights;
        let det_j = self.sides[s].det_j;
        let zero = Vector2::zeros();
        let mut out = SideVolumeIntegrals {
            shape: [0.0; 3],
            grad: [zero; 3],
            shape_shape: [[0.0; 3]; 3],
            grad_grad: [[0.0; 3]; 3],
            shape_grad: [[zero; 3]; 3],
        };
        for i in 0..3 {
            let mut shape = 0.0;
            let mut grad = zero;
            for (qp, &w) in weights.iter().enumerate() {
                shape += w * qp_data.shape_qp[[s, i, qp]];
                grad += qp_data.gradshape(s, i, qp) * w;
            }
            out.shape[i] = det_j * shape;
            out.grad[i] = grad * det_j;
            for j in 0..3 {
                let mut shape_shape = 0.0;
                let mut grad_grad = 0.0;
                let mut shape_grad = zero;
                for (qp, &w) in weights.iter().enumerate() {
                    let phi_i = qp_data.shape_qp[[s, i, qp]];
                    let grad_j = qp_data.gradshape(s, j, qp);
                    shape_shape += w * phi_i * qp_data.shape_qp[[s, j, qp]];
                    grad_grad += w * qp_data.gradshape(s, i, qp).dot(&grad_j);
                    shape_grad += grad_j * (w * phi_i);
                }
                out.shape_shape[i][j] = det_j * shape_shape;
                out.grad_grad[i][j] = det_j * grad_grad;
                out.shape_grad[i][j] = shape_grad * det_j;
            }
        }
        out
    }

    fn compute_integrals(&self, qp_data: &QpShapeCache) -> CellIntegrals {
        let n = self.dofs;
        let nsides = self.num_of_subtris;
        let surf_weights = &self.surf_quadrature.weights;
        let zero = Vector2::zeros();

        let mut int_si_shape_i_shape_j = Array3::<f64>::zeros((nsides, 3, 3));
        let mut int_si_shape_i_grad_shape_j = Array3::from_elem((nsides, 3, 3), zero);
        let mut int_s_shape_i = Array2::<f64>::zeros((n, nsides));
        let mut int_v_shape_i = Array1::<f64>::zeros(n);
        let mut int_v_shape_i_shape_j = Array2::<f64>::zeros((n, n));
        let mut int_v_grad_shape_i_grad_shape_j = Array2::<f64>::zeros((n, n));
        let mut int_v_shape_i_grad_shape_j = Array2::from_elem((n, n), zero);
        let mut int_s_shape_i_shape_j = Array3::<f64>::zeros((nsides, n, n));
        let mut int_s_shape_i_grad_shape_j = Array3::from_elem((nsides, n, n), zero);
        let mut side_volume = Vec::with_capacity(nsides);

        for s in 0..nsides {
            let side = &self.sides[s];
            // side-local surface integrals over the boundary edge
            let mut surf_shape = [0.0; 3];
            for i in 0..3 {
                let mut shape = 0.0;
                for (qp, &w) in surf_weights.iter().enumerate() {
                    shape += w * qp_data.shape_qp_surf[[s, i, qp]];
                }
                surf_shape[i] = side.det_j_surf * shape;
                for j in 0..3 {
                    // gradients are constant on a side
                    let grad_j = side.grad_shape(j);
                    let mut shape_shape = 0.0;
                    let mut shape_grad = zero;
                    for (qp, &w) in surf_weights.iter().enumerate() {
                        let phi_i = qp_data.shape_qp_surf[[s, i, qp]];
                        shape_shape += w * phi_i * qp_data.shape_qp_surf[[s, j, qp]];
                        shape_grad += grad_j * (w * phi_i);
                    }
                    int_si_shape_i_shape_j[[s, i, j]] = side.det_j_surf * shape_shape;
                    int_si_shape_i_grad_shape_j[[s, i, j]] = shape_grad * side.det_j_surf;
                }
            }
            let vol = self.compute_side_volume_integrals(qp_data, s);

            // scatter into cell dofs through the folded basis
            let coeffs: Vec<[f64; 3]> = (0..n).map(|i| self.fold_coefficients(s, i)).collect();
            for (i, ci) in coeffs.iter().enumerate() {
                for l in 0..3 {
                    int_v_shape_i[i] += ci[l] * vol.shape[l];
                    int_s_shape_i[[i, s]] += ci[l] * surf_shape[l];
                }
                for (j, cj) in coeffs.iter().enumerate() {
                    for l in 0..3 {
                        for k in 0..3 {
                            let c = ci[l] * cj[k];
                            int_v_shape_i_shape_j[[i, j]] += c * vol.shape_shape[l][k];
                            int_v_grad_shape_i_grad_shape_j[[i, j]] += c * vol.grad_grad[l][k];
                            int_v_shape_i_grad_shape_j[[i, j]] += vol.shape_grad[l][k] * c;
                            int_s_shape_i_shape_j[[s, i, j]] += c * int_si_shape_i_shape_j[[s, l, k]];
                            int_s_shape_i_grad_shape_j[[s, i, j]] +=
                                int_si_shape_i_grad_shape_j[[s, l, k]] * c;
                        }
                    }
                }
            }
            side_volume.push(vol);
        }

        // each vertex function collects its two edge tents plus beta times the
        // centroid tent of every side
        let centroid_grad = side_volume.iter().fold(zero, |acc, vol| acc + vol.grad[2]);
        let int_v_grad_shape_i = self
            .node_to_side_map
            .iter()
            .map(|entries| {
                entries
                    .iter()
                    .fold(zero, |acc, &(s, local)| acc + side_volume[s].grad[local])
                    + centroid_grad * self.beta
            })
            .collect();

        CellIntegrals {
            int_v_shape_i,
            int_v_grad_shape_i,
            int_v_shape_i_shape_j,
            int_v_grad_shape_i_grad_shape_j,
            int_v_shape_i_grad_shape_j,
            int_si_shape_i_shape_j,
            int_si_shape_i_grad_shape_j,
            int_s_shape_i,
            int_s_shape_i_shape_j,
            int_s_shape_i_grad_shape_j,
        }
    }

    fn precomputed(&self) -> Result<&PrecomputedData, PwlError> {
        match &self.state {
            Precomputation::Precomputed(data) => Ok(data),
            Precomputation::Uninitialized => Err(PwlError::NotPrecomputed),
        }
    }
    fn check_qp(&self, s: usize, i: usize, qp: usize, on_surface: bool) -> Result<(), PwlError> {
        PwlError::check_index("side", s, self.num_of_subtris)?;
        PwlError::check_index("local dof", i, 3)?;
        if on_surface {
            PwlError::check_index("surface quadrature point", qp, self.surf_quadrature.len())
        } else {
            PwlError::check_index("volume quadrature point", qp, self.vol_quadrature.len())
        }
    }

    pub fn qp_data(&self) -> Result<&QpShapeCache, PwlError> {
        Ok(&self.precomputed()?.qp_data)
    }
    pub fn integrals(&self) -> Result<&CellIntegrals, PwlError> {
        Ok(&self.precomputed()?.integrals)
    }
    /// Cached value of local shape `i` of side `s` at a quadrature point.
    pub fn pre_shape(&self, s: usize, i: usize, qp: usize, on_surface: bool) -> Result<f64, PwlError> {
        let data = self.precomputed()?;
        self.check_qp(s, i, qp, on_surface)?;
        Ok(if on_surface {
            data.qp_data.shape_qp_surf[[s, i, qp]]
        } else {
            data.qp_data.shape_qp[[s, i, qp]]
        })
    }
    pub fn pre_grad_shape_x(&self, s: usize, i: usize, qp: usize) -> Result<f64, PwlError> {
        let data = self.precomputed()?;
        self.check_qp(s, i, qp, false)?;
        Ok(data.qp_data.gradshape_x_qp[[s, i, qp]])
    }
    pub fn pre_grad_shape_y(&self, s: usize, i: usize, qp: usize) -> Result<f64, PwlError> {
        let data = self.precomputed()?;
        self.check_qp(s, i, qp, false)?;
        Ok(data.qp_data.gradshape_y_qp[[s, i, qp]])
    }
    /// Volume integral of the gradient of cell dof `i`.
    pub fn int_v_grad_shape_i(&self, i: usize) -> Result<Vector2<f64>, PwlError> {
        let integrals = self.integrals()?;
        PwlError::check_index("dof", i, self.dofs)?;
        Ok(integrals.int_v_grad_shape_i[i])
    }
    pub fn int_si_shape_i_shape_j(&self, s: usize, i: usize, j: usize) -> Result<f64, PwlError> {
        let integrals = self.integrals()?;
        PwlError::check_index("side", s, self.num_of_subtris)?;
        PwlError::check_index("local dof", i, 3)?;
        PwlError::check_index("local dof", j, 3)?;
        Ok(integrals.int_si_shape_i_shape_j[[s, i, j]])
    }
    pub fn int_si_shape_i_grad_shape_j(
        &self,
        s: usize,
        i: usize,
        j: usize,
    ) -> Result<Vector2<f64>, PwlError> {
        let integrals = self.integrals()?;
        PwlError::check_index("side", s, self.num_of_subtris)?;
        PwlError::check_index("local dof", i, 3)?;
        PwlError::check_index("local dof", j, 3)?;
        Ok(integrals.int_si_shape_i_grad_shape_j[[s, i, j]])
    }
    /// Integral of cell dof `i` over boundary face `f`.
    pub fn int_s_shape_i(&self, i: usize, f: usize) -> Result<f64, PwlError> {
        let integrals = self.integrals()?;
        PwlError::check_index("dof", i, self.dofs)?;
        PwlError::check_index("face", f, self.num_of_subtris)?;
        Ok(integrals.int_s_shape_i[[i, f]])
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector2;

    use crate::disc::{
        error::PwlError,
        gauss_points::{LineQuadrature, TriangleQuadrature},
        mesh::mesh2d::Mesh2d,
        pwl_basis::{CellFEView, polygon::PolygonFEView},
    };

    #[test]
    fn accessors_fail_before_precompute() {
        let mesh = Mesh2d::create_unit_square();
        let vol = TriangleQuadrature::new(2).unwrap();
        let surf = LineQuadrature::new(2).unwrap();
        let mut view = PolygonFEView::new(0, &mesh, &vol, &surf).unwrap();
        assert!(!view.is_precomputed());
        assert_eq!(view.integrals().err(), Some(PwlError::NotPrecomputed));
        assert_eq!(view.pre_shape(0, 0, 0, false), Err(PwlError::NotPrecomputed));
        assert_eq!(view.pre_grad_shape_x(0, 0, 0), Err(PwlError::NotPrecomputed));
        assert_eq!(view.int_v_grad_shape_i(0), Err(PwlError::NotPrecomputed));
        // point evaluation does not depend on the cache
        assert!(view.shape_value(0, [0.2, 0.2]).is_ok());

        view.precompute();
        assert!(view.is_precomputed());
        assert!(view.integrals().is_ok());
        assert!(matches!(
            view.pre_shape(0, 3, 0, false),
            Err(PwlError::Index { what: "local dof", .. })
        ));
        assert!(matches!(
            view.pre_shape(0, 0, vol.len(), false),
            Err(PwlError::Index { what: "volume quadrature point", .. })
        ));
        assert!(matches!(
            view.pre_grad_shape_y(4, 0, 0),
            Err(PwlError::Index { what: "side", .. })
        ));
        assert!(matches!(
            view.int_si_shape_i_shape_j(0, 0, 3),
            Err(PwlError::Index { .. })
        ));
    }

    #[test]
    fn cached_values_satisfy_local_invariants() {
        let mesh = Mesh2d::create_regular_polygon(5, 1.0, [0.5, 0.5]);
        let vol = TriangleQuadrature::new(4).unwrap();
        let surf = LineQuadrature::new(3).unwrap();
        let mut view = PolygonFEView::new(0, &mesh, &vol, &surf).unwrap();
        view.precompute();
        for s in 0..view.num_of_subtris {
            for qp in 0..vol.len() {
                let (mut sum, mut gx, mut gy) = (0.0, 0.0, 0.0);
                for i in 0..3 {
                    sum += view.pre_shape(s, i, qp, false).unwrap();
                    gx += view.pre_grad_shape_x(s, i, qp).unwrap();
                    gy += view.pre_grad_shape_y(s, i, qp).unwrap();
                }
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
                assert_abs_diff_eq!(gx, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(gy, 0.0, epsilon = 1e-12);
            }
            for qp in 0..surf.len() {
                // the centroid function vanishes on the boundary edge
                assert_abs_diff_eq!(view.pre_shape(s, 2, qp, true).unwrap(), 0.0);
                let sum = view.pre_shape(s, 0, qp, true).unwrap() + view.pre_shape(s, 1, qp, true).unwrap();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn edge_integrals_match_closed_form() {
        // on an edge of length h: int L0 L0 = h/3, int L0 L1 = h/6
        let mesh = Mesh2d::create_single_polygon(&[[0.0, 0.0], [2.0, 0.0], [1.0, 1.5]]);
        let vol = TriangleQuadrature::new(2).unwrap();
        let surf = LineQuadrature::new(2).unwrap();
        let mut view = PolygonFEView::new(0, &mesh, &vol, &surf).unwrap();
        view.precompute();
        let h = 2.0;
        assert_relative_eq!(view.int_si_shape_i_shape_j(0, 0, 0).unwrap(), h / 3.0, epsilon = 1e-14);
        assert_relative_eq!(view.int_si_shape_i_shape_j(0, 0, 1).unwrap(), h / 6.0, epsilon = 1e-14);
        assert_abs_diff_eq!(view.int_si_shape_i_shape_j(0, 2, 2).unwrap(), 0.0);
        let grad = view.sides()[0].grad_shape(2);
        assert_abs_diff_eq!(
            view.int_si_shape_i_grad_shape_j(0, 1, 2).unwrap(),
            grad * (h / 2.0),
            epsilon = 1e-14
        );
        assert_relative_eq!(view.int_s_shape_i(0, 0).unwrap(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(view.int_s_shape_i(2, 0).unwrap(), 0.0);
    }

    #[test]
    fn mass_and_stiffness_are_consistent() {
        let mesh = Mesh2d::create_two_polygon_mesh();
        let vol = TriangleQuadrature::new(2).unwrap();
        let surf = LineQuadrature::new(2).unwrap();
        let mut view = PolygonFEView::new(1, &mesh, &vol, &surf).unwrap();
        view.precompute();
        let area = view.area();
        let integrals = view.integrals().unwrap();
        assert_relative_eq!(integrals.int_v_shape_i_shape_j.sum(), area, epsilon = 1e-13);
        assert_relative_eq!(integrals.int_v_shape_i.sum(), area, epsilon = 1e-13);
        let n = view.dofs;
        for i in 0..n {
            let row_sum: f64 = (0..n).map(|j| integrals.int_v_grad_shape_i_grad_shape_j[[i, j]]).sum();
            assert_abs_diff_eq!(row_sum, 0.0, epsilon = 1e-12);
            assert!(integrals.int_v_grad_shape_i_grad_shape_j[[i, i]] > 0.0);
            // row sums of the mass matrix give int b_i
            let mass_row: f64 = (0..n).map(|j| integrals.int_v_shape_i_shape_j[[i, j]]).sum();
            assert_relative_eq!(mass_row, integrals.int_v_shape_i[i], epsilon = 1e-13);
            for j in 0..n {
                assert_relative_eq!(
                    integrals.int_v_shape_i_shape_j[[i, j]],
                    integrals.int_v_shape_i_shape_j[[j, i]],
                    epsilon = 1e-15
                );
                assert_relative_eq!(
                    integrals.int_v_grad_shape_i_grad_shape_j[[i, j]],
                    integrals.int_v_grad_shape_i_grad_shape_j[[j, i]],
                    epsilon = 1e-14
                );
            }
            // sum over j of int b_i grad b_j = int b_i grad(1) = 0
            let adv = (0..n).fold(Vector2::zeros(), |acc, j| acc + integrals.int_v_shape_i_grad_shape_j[[i, j]]);
            assert_abs_diff_eq!(adv, Vector2::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn face_tables_fold_consistently() {
        let mesh = Mesh2d::create_two_polygon_mesh();
        let vol = TriangleQuadrature::new(2).unwrap();
        let surf = LineQuadrature::new(2).unwrap();
        let mut view = PolygonFEView::new(1, &mesh, &vol, &surf).unwrap();
        view.precompute();
        let integrals = view.integrals().unwrap();
        let n = view.dofs;
        for f in 0..view.num_of_subtris {
            for i in 0..n {
                // the basis sums to one on the face
                let row: f64 = (0..n).map(|j| integrals.int_s_shape_i_shape_j[[f, i, j]]).sum();
                assert_relative_eq!(row, integrals.int_s_shape_i[[i, f]], epsilon = 1e-14);
                let grad_row = (0..n).fold(Vector2::zeros(), |acc, j| {
                    acc + integrals.int_s_shape_i_grad_shape_j[[f, i, j]]
                });
                assert_abs_diff_eq!(grad_row, Vector2::zeros(), epsilon = 1e-12);
            }
        }
        // face 0 runs from (1, 0) to (2, 0) and carries dofs 0 and 1
        assert_eq!(view.face_dof_mappings(0).unwrap(), [0, 1]);
        let h = 1.0;
        assert_relative_eq!(integrals.int_s_shape_i_shape_j[[0, 0, 0]], h / 3.0, epsilon = 1e-14);
        assert_relative_eq!(integrals.int_s_shape_i_shape_j[[0, 0, 1]], h / 6.0, epsilon = 1e-14);
        assert_relative_eq!(integrals.int_s_shape_i_shape_j[[0, 1, 0]], h / 6.0, epsilon = 1e-14);
        assert_abs_diff_eq!(integrals.int_s_shape_i_shape_j[[0, 2, 2]], 0.0);
        assert_abs_diff_eq!(integrals.int_s_shape_i_shape_j[[0, 0, 3]], 0.0);
        // grad b_1 is constant on side 0, so int b_0 grad b_1 = grad b_1 * h / 2
        let grad_b1 = view.sides()[0].grad_shape(1) + view.sides()[0].grad_shape(2) * view.beta;
        assert_abs_diff_eq!(
            integrals.int_s_shape_i_grad_shape_j[[0, 0, 1]],
            grad_b1 * (h / 2.0),
            epsilon = 1e-14
        );
    }

    #[test]
    fn precompute_twice_is_bit_identical() {
        let mesh = Mesh2d::create_regular_polygon(6, 1.0, [0.0, 0.0]);
        let vol = TriangleQuadrature::new(3).unwrap();
        let surf = LineQuadrature::new(3).unwrap();
        let mut view = PolygonFEView::new(0, &mesh, &vol, &surf).unwrap();
        view.precompute();
        let first = view.integrals().unwrap().clone();
        let first_cache = view.qp_data().unwrap().clone();
        assert_eq!(CellFEView::precompute(&mut view), Ok(()));
        assert_eq!(&first, view.integrals().unwrap());
        assert_eq!(&first_cache, view.qp_data().unwrap());
    }
}
