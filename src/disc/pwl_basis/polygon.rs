//! PWL basis on arbitrary polygons.
//!
//! The polygon is split into a fan of sub-triangles ("sides"), each formed by
//! one boundary edge and the vertex-average centroid `vc`. Side `s` maps the
//! reference triangle (0,0), (1,0), (0,1) onto `(v_s, v_{s+1}, vc)`, so local
//! index 0 and 1 are the edge vertices and local index 2 is the centroid.
//!
//! The centroid carries no degree of freedom. Its tent function `t_c` is
//! folded into every vertex function with weight `beta = 1 / N`:
//!
//! ```text
//! b_i = t_i + beta * t_c
//! ```
//!
//! which keeps one basis function per vertex, a partition of unity, and exact
//! reproduction of linear fields.
use hashbrown::HashMap;
use log::{debug, warn};
use nalgebra::{Matrix3, Vector2, Vector3};

use crate::disc::{
    cg_basis::triangle::TriangleP1Basis,
    error::PwlError,
    gauss_points::{LineQuadrature, TriangleQuadrature},
    geometric::Geometric2D,
    mesh::mesh2d::Mesh2d,
    pwl_basis::CellFEView,
};

mod precompute;
pub use precompute::{CellIntegrals, QpShapeCache};

/// Barycentric slack accepted by point location.
pub const DEFAULT_POINT_TOLERANCE: f64 = 1.0e-10;
/// Sides with `detJ` below this fraction of the squared cell diameter are degenerate.
const DET_J_REL_TOL: f64 = 1.0e-14;

/// Geometry of one sub-triangle of the fan.
#[derive(Clone, Debug)]
pub struct SideData {
    /// Global node indices of the boundary edge.
    pub v_index: [usize; 2],
    /// Cell dofs of the boundary edge (local indices 0 and 1).
    pub dof_index: [usize; 2],
    /// Physical position of reference node (0, 0).
    pub origin: [f64; 2],
    pub j: Matrix3<f64>,
    pub j_inv: Matrix3<f64>,
    pub j_t_inv: Matrix3<f64>,
    pub det_j: f64,
    /// Length of the boundary edge; maps the reference edge [0, 1].
    pub det_j_surf: f64,
}
impl SideData {
    /// Local barycentric coordinates of a physical point. Points outside the
    /// sub-triangle get the affine extension (some entries negative).
    pub fn barycentric(&self, xy: [f64; 2]) -> [f64; 3] {
        let d = Vector3::new(xy[0] - self.origin[0], xy[1] - self.origin[1], 0.0);
        let rs = self.j_inv * d;
        TriangleP1Basis::barycentric(rs.x, rs.y)
    }
    /// Maps a reference gradient to physical space with `J^-T`.
    pub fn map_ref_grad(&self, dr: f64, ds: f64) -> Vector2<f64> {
        let g = self.j_t_inv * Vector3::new(dr, ds, 0.0);
        Vector2::new(g.x, g.y)
    }
    pub fn grad_shape(&self, i: usize) -> Vector2<f64> {
        let [dr, ds] = TriangleP1Basis::REF_GRADS[i];
        self.map_ref_grad(dr, ds)
    }
}

enum Precomputation {
    Uninitialized,
    Precomputed(Box<PrecomputedData>),
}
struct PrecomputedData {
    qp_data: QpShapeCache,
    integrals: CellIntegrals,
}

pub struct PolygonFEView<'a> {
    vol_quadrature: &'a TriangleQuadrature,
    surf_quadrature: &'a LineQuadrature,
    pub cell_index: usize,
    pub dofs: usize,
    pub num_of_subtris: usize,
    pub beta: f64,
    pub vc: [f64; 2],
    vertices: Vec<[f64; 2]>,
    sides: Vec<SideData>,
    node_to_side_map: Vec<Vec<(usize, usize)>>,
    node_to_dof: HashMap<usize, usize>,
    point_tolerance: f64,
    state: Precomputation,
}
impl Geometric2D for PolygonFEView<'_> {}

impl<'a> PolygonFEView<'a> {
    pub fn new(
        cell_index: usize,
        mesh: &'a Mesh2d,
        vol_quadrature: &'a TriangleQuadrature,
        surf_quadrature: &'a LineQuadrature,
    ) -> Result<Self, PwlError> {
        let cell = mesh.element(cell_index)?;
        let vertices = mesh.element_coords(cell_index)?;
        let num_verts = vertices.len();
        if num_verts < 3 {
            return Err(PwlError::TooFewVertices { found: num_verts });
        }
        let vc = Self::compute_vertex_centroid(&vertices);
        let diag = Self::compute_bounding_diagonal(&vertices);
        let det_j_tol = DET_J_REL_TOL * diag * diag;

        let mut sides = Vec::with_capacity(num_verts);
        for s in 0..num_verts {
            let (a, b) = (s, (s + 1) % num_verts);
            let [xa, ya] = vertices[a];
            let [xb, yb] = vertices[b];
            let (det_j, j) = Self::evaluate_jacob(&[xa, xb, vc[0]], &[ya, yb, vc[1]]);
            // negated comparison also rejects NaN
            if !(det_j > det_j_tol) {
                warn!(
                    "cell {}: side {} has detJ = {:e}, rejecting cell",
                    cell_index, s, det_j
                );
                return Err(PwlError::Geometry { side: s, det_j });
            }
            let j_inv = j
                .try_inverse()
                .ok_or(PwlError::Geometry { side: s, det_j })?;
            sides.push(SideData {
                v_index: [cell.inodes[a], cell.inodes[b]],
                dof_index: [a, b],
                origin: vertices[a],
                j,
                j_inv,
                j_t_inv: j_inv.transpose(),
                det_j,
                det_j_surf: Self::compute_edge_length(xa, ya, xb, yb),
            });
        }

        let mut node_to_side_map = vec![Vec::with_capacity(2); num_verts];
        for (s, side) in sides.iter().enumerate() {
            for (local, &dof) in side.dof_index.iter().enumerate() {
                node_to_side_map[dof].push((s, local));
            }
        }
        let node_to_dof = cell
            .inodes
            .iter()
            .enumerate()
            .map(|(dof, &inode)| (inode, dof))
            .collect();

        let view = Self {
            vol_quadrature,
            surf_quadrature,
            cell_index,
            dofs: num_verts,
            num_of_subtris: num_verts,
            beta: 1.0 / num_verts as f64,
            vc,
            vertices,
            sides,
            node_to_side_map,
            node_to_dof,
            point_tolerance: DEFAULT_POINT_TOLERANCE,
            state: Precomputation::Uninitialized,
        };
        debug!(
            "cell {}: {} sides, area {:.6e}, centroid ({:.6}, {:.6})",
            cell_index,
            view.num_of_subtris,
            view.area(),
            vc[0],
            vc[1]
        );
        Ok(view)
    }
    pub fn with_point_tolerance(mut self, point_tolerance: f64) -> Self {
        self.point_tolerance = point_tolerance;
        self
    }
    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }
    pub fn sides(&self) -> &[SideData] {
        &self.sides
    }
    pub fn side(&self, s: usize) -> Result<&SideData, PwlError> {
        PwlError::check_index("side", s, self.num_of_subtris)?;
        Ok(&self.sides[s])
    }
    /// `(side, local index)` pairs referencing cell dof `i`, ascending by side.
    pub fn node_to_side_map(&self, i: usize) -> Result<&[(usize, usize)], PwlError> {
        PwlError::check_index("dof", i, self.dofs)?;
        Ok(&self.node_to_side_map[i])
    }
    /// Cell dofs on boundary face `f`; face `f` is the edge of side `f`.
    pub fn face_dof_mappings(&self, f: usize) -> Result<[usize; 2], PwlError> {
        Ok(self.side(f)?.dof_index)
    }
    /// Cell dof of a global mesh node, if the node belongs to this cell.
    pub fn dof_of_node(&self, inode: usize) -> Option<usize> {
        self.node_to_dof.get(&inode).copied()
    }
    pub fn det_j_values(&self) -> Vec<f64> {
        self.sides.iter().map(|side| side.det_j).collect()
    }
    /// Sum of the sub-triangle areas.
    pub fn area(&self) -> f64 {
        self.sides.iter().map(|side| 0.5 * side.det_j).sum()
    }
    /// Scale factor of side `s` at quadrature point `qp`: `detJ` for the
    /// volume rule, `detJ_surf` for the surface rule.
    pub fn det_j(&self, s: usize, qp: usize, on_surface: bool) -> Result<f64, PwlError> {
        let side = self.side(s)?;
        if on_surface {
            PwlError::check_index("surface quadrature point", qp, self.surf_quadrature.len())?;
            Ok(side.det_j_surf)
        } else {
            PwlError::check_index("volume quadrature point", qp, self.vol_quadrature.len())?;
            Ok(side.det_j)
        }
    }

    /// Finds the lowest-index side containing `xy`.
    fn locate(&self, xy: [f64; 2]) -> Result<(usize, [f64; 3]), PwlError> {
        self.sides
            .iter()
            .enumerate()
            .map(|(s, side)| (s, side.barycentric(xy)))
            .find(|(_, l)| l.iter().all(|&li| li >= -self.point_tolerance))
            .ok_or(PwlError::PointOutOfDomain { x: xy[0], y: xy[1] })
    }
    /// Coefficients of cell dof `i` in the local basis of side `s`.
    fn fold_coefficients(&self, s: usize, i: usize) -> [f64; 3] {
        let side = &self.sides[s];
        let on_edge = |k: usize| if side.dof_index[k] == i { 1.0 } else { 0.0 };
        [on_edge(0), on_edge(1), self.beta]
    }
    /// The three local linear shape values of side `s` at `xy`.
    pub fn side_local_shape_values(&self, s: usize, xy: [f64; 2]) -> Result<[f64; 3], PwlError> {
        Ok(self.side(s)?.barycentric(xy))
    }
    pub fn shape_xy(&self, i: usize, xy: [f64; 2]) -> Result<f64, PwlError> {
        PwlError::check_index("dof", i, self.dofs)?;
        let (s, l) = self.locate(xy)?;
        let c = self.fold_coefficients(s, i);
        Ok(c[0] * l[0] + c[1] * l[1] + c[2] * l[2])
    }
    pub fn grad_shape_xy(&self, i: usize, xy: [f64; 2]) -> Result<Vector2<f64>, PwlError> {
        PwlError::check_index("dof", i, self.dofs)?;
        let (s, _) = self.locate(xy)?;
        let c = self.fold_coefficients(s, i);
        let side = &self.sides[s];
        Ok((0..3).fold(Vector2::zeros(), |acc, k| acc + side.grad_shape(k) * c[k]))
    }
}

impl CellFEView for PolygonFEView<'_> {
    fn dofs(&self) -> usize {
        self.dofs
    }
    fn shape_value(&self, i: usize, xy: [f64; 2]) -> Result<f64, PwlError> {
        self.shape_xy(i, xy)
    }
    fn grad_shape(&self, i: usize, xy: [f64; 2]) -> Result<Vector2<f64>, PwlError> {
        self.grad_shape_xy(i, xy)
    }
    fn shape_values(&self, xy: [f64; 2]) -> Result<Vec<f64>, PwlError> {
        let (s, l) = self.locate(xy)?;
        let mut values = vec![self.beta * l[2]; self.dofs];
        for (k, &dof) in self.sides[s].dof_index.iter().enumerate() {
            values[dof] += l[k];
        }
        Ok(values)
    }
    fn grad_shape_values(&self, xy: [f64; 2]) -> Result<Vec<Vector2<f64>>, PwlError> {
        let (s, _) = self.locate(xy)?;
        let side = &self.sides[s];
        let mut grads = vec![side.grad_shape(2) * self.beta; self.dofs];
        for (k, &dof) in side.dof_index.iter().enumerate() {
            grads[dof] += side.grad_shape(k);
        }
        Ok(grads)
    }
    fn precompute(&mut self) -> Result<(), PwlError> {
        PolygonFEView::precompute(self);
        Ok(())
    }
    fn is_precomputed(&self) -> bool {
        matches!(self.state, Precomputation::Precomputed(_))
    }
}
