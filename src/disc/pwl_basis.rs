//! Piecewise-linear (PWL) cell views.
//!
//! A cell view owns the geometric decomposition of one mesh cell and exposes
//! its PWL basis functions, both as on-demand point evaluations and as
//! precomputed cell integrals for matrix assembly.
use nalgebra::Vector2;

use crate::disc::error::PwlError;

pub mod polygon;

/// Capabilities shared by every PWL cell kind.
pub trait CellFEView {
    /// Number of basis functions (one per cell vertex).
    fn dofs(&self) -> usize;

    /// Value of basis function `i` at the physical point `xy`.
    fn shape_value(&self, i: usize, xy: [f64; 2]) -> Result<f64, PwlError>;

    /// Physical gradient of basis function `i` at `xy`.
    fn grad_shape(&self, i: usize, xy: [f64; 2]) -> Result<Vector2<f64>, PwlError>;

    fn shape_values(&self, xy: [f64; 2]) -> Result<Vec<f64>, PwlError> {
        (0..self.dofs()).map(|i| self.shape_value(i, xy)).collect()
    }

    fn grad_shape_values(&self, xy: [f64; 2]) -> Result<Vec<Vector2<f64>>, PwlError> {
        (0..self.dofs()).map(|i| self.grad_shape(i, xy)).collect()
    }

    /// Fills the quadrature caches and cell integral tables.
    ///
    /// Polygon views validate their geometry on construction and always
    /// return `Ok`. Cell kinds that defer geometry checks report them here.
    fn precompute(&mut self) -> Result<(), PwlError>;

    fn is_precomputed(&self) -> bool;
}
