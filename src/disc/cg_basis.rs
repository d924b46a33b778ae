use ndarray::{Array1, Array2, ArrayView1};

pub mod triangle;

/// Trait for Continuous Galerkin basis functions on reference elements
/// These ensure C0 continuity across element boundaries
pub trait CGBasis2D {
    /// Evaluate shape functions at reference coordinates, one row per point
    fn shape_functions(r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64>;

    /// Evaluate reference gradients of shape functions, one row per point
    fn grad_shape_functions(r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array2<f64>, Array2<f64>);

    /// Nodal coordinates on the reference element
    fn nodes2d() -> (Array1<f64>, Array1<f64>);

    fn num_nodes() -> usize;
}
