use thiserror::Error;

/// Errors raised while building or querying a PWL cell view.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PwlError {
    /// A sub-triangle of the centroid fan is degenerate or inverted.
    #[error("non-positive Jacobian determinant {det_j:e} on side {side}")]
    Geometry { side: usize, det_j: f64 },

    #[error("a polygon cell needs at least 3 vertices, found {found}")]
    TooFewVertices { found: usize },

    #[error("{what} index {index} out of range (len {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The query point is not inside any sub-triangle of the cell.
    #[error("point ({x}, {y}) lies outside the cell")]
    PointOutOfDomain { x: f64, y: f64 },

    #[error("cell integrals requested before precompute()")]
    NotPrecomputed,

    #[error("quadrature order {order} is not tabulated (max {max})")]
    UnsupportedQuadratureOrder { order: usize, max: usize },
}

impl PwlError {
    pub fn check_index(what: &'static str, index: usize, len: usize) -> Result<(), PwlError> {
        if index < len {
            Ok(())
        } else {
            Err(PwlError::Index { what, index, len })
        }
    }
}
