use ndarray::{Array, Array1, Ix1};

use crate::disc::error::PwlError;

pub mod legendre_points;
pub mod triangle_points;

/// Gauss-Legendre rule mapped onto the reference edge [0, 1].
///
/// Weights sum to 1, the length of the reference edge.
#[derive(Clone, Debug)]
pub struct LineQuadrature {
    pub order: usize,
    pub points: Array<f64, Ix1>,
    pub weights: Array<f64, Ix1>,
}
impl LineQuadrature {
    /// Smallest Gauss-Legendre rule exact for polynomials of degree `order`.
    pub fn new(order: usize) -> Result<Self, PwlError> {
        let points_num = order / 2 + 1;
        if points_num > legendre_points::MAX_LEGENDRE_POINTS {
            return Err(PwlError::UnsupportedQuadratureOrder {
                order,
                max: 2 * legendre_points::MAX_LEGENDRE_POINTS - 1,
            });
        }
        let (points, weights) = legendre_points::get_legendre_points_interval(points_num)?;
        Ok(Self {
            order,
            points: points.mapv(|x| 0.5 * (x + 1.0)),
            weights: weights * 0.5,
        })
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Cubature on the reference triangle (0,0), (1,0), (0,1).
///
/// Weights sum to 1/2, the area of the reference triangle.
#[derive(Clone, Debug)]
pub struct TriangleQuadrature {
    pub order: usize,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub weights: Array1<f64>,
}
impl TriangleQuadrature {
    pub fn new(order: usize) -> Result<Self, PwlError> {
        let (r, s, weights) = triangle_points::get_triangle_points(order)?;
        Ok(Self {
            order,
            r,
            s,
            weights,
        })
    }
    pub fn len(&self) -> usize {
        self.weights.len()
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
