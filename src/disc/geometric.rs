use nalgebra::Matrix3;

pub trait Geometric2D {
    fn compute_normal(x0: f64, y0: f64, x1: f64, y1: f64) -> [f64; 2] {
        // normalized normal vector, outward for counter-clockwise edges
        let normal = [y1 - y0, x0 - x1];
        let normal_magnitude = (normal[0].powi(2) + normal[1].powi(2)).sqrt();
        [normal[0] / normal_magnitude, normal[1] / normal_magnitude]
    }
    fn compute_edge_length(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
        ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
    }
    /// Signed shoelace area, positive for counter-clockwise vertices.
    fn compute_polygon_area(vertices: &[[f64; 2]]) -> f64 {
        let n = vertices.len();
        let mut twice_area = 0.0;
        for k in 0..n {
            let [x0, y0] = vertices[k];
            let [x1, y1] = vertices[(k + 1) % n];
            twice_area += x0 * y1 - x1 * y0;
        }
        0.5 * twice_area
    }
    fn compute_vertex_centroid(vertices: &[[f64; 2]]) -> [f64; 2] {
        let n = vertices.len() as f64;
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), v| (sx + v[0], sy + v[1]));
        [sx / n, sy / n]
    }
    fn compute_bounding_diagonal(vertices: &[[f64; 2]]) -> f64 {
        let mut lo = [f64::INFINITY; 2];
        let mut hi = [f64::NEG_INFINITY; 2];
        for v in vertices {
            for d in 0..2 {
                lo[d] = lo[d].min(v[d]);
                hi[d] = hi[d].max(v[d]);
            }
        }
        Self::compute_edge_length(lo[0], lo[1], hi[0], hi[1])
    }
    fn evaluate_jacob(x: &[f64; 3], y: &[f64; 3]) -> (f64, Matrix3<f64>) {
        // Reference triangle vertices:
        // Node 0: (0, 0)
        // Node 1: (1, 0)
        // Node 2: (0, 1)
        // N0 = 1 - xi - eta, N1 = xi, N2 = eta
        let dn_dxi = [-1.0, 1.0, 0.0];
        let dn_deta = [-1.0, 0.0, 1.0];
        let mut dx_dxi = 0.0;
        let mut dx_deta = 0.0;
        let mut dy_dxi = 0.0;
        let mut dy_deta = 0.0;
        for k in 0..3 {
            dx_dxi += dn_dxi[k] * x[k];
            dx_deta += dn_deta[k] * x[k];
            dy_dxi += dn_dxi[k] * y[k];
            dy_deta += dn_deta[k] * y[k];
        }
        let jacob_det = dx_dxi * dy_deta - dx_deta * dy_dxi;
        // 2x2 map embedded in 3x3, unit zz entry
        let jacob = Matrix3::new(
            dx_dxi, dx_deta, 0.0, //
            dy_dxi, dy_deta, 0.0, //
            0.0, 0.0, 1.0,
        );
        (jacob_det, jacob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Geom;
    impl Geometric2D for Geom {}

    #[test]
    fn shoelace_area_is_signed() {
        let square = [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]];
        assert_relative_eq!(Geom::compute_polygon_area(&square), 2.0);
        let mut clockwise = square;
        clockwise.reverse();
        assert_relative_eq!(Geom::compute_polygon_area(&clockwise), -2.0);
    }

    #[test]
    fn jacobian_maps_reference_edges() {
        let x = [1.0, 3.0, 1.0];
        let y = [1.0, 1.0, 4.0];
        let (det, jacob) = Geom::evaluate_jacob(&x, &y);
        assert_relative_eq!(det, 6.0);
        assert_relative_eq!(jacob[(0, 0)], 2.0);
        assert_relative_eq!(jacob[(1, 1)], 3.0);
        assert_relative_eq!(jacob[(0, 1)], 0.0);
        assert_relative_eq!(jacob.determinant(), det);
    }

    #[test]
    fn normal_points_outward_for_ccw_edge() {
        let n = Geom::compute_normal(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(n[0], 0.0);
        assert_relative_eq!(n[1], -1.0);
    }
}
