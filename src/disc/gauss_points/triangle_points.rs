use ndarray::Array1;

use crate::disc::error::PwlError;

pub const MAX_TRIANGLE_ORDER: usize = 6;

/// Symmetric cubature on the reference triangle (0,0), (1,0), (0,1).
///
/// Returns `(r, s, weight)` for a rule exact up to total degree `n`. The
/// weights sum to 1/2, the area of the reference triangle.
pub fn get_triangle_points(n: usize) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>), PwlError> {
    let mut rule = CubatureBuilder::default();
    match n {
        0 | 1 => {
            rule.centroid(1.0);
        }
        2 => {
            rule.orbit3(1.0 / 6.0, 1.0 / 3.0);
        }
        3 => {
            rule.centroid(-0.5625);
            rule.orbit3(0.2, 0.5208333333333333);
        }
        4 => {
            rule.orbit3(0.445948490915965, 0.223381589678011);
            rule.orbit3(0.091576213509771, 0.109951743655322);
        }
        5 => {
            rule.centroid(0.225);
            rule.orbit3(0.470142064105115, 0.132394152788506);
            rule.orbit3(0.101286507323456, 0.125939180544827);
        }
        6 => {
            rule.orbit3(0.249286745170910, 0.116786275726379);
            rule.orbit3(0.063089014491502, 0.050844906370207);
            rule.orbit6(0.053145049844817, 0.310352451033784, 0.082851075618374);
        }
        _ => {
            return Err(PwlError::UnsupportedQuadratureOrder {
                order: n,
                max: MAX_TRIANGLE_ORDER,
            });
        }
    }
    Ok(rule.finish())
}

// Weights are accumulated against a unit-area triangle and halved on finish.
#[derive(Default)]
struct CubatureBuilder {
    r: Vec<f64>,
    s: Vec<f64>,
    weight: Vec<f64>,
}
impl CubatureBuilder {
    fn push(&mut self, r: f64, s: f64, weight: f64) {
        self.r.push(r);
        self.s.push(s);
        self.weight.push(weight);
    }
    fn centroid(&mut self, weight: f64) {
        self.push(1.0 / 3.0, 1.0 / 3.0, weight);
    }
    /// Points with barycentric coordinates (a, a, 1 - 2a) and permutations.
    fn orbit3(&mut self, a: f64, weight: f64) {
        let b = 1.0 - 2.0 * a;
        self.push(a, a, weight);
        self.push(b, a, weight);
        self.push(a, b, weight);
    }
    /// Points with barycentric coordinates (a, b, 1 - a - b) and permutations.
    fn orbit6(&mut self, a: f64, b: f64, weight: f64) {
        let c = 1.0 - a - b;
        self.push(a, b, weight);
        self.push(b, a, weight);
        self.push(a, c, weight);
        self.push(c, a, weight);
        self.push(b, c, weight);
        self.push(c, b, weight);
    }
    fn finish(self) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
        let weight = Array1::from(self.weight) * 0.5;
        (Array1::from(self.r), Array1::from(self.s), weight)
    }
}
