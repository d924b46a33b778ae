use anyhow::{Context, Result};
use log::info;

use pwl_polygon::disc::{
    gauss_points::{LineQuadrature, TriangleQuadrature},
    geometric::Geometric2D,
    mesh::mesh2d::Mesh2d,
    pwl_basis::polygon::PolygonFEView,
};
use pwl_polygon::io::{logger::init_logging, param_parser::CellParamParser};

struct Shoelace;
impl Geometric2D for Shoelace {}

fn main() -> Result<()> {
    let param_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inputs/cellparam.json".to_string());
    let params = CellParamParser::parse(&param_path)?;
    init_logging(params.log_level.as_deref());

    let mesh = Mesh2d::create_single_polygon(&params.vertices);
    let vol_quadrature = TriangleQuadrature::new(params.vol_quadrature_order)?;
    let surf_quadrature = LineQuadrature::new(params.surf_quadrature_order)?;
    let mut view = PolygonFEView::new(0, &mesh, &vol_quadrature, &surf_quadrature)
        .with_context(|| format!("building cell view from {}", param_path))?
        .with_point_tolerance(params.point_tolerance);
    view.precompute();

    info!(
        "{} vertices, {} volume / {} surface quadrature points",
        view.dofs,
        vol_quadrature.len(),
        surf_quadrature.len()
    );
    info!(
        "fan area {:.12}, shoelace area {:.12}",
        view.area(),
        Shoelace::compute_polygon_area(view.vertices())
    );
    let integrals = view.integrals()?;
    for i in 0..view.dofs {
        let grad = integrals.int_v_grad_shape_i[i];
        let mass_row: Vec<String> = integrals
            .int_v_shape_i_shape_j
            .row(i)
            .iter()
            .map(|m| format!("{:.6}", m))
            .collect();
        let stiffness_row: Vec<String> = integrals
            .int_v_grad_shape_i_grad_shape_j
            .row(i)
            .iter()
            .map(|k| format!("{:.6}", k))
            .collect();
        info!(
            "dof {}: IntV_gradshapeI = ({:.6}, {:.6}), mass [{}], stiffness [{}]",
            i,
            grad.x,
            grad.y,
            mass_row.join(", "),
            stiffness_row.join(", ")
        );
    }
    Ok(())
}
