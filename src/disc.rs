pub mod cg_basis;
pub mod error;
pub mod gauss_points;
pub mod geometric;
pub mod mesh;
pub mod pwl_basis;
