use std::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::disc::pwl_basis::polygon::DEFAULT_POINT_TOLERANCE;

#[derive(Debug, Error)]
pub enum ParamError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse parameters: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CellParamParser {
    /// Counter-clockwise polygon vertices.
    pub vertices: Vec<[f64; 2]>,
    pub vol_quadrature_order: usize,
    pub surf_quadrature_order: usize,
    pub point_tolerance: f64,
    pub log_level: Option<String>,
}
impl Default for CellParamParser {
    fn default() -> Self {
        Self {
            vertices: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            vol_quadrature_order: 2,
            surf_quadrature_order: 2,
            point_tolerance: DEFAULT_POINT_TOLERANCE,
            log_level: None,
        }
    }
}
impl CellParamParser {
    pub fn parse(file_path: &str) -> Result<Self, ParamError> {
        let file_content = fs::read_to_string(file_path).map_err(|source| ParamError::Io {
            path: file_path.to_string(),
            source,
        })?;
        Self::parse_str(&file_content)
    }
    pub fn parse_str(content: &str) -> Result<Self, ParamError> {
        Ok(serde_json::from_str(content)?)
    }
}
