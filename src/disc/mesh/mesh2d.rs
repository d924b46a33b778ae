use crate::disc::error::PwlError;

#[derive(Clone, Debug)]
pub struct Node {
    pub x: f64,
    pub y: f64,
}
impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
pub trait Element2d: std::fmt::Debug {
    fn inodes(&self) -> &[usize];
}
/// Polygon cell with counter-clockwise ordered vertices.
#[derive(Clone, Debug)]
pub struct PolygonElement {
    pub inodes: Vec<usize>,
}
impl Element2d for PolygonElement {
    fn inodes(&self) -> &[usize] {
        &self.inodes
    }
}
#[derive(Clone, Debug)]
pub struct Mesh2d {
    pub nodes: Vec<Node>,
    pub elements: Vec<PolygonElement>,
    pub elem_num: usize,
    pub node_num: usize,
}
impl Mesh2d {
    /// Builds a mesh, checking every element's node indices.
    pub fn new(nodes: Vec<Node>, elements: Vec<PolygonElement>) -> Result<Self, PwlError> {
        let node_num = nodes.len();
        for elem in elements.iter() {
            for &inode in elem.inodes() {
                PwlError::check_index("node", inode, node_num)?;
            }
        }
        Ok(Mesh2d {
            elem_num: elements.len(),
            node_num,
            nodes,
            elements,
        })
    }
    pub fn create_single_polygon(vertices: &[[f64; 2]]) -> Mesh2d {
        let nodes = vertices.iter().map(|v| Node::new(v[0], v[1])).collect();
        Mesh2d {
            nodes,
            elements: vec![PolygonElement {
                inodes: (0..vertices.len()).collect(),
            }],
            elem_num: 1,
            node_num: vertices.len(),
        }
    }
    pub fn create_unit_square() -> Mesh2d {
        Self::create_single_polygon(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }
    /// Regular `n`-gon inscribed in a circle of `radius` around `center`.
    pub fn create_regular_polygon(n: usize, radius: f64, center: [f64; 2]) -> Mesh2d {
        let vertices: Vec<[f64; 2]> = (0..n)
            .map(|k| {
                let theta = 2.0 * std::f64::consts::PI * k as f64 / n as f64;
                [
                    center[0] + radius * theta.cos(),
                    center[1] + radius * theta.sin(),
                ]
            })
            .collect();
        Self::create_single_polygon(&vertices)
    }
    /// A unit square and a pentagon sharing the edge x = 1.
    pub fn create_two_polygon_mesh() -> Mesh2d {
        let nodes = vec![
            Node::new(0.0, 0.0),
            Node::new(1.0, 0.0),
            Node::new(2.0, 0.0),
            Node::new(2.5, 0.6),
            Node::new(2.0, 1.0),
            Node::new(1.0, 1.0),
            Node::new(0.0, 1.0),
        ];
        let elements = vec![
            PolygonElement {
                inodes: vec![0, 1, 5, 6],
            },
            PolygonElement {
                inodes: vec![1, 2, 3, 4, 5],
            },
        ];
        Self::new(nodes, elements).expect("static mesh connectivity is valid")
    }
    pub fn element(&self, ielem: usize) -> Result<&PolygonElement, PwlError> {
        PwlError::check_index("cell", ielem, self.elem_num)?;
        Ok(&self.elements[ielem])
    }
    /// Vertex coordinates of a cell in its own vertex order.
    pub fn element_coords(&self, ielem: usize) -> Result<Vec<[f64; 2]>, PwlError> {
        self.element(ielem)?
            .inodes()
            .iter()
            .map(|&inode| {
                PwlError::check_index("node", inode, self.node_num)?;
                let node = &self.nodes[inode];
                Ok([node.x, node.y])
            })
            .collect()
    }
}
