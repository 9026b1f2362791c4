//! Cube geometry. The shape is fixed: eight corners, six colored quad
//! faces, twelve silhouette edges.

use druid::Color;

/// Vertex with world position, projected screen position, and normal
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
    pub normal: [f64; 3],
}

/// Corner positions of the cube
pub const CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0], // 0
    [1.0, -1.0, -1.0],  // 1
    [1.0, 1.0, -1.0],   // 2
    [-1.0, 1.0, -1.0],  // 3
    [-1.0, -1.0, 1.0],  // 4
    [1.0, -1.0, 1.0],   // 5
    [1.0, 1.0, 1.0],    // 6
    [-1.0, 1.0, 1.0],   // 7
];

/// Quad faces as corner indices
pub const FACES: [(usize, usize, usize, usize); 6] = [
    (0, 1, 2, 3), // back
    (5, 4, 7, 6), // front
    (4, 0, 3, 7), // left
    (1, 5, 6, 2), // right
    (4, 5, 1, 0), // bottom
    (3, 2, 6, 7), // top
];

/// Edges for wireframe rendering (pairs of corner indices)
pub const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0), // back face
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4), // front face
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7), // connecting edges
];

/// One fixed color per face, same order as [`FACES`]
pub const FACE_COLORS: [Color; 6] = [
    Color::rgb8(255, 255, 0), // back: yellow
    Color::rgb8(255, 0, 0),   // front: red
    Color::rgb8(0, 0, 255),   // left: blue
    Color::rgb8(255, 0, 255), // right: violet
    Color::rgb8(255, 128, 0), // bottom: orange
    Color::rgb8(0, 255, 0),   // top: green
];
