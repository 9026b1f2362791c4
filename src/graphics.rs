//! Software rasterizer: lit triangles and wireframe lines drawn into
//! an RGBA framebuffer with depth testing.

use druid::Color;

use crate::math::{apply_lighting, calculate_light_intensity, edge_function};
use crate::mesh::Vertex;

/// RGBA pixel buffer with a parallel depth buffer.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    depth: Vec<f64>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
            depth: vec![f64::INFINITY; width * height],
        }
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn put(&mut self, x: usize, y: usize, color: &Color) {
        let offset = (y * self.width + x) * 4;
        let (r, g, b, a) = color.as_rgba8();
        self.pixels[offset] = r;
        self.pixels[offset + 1] = g;
        self.pixels[offset + 2] = b;
        self.pixels[offset + 3] = a;
    }
}

/// Draws a triangle with per-pixel lighting
pub fn draw_triangle(
    fb: &mut FrameBuffer,
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    light_pos_world: &[f64; 3],
    base_color: Color,
) {
    // Compute bounding box of the triangle
    let min_x = v0.screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0) as usize;
    let max_x = v0.screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(fb.width as f64 - 1.0) as usize;
    let min_y = v0.screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0) as usize;
    let max_y = v0.screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(fb.height as f64 - 1.0) as usize;

    // Precompute area of the triangle; degenerate triangles have
    // nothing to rasterize
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < 1e-9 {
        return;
    }

    // For each pixel in the bounding box
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            let p = [px, py];

            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p);
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p);
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p);

            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                // Inside triangle
                // Normalize barycentric coordinates
                let w0 = w0 / area;
                let w1 = w1 / area;
                let w2 = w2 / area;

                // Interpolate position
                let px3d = v0.position[0] * w0 + v1.position[0] * w1 + v2.position[0] * w2;
                let py3d = v0.position[1] * w0 + v1.position[1] * w1 + v2.position[1] * w2;
                let pz3d = v0.position[2] * w0 + v1.position[2] * w1 + v2.position[2] * w2;

                // Depth test
                let offset = y * fb.width + x;
                if pz3d < fb.depth[offset] {
                    fb.depth[offset] = pz3d;

                    // Interpolate normal
                    let nx = v0.normal[0] * w0 + v1.normal[0] * w1 + v2.normal[0] * w2;
                    let ny = v0.normal[1] * w0 + v1.normal[1] * w1 + v2.normal[1] * w2;
                    let nz = v0.normal[2] * w0 + v1.normal[2] * w1 + v2.normal[2] * w2;
                    let length = (nx * nx + ny * ny + nz * nz).sqrt();
                    let interpolated_normal = [nx / length, ny / length, nz / length];

                    // Compute lighting
                    let light_intensity = calculate_light_intensity(
                        &interpolated_normal,
                        &[px3d, py3d, pz3d],
                        light_pos_world,
                    );

                    // Shade and store
                    let shaded_color = apply_lighting(base_color.clone(), light_intensity);
                    fb.put(x, y, &shaded_color);
                }
            }
        }
    }
}

/// Draws a line between two points using Bresenham's algorithm
pub fn draw_line(fb: &mut FrameBuffer, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < fb.width as isize && y0 >= 0 && y0 < fb.height as isize {
            fb.put(x0 as usize, y0 as usize, &color);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
