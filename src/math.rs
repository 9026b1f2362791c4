use druid::Color;

/// Rotation matrix around the X axis; `deg` in degrees
pub fn rotation_x(deg: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = deg.to_radians().sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Rotation matrix around the Y axis; `deg` in degrees
pub fn rotation_y(deg: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = deg.to_radians().sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

/// Combined model rotation for a sensor frame. The Y rotation is
/// applied to the corner first, then the X rotation.
pub fn model_rotation(x_deg: f64, y_deg: f64) -> [[f64; 3]; 3] {
    multiply_matrices(&rotation_x(x_deg), &rotation_y(y_deg))
}

/// Edge function used in rasterization
pub fn edge_function(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> [f64; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let normal = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
    [normal[0] / length, normal[1] / length, normal[2] / length]
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(
    normal: &[f64; 3],
    position: &[f64; 3],
    light_pos: &[f64; 3],
) -> f64 {
    let light_dir = [
        light_pos[0] - position[0],
        light_pos[1] - position[1],
        light_pos[2] - position[2],
    ];
    let length = (light_dir[0] * light_dir[0]
        + light_dir[1] * light_dir[1]
        + light_dir[2] * light_dir[2])
        .sqrt();
    let light_dir = [
        light_dir[0] / length,
        light_dir[1] / length,
        light_dir[2] / length,
    ];
    let dot_product =
        normal[0] * light_dir[0] + normal[1] * light_dir[1] + normal[2] * light_dir[2];
    dot_product.max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a color
pub fn apply_lighting(color: Color, intensity: f64) -> Color {
    let r = (color.as_rgba8().0 as f64 * intensity).min(255.0) as u8;
    let g = (color.as_rgba8().1 as f64 * intensity).min(255.0) as u8;
    let b = (color.as_rgba8().2 as f64 * intensity).min(255.0) as u8;
    Color::rgb8(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(actual: [f64; 3], expected: [f64; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-9,
                "component {i}: {actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn zero_angles_are_the_identity() {
        let m = model_rotation(0.0, 0.0);
        assert_vec_close(multiply_matrix_vector(&m, &[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn quarter_turn_about_y_maps_z_to_x() {
        let m = rotation_y(90.0);
        assert_vec_close(multiply_matrix_vector(&m, &[0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn quarter_turn_about_x_maps_y_to_z() {
        let m = rotation_x(90.0);
        assert_vec_close(multiply_matrix_vector(&m, &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn model_rotation_applies_y_before_x() {
        // Ry(90) sends +z to +x; Rx(90) then leaves +x alone.
        let m = model_rotation(90.0, 90.0);
        assert_vec_close(multiply_matrix_vector(&m, &[0.0, 0.0, 1.0]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn full_turn_is_the_identity() {
        let m = model_rotation(360.0, 360.0);
        assert_vec_close(multiply_matrix_vector(&m, &[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn normal_of_xy_plane_triangle_points_along_z() {
        let n = calculate_normal(&[0.0, 0.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert_vec_close(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn light_intensity_has_an_ambient_floor() {
        // Normal points away from the light.
        let intensity =
            calculate_light_intensity(&[0.0, 0.0, 1.0], &[0.0, 0.0, 0.0], &[0.0, 0.0, -5.0]);
        assert_eq!(intensity, 0.1);
    }

    #[test]
    fn head_on_light_is_full_intensity() {
        let intensity =
            calculate_light_intensity(&[0.0, 0.0, -1.0], &[0.0, 0.0, 0.0], &[0.0, 0.0, -5.0]);
        assert!((intensity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_intensity_keeps_the_base_color() {
        let shaded = apply_lighting(Color::rgb8(200, 100, 50), 1.0);
        assert_eq!(shaded.as_rgba8(), (200, 100, 50, 255));
    }

    #[test]
    fn half_intensity_halves_the_channels() {
        let shaded = apply_lighting(Color::rgb8(200, 100, 50), 0.5);
        assert_eq!(shaded.as_rgba8(), (100, 50, 25, 255));
    }
}
