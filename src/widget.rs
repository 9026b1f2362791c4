//! The cube widget. The timer tick is the idle path of the event
//! loop: it drains the sensor stream and requests a repaint only when
//! the orientation actually changed.

use std::time::{Duration, Instant};

use druid::keyboard_types::Key;
use druid::kurbo::Point;
use druid::text::FontFamily;
use druid::widget::prelude::*;
use druid::{
    commands,
    piet::{ImageFormat, InterpolationMode, Text, TextLayout, TextLayoutBuilder},
    Color, RenderContext, Widget,
};
use serialport::SerialPort;

use crate::graphics::{draw_line, draw_triangle, FrameBuffer};
use crate::math::{calculate_normal, model_rotation, multiply_matrix_vector};
use crate::mesh::{Vertex, CORNERS, EDGES, FACES, FACE_COLORS};
use crate::serial::AngleStream;
use crate::state::AppState;

/// Cadence of the serial drain.
const TICK: Duration = Duration::from_millis(16);

/// What a key press should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleDebug,
    TogglePause,
    ToggleWireframe,
    ResetView,
}

/// Maps a pressed key to its action. Escape quits no matter what else
/// is going on; `q` is an alias.
pub fn key_action(key: &Key) -> Option<KeyAction> {
    match key {
        Key::Escape => Some(KeyAction::Quit),
        Key::Character(s) => match s.as_str() {
            "q" | "Q" => Some(KeyAction::Quit),
            "d" | "D" => Some(KeyAction::ToggleDebug),
            "p" | "P" => Some(KeyAction::TogglePause),
            "w" | "W" => Some(KeyAction::ToggleWireframe),
            "r" | "R" => Some(KeyAction::ResetView),
            _ => None,
        },
        _ => None,
    }
}

/// 3D cube widget fed by the serial angle stream
pub struct CubeWidget {
    angles: AngleStream<Box<dyn SerialPort>>,
    port_name: String,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    /// Widget size
    size: Size,
}

impl CubeWidget {
    pub fn new(angles: AngleStream<Box<dyn SerialPort>>, port_name: String) -> Self {
        CubeWidget {
            angles,
            port_name,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            size: Size::ZERO,
        }
    }

    /// Computes the projected cube vertices for the current state
    fn compute_projected_vertices(&self, data: &AppState) -> Vec<Vertex> {
        let center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
        let scale = (self.size.height.min(self.size.width) / 4.0) * data.zoom;

        let rotation = model_rotation(data.angle_x, data.angle_y);

        // Rotate the corners
        let transformed: Vec<[f64; 3]> = CORNERS
            .iter()
            .map(|corner| multiply_matrix_vector(&rotation, corner))
            .collect();

        // Average face normals into vertex normals
        let mut vertex_normals = vec![[0.0; 3]; CORNERS.len()];
        for &(a, b, c, d) in FACES.iter() {
            let normal = calculate_normal(&transformed[a], &transformed[b], &transformed[c]);
            for &index in &[a, b, c, d] {
                vertex_normals[index][0] += normal[0];
                vertex_normals[index][1] += normal[1];
                vertex_normals[index][2] += normal[2];
            }
        }
        for normal in vertex_normals.iter_mut() {
            let length =
                (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
            normal[0] /= length;
            normal[1] /= length;
            normal[2] /= length;
        }

        // Attach screen positions
        transformed
            .iter()
            .zip(vertex_normals.iter())
            .map(|(&position, &normal)| {
                let screen_x = position[0] * scale + center.x;
                let screen_y = position[1] * scale + center.y;
                Vertex {
                    position,
                    screen_position: [screen_x, screen_y],
                    normal,
                }
            })
            .collect()
    }
}

impl Widget<AppState> for CubeWidget {
    /// Handle events for the cube widget
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                ctx.request_timer(TICK);
                // Request focus to receive keyboard events
                ctx.request_focus();
            }
            Event::Timer(_) => {
                let mut changed = false;
                for frame in self.angles.poll() {
                    if !data.paused && data.set_orientation(frame) {
                        changed = true;
                    }
                }
                if changed {
                    ctx.request_paint();
                }
                ctx.request_timer(TICK);
            }
            Event::KeyDown(key_event) => match key_action(&key_event.key) {
                Some(KeyAction::Quit) => {
                    ctx.submit_command(commands::QUIT_APP);
                }
                Some(KeyAction::ToggleDebug) => {
                    data.debug = !data.debug;
                    ctx.request_paint();
                }
                Some(KeyAction::TogglePause) => {
                    data.paused = !data.paused;
                    ctx.request_paint();
                }
                Some(KeyAction::ToggleWireframe) => {
                    if !data.paused {
                        data.wireframe = !data.wireframe;
                        ctx.request_paint();
                    }
                }
                Some(KeyAction::ResetView) => {
                    if !data.paused {
                        data.reset_view();
                        ctx.request_paint();
                    }
                }
                None => {}
            },
            Event::Wheel(wheel_event) => {
                if !data.paused {
                    let delta = wheel_event.wheel_delta.y;
                    data.zoom *= 1.0 + delta * 0.001;
                    data.zoom = data.zoom.clamp(0.1, 10.0);
                    ctx.request_paint();
                }
            }
            _ => {}
        }
    }

    fn lifecycle(
        &mut self,
        _ctx: &mut LifeCycleCtx,
        event: &LifeCycle,
        _data: &AppState,
        _env: &Env,
    ) {
        if let LifeCycle::Size(size) = event {
            self.size = *size;
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old_data: &AppState, _data: &AppState, _env: &Env) {
    }

    /// Determines the layout constraints for the cube widget
    fn layout(
        &mut self,
        _layout_ctx: &mut LayoutCtx,
        bc: &BoxConstraints,
        _data: &AppState,
        _env: &Env,
    ) -> Size {
        let size = bc.max();
        self.size = size;
        size
    }

    /// Paint the cube widget
    fn paint(&mut self, ctx: &mut PaintCtx, data: &AppState, _env: &Env) {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let size = ctx.size();
        let width = size.width as usize;
        let height = size.height as usize;
        // Nothing to rasterize into while minimized
        if width == 0 || height == 0 {
            return;
        }

        let mut fb = FrameBuffer::new(width, height);
        let vertices = self.compute_projected_vertices(data);

        if data.wireframe {
            for &(start, end) in &EDGES {
                let v0 = &vertices[start];
                let v1 = &vertices[end];
                draw_line(
                    &mut fb,
                    v0.screen_position[0],
                    v0.screen_position[1],
                    v1.screen_position[0],
                    v1.screen_position[1],
                    Color::WHITE,
                );
            }
        } else {
            for (face_index, &(a, b, c, d)) in FACES.iter().enumerate() {
                // Triangle 1: a, b, c
                draw_triangle(
                    &mut fb,
                    &vertices[a],
                    &vertices[b],
                    &vertices[c],
                    &data.light_position,
                    FACE_COLORS[face_index].clone(),
                );
                // Triangle 2: a, c, d
                draw_triangle(
                    &mut fb,
                    &vertices[a],
                    &vertices[c],
                    &vertices[d],
                    &data.light_position,
                    FACE_COLORS[face_index].clone(),
                );
            }
        }

        // Blit the framebuffer
        let image = ctx
            .make_image(width, height, fb.pixels(), ImageFormat::RgbaSeparate)
            .unwrap();
        ctx.draw_image(&image, size.to_rect(), InterpolationMode::NearestNeighbor);

        // Add debug info if the debug overlay is enabled
        if data.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Port: {}", self.port_name),
                format!("Angle X: {:.2}, Angle Y: {:.2}", data.angle_x, data.angle_y),
                format!("Zoom: {:.2}", data.zoom),
                format!("FPS: {:.2}", self.fps),
            ];
            for (i, line) in lines.into_iter().enumerate() {
                let text_layout = ctx
                    .text()
                    .new_text_layout(line)
                    .font(FontFamily::SYSTEM_UI, 12.0)
                    .text_color(Color::WHITE)
                    .build()
                    .unwrap();
                ctx.draw_text(&text_layout, (10.0, 10.0 + 20.0 * i as f64));
            }
        }

        // Display 'Paused' while sensor frames are being ignored
        if data.paused {
            // Semi-transparent overlay
            let overlay_color = Color::rgba8(0, 0, 0, 150);
            ctx.fill(size.to_rect(), &overlay_color);

            let text_layout = ctx
                .text()
                .new_text_layout("Paused")
                .font(FontFamily::SYSTEM_UI, 36.0)
                .default_attribute(druid::piet::FontWeight::BOLD)
                .text_color(Color::WHITE)
                .build()
                .unwrap();
            let text_size = text_layout.size();
            let pos = (
                (size.width - text_size.width) / 2.0,
                (size.height - text_size.height) / 2.0,
            );
            ctx.draw_text(&text_layout, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(s: &str) -> Key {
        Key::Character(s.to_string())
    }

    #[test]
    fn escape_always_quits() {
        assert_eq!(key_action(&Key::Escape), Some(KeyAction::Quit));
    }

    #[test]
    fn q_is_a_quit_alias() {
        assert_eq!(key_action(&ch("q")), Some(KeyAction::Quit));
        assert_eq!(key_action(&ch("Q")), Some(KeyAction::Quit));
    }

    #[test]
    fn toggles_map_to_their_keys() {
        assert_eq!(key_action(&ch("d")), Some(KeyAction::ToggleDebug));
        assert_eq!(key_action(&ch("p")), Some(KeyAction::TogglePause));
        assert_eq!(key_action(&ch("w")), Some(KeyAction::ToggleWireframe));
        assert_eq!(key_action(&ch("r")), Some(KeyAction::ResetView));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(key_action(&ch("x")), None);
        assert_eq!(key_action(&Key::Enter), None);
        assert_eq!(key_action(&Key::F1), None);
    }
}
