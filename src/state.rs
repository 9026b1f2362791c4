use druid::Data;

use crate::protocol::AngleFrame;

/// Application state
#[derive(Clone, Data)]
pub struct AppState {
    /// Current rotation angle around the X axis, in degrees
    pub angle_x: f64,
    /// Current rotation angle around the Y axis, in degrees
    pub angle_y: f64,
    /// Enable debug overlay
    pub debug: bool,
    /// Incoming sensor frames are ignored while paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
    /// Zoom level
    pub zoom: f64,
    /// Light position in world space
    pub light_position: [f64; 3],
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            angle_x: 0.0,
            angle_y: 0.0,
            debug: false,
            paused: false,
            wireframe: false,
            zoom: 1.0,
            light_position: [2.0, 2.0, -5.0],
        }
    }

    /// Adopts a freshly received orientation and reports whether it
    /// differs from the one on screen. An unchanged pair must not
    /// trigger a redraw.
    pub fn set_orientation(&mut self, frame: AngleFrame) -> bool {
        if self.angle_x == frame.x_deg && self.angle_y == frame.y_deg {
            return false;
        }
        self.angle_x = frame.x_deg;
        self.angle_y = frame.y_deg;
        true
    }

    /// Restores the default view. The next sensor frame takes over
    /// the orientation again.
    pub fn reset_view(&mut self) {
        self.angle_x = 0.0;
        self.angle_y = 0.0;
        self.zoom = 1.0;
        self.wireframe = false;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
