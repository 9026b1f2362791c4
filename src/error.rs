use thiserror::Error;

/// Errors that can occur while bringing the viewer up.
///
/// Malformed sensor lines are not represented here: the serial link is
/// expected to carry noise, and the protocol layer drops bad lines
/// without raising anything.
#[derive(Error, Debug)]
pub enum GyrocubeError {
    /// The serial device could not be opened.
    #[error("failed to open serial port {path} at {baud} baud: {source}")]
    PortOpen {
        path: String,
        baud: u32,
        #[source]
        source: serialport::Error,
    },

    /// The windowing toolkit failed to start or run.
    #[error("window platform error: {0}")]
    Platform(#[from] druid::PlatformError),
}

/// Standard Result type for gyrocube operations.
pub type Result<T> = std::result::Result<T, GyrocubeError>;
