//! gyrocube renders a 3D cube whose orientation follows angle pairs
//! streamed over a serial line by an external sensor.

mod error;
mod graphics;
mod math;
mod mesh;
mod protocol;
mod serial;
mod state;
mod widget;

use clap::Parser;
use druid::{AppLauncher, LocalizedString, WindowDesc};
use log::{error, info};

use crate::error::Result;
use crate::serial::AngleStream;
use crate::state::AppState;
use crate::widget::CubeWidget;

/// Window title
const WINDOW_TITLE: &str = "Controllable 3D Cube Rotation Via Serial Communication";

/// Window size (height and width)
const WINDOW_WIDTH: f64 = 200.0;
const WINDOW_HEIGHT: f64 = 200.0;

/// Exit code when the serial line or the window platform is unavailable
const EXIT_UNAVAILABLE: i32 = 2;

/// Renders a 3D cube whose rotation follows "X:Y" angle pairs streamed
/// over a serial connection.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serial device the sensor is attached to
    #[arg(long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Baud rate of the serial line
    #[arg(long, default_value_t = 9600)]
    baud: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args) {
        error!("{err}");
        std::process::exit(EXIT_UNAVAILABLE);
    }
}

fn run(args: Args) -> Result<()> {
    let port = serial::open_port(&args.port, args.baud)?;
    info!(
        "listening for angle frames on {} at {} baud",
        args.port, args.baud
    );

    let main_window = WindowDesc::new(CubeWidget::new(AngleStream::new(port), args.port))
        .title(LocalizedString::new(WINDOW_TITLE))
        .window_size((WINDOW_WIDTH, WINDOW_HEIGHT));

    AppLauncher::with_window(main_window).launch(AppState::new())?;

    Ok(())
}
