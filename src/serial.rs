//! Serial line source for angle frames.
//!
//! The port is opened with a short read timeout so that draining it
//! from the UI timer tick blocks for at most that long when the sensor
//! is quiet.

use std::io::{self, Read};
use std::time::Duration;

use log::{debug, warn};
use serialport::SerialPort;

use crate::error::{GyrocubeError, Result};
use crate::protocol::{self, AngleFrame};

/// Read timeout on the port; bounds how long one poll can block.
const READ_TIMEOUT: Duration = Duration::from_millis(5);

/// At most this many bytes are consumed per poll.
const READ_BUDGET: usize = 2048;

/// The pending buffer is discarded once it grows past this without a
/// newline showing up.
const MAX_PENDING: usize = 4096;

/// Opens the sensor's serial port (8N1 defaults).
pub fn open_port(path: &str, baud: u32) -> Result<Box<dyn SerialPort>> {
    serialport::new(path, baud)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|source| GyrocubeError::PortOpen {
            path: path.to_string(),
            baud,
            source,
        })
}

/// Incremental reader that turns raw serial bytes into [`AngleFrame`]s.
///
/// Bytes arrive in arbitrary chunks; complete `\n`-terminated lines
/// are decoded and anything after the last newline is kept for the
/// next poll.
pub struct AngleStream<R> {
    reader: R,
    pending: Vec<u8>,
}

impl<R: Read> AngleStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    /// Drains whatever is currently readable and returns the frames
    /// decoded from complete lines, oldest first. Malformed lines are
    /// dropped.
    pub fn poll(&mut self) -> Vec<AngleFrame> {
        self.fill_pending();

        let mut frames = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            match std::str::from_utf8(&line) {
                Ok(text) => {
                    if let Some(frame) = protocol::parse_line(text) {
                        frames.push(frame);
                    } else if !text.trim().is_empty() {
                        debug!("ignoring malformed sensor line: {:?}", text.trim_end());
                    }
                }
                Err(_) => debug!("ignoring non-UTF-8 sensor line"),
            }
        }
        frames
    }

    fn fill_pending(&mut self) {
        let mut chunk = [0u8; 256];
        let mut budget = READ_BUDGET;
        while budget > 0 {
            match self.reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    if self.pending.len() > MAX_PENDING {
                        warn!(
                            "{} bytes from sensor without a newline, dropping",
                            self.pending.len()
                        );
                        self.pending.clear();
                    }
                    budget = budget.saturating_sub(n);
                }
                Err(e)
                    if e.kind() == io::ErrorKind::TimedOut
                        || e.kind() == io::ErrorKind::WouldBlock =>
                {
                    break
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("serial read failed: {e}");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Yields one scripted chunk per read call, then times out the way
    /// a quiet serial port does.
    struct ScriptedReader {
        script: VecDeque<Vec<u8>>,
    }

    impl ScriptedReader {
        fn new(chunks: &[&[u8]]) -> Self {
            Self {
                script: chunks.iter().map(|c| c.to_vec()).collect(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.script.pop_front() {
                Some(chunk) => {
                    assert!(chunk.len() <= buf.len());
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Err(io::Error::new(io::ErrorKind::TimedOut, "no data")),
            }
        }
    }

    fn frame(x: f64, y: f64) -> AngleFrame {
        AngleFrame { x_deg: x, y_deg: y }
    }

    #[test]
    fn complete_lines_decode_to_frames() {
        let reader = ScriptedReader::new(&[b"10.0:20.0\n30:40\n"]);
        let mut stream = AngleStream::new(reader);
        assert_eq!(stream.poll(), vec![frame(10.0, 20.0), frame(30.0, 40.0)]);
        assert_eq!(stream.poll(), vec![]);
    }

    #[test]
    fn partial_line_is_deferred_to_the_next_poll() {
        let reader = ScriptedReader::new(&[b"1:2\n3:"]);
        let mut stream = AngleStream::new(reader);
        assert_eq!(stream.poll(), vec![frame(1.0, 2.0)]);

        stream.reader.script.push_back(b"4\n".to_vec());
        assert_eq!(stream.poll(), vec![frame(3.0, 4.0)]);
    }

    #[test]
    fn line_split_across_reads_reassembles() {
        let reader = ScriptedReader::new(&[b"45.", b"0:9", b"0.0\n"]);
        let mut stream = AngleStream::new(reader);
        assert_eq!(stream.poll(), vec![frame(45.0, 90.0)]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let reader = ScriptedReader::new(&[b"garbage\n45:90\n:\n"]);
        let mut stream = AngleStream::new(reader);
        assert_eq!(stream.poll(), vec![frame(45.0, 90.0)]);
    }

    #[test]
    fn newline_free_junk_is_bounded() {
        let junk = vec![b'x'; 200];
        let chunks: Vec<&[u8]> = (0..25).map(|_| junk.as_slice()).collect();
        let reader = ScriptedReader::new(&chunks);
        let mut stream = AngleStream::new(reader);

        // 5000 junk bytes; however many polls it takes, the pending
        // buffer stays bounded and no frames come out.
        for _ in 0..5 {
            assert_eq!(stream.poll(), vec![]);
            assert!(stream.pending.len() <= MAX_PENDING);
        }
    }

    #[test]
    fn read_errors_stop_the_poll_without_losing_buffered_data() {
        struct FailingReader {
            sent: bool,
        }
        impl Read for FailingReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.sent {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
                }
                self.sent = true;
                let data = b"7:8\n9:1a";
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
        }

        let mut stream = AngleStream::new(FailingReader { sent: false });
        assert_eq!(stream.poll(), vec![frame(7.0, 8.0)]);
        // The trailing partial line survives the error.
        assert_eq!(stream.pending, b"9:1a".to_vec());
    }
}
