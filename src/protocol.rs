//! Decoding of the sensor's angle protocol.
//!
//! The device streams newline-delimited `"X:Y"` pairs, e.g.
//! `45.0:90.0`, where both fields are rotation angles in degrees.

/// One decoded angle pair from the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleFrame {
    /// Rotation around the X axis, in degrees.
    pub x_deg: f64,
    /// Rotation around the Y axis, in degrees.
    pub y_deg: f64,
}

/// Parses one line of sensor output.
///
/// Returns `None` for anything that is not a well-formed pair: a
/// missing `:` separator, an empty field, or a field that does not
/// parse as a float.
pub fn parse_line(line: &str) -> Option<AngleFrame> {
    let (x, y) = line.trim().split_once(':')?;
    let (x, y) = (x.trim(), y.trim());
    if x.is_empty() || y.is_empty() {
        return None;
    }
    Some(AngleFrame {
        x_deg: x.parse().ok()?,
        y_deg: y.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_pair_yields_exact_angles() {
        let frame = parse_line("45.0:90.0").unwrap();
        assert_eq!(frame.x_deg, 45.0);
        assert_eq!(frame.y_deg, 90.0);
    }

    #[test]
    fn negative_and_integer_fields_parse() {
        let frame = parse_line("-12.5:0").unwrap();
        assert_eq!(frame.x_deg, -12.5);
        assert_eq!(frame.y_deg, 0.0);
    }

    #[test]
    fn crlf_and_surrounding_whitespace_are_tolerated() {
        let frame = parse_line(" 45.0 : 90.0 \r").unwrap();
        assert_eq!(frame.x_deg, 45.0);
        assert_eq!(frame.y_deg, 90.0);
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(parse_line("45.0"), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert_eq!(parse_line(":90.0"), None);
        assert_eq!(parse_line("45.0:"), None);
        assert_eq!(parse_line(":"), None);
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert_eq!(parse_line("abc:90.0"), None);
        assert_eq!(parse_line("45.0:xyz"), None);
        // Extra separators land in the second field and fail the parse.
        assert_eq!(parse_line("1:2:3"), None);
    }
}
