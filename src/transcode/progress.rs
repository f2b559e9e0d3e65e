//! FFmpeg progress parsing
//!
//! FFmpeg reports encode progress on stderr as lines containing
//! `time=HH:MM:SS.cc` alongside `bitrate=`. Combined with the probed input
//! duration this yields a 0-100 percent for the status channel.

/// Whether a stderr line is a progress report rather than banner output.
pub fn is_progress_line(line: &str) -> bool {
    line.contains("time=") && line.contains("bitrate=")
}

/// Extract the value following `key` in an ffmpeg progress line.
///
/// FFmpeg pads some values with spaces after the `=`, so leading
/// whitespace is skipped before the value is read.
pub fn extract_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let value = &rest[..end];
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse an `HH:MM:SS.cc` timestamp into seconds.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let mut parts = value.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Extract the elapsed encode time from a progress line, in seconds.
pub fn parse_progress_seconds(line: &str) -> Option<f64> {
    if !is_progress_line(line) {
        return None;
    }
    parse_timestamp(extract_value(line, "time=")?)
}

/// Convert elapsed seconds to a clamped 0-100 percent of `total_seconds`.
pub fn percent(elapsed_seconds: f64, total_seconds: f64) -> Option<u8> {
    if total_seconds <= 0.0 {
        return None;
    }
    Some((elapsed_seconds / total_seconds * 100.0).clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_LINE: &str =
        "frame= 123 fps= 60.0 size= 1024kB time=00:00:10.00 bitrate= 2000.0kbits/s speed= 1.0x";

    #[test]
    fn test_extract_value() {
        assert_eq!(extract_value(VIDEO_LINE, "frame="), Some("123"));
        assert_eq!(extract_value(VIDEO_LINE, "time="), Some("00:00:10.00"));
        assert_eq!(extract_value(VIDEO_LINE, "speed="), Some("1.0x"));
        assert_eq!(extract_value(VIDEO_LINE, "missing="), None);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:10.00"), Some(10.0));
        assert_eq!(parse_timestamp("01:02:03.50"), Some(3723.5));
        assert_eq!(parse_timestamp("garbage"), None);
        assert_eq!(parse_timestamp("00:10"), None);
    }

    #[test]
    fn test_progress_line_detection() {
        assert!(is_progress_line(VIDEO_LINE));
        assert!(!is_progress_line(
            "Input #0, matroska,webm, from 'input.webm':"
        ));
    }

    #[test]
    fn test_parse_progress_seconds() {
        assert_eq!(parse_progress_seconds(VIDEO_LINE), Some(10.0));
        assert_eq!(parse_progress_seconds("Stream mapping:"), None);
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(percent(5.0, 10.0), Some(50));
        assert_eq!(percent(15.0, 10.0), Some(100));
        assert_eq!(percent(-1.0, 10.0), Some(0));
        assert_eq!(percent(5.0, 0.0), None);
    }
}
