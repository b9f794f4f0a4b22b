//! Call stack capture for diagnostics

use std::backtrace::Backtrace;
use std::sync::OnceLock;

use regex::Regex;

fn frame_regex() -> &'static Regex {
    static FRAME: OnceLock<Regex> = OnceLock::new();
    FRAME.get_or_init(|| Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("Invalid regex pattern"))
}

fn location_regex() -> &'static Regex {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    LOCATION.get_or_init(|| Regex::new(r"^\s*at\s+(.+?)\s*$").expect("Invalid regex pattern"))
}

/// Parses the textual form of a [`Backtrace`] into one entry per frame.
///
/// A frame's source location, when present, is appended in parentheses.
pub fn parse_frames(backtrace: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();

    for line in backtrace.lines() {
        if let Some(caps) = frame_regex().captures(line) {
            frames.push(caps[1].to_string());
        } else if let Some(caps) = location_regex().captures(line) {
            if let Some(frame) = frames.last_mut() {
                frame.push_str(&format!(" ({})", &caps[1]));
            }
        }
    }

    frames
}

/// Captures the current call stack, one entry per frame.
///
/// Returns an empty list on platforms without backtrace support.
pub fn capture_frames() -> Vec<String> {
    parse_frames(&Backtrace::force_capture().to_string())
}

/// Renders `label` followed by one `\tat <frame>` line per frame.
///
/// Line breaks inside `label` are escaped so the label stays on one line.
pub fn format_stack_trace(label: &str, frames: &[String]) -> String {
    let label = label.replace('\r', "\\r").replace('\n', "\\n");
    let mut out = format!("{}\n", label);
    for frame in frames {
        out.push_str("\tat ");
        out.push_str(frame);
        out.push('\n');
    }
    out
}
