//! Parsing of collaborator progress lines
//!
//! With `--newline`, yt-dlp emits lines like:
//!
//! ```text
//! [download]  42.3% of 10.50MiB at 1.20MiB/s ETA 00:05
//! ```

use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Progress snapshot for one item being fetched
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Percent complete (0.0 to 100.0)
    pub percent: f64,
    /// Total size in bytes, if reported
    pub total_bytes: Option<u64>,
    /// Current speed in bytes per second, if reported
    pub speed: Option<f64>,
    /// Estimated time remaining, if reported
    pub eta: Option<Duration>,
}

fn progress_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\[download\]\s+(?P<pct>\d+(?:\.\d+)?)%(?:\s+of\s+~?\s*(?P<total>[\d.]+\w+))?(?:\s+at\s+(?P<speed>[\d.]+\w+)/s)?(?:\s+ETA\s+(?P<eta>[\d:]+))?",
        )
        .unwrap()
    })
}

/// Parse one line of collaborator output into a progress snapshot
pub fn parse_progress_line(line: &str) -> Option<Progress> {
    let caps = progress_regex().captures(line)?;

    let percent = caps.name("pct")?.as_str().parse::<f64>().ok()?;
    let total_bytes = caps.name("total").and_then(|m| parse_size(m.as_str()));
    let speed = caps
        .name("speed")
        .and_then(|m| parse_size(m.as_str()))
        .map(|b| b as f64);
    let eta = caps.name("eta").and_then(|m| parse_clock(m.as_str()));

    Some(Progress {
        percent,
        total_bytes,
        speed,
        eta,
    })
}

/// Parse "10.50MiB" style sizes into bytes
fn parse_size(s: &str) -> Option<u64> {
    let number_end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    let value: f64 = s[..number_end].parse().ok()?;
    let multiplier = match s[number_end..].trim() {
        "B" | "" => 1.0,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        "TiB" => 1024.0_f64.powi(4),
        "KB" => 1000.0,
        "MB" => 1000.0 * 1000.0,
        "GB" => 1000.0 * 1000.0 * 1000.0,
        _ => return None,
    };

    Some((value * multiplier) as u64)
}

/// Parse "mm:ss" or "hh:mm:ss" clocks
fn parse_clock(s: &str) -> Option<Duration> {
    let parts: Vec<u64> = s.split(':').map(|p| p.parse().ok()).collect::<Option<_>>()?;
    let seconds = match parts.as_slice() {
        [m, s] => m * 60 + s,
        [h, m, s] => h * 3600 + m * 60 + s,
        _ => return None,
    };
    Some(Duration::from_secs(seconds))
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}
