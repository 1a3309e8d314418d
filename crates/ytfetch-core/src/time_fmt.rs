//! VTT/SRT timestamp formatting helpers.

fn split(seconds: f64) -> (u64, u64, u64, u64) {
    let seconds = seconds.max(0.0);
    let whole = seconds as u64;
    let h = whole / 3600;
    let m = (whole % 3600) / 60;
    let s = whole % 60;
    let ms = ((seconds.fract() * 1000.0).round() as u64).min(999);
    (h, m, s, ms)
}

/// Seconds to WebVTT timestamp: `HH:MM:SS.mmm`.
pub fn seconds_to_vtt(seconds: f64) -> String {
    let (h, m, s, ms) = split(seconds);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Seconds to SRT timestamp: `HH:MM:SS,mmm`.
pub fn seconds_to_srt(seconds: f64) -> String {
    let (h, m, s, ms) = split(seconds);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}
