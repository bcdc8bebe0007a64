//! Time text formatting

/// Split a seconds count into whole minutes and leftover seconds
pub fn split(total_seconds: u64) -> (u64, u64) {
    (total_seconds / 60, total_seconds % 60)
}

/// Format a seconds count as "MM:SS"
pub fn format_time(total_seconds: u64) -> String {
    let (minutes, seconds) = split(total_seconds);
    format!("{:02}:{:02}", minutes, seconds)
}
