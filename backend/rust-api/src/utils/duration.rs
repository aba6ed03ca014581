/// Human-readable duration label for course cards, minute precision.
pub fn format_duration(seconds: u32) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}min", h, m),
    }
}
