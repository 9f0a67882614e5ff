//! Widget utilities - small stateless rendering helpers

use super::theme::icons;

/// Create a progress bar string
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!(
        "[{}{}]",
        icons::BAR_FULL.to_string().repeat(filled),
        icons::BAR_EMPTY.to_string().repeat(empty)
    )
}

/// One decimal place with a litres suffix
pub fn litres(value: f64) -> String {
    format!("{value:.1}l")
}

/// Truncate string with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_halves() {
        let bar = progress_bar(50.0, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
    }

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(150.0, 4), "[████]");
        assert_eq!(progress_bar(-5.0, 4), "[░░░░]");
    }

    #[test]
    fn litres_formatting() {
        assert_eq!(litres(28.5), "28.5l");
        assert_eq!(litres(117.62), "117.6l");
    }

    #[test]
    fn truncate_behaviour() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 2), "hi");
    }
}
