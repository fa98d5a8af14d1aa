/// Shorten a string to at most `max_chars` characters for log panels and
/// alert previews. Appends an ellipsis when anything was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut chars = s.char_indices();
    match chars.nth(max_chars) {
        None => s.to_string(),
        Some((byte_idx, _)) => {
            let mut out = s[..byte_idx].trim_end().to_string();
            out.push('…');
            out
        }
    }
}

/// Render an age in seconds as a compact human string: "42s", "3m", "2h 5m",
/// "1d 3h". Used in generated prompts and status log lines.
pub fn human_age(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 3600;
    const DAY: u64 = 86400;

    if secs < MINUTE {
        format!("{}s", secs)
    } else if secs < HOUR {
        format!("{}m", secs / MINUTE)
    } else if secs < DAY {
        let rem = (secs % HOUR) / MINUTE;
        if rem == 0 {
            format!("{}h", secs / HOUR)
        } else {
            format!("{}h {}m", secs / HOUR, rem)
        }
    } else {
        let rem = (secs % DAY) / HOUR;
        if rem == 0 {
            format!("{}d", secs / DAY)
        } else {
            format!("{}d {}h", secs / DAY, rem)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_string_untouched() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn preview_exact_length_untouched() {
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn preview_cuts_and_marks() {
        assert_eq!(preview("hello world", 5), "hello…");
    }

    #[test]
    fn preview_trims_trailing_space_before_ellipsis() {
        assert_eq!(preview("hello world", 6), "hello…");
    }

    #[test]
    fn preview_counts_chars_not_bytes() {
        // Each kana is 3 bytes; 2 chars must survive intact.
        assert_eq!(preview("あいう", 2), "あい…");
    }

    #[test]
    fn preview_empty() {
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn human_age_seconds() {
        assert_eq!(human_age(0), "0s");
        assert_eq!(human_age(42), "42s");
    }

    #[test]
    fn human_age_minutes() {
        assert_eq!(human_age(60), "1m");
        assert_eq!(human_age(185), "3m");
    }

    #[test]
    fn human_age_hours() {
        assert_eq!(human_age(3600), "1h");
        assert_eq!(human_age(2 * 3600 + 5 * 60), "2h 5m");
    }

    #[test]
    fn human_age_days() {
        assert_eq!(human_age(86400), "1d");
        assert_eq!(human_age(86400 + 3 * 3600), "1d 3h");
    }
}
