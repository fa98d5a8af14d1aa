//! Parsing helpers for the settings schema: check-in times ("09:00")
//! and stale windows ("24h", "1d12h").

use std::time::Duration;

/// Parse a compound duration like "30m", "24h", or "1d12h".
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total_secs: u64 = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(format!("expected a number before '{c}' in duration '{s}'"));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("invalid number in duration '{s}'"))?;
        digits.clear();
        let unit_secs = match c {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            other => return Err(format!("unknown duration unit '{other}' in '{s}'")),
        };
        total_secs += value * unit_secs;
    }
    if !digits.is_empty() {
        return Err(format!("trailing number without a unit in duration '{s}'"));
    }
    if total_secs == 0 {
        return Err(format!("duration '{s}' is zero"));
    }
    Ok(Duration::from_secs(total_secs))
}

/// Parse a check-in time "HH:MM" on the 24h clock.
pub fn parse_time(s: &str) -> Result<(u8, u8), String> {
    let (hour, minute) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
    let hour: u8 = hour.parse().map_err(|_| format!("invalid hour in '{s}'"))?;
    let minute: u8 = minute
        .parse()
        .map_err(|_| format!("invalid minute in '{s}'"))?;
    if hour > 23 {
        return Err(format!("hour out of range in '{s}'"));
    }
    if minute > 59 {
        return Err(format!("minute out of range in '{s}'"));
    }
    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse() {
        assert_eq!(parse_duration("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86400));
        assert_eq!(
            parse_duration("1d12h").unwrap(),
            Duration::from_secs(36 * 3600)
        );
        assert_eq!(parse_duration(" 2h ").unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn durations_reject_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("24").is_err());
        assert!(parse_duration("24x").is_err());
        assert!(parse_duration("0h").is_err());
    }

    #[test]
    fn times_parse() {
        assert_eq!(parse_time("09:00").unwrap(), (9, 0));
        assert_eq!(parse_time("23:59").unwrap(), (23, 59));
        assert_eq!(parse_time("0:5").unwrap(), (0, 5));
    }

    #[test]
    fn times_reject_out_of_range() {
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("noon").is_err());
        assert!(parse_time("12").is_err());
    }
}
