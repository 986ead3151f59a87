use std::env;
use std::time::Duration;

/// Read a boolean flag; `1`, `true`, `yes` and `on` are truthy.
pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

pub fn env_usize(key: &str, default: usize) -> usize {
    match env::var(key) {
        Ok(value) => value.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Read a duration expressed in (possibly fractional) seconds.
///
/// Negative, non-finite, out-of-range, or unparsable values fall back to
/// `default`.
pub fn env_secs(key: &str, default: Duration) -> Duration {
    match env::var(key) {
        Ok(value) => parse_secs(&value).unwrap_or(default),
        Err(_) => default,
    }
}

/// Read a trimmed, non-empty string.
pub fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_secs(raw: &str) -> Option<Duration> {
    let secs = raw.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::parse_secs;

    #[test]
    fn parses_fractional_seconds() {
        assert_eq!(parse_secs("1.5"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_secs(" 2 "), Some(Duration::from_secs(2)));
        assert_eq!(parse_secs("0"), Some(Duration::ZERO));
    }

    #[test]
    fn rejects_invalid_seconds() {
        assert_eq!(parse_secs("-1"), None);
        assert_eq!(parse_secs("soon"), None);
        assert_eq!(parse_secs("NaN"), None);
        assert_eq!(parse_secs("inf"), None);
        assert_eq!(parse_secs("1e30"), None);
    }
}
