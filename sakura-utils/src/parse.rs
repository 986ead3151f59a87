/// Pull a `language=<value>` token out of free-form command arguments.
pub fn extract_language_option(args: &str) -> Option<String> {
    args.split_whitespace()
        .find_map(|part| part.strip_prefix("language="))
        .map(|value| value.trim_matches('"').trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Return the text between the first pair of double quotes, if any.
pub fn extract_quoted_text(text: &str) -> Option<&str> {
    let start = text.find('"')?;
    let rest = &text[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Parse a channel id from a raw id or a `<#id>` mention.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }

    raw.strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .and_then(|id| id.parse::<u64>().ok())
}

/// Interpret an on/off style toggle argument.
pub fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "enable" | "enabled" | "true" | "yes" => Some(true),
        "off" | "disable" | "disabled" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_language_option, extract_quoted_text, parse_channel_id, parse_toggle};

    #[test]
    fn finds_language_option() {
        assert_eq!(
            extract_language_option("\"New Members\" language=Spanish"),
            Some("Spanish".to_owned())
        );
        assert_eq!(extract_language_option("language="), None);
        assert_eq!(extract_language_option("no option here"), None);
    }

    #[test]
    fn finds_quoted_text() {
        assert_eq!(extract_quoted_text("role \"New Members\" x"), Some("New Members"));
        assert_eq!(extract_quoted_text("\"unterminated"), None);
        assert_eq!(extract_quoted_text("plain"), None);
    }

    #[test]
    fn parses_channel_ids() {
        assert_eq!(parse_channel_id("1234"), Some(1234));
        assert_eq!(parse_channel_id("<#5678>"), Some(5678));
        assert_eq!(parse_channel_id("#general"), None);
    }

    #[test]
    fn parses_toggles() {
        assert_eq!(parse_toggle("ON"), Some(true));
        assert_eq!(parse_toggle(" off "), Some(false));
        assert_eq!(parse_toggle("status"), None);
    }
}
