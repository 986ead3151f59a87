/// True if any character is hiragana, katakana, or a CJK ideograph.
pub fn is_japanese(text: &str) -> bool {
    text.chars().any(|ch| {
        matches!(ch,
            '\u{3040}'..='\u{309F}'
            | '\u{30A0}'..='\u{30FF}'
            | '\u{4E00}'..='\u{9FFF}')
    })
}

#[cfg(test)]
mod tests {
    use super::is_japanese;

    #[test]
    fn detects_each_script() {
        assert!(is_japanese("あいう"));
        assert!(is_japanese("アリス"));
        assert!(is_japanese("田中"));
        assert!(is_japanese("mika さん"));
        assert!(!is_japanese("Alice"));
        assert!(!is_japanese("Алиса"));
    }
}
