/// A translation target: the short tag used in cache keys and the name
/// shown to the LLM and to users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub tag: String,
    pub name: String,
}

const KNOWN: &[(&str, &str)] = &[
    ("ja", "Japanese"),
    ("en", "English"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
];

impl Language {
    /// Resolve a user-supplied language name or tag. Unknown inputs are kept
    /// as-is so the LLM can still interpret them.
    pub fn resolve(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lowered = trimmed.to_lowercase();

        let known = KNOWN
            .iter()
            .find(|(tag, name)| lowered == *tag || lowered == name.to_lowercase());

        match known {
            Some((tag, name)) => Self {
                tag: (*tag).to_owned(),
                name: (*name).to_owned(),
            },
            None => Self {
                tag: lowered,
                name: trimmed.to_owned(),
            },
        }
    }

    pub fn is_japanese(&self) -> bool {
        self.tag == "ja"
    }
}

#[cfg(test)]
mod tests {
    use super::Language;

    #[test]
    fn names_and_tags_resolve_to_same_language() {
        assert_eq!(Language::resolve("Japanese"), Language::resolve("ja"));
        assert_eq!(Language::resolve(" JAPANESE ").tag, "ja");
        assert!(Language::resolve("ja").is_japanese());
    }

    #[test]
    fn unknown_language_passes_through() {
        let language = Language::resolve("Klingon");
        assert_eq!(language.tag, "klingon");
        assert_eq!(language.name, "Klingon");
        assert!(!language.is_japanese());
    }
}
