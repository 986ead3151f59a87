use crate::batch::{BatchProgress, ItemOutcome};

/// Discord rejects nicknames longer than this many characters.
pub const NICKNAME_MAX_CHARS: usize = 32;

/// Trim a nickname to Discord's length limit without splitting a character.
pub fn truncate_nickname(name: &str) -> String {
    truncate_chars(name.trim(), NICKNAME_MAX_CHARS)
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_owned(),
        None => text.to_owned(),
    }
}

/// Neutralize mass mentions in user-controlled text before echoing it back.
pub fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Format a progress line (e.g. "41% complete (5/12)").
pub fn format_progress_line(progress: &BatchProgress) -> String {
    format!(
        "{}% complete ({}/{})",
        progress.percent(),
        progress.processed,
        progress.total
    )
}

pub fn format_tally(progress: &BatchProgress) -> String {
    format!(
        "✅ Success: {}\n⏭️ Skipped: {}\n❌ Failed: {}",
        progress.succeeded, progress.skipped, progress.failed
    )
}

/// Render the first `limit` outcome lines, summarizing the rest.
pub fn format_outcome_lines(outcomes: &[ItemOutcome], limit: usize) -> String {
    let mut lines = outcomes
        .iter()
        .take(limit)
        .map(|outcome| format!("• {}", outcome.message))
        .collect::<Vec<_>>();

    if outcomes.len() > limit {
        lines.push(format!("... and {} more", outcomes.len() - limit));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{
        format_outcome_lines, format_progress_line, format_tally, truncate_chars, truncate_nickname,
    };
    use crate::batch::{BatchProgress, ItemOutcome};

    #[test]
    fn nicknames_are_cut_at_32_characters() {
        let long = "a".repeat(40);
        assert_eq!(truncate_nickname(&long).chars().count(), 32);
        assert_eq!(truncate_nickname("  アリス  "), "アリス");
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        assert_eq!(truncate_chars("さくらさくら", 3), "さくら");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn progress_lines() {
        let mut progress = BatchProgress::new(12);
        progress.processed = 5;
        progress.succeeded = 3;
        progress.skipped = 1;
        progress.failed = 1;

        assert_eq!(format_progress_line(&progress), "41% complete (5/12)");
        assert_eq!(
            format_tally(&progress),
            "✅ Success: 3\n⏭️ Skipped: 1\n❌ Failed: 1"
        );
    }

    #[test]
    fn outcome_lines_are_capped() {
        let outcomes = (0..4)
            .map(|i| ItemOutcome::success(format!("Changed {i}")))
            .collect::<Vec<_>>();

        assert_eq!(
            format_outcome_lines(&outcomes, 2),
            "• Changed 0\n• Changed 1\n... and 2 more"
        );
        assert_eq!(format_outcome_lines(&outcomes[..1], 2), "• Changed 0");
    }
}
