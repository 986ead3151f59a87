use poise::serenity_prelude as serenity;

use sakura_utils::batch::{BatchReport, BatchState};
use sakura_utils::embed::{
    DEFAULT_EMBED_COLOR, SUCCESS_EMBED_COLOR, WARNING_EMBED_COLOR, requested_by_footer,
};
use sakura_utils::formatting::{format_outcome_lines, format_progress_line, format_tally};

/// Maximum per-member lines listed in a bulk summary.
const SUMMARY_LINE_LIMIT: usize = 15;

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn missing_permission_message(permission: &str) -> String {
    format!("You need the **{permission}** permission to use this command.")
}

pub fn higher_role_message(mention: &str) -> String {
    format!("I can't change {mention}'s nickname because their role is higher than mine.")
}

pub fn job_running_message() -> &'static str {
    "A bulk nickname job is already running in this server. Use `!batchcancel` to stop it."
}

pub fn bulk_confirmation_embed(action: &str, member_count: usize) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title("Confirm bulk nickname change")
        .description(format!(
            "This will {action} for **{member_count}** members.\nDo you want to continue?"
        ))
        .color(WARNING_EMBED_COLOR)
}

pub fn bulk_progress_embed(title: &str, progress_line: &str, tally: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(format!("{progress_line}\n\n{tally}"))
        .color(DEFAULT_EMBED_COLOR)
}

pub fn bulk_summary_embed(
    title: &str,
    report: &BatchReport,
    author: &serenity::User,
) -> serenity::CreateEmbed {
    let color = match report.progress.state {
        BatchState::Cancelled => WARNING_EMBED_COLOR,
        _ if report.progress.failed > 0 => WARNING_EMBED_COLOR,
        _ => SUCCESS_EMBED_COLOR,
    };

    serenity::CreateEmbed::new()
        .title(summary_title(title, report.progress.state))
        .description(summary_description(report))
        .color(color)
        .footer(requested_by_footer(author))
}

fn summary_title(title: &str, state: BatchState) -> String {
    match state {
        BatchState::Cancelled => format!("{title} (cancelled)"),
        _ => title.to_owned(),
    }
}

fn summary_description(report: &BatchReport) -> String {
    let mut description = format!(
        "{}\n\n{}",
        format_progress_line(&report.progress),
        format_tally(&report.progress)
    );

    if !report.outcomes.is_empty() {
        description.push_str("\n\n");
        description.push_str(&format_outcome_lines(&report.outcomes, SUMMARY_LINE_LIMIT));
    }

    description
}

#[cfg(test)]
mod tests {
    use sakura_utils::batch::{BatchProgress, BatchReport, BatchState, ItemOutcome};

    use super::{summary_description, summary_title};

    #[test]
    fn summary_lists_tally_and_outcomes() {
        let mut progress = BatchProgress::new(2);
        progress.processed = 2;
        progress.succeeded = 1;
        progress.skipped = 1;
        progress.state = BatchState::Finished;
        let report = BatchReport {
            progress,
            outcomes: vec![
                ItemOutcome::success("Changed Alice → アリス"),
                ItemOutcome::skipped("No translation needed for さくら"),
            ],
        };

        let description = summary_description(&report);
        assert!(description.starts_with("100% complete (2/2)"));
        assert!(description.contains("✅ Success: 1"));
        assert!(description.contains("• Changed Alice → アリス"));
    }

    #[test]
    fn cancelled_jobs_are_labelled() {
        assert_eq!(
            summary_title("Nickname translation", BatchState::Cancelled),
            "Nickname translation (cancelled)"
        );
        assert_eq!(
            summary_title("Nickname translation", BatchState::Finished),
            "Nickname translation"
        );
    }
}
