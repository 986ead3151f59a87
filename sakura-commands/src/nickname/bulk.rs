use std::future::Future;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use sakura_core::{BatchGuard, Context, Error};
use sakura_utils::batch::{BatchOptions, BatchProgress, ItemOutcome, ProgressReporter, run_batch};
use sakura_utils::formatting::{format_progress_line, format_tally};

use crate::nickname::embeds::{bulk_progress_embed, bulk_summary_embed};

/// Edits one status message in place as a bulk job advances.
struct StatusReporter<'a> {
    http: &'a serenity::Http,
    message: &'a mut serenity::Message,
    title: &'a str,
}

#[async_trait]
impl ProgressReporter for StatusReporter<'_> {
    async fn report(&mut self, progress: &BatchProgress) {
        let embed = bulk_progress_embed(
            self.title,
            &format_progress_line(progress),
            &format_tally(progress),
        );
        let edit = serenity::EditMessage::new().content("").embed(embed);

        if let Err(source) = self.message.edit(self.http, edit).await {
            warn!(?source, "failed to update bulk progress message");
        }
    }
}

/// Run `op` over `members` under the guild's job slot, reporting into
/// `message` and finishing with a summary embed.
pub async fn run_member_batch<F, Fut>(
    ctx: Context<'_>,
    guard: &BatchGuard,
    mut message: serenity::Message,
    members: Vec<serenity::Member>,
    options: &BatchOptions,
    title: &str,
    op: F,
) -> Result<(), Error>
where
    F: FnMut(serenity::Member) -> Fut + Send,
    Fut: Future<Output = anyhow::Result<ItemOutcome>> + Send,
{
    let total = members.len();
    info!(
        guild_id = ?ctx.guild_id(),
        total,
        chunk_size = options.chunk_size,
        chunk_delay_ms = options.chunk_delay.as_millis() as u64,
        "bulk nickname job started"
    );

    let report = {
        let mut reporter = StatusReporter {
            http: ctx.http(),
            message: &mut message,
            title,
        };
        run_batch(members, options, Some(guard.token()), &mut reporter, op).await
    };

    info!(
        guild_id = ?ctx.guild_id(),
        processed = report.progress.processed,
        succeeded = report.progress.succeeded,
        skipped = report.progress.skipped,
        failed = report.progress.failed,
        state = ?report.progress.state,
        "bulk nickname job ended"
    );

    let embed = bulk_summary_embed(title, &report, ctx.author());
    message
        .edit(ctx.http(), serenity::EditMessage::new().content("").embed(embed))
        .await?;

    Ok(())
}
