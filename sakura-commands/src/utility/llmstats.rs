use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::utility::embeds::relative_time;
use sakura_core::{Context, Error};
use sakura_utils::embed::DEFAULT_EMBED_COLOR;
use sakura_utils::formatting::truncate_chars;

pub const META: CommandMeta = CommandMeta {
    name: "llmstats",
    desc: "Show translation service usage statistics.",
    category: "utility",
    usage: "!llmstats",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn llmstats(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let cache = data.translator.cache();
    let cache_line = format!("{}/{} entries", cache.len(), cache.capacity());

    let Some(llm) = data.llm.as_ref() else {
        let embed = serenity::CreateEmbed::new()
            .title("LLM Statistics")
            .description("LLM integration is disabled; translations use the local fallback.")
            .field("Translation cache", cache_line, false)
            .color(DEFAULT_EMBED_COLOR);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    };

    let stats = llm.stats();
    let last_request = stats
        .last_request_unix
        .map(relative_time)
        .unwrap_or_else(|| "never".to_owned());
    let last_error = stats
        .last_error
        .as_deref()
        .map(|error| format!("`{}`", truncate_chars(error, 200)))
        .unwrap_or_else(|| "none".to_owned());

    let embed = serenity::CreateEmbed::new()
        .title("LLM Statistics")
        .color(DEFAULT_EMBED_COLOR)
        .field(
            "Provider",
            format!("{} (`{}`)", llm.provider().as_str(), llm.model()),
            false,
        )
        .field("Total requests", stats.total.to_string(), true)
        .field("Successful", stats.succeeded.to_string(), true)
        .field("Failed", stats.failed.to_string(), true)
        .field("Success rate", format!("{:.1}%", stats.success_rate()), true)
        .field("Last request", last_request, true)
        .field("Translation cache", cache_line, true)
        .field("Last error", last_error, false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
