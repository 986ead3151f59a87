use poise::serenity_prelude as serenity;
use rand::seq::IndexedRandom;
use tracing::{error, info, warn};

use sakura_core::Data;
use sakura_llm::prompt::welcome_request;
use sakura_utils::embed::DEFAULT_EMBED_COLOR;

/// Generated greetings shorter than this are discarded.
pub(crate) const MIN_GREETING_CHARS: usize = 10;

pub(crate) struct GuildSummary {
    pub name: String,
    pub member_count: Option<u64>,
    pub icon_url: Option<String>,
}

pub async fn send_welcome(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
    channel_id: u64,
    translated_name: Option<&str>,
    language: &str,
) {
    if channel_id == 0 {
        return;
    }

    let guild = guild_summary(ctx, member.guild_id);
    let greeting = greeting(data, member, &guild.name, translated_name, language).await;

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Welcome to {}! 🎉", guild.name))
        .description(greeting)
        .color(DEFAULT_EMBED_COLOR)
        .field(
            "Member",
            format!("{} (<@{}>)", member.user.name, member.user.id),
            true,
        );

    if let Some(name) = translated_name {
        embed = embed.field(format!("{language} Name"), name, true);
    }

    embed = embed.field(
        "Account Created",
        format!("<t:{}:R>", member.user.id.created_at().unix_timestamp()),
        true,
    );

    if let Some(count) = guild.member_count {
        embed = embed.field("Member Count", format!("{count} members"), false);
    }

    let thumbnail = member.user.avatar_url().or_else(|| guild.icon_url.clone());
    if let Some(url) = thumbnail {
        embed = embed.thumbnail(url);
    }

    let mut footer = serenity::CreateEmbedFooter::new(format!(
        "ID: {} • {}",
        member.user.id, guild.name
    ));
    if let Some(icon) = guild.icon_url {
        footer = footer.icon_url(icon);
    }
    embed = embed.footer(footer);

    let message = serenity::CreateMessage::new()
        .content(format!("Welcome <@{}>!", member.user.id))
        .embed(embed);

    match serenity::ChannelId::new(channel_id)
        .send_message(&ctx.http, message)
        .await
    {
        Ok(_) => info!(
            guild_id = member.guild_id.get(),
            channel_id,
            user_id = member.user.id.get(),
            "welcome message sent"
        ),
        Err(source) => error!(?source, channel_id, "failed to send welcome message"),
    }
}

pub(crate) fn guild_summary(ctx: &serenity::Context, guild_id: serenity::GuildId) -> GuildSummary {
    match ctx.cache.guild(guild_id) {
        Some(guild) => GuildSummary {
            name: guild.name.clone(),
            member_count: Some(guild.member_count),
            icon_url: guild.icon_url(),
        },
        None => GuildSummary {
            name: "the server".to_owned(),
            member_count: None,
            icon_url: None,
        },
    }
}

async fn greeting(
    data: &Data,
    member: &serenity::Member,
    guild_name: &str,
    translated_name: Option<&str>,
    language: &str,
) -> String {
    let request = welcome_request(
        &member.user.name,
        guild_name,
        translated_name.map(|name| (name, language)),
    );

    match data.translator.generate(&request).await {
        Some(text) if text.chars().count() > MIN_GREETING_CHARS => text,
        Some(_) | None => {
            warn!(user_id = member.user.id.get(), "using fallback welcome greeting");
            fallback_greeting(&member.user.name, guild_name)
        }
    }
}

fn fallback_greetings(name: &str, guild_name: &str) -> [String; 5] {
    [
        format!("Welcome to our community, {name}! Feel free to introduce yourself!"),
        format!("So glad to have you with us, {name}! Make yourself at home!"),
        format!("A new friend has arrived! Welcome to {guild_name}, {name}!"),
        format!("The community just got better with {name} joining us!"),
        format!("Hello there, {name}! We're excited to have you join our server!"),
    ]
}

fn fallback_greeting(name: &str, guild_name: &str) -> String {
    let greetings = fallback_greetings(name, guild_name);
    greetings
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| format!("Welcome, {name}!"))
}

#[cfg(test)]
mod tests {
    use super::{fallback_greeting, fallback_greetings};

    #[test]
    fn fallback_mentions_member() {
        let greeting = fallback_greeting("mika", "Sakura");
        assert!(greeting.contains("mika"));
        assert!(fallback_greetings("mika", "Sakura").contains(&greeting));
    }
}
