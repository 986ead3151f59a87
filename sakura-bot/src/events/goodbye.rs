use poise::serenity_prelude as serenity;
use rand::seq::IndexedRandom;
use tracing::{error, info, warn};

use sakura_core::Data;
use sakura_database::GreetingChannel;
use sakura_database::impls::translation_config::get_translation_config;
use sakura_llm::prompt::goodbye_request;

use crate::events::welcome::{MIN_GREETING_CHARS, guild_summary};

const GOODBYE_COLOR: u32 = 0xED4245;

pub async fn handle_member_leave(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: serenity::GuildId,
    user: &serenity::User,
    member: Option<&serenity::Member>,
) {
    if user.bot {
        return;
    }

    let config = match get_translation_config(&data.db, guild_id.get()).await {
        Ok(config) => config,
        Err(source) => {
            error!(?source, guild_id = guild_id.get(), "failed to load goodbye channel");
            return;
        }
    };
    let Some(channel_id) = config.channel_for(GreetingChannel::Goodbye) else {
        return;
    };
    let language = config
        .language_or(data.translator.default_language())
        .to_owned();

    let guild = guild_summary(ctx, guild_id);
    let farewell = farewell(data, user, &guild.name, &language).await;

    let mut embed = serenity::CreateEmbed::new()
        .title("Goodbye! 👋")
        .description(farewell)
        .color(GOODBYE_COLOR)
        .field("Member", format!("{} (<@{}>)", user.name, user.id), true);

    if let Some(joined_at) = member.and_then(|member| member.joined_at) {
        embed = embed.field(
            "Joined Server",
            format!("<t:{}:R>", joined_at.unix_timestamp()),
            true,
        );
    }

    if let Some(count) = guild.member_count {
        embed = embed.field("New Member Count", format!("{count} members"), false);
    }

    let thumbnail = user.avatar_url().or_else(|| guild.icon_url.clone());
    if let Some(url) = thumbnail {
        embed = embed.thumbnail(url);
    }

    let mut footer =
        serenity::CreateEmbedFooter::new(format!("ID: {} • {}", user.id, guild.name));
    if let Some(icon) = guild.icon_url {
        footer = footer.icon_url(icon);
    }
    embed = embed.footer(footer);

    match serenity::ChannelId::new(channel_id)
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(_) => info!(
            guild_id = guild_id.get(),
            channel_id,
            user_id = user.id.get(),
            "goodbye message sent"
        ),
        Err(source) => error!(?source, channel_id, "failed to send goodbye message"),
    }
}

async fn farewell(data: &Data, user: &serenity::User, guild_name: &str, language: &str) -> String {
    let request = goodbye_request(&user.name, guild_name, language);

    match data.translator.generate(&request).await {
        Some(text) if text.chars().count() > MIN_GREETING_CHARS => text,
        Some(_) | None => {
            warn!(user_id = user.id.get(), "using fallback goodbye message");
            fallback_farewell(&user.name)
        }
    }
}

fn fallback_farewells(name: &str) -> [String; 5] {
    [
        format!("We'll miss you, {name}! Hope to see you again soon!"),
        format!("Sorry to see you go, {name}. The door is always open if you decide to return!"),
        format!("{name} has left the server. Wishing you all the best!"),
        format!("Until we meet again, {name}! Take care!"),
        format!("Farewell, {name}! Thank you for being part of our community!"),
    ]
}

fn fallback_farewell(name: &str) -> String {
    fallback_farewells(name)
        .choose(&mut rand::rng())
        .cloned()
        .unwrap_or_else(|| format!("Goodbye, {name}!"))
}

#[cfg(test)]
mod tests {
    use super::{fallback_farewell, fallback_farewells};

    #[test]
    fn fallback_farewell_names_the_member() {
        let farewell = fallback_farewell("ken");
        assert!(farewell.contains("ken"));
        assert!(fallback_farewells("ken").contains(&farewell));
    }
}
