use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, missing_permission_message};
use sakura_core::{Context, Error};
use sakura_database::GreetingChannel;
use sakura_database::impls::translation_config::{
    clear_greeting_channel_id, get_translation_config, set_greeting_channel_id,
};
use sakura_utils::parse::parse_channel_id;
use sakura_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "welcomechannel",
    desc: "Set or view the channel where new members are greeted.",
    category: "settings",
    usage: "!welcomechannel [#channel|channel_id|clear]",
};

#[poise::command(prefix_command, slash_command, category = "Settings")]
pub async fn welcomechannel(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    run_greeting_channel(ctx, GreetingChannel::Welcome, input.as_deref()).await
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ChannelAction {
    Show,
    Clear,
    Set(u64),
    Invalid,
}

pub(crate) fn parse_channel_action(input: Option<&str>) -> ChannelAction {
    match input.map(str::trim).filter(|entry| !entry.is_empty()) {
        None => ChannelAction::Show,
        Some(entry) if entry.eq_ignore_ascii_case("clear") => ChannelAction::Clear,
        Some(entry) => parse_channel_id(entry).map_or(ChannelAction::Invalid, ChannelAction::Set),
    }
}

/// Shared body of `welcomechannel` and `goodbyechannel`.
pub(crate) async fn run_greeting_channel(
    ctx: Context<'_>,
    kind: GreetingChannel,
    input: Option<&str>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_GUILD,
    )
    .await?
    {
        ctx.say(missing_permission_message("Manage Server")).await?;
        return Ok(());
    }

    let db = &ctx.data().db;
    let label = kind.label();

    match parse_channel_action(input) {
        ChannelAction::Clear => {
            clear_greeting_channel_id(db, guild_id.get(), kind).await?;
            ctx.say(format!("{label} channel cleared.")).await?;
        }
        ChannelAction::Set(channel_id) => {
            set_greeting_channel_id(db, guild_id.get(), kind, channel_id).await?;
            ctx.say(format!("{label} channel set to <#{channel_id}>."))
                .await?;
        }
        ChannelAction::Invalid => {
            ctx.say("Provide a valid channel mention/id, or `clear`.")
                .await?;
        }
        ChannelAction::Show => {
            let config = get_translation_config(db, guild_id.get()).await?;
            match config.channel_for(kind) {
                Some(channel_id) => {
                    ctx.say(format!("Current {} channel: <#{channel_id}>", label.to_lowercase()))
                        .await?
                }
                None => {
                    ctx.say(format!("No {} channel configured.", label.to_lowercase()))
                        .await?
                }
            };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ChannelAction, parse_channel_action};

    #[test]
    fn parses_channel_arguments() {
        assert_eq!(parse_channel_action(None), ChannelAction::Show);
        assert_eq!(parse_channel_action(Some("  ")), ChannelAction::Show);
        assert_eq!(parse_channel_action(Some("CLEAR")), ChannelAction::Clear);
        assert_eq!(
            parse_channel_action(Some("<#123456789>")),
            ChannelAction::Set(123456789)
        );
        assert_eq!(parse_channel_action(Some("general")), ChannelAction::Invalid);
    }
}
