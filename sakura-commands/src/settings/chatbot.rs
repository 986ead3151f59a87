use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, missing_permission_message, usage_message};
use sakura_core::{Context, Error};
use sakura_database::impls::chatbot_config::{
    add_chatbot_channel, get_chatbot_config, remove_chatbot_channel, set_chatbot_enabled,
};
use sakura_database::impls::llm_chat::clear_llm_chat_history;
use sakura_utils::embed::DEFAULT_EMBED_COLOR;
use sakura_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "chatbot",
    desc: "Control the chatbot: enable, disable, status, clear, addchannel, removechannel.",
    category: "settings",
    usage: "!chatbot <enable|disable|status|clear|addchannel|removechannel>",
};

const VALID_ACTIONS: &str = "enable, disable, status, clear, addchannel, removechannel";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChatbotAction {
    Enable,
    Disable,
    Status,
    Clear,
    AddChannel,
    RemoveChannel,
}

impl ChatbotAction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            "status" => Some(Self::Status),
            "clear" => Some(Self::Clear),
            "addchannel" => Some(Self::AddChannel),
            "removechannel" => Some(Self::RemoveChannel),
            _ => None,
        }
    }
}

#[poise::command(prefix_command, slash_command, category = "Settings")]
pub async fn chatbot(
    ctx: Context<'_>,
    #[description = "enable, disable, status, clear, addchannel, or removechannel"]
    action: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::ADMINISTRATOR,
    )
    .await?
    {
        ctx.say(missing_permission_message("Administrator")).await?;
        return Ok(());
    }

    let Some(raw_action) = action.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(action) = ChatbotAction::parse(raw_action) else {
        ctx.say(format!(
            "Unknown action: {raw_action}\nValid actions are: {VALID_ACTIONS}"
        ))
        .await?;
        return Ok(());
    };

    let data = ctx.data();
    let channel_id = ctx.channel_id();

    match action {
        ChatbotAction::Enable | ChatbotAction::Disable => {
            let enabled = action == ChatbotAction::Enable;
            set_chatbot_enabled(&data.db, guild_id.get(), enabled).await?;
            info!(
                guild_id = guild_id.get(),
                user_id = ctx.author().id.get(),
                enabled,
                "chatbot toggled"
            );
            ctx.say(format!(
                "Chatbot has been {}.",
                if enabled { "enabled" } else { "disabled" }
            ))
            .await?;
        }
        ChatbotAction::Status => {
            let config = get_chatbot_config(&data.db, guild_id.get()).await?;
            let status = if config.enabled_or(data.chatbot.default_enabled) {
                "Enabled"
            } else {
                "Disabled"
            };
            let channels = if config.channel_ids.is_empty() {
                "None (mentions only)".to_owned()
            } else {
                config
                    .channel_ids
                    .iter()
                    .map(|id| format!("<#{id}>"))
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            let embed = serenity::CreateEmbed::new()
                .title("Chatbot Status")
                .description("Current chatbot configuration")
                .color(DEFAULT_EMBED_COLOR)
                .field("Status", status, true)
                .field("Max History", data.chatbot.max_history.to_string(), true)
                .field("Max Tokens", data.chatbot.max_tokens.to_string(), true)
                .field("Active Channels", channels, false);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        ChatbotAction::Clear => {
            let removed = clear_llm_chat_history(&data.db, guild_id.get(), channel_id.get()).await?;
            if removed > 0 {
                ctx.say("Conversation history has been cleared for this channel.")
                    .await?;
            } else {
                ctx.say("There's no conversation history to clear in this channel.")
                    .await?;
            }
        }
        ChatbotAction::AddChannel => {
            if add_chatbot_channel(&data.db, guild_id.get(), channel_id.get()).await? {
                ctx.say(format!("Added <#{channel_id}> to chatbot channels."))
                    .await?;
            } else {
                ctx.say(format!("<#{channel_id}> is already a chatbot channel."))
                    .await?;
            }
        }
        ChatbotAction::RemoveChannel => {
            if remove_chatbot_channel(&data.db, guild_id.get(), channel_id.get()).await? {
                ctx.say(format!("Removed <#{channel_id}> from chatbot channels."))
                    .await?;
            } else {
                ctx.say(format!("<#{channel_id}> is not a chatbot channel."))
                    .await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ChatbotAction;

    #[test]
    fn parses_actions_case_insensitively() {
        assert_eq!(ChatbotAction::parse("Enable"), Some(ChatbotAction::Enable));
        assert_eq!(ChatbotAction::parse(" status "), Some(ChatbotAction::Status));
        assert_eq!(
            ChatbotAction::parse("ADDCHANNEL"),
            Some(ChatbotAction::AddChannel)
        );
        assert_eq!(ChatbotAction::parse("diagnostics"), None);
    }
}
