use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use sakura_core::Data;
use sakura_database::impls::chatbot_config::get_chatbot_config;
use sakura_database::impls::llm_chat::{
    insert_llm_chat_message, list_recent_llm_chat_messages, prune_llm_chat_history,
};
use sakura_database::{ChatHistoryRole, LlmChatEntry};
use sakura_llm::prompt::{ChatSpeaker, ChatTurn, chat_reply_request};
use sakura_utils::COMMAND_PREFIX;

/// Discord rejects messages over 2000 characters.
const MAX_REPLY_CHARS: usize = 1900;

const THINKING_FALLBACK: &str =
    "I'm having trouble thinking right now. Can you try again in a moment?";

pub async fn handle_message(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    if message.author.bot || !data.translator.has_client() {
        return;
    }
    let Some(guild_id) = message.guild_id else {
        return;
    };
    let content = message.content.trim();
    if content.is_empty() || content.starts_with(COMMAND_PREFIX) {
        return;
    }

    let bot_id = ctx.cache.current_user().id;
    let mentioned = message.mentions_user_id(bot_id);

    let config = match get_chatbot_config(&data.db, guild_id.get()).await {
        Ok(config) => config,
        Err(source) => {
            error!(?source, guild_id = guild_id.get(), "failed to load chatbot config");
            return;
        }
    };
    let enabled = config.enabled_or(data.chatbot.default_enabled);
    if !should_respond(
        enabled,
        mentioned,
        config.is_chat_channel(message.channel_id.get()),
    ) {
        return;
    }

    let prompt = strip_bot_mention(content, bot_id.get());
    if prompt.is_empty() {
        return;
    }

    let speaker_name = message
        .member
        .as_ref()
        .and_then(|member| member.nick.clone())
        .unwrap_or_else(|| message.author.display_name().to_owned());
    let member_roles = message
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();
    let top_role = top_role_name(ctx, guild_id, &member_roles);

    let channel_id = message.channel_id;
    let history = match list_recent_llm_chat_messages(
        &data.db,
        guild_id.get(),
        channel_id.get(),
        history_limit(data.chatbot.stored_turns()),
    )
    .await
    {
        Ok(history) => history,
        Err(source) => {
            warn!(?source, channel_id = channel_id.get(), "failed to load chat history");
            Vec::new()
        }
    };
    let turns = history_turns(&history);

    let request = chat_reply_request(
        &data.chatbot.bot_name,
        ChatSpeaker {
            user_id: message.author.id.get(),
            name: &speaker_name,
            top_role: top_role.as_deref(),
        },
        &turns,
        &prompt,
        data.chatbot.max_tokens,
    );

    let typing = channel_id.start_typing(&ctx.http);
    let reply = data.translator.generate(&request).await;
    typing.stop();

    let Some(reply) = reply.filter(|reply| !reply.trim().is_empty()) else {
        warn!(channel_id = channel_id.get(), "chatbot reply unavailable");
        if let Err(source) = message.reply(ctx, THINKING_FALLBACK).await {
            error!(?source, "failed to send chatbot fallback");
        }
        return;
    };

    let mut chunks = split_reply(&reply, MAX_REPLY_CHARS).into_iter();
    if let Some(first) = chunks.next() {
        if let Err(source) = message.reply(ctx, first).await {
            error!(?source, channel_id = channel_id.get(), "failed to send chatbot reply");
            return;
        }
    }
    for chunk in chunks {
        if let Err(source) = channel_id.say(&ctx.http, chunk).await {
            error!(?source, channel_id = channel_id.get(), "failed to send chatbot reply");
            return;
        }
    }

    info!(
        guild_id = guild_id.get(),
        channel_id = channel_id.get(),
        user_id = message.author.id.get(),
        "chatbot replied"
    );

    let stored = remember_exchange(
        data,
        guild_id.get(),
        channel_id.get(),
        (message.author.id.get(), speaker_name.as_str()),
        &prompt,
        bot_id.get(),
        &reply,
    )
    .await;
    match stored {
        Ok(pruned) if pruned > 0 => {
            debug!(channel_id = channel_id.get(), pruned, "pruned chat history");
        }
        Ok(_) => {}
        Err(source) => {
            error!(?source, channel_id = channel_id.get(), "failed to store chat history");
        }
    }
}

/// Store the user turn and the reply, then trim the channel back to its limit.
async fn remember_exchange(
    data: &Data,
    guild_id: u64,
    channel_id: u64,
    (user_id, user_name): (u64, &str),
    prompt: &str,
    bot_id: u64,
    reply: &str,
) -> anyhow::Result<u64> {
    insert_llm_chat_message(
        &data.db,
        guild_id,
        channel_id,
        user_id,
        Some(user_name),
        ChatHistoryRole::User,
        prompt,
    )
    .await?;
    insert_llm_chat_message(
        &data.db,
        guild_id,
        channel_id,
        bot_id,
        Some(data.chatbot.bot_name.as_str()),
        ChatHistoryRole::Assistant,
        reply,
    )
    .await?;
    prune_llm_chat_history(
        &data.db,
        guild_id,
        channel_id,
        history_limit(data.chatbot.stored_turns()),
    )
    .await
}

/// A disabled guild gets no replies, even to mentions.
fn should_respond(enabled: bool, mentioned: bool, in_chat_channel: bool) -> bool {
    enabled && (mentioned || in_chat_channel)
}

fn strip_bot_mention(content: &str, bot_id: u64) -> String {
    content
        .replace(&format!("<@!{bot_id}>"), "")
        .replace(&format!("<@{bot_id}>"), "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn history_limit(turns: usize) -> u32 {
    u32::try_from(turns).unwrap_or(u32::MAX)
}

/// Stored history arrives newest first; prompts want it oldest first.
fn history_turns(history: &[LlmChatEntry]) -> Vec<ChatTurn<'_>> {
    history
        .iter()
        .rev()
        .map(|entry| match entry.role {
            ChatHistoryRole::User => ChatTurn::User {
                user_id: entry.user_id,
                name: entry.display_name.as_deref(),
                content: &entry.content,
            },
            ChatHistoryRole::Assistant => ChatTurn::Assistant {
                content: &entry.content,
            },
        })
        .collect()
}

fn top_role_name(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    member_roles: &[serenity::RoleId],
) -> Option<String> {
    let guild = ctx.cache.guild(guild_id)?;
    member_roles
        .iter()
        .filter_map(|role_id| guild.roles.get(role_id))
        .max_by_key(|role| role.position)
        .map(|role| role.name.clone())
}

/// Split a reply into chunks of at most `max_chars`, preferring line then word breaks.
fn split_reply(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while rest.chars().count() > max_chars {
        let hard_cut = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(index, _)| index);
        let window = &rest[..hard_cut];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .filter(|&index| index > 0)
            .unwrap_or(hard_cut);

        chunks.push(rest[..cut].trim_end().to_owned());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        chunks.push(rest.to_owned());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use sakura_database::{ChatHistoryRole, LlmChatEntry};
    use sakura_llm::prompt::ChatTurn;

    use super::{history_turns, should_respond, split_reply, strip_bot_mention};

    #[test]
    fn responds_to_mentions_and_chat_channels_only_when_enabled() {
        assert!(should_respond(true, true, false));
        assert!(should_respond(true, false, true));
        assert!(!should_respond(true, false, false));
        assert!(!should_respond(false, true, true));
    }

    #[test]
    fn strips_both_mention_forms() {
        assert_eq!(strip_bot_mention("<@42> hello there", 42), "hello there");
        assert_eq!(strip_bot_mention("hey <@!42>,  you", 42), "hey , you");
        assert_eq!(strip_bot_mention("<@43> hi", 42), "<@43> hi");
        assert_eq!(strip_bot_mention("<@42>", 42), "");
    }

    #[test]
    fn history_is_replayed_oldest_first() {
        let entry = |role, content: &str, created_at| LlmChatEntry {
            user_id: 1,
            display_name: Some("mika".to_owned()),
            role,
            content: content.to_owned(),
            created_at,
        };
        let newest_first = vec![
            entry(ChatHistoryRole::Assistant, "hi mika", 2),
            entry(ChatHistoryRole::User, "hello", 1),
        ];

        assert_eq!(
            history_turns(&newest_first),
            vec![
                ChatTurn::User {
                    user_id: 1,
                    name: Some("mika"),
                    content: "hello",
                },
                ChatTurn::Assistant { content: "hi mika" },
            ]
        );
    }

    #[test]
    fn long_replies_split_on_word_boundaries() {
        let chunks = split_reply("alpha beta gamma delta", 11);
        assert_eq!(chunks, vec!["alpha beta", "gamma delta"]);
        assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 11));

        assert_eq!(split_reply("short", 11), vec!["short"]);
        assert_eq!(split_reply("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(split_reply("one\ntwo three", 9), vec!["one", "two three"]);
    }
}
