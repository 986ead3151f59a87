use crate::message::{ChatMessage, ChatRequest};

/// Prompt for translating a display name into `language`.
pub fn name_translation_request(name: &str, language: &str) -> ChatRequest {
    ChatRequest::new(
        vec![
            ChatMessage::system(format!(
                "You are a translator that specializes in converting names to {language}. \
                 If the name has a common {language} equivalent, use it; otherwise write a \
                 phonetic rendering that sounds similar in {language}. \
                 Respond with ONLY the translated name."
            )),
            ChatMessage::user(format!("Translate this name to {language}: {name}")),
        ],
        50,
    )
    .temperature(0.2)
}

/// Prompt for translating free text into `language`.
pub fn text_translation_request(text: &str, language: &str) -> ChatRequest {
    ChatRequest::new(
        vec![
            ChatMessage::system(format!(
                "You are a translator. Translate the user's message into {language}. \
                 Output only the translation, nothing else."
            )),
            ChatMessage::user(text.to_owned()),
        ],
        1024,
    )
    .temperature(0.2)
}

/// Prompt for a short greeting posted when someone joins a server.
pub fn welcome_request(
    member_name: &str,
    guild_name: &str,
    translated_name: Option<(&str, &str)>,
) -> ChatRequest {
    let name_info = match translated_name {
        Some((name, language)) => {
            format!(" Their name has been translated to {language} as '{name}'.")
        }
        None => String::new(),
    };

    ChatRequest::new(
        vec![ChatMessage::user(format!(
            "Generate a friendly, warm welcome message for a new Discord user named \
             {member_name} who just joined the server {guild_name}.{name_info} \
             The message should be 2-3 sentences, conversational, and welcoming. \
             Don't use hashtags or emojis, and write only in English."
        ))],
        150,
    )
    .temperature(0.7)
}

/// Prompt for a short farewell posted when someone leaves a server.
pub fn goodbye_request(member_name: &str, guild_name: &str, language: &str) -> ChatRequest {
    ChatRequest::new(
        vec![ChatMessage::user(format!(
            "Generate a brief, thoughtful goodbye message for a Discord user named \
             {member_name} who just left the server {guild_name}. \
             The message should be 1-2 sentences, respectful, and wishing them well. \
             Don't use hashtags or emojis, and write only in English. \
             The server's primary language is {language}."
        ))],
        150,
    )
    .temperature(0.7)
}

/// The member the chatbot is replying to.
#[derive(Clone, Copy, Debug)]
pub struct ChatSpeaker<'a> {
    pub user_id: u64,
    pub name: &'a str,
    pub top_role: Option<&'a str>,
}

/// A stored turn of channel conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatTurn<'a> {
    User {
        user_id: u64,
        name: Option<&'a str>,
        content: &'a str,
    },
    Assistant {
        content: &'a str,
    },
}

/// Prompt for a chatbot reply. `history` is oldest first and excludes `latest`.
pub fn chat_reply_request(
    bot_name: &str,
    speaker: ChatSpeaker<'_>,
    history: &[ChatTurn<'_>],
    latest: &str,
    max_tokens: u32,
) -> ChatRequest {
    let top_role = speaker.top_role.unwrap_or("None");
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(format!(
        "You are {bot_name}, a friendly and helpful Discord bot chatting in a server with \
         multiple users.\n\n\
         The latest message is from user {id} ({name}), whose top role is {top_role}.\n\n\
         Keep responses concise and friendly: 1-3 sentences unless a longer explanation is \
         needed, and always under 1,800 characters. Use Discord markdown where it helps. \
         Reply in English unless asked otherwise. Users may change display names, so track \
         them by their numeric ID.",
        id = speaker.user_id,
        name = single_line(Some(speaker.name)),
    )));

    for turn in history {
        messages.push(match *turn {
            ChatTurn::User {
                user_id,
                name,
                content,
            } => ChatMessage::user(user_line(user_id, name, content)),
            ChatTurn::Assistant { content } => ChatMessage::assistant(content),
        });
    }

    messages.push(ChatMessage::user(user_line(
        speaker.user_id,
        Some(speaker.name),
        latest,
    )));

    ChatRequest::new(messages, max_tokens).temperature(0.75)
}

fn user_line(user_id: u64, name: Option<&str>, content: &str) -> String {
    format!("[User {user_id} ({})]: {content}", single_line(name))
}

fn single_line(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.replace('\n', " "))
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::{
        ChatSpeaker, ChatTurn, chat_reply_request, goodbye_request, name_translation_request,
        welcome_request,
    };
    use crate::message::ChatRole;

    #[test]
    fn name_prompt_is_system_then_user() {
        let request = name_translation_request("Alice", "Japanese");
        let roles = request.messages.iter().map(|m| m.role).collect::<Vec<_>>();
        assert_eq!(roles, vec![ChatRole::System, ChatRole::User]);
        assert!(request.messages[1].content.ends_with("Japanese: Alice"));
        assert_eq!(request.max_tokens, 50);
    }

    #[test]
    fn welcome_prompt_mentions_translation_only_when_present() {
        let with = welcome_request("alice", "Sakura", Some(("アリス", "Japanese")));
        assert!(with.messages[0].content.contains("'アリス'"));

        let without = welcome_request("alice", "Sakura", None);
        assert!(!without.messages[0].content.contains("translated"));
    }

    #[test]
    fn goodbye_prompt_names_member_and_language() {
        let request = goodbye_request("ken", "Sakura", "Korean");
        assert!(request.messages[0].content.contains("named ken"));
        assert!(request.messages[0].content.contains("language is Korean"));
        assert_eq!(request.max_tokens, 150);
    }

    #[test]
    fn chat_prompt_replays_history_before_latest_message() {
        let speaker = ChatSpeaker {
            user_id: 7,
            name: "mika\nchan",
            top_role: Some("Regulars"),
        };
        let history = [
            ChatTurn::User {
                user_id: 9,
                name: None,
                content: "hi bot",
            },
            ChatTurn::Assistant { content: "hello!" },
        ];

        let request = chat_reply_request("Sakura", speaker, &history, "how are you?", 200);
        let roles = request.messages.iter().map(|m| m.role).collect::<Vec<_>>();

        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert!(request.messages[0].content.starts_with("You are Sakura"));
        assert!(request.messages[0].content.contains("top role is Regulars"));
        assert_eq!(request.messages[1].content, "[User 9 (unknown)]: hi bot");
        assert_eq!(request.messages[2].content, "hello!");
        assert_eq!(request.messages[3].content, "[User 7 (mika chan)]: how are you?");
        assert_eq!(request.max_tokens, 200);
    }
}
