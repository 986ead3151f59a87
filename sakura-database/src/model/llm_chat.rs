#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatHistoryRole {
    User,
    Assistant,
}

impl ChatHistoryRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One stored chatbot turn in a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmChatEntry {
    pub user_id: u64,
    pub display_name: Option<String>,
    pub role: ChatHistoryRole,
    pub content: String,
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::ChatHistoryRole;

    #[test]
    fn roles_round_trip_through_storage_names() {
        for role in [ChatHistoryRole::User, ChatHistoryRole::Assistant] {
            assert_eq!(ChatHistoryRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(ChatHistoryRole::parse("system"), None);
    }
}
