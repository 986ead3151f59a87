/// Per-guild chatbot settings. An unset `enabled` defers to the deployment default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuildChatbotConfig {
    pub enabled: Option<bool>,
    pub channel_ids: Vec<u64>,
}

impl GuildChatbotConfig {
    pub fn enabled_or(&self, default: bool) -> bool {
        self.enabled.unwrap_or(default)
    }

    pub fn is_chat_channel(&self, channel_id: u64) -> bool {
        self.channel_ids.contains(&channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::GuildChatbotConfig;

    #[test]
    fn channel_membership_and_default() {
        let config = GuildChatbotConfig {
            enabled: None,
            channel_ids: vec![10, 20],
        };

        assert!(config.enabled_or(true));
        assert!(!config.enabled_or(false));
        assert!(config.is_chat_channel(20));
        assert!(!config.is_chat_channel(30));
    }
}
