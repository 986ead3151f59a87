use sakura_utils::env::{env_bool, env_string, env_u64, env_usize};

const DEFAULT_MAX_HISTORY: usize = 10;
const DEFAULT_MAX_TOKENS: u32 = 256;

/// Deployment-wide chatbot settings; guilds can still toggle it per server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatbotOptions {
    /// Used when a guild has never run `chatbot enable` or `chatbot disable`.
    pub default_enabled: bool,
    /// Exchanges kept per channel. Each exchange is a user turn and a reply.
    pub max_history: usize,
    pub bot_name: String,
    pub max_tokens: u32,
}

impl Default for ChatbotOptions {
    fn default() -> Self {
        Self {
            default_enabled: true,
            max_history: DEFAULT_MAX_HISTORY,
            bot_name: "Sakura".to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ChatbotOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_enabled: env_bool("FEATURE_CHATBOT", defaults.default_enabled),
            max_history: env_usize("CHATBOT_MAX_HISTORY", defaults.max_history).max(1),
            bot_name: env_string("CHATBOT_NAME").unwrap_or(defaults.bot_name),
            max_tokens: u32::try_from(env_u64(
                "CHATBOT_MAX_TOKENS",
                u64::from(defaults.max_tokens),
            ))
            .unwrap_or(defaults.max_tokens)
            .max(1),
        }
    }

    /// Rows stored per channel before pruning.
    pub fn stored_turns(&self) -> usize {
        self.max_history.saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::ChatbotOptions;

    #[test]
    fn stores_two_rows_per_exchange() {
        let options = ChatbotOptions {
            max_history: 4,
            ..ChatbotOptions::default()
        };
        assert_eq!(options.stored_turns(), 8);
    }
}
