/// Per-guild translation settings. `None` means the deployment default applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuildTranslationConfig {
    pub language: Option<String>,
    pub auto_translate: Option<bool>,
    pub welcome_channel_id: Option<u64>,
    pub goodbye_channel_id: Option<u64>,
}

impl GuildTranslationConfig {
    pub fn language_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.language.as_deref().unwrap_or(default)
    }

    pub fn auto_translate_or(&self, default: bool) -> bool {
        self.auto_translate.unwrap_or(default)
    }

    pub fn channel_for(&self, kind: GreetingChannel) -> Option<u64> {
        match kind {
            GreetingChannel::Welcome => self.welcome_channel_id,
            GreetingChannel::Goodbye => self.goodbye_channel_id,
        }
    }
}

/// Which member announcement a channel setting controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GreetingChannel {
    Welcome,
    Goodbye,
}

impl GreetingChannel {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Welcome => "welcome_channel_id",
            Self::Goodbye => "goodbye_channel_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Goodbye => "Goodbye",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GreetingChannel, GuildTranslationConfig};

    #[test]
    fn missing_values_use_defaults() {
        let config = GuildTranslationConfig::default();
        assert_eq!(config.language_or("Japanese"), "Japanese");
        assert!(config.auto_translate_or(true));

        let config = GuildTranslationConfig {
            language: Some("Korean".into()),
            auto_translate: Some(false),
            ..GuildTranslationConfig::default()
        };
        assert_eq!(config.language_or("Japanese"), "Korean");
        assert!(!config.auto_translate_or(true));
    }

    #[test]
    fn channels_are_looked_up_by_kind() {
        let config = GuildTranslationConfig {
            welcome_channel_id: Some(1),
            goodbye_channel_id: Some(2),
            ..GuildTranslationConfig::default()
        };
        assert_eq!(config.channel_for(GreetingChannel::Welcome), Some(1));
        assert_eq!(config.channel_for(GreetingChannel::Goodbye), Some(2));
        assert_eq!(GreetingChannel::Goodbye.column(), "goodbye_channel_id");
    }
}
