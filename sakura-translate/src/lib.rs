pub mod cache;
pub mod config;
pub mod language;
pub mod romanize;
pub mod script;
pub mod throttle;
pub mod translator;

pub use cache::TranslationCache;
pub use config::TranslatorConfig;
pub use language::Language;
pub use throttle::{Admission, RequestThrottle, ThrottleConfig, ThrottlePolicy};
pub use translator::{Translation, TranslationSource, Translator};
