pub mod autotranslate;
pub mod chatbot;
pub mod goodbyechannel;
pub mod language;
pub mod welcomechannel;
