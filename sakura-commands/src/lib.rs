pub mod nickname;
pub mod settings;
pub mod utility;

use sakura_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    utility::usage::META,
    utility::llmstats::META,
    nickname::translatename::META,
    nickname::translatetext::META,
    nickname::translateall::META,
    nickname::translaterole::META,
    nickname::resetname::META,
    nickname::resetall::META,
    nickname::randomname::META,
    nickname::batchcancel::META,
    settings::language::META,
    settings::autotranslate::META,
    settings::welcomechannel::META,
    settings::goodbyechannel::META,
    settings::chatbot::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        utility::usage::usage(),
        utility::llmstats::llmstats(),
        nickname::translatename::translatename(),
        nickname::translatetext::translatetext(),
        nickname::translateall::translateall(),
        nickname::translaterole::translaterole(),
        nickname::resetname::resetname(),
        nickname::resetall::resetall(),
        nickname::randomname::randomname(),
        nickname::batchcancel::batchcancel(),
        settings::language::language(),
        settings::autotranslate::autotranslate(),
        settings::welcomechannel::welcomechannel(),
        settings::goodbyechannel::goodbyechannel(),
        settings::chatbot::chatbot(),
    ]
}
