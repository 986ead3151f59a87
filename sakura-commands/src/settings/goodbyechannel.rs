use crate::CommandMeta;
use crate::settings::welcomechannel::run_greeting_channel;
use sakura_core::{Context, Error};
use sakura_database::GreetingChannel;

pub const META: CommandMeta = CommandMeta {
    name: "goodbyechannel",
    desc: "Set or view the channel where departing members get a farewell.",
    category: "settings",
    usage: "!goodbyechannel [#channel|channel_id|clear]",
};

#[poise::command(prefix_command, slash_command, category = "Settings")]
pub async fn goodbyechannel(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    run_greeting_channel(ctx, GreetingChannel::Goodbye, input.as_deref()).await
}
