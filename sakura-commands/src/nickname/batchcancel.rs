use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, missing_permission_message};
use sakura_core::{Context, Error};
use sakura_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "batchcancel",
    desc: "Stop the bulk nickname job running in this server.",
    category: "nickname",
    usage: "!batchcancel",
};

#[poise::command(prefix_command, slash_command, category = "Nickname")]
pub async fn batchcancel(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_NICKNAMES,
    )
    .await?
    {
        ctx.say(missing_permission_message("Manage Nicknames")).await?;
        return Ok(());
    }

    if ctx.data().batch_jobs.cancel(guild_id.get()) {
        ctx.say("Cancelling the running bulk job. It will stop after the current chunk.")
            .await?;
    } else {
        ctx.say("No bulk job is running in this server.").await?;
    }

    Ok(())
}
