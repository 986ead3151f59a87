use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::bulk::run_member_batch;
use crate::nickname::embeds::{
    bulk_confirmation_embed, guild_only_message, job_running_message, missing_permission_message,
};
use crate::nickname::members::{fetch_all_members, reset_member};
use sakura_core::{Context, Error};
use sakura_utils::confirmation::{CONFIRMATION_TIMEOUT, Confirmation, confirm_bulk_action};
use sakura_utils::permissions::{RoleHierarchy, has_user_permission};

pub const META: CommandMeta = CommandMeta {
    name: "resetall",
    desc: "Reset every member's nickname in the server.",
    category: "nickname",
    usage: "!resetall",
};

#[poise::command(prefix_command, slash_command, category = "Nickname", guild_cooldown = 30)]
pub async fn resetall(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::ADMINISTRATOR,
    )
    .await?
    {
        ctx.say(missing_permission_message("Administrator")).await?;
        return Ok(());
    }

    let data = ctx.data();
    let Some(guard) = data.batch_jobs.start(guild_id.get()) else {
        ctx.say(job_running_message()).await?;
        return Ok(());
    };

    let members = fetch_all_members(ctx.http(), guild_id)
        .await?
        .into_iter()
        .filter(|member| !member.user.bot && member.nick.is_some())
        .collect::<Vec<_>>();

    if members.is_empty() {
        ctx.say("Nobody in this server has a nickname to reset.")
            .await?;
        return Ok(());
    }

    let prompt = bulk_confirmation_embed("reset nicknames", members.len());
    let Confirmation::Confirmed(message) =
        confirm_bulk_action(ctx, prompt, CONFIRMATION_TIMEOUT).await?
    else {
        return Ok(());
    };

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    let http = ctx.http();
    let hierarchy = &hierarchy;

    run_member_batch(
        ctx,
        &guard,
        message,
        members,
        &data.batch,
        "Nickname reset",
        move |member| async move { reset_member(http, hierarchy, guild_id, &member).await },
    )
    .await
}
