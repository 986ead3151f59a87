use std::borrow::Cow;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, higher_role_message, missing_permission_message};
use crate::nickname::members::reset_member;
use sakura_core::{Context, Error};
use sakura_utils::batch::ItemStatus;
use sakura_utils::permissions::{RoleHierarchy, has_user_permission};

pub const META: CommandMeta = CommandMeta {
    name: "resetname",
    desc: "Reset a member's nickname to their username.",
    category: "nickname",
    usage: "!resetname [member]",
};

#[poise::command(
    prefix_command,
    slash_command,
    category = "Nickname",
    aliases("rn"),
    user_cooldown = 3
)]
pub async fn resetname(
    ctx: Context<'_>,
    #[description = "Member to reset (defaults to you)"] member: Option<serenity::Member>,
) -> Result<(), Error> {
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

    let target = match member {
        Some(member) => member,
        None => match ctx.author_member().await {
            Some(member) => Cow::into_owned(member),
            None => {
                ctx.say("I couldn't look up your server profile.").await?;
                return Ok(());
            }
        },
    };
    let mention = format!("<@{}>", target.user.id);

    if target.nick.is_none() {
        ctx.say(format!("{mention} doesn't have a nickname to reset."))
            .await?;
        return Ok(());
    }

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    if !hierarchy.can_manage(target.user.id, &target.roles) {
        ctx.say(higher_role_message(&mention)).await?;
        return Ok(());
    }

    let outcome = reset_member(ctx.http(), &hierarchy, guild_id, &target).await?;
    let reply = match outcome.status {
        ItemStatus::Success => format!("Reset {mention}'s nickname to their original username."),
        _ => outcome.message,
    };

    ctx.say(reply).await?;
    Ok(())
}
