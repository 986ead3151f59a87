use std::borrow::Cow;

use poise::serenity_prelude as serenity;
use rand::seq::IndexedRandom;
use tracing::{error, info};

use crate::CommandMeta;
use crate::nickname::embeds::{guild_only_message, higher_role_message, missing_permission_message};
use sakura_core::{Context, Error};
use sakura_utils::formatting::truncate_nickname;
use sakura_utils::permissions::{RoleHierarchy, has_user_permission, is_missing_permissions};

pub const META: CommandMeta = CommandMeta {
    name: "randomname",
    desc: "Give a member a random Japanese name.",
    category: "nickname",
    usage: "!randomname [member]",
};

const FIRST_NAMES: &[&str] = &[
    "Haruto", "Yuki", "Sora", "Haruka", "Kohaku", "Ren", "Aoi", "Hana", "Yui", "Kaito", "Mei",
    "Takumi", "Akira", "Rin",
];

const LAST_NAMES: &[&str] = &[
    "Sato",
    "Suzuki",
    "Takahashi",
    "Tanaka",
    "Watanabe",
    "Ito",
    "Yamamoto",
    "Nakamura",
    "Kobayashi",
    "Kato",
];

#[poise::command(
    prefix_command,
    slash_command,
    category = "Nickname",
    aliases("rname"),
    user_cooldown = 3
)]
pub async fn randomname(
    ctx: Context<'_>,
    #[description = "Member to rename (defaults to you)"] member: Option<serenity::Member>,
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

    if target.user.bot {
        ctx.say("I don't change bot names.").await?;
        return Ok(());
    }

    let hierarchy = RoleHierarchy::fetch(ctx.http(), guild_id, ctx.framework().bot_id).await?;
    if !hierarchy.can_manage(target.user.id, &target.roles) {
        ctx.say(higher_role_message(&mention)).await?;
        return Ok(());
    }

    let status = ctx.say("Generating a random Japanese name...").await?;

    let romaji = random_romaji_name();
    let translation = ctx.data().translator.to_japanese(&romaji).await;
    let nickname = truncate_nickname(&translation.text);

    let edit = serenity::EditMember::new().nickname(&nickname);
    let reply = match guild_id.edit_member(ctx.http(), target.user.id, edit).await {
        Ok(_) => {
            info!(
                guild_id = guild_id.get(),
                user_id = target.user.id.get(),
                romaji = %romaji,
                nickname = %nickname,
                "random nickname applied"
            );
            format!("Changed {mention}'s nickname to {nickname}")
        }
        Err(source) if is_missing_permissions(&source) => {
            format!("I don't have permission to change {mention}'s nickname.")
        }
        Err(source) => {
            error!(?source, "failed to apply random nickname");
            format!("Error setting random name: {source}")
        }
    };

    status
        .edit(ctx, poise::CreateReply::default().content(reply))
        .await?;

    Ok(())
}

/// A romanized "Family Given" name.
fn random_romaji_name() -> String {
    let mut rng = rand::rng();
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Sato");
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Yuki");
    format!("{last} {first}")
}

#[cfg(test)]
mod tests {
    use super::{FIRST_NAMES, LAST_NAMES, random_romaji_name};

    #[test]
    fn random_names_come_from_the_lists() {
        for _ in 0..20 {
            let name = random_romaji_name();
            let (last, first) = name.split_once(' ').expect("family and given name");
            assert!(LAST_NAMES.contains(&last));
            assert!(FIRST_NAMES.contains(&first));
        }
    }
}
