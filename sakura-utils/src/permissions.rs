use std::collections::HashMap;

use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild-level permissions from their roles.
///
/// The guild owner implicitly holds every permission.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    let resolved = guild
        .roles
        .values()
        .filter(|role| role.id == everyone_role_id || member.roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| {
            acc | role.permissions
        });

    Ok(resolved)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Whether a serenity error is Discord refusing the action for lack of permissions.
pub fn is_missing_permissions(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

/// Snapshot of a guild's role ordering, used to decide which members the bot
/// may rename.
///
/// Discord only lets a bot edit members whose highest role sits strictly
/// below the bot's own highest role, and never the guild owner.
#[derive(Clone, Debug)]
pub struct RoleHierarchy {
    owner_id: serenity::UserId,
    positions: HashMap<serenity::RoleId, u16>,
    bot_top_position: u16,
}

impl RoleHierarchy {
    pub fn new(
        owner_id: serenity::UserId,
        positions: HashMap<serenity::RoleId, u16>,
        bot_roles: &[serenity::RoleId],
    ) -> Self {
        let bot_top_position = top_position(&positions, bot_roles);
        Self {
            owner_id,
            positions,
            bot_top_position,
        }
    }

    pub async fn fetch(
        http: &serenity::Http,
        guild_id: serenity::GuildId,
        bot_user_id: serenity::UserId,
    ) -> anyhow::Result<Self> {
        let guild = guild_id.to_partial_guild(http).await?;
        let bot_member = guild_id.member(http, bot_user_id).await?;
        let positions = guild
            .roles
            .iter()
            .map(|(id, role)| (*id, role.position))
            .collect();

        Ok(Self::new(guild.owner_id, positions, &bot_member.roles))
    }

    pub fn can_manage(&self, user_id: serenity::UserId, roles: &[serenity::RoleId]) -> bool {
        user_id != self.owner_id && self.bot_top_position > top_position(&self.positions, roles)
    }
}

fn top_position(positions: &HashMap<serenity::RoleId, u16>, roles: &[serenity::RoleId]) -> u16 {
    roles
        .iter()
        .filter_map(|role_id| positions.get(role_id).copied())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use poise::serenity_prelude as serenity;

    use super::RoleHierarchy;

    fn role(id: u64) -> serenity::RoleId {
        serenity::RoleId::new(id)
    }

    fn hierarchy() -> RoleHierarchy {
        let positions = HashMap::from([(role(10), 1), (role(20), 5), (role(30), 9)]);
        RoleHierarchy::new(serenity::UserId::new(1), positions, &[role(20)])
    }

    #[test]
    fn manages_members_strictly_below_the_bot() {
        let hierarchy = hierarchy();
        assert!(hierarchy.can_manage(serenity::UserId::new(2), &[]));
        assert!(hierarchy.can_manage(serenity::UserId::new(2), &[role(10)]));
        assert!(!hierarchy.can_manage(serenity::UserId::new(2), &[role(20)]));
        assert!(!hierarchy.can_manage(serenity::UserId::new(2), &[role(10), role(30)]));
    }

    #[test]
    fn never_manages_the_owner() {
        assert!(!hierarchy().can_manage(serenity::UserId::new(1), &[]));
    }

    #[test]
    fn roleless_bot_manages_nobody() {
        let bot = RoleHierarchy::new(serenity::UserId::new(1), HashMap::new(), &[]);
        assert!(!bot.can_manage(serenity::UserId::new(2), &[]));
    }
}
