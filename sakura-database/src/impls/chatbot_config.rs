use anyhow::Context as _;

use crate::database::Database;
use crate::model::chatbot_config::GuildChatbotConfig;

pub async fn get_chatbot_config(db: &Database, guild_id: u64) -> anyhow::Result<GuildChatbotConfig> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let enabled: Option<bool> =
        sqlx::query_scalar("SELECT enabled FROM guild_chatbot_config WHERE guild_id = $1")
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?
            .flatten();

    let channel_rows: Vec<i64> = sqlx::query_scalar(
        "SELECT channel_id FROM guild_chatbot_channels
         WHERE guild_id = $1
         ORDER BY created_at",
    )
    .bind(guild_id_i64)
    .fetch_all(db.pool())
    .await?;

    let channel_ids = channel_rows
        .into_iter()
        .map(u64::try_from)
        .collect::<Result<Vec<_>, _>>()
        .context("channel_id row out of u64 range")?;

    Ok(GuildChatbotConfig {
        enabled,
        channel_ids,
    })
}

pub async fn set_chatbot_enabled(db: &Database, guild_id: u64, enabled: bool) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_chatbot_config (guild_id, enabled)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE
         SET enabled = EXCLUDED.enabled, updated_at = NOW()",
    )
    .bind(guild_id_i64)
    .bind(enabled)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Returns `false` when the channel was already a chatbot channel.
pub async fn add_chatbot_channel(db: &Database, guild_id: u64, channel_id: u64) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;

    let result = sqlx::query(
        "INSERT INTO guild_chatbot_channels (guild_id, channel_id)
         VALUES ($1, $2)
         ON CONFLICT (guild_id, channel_id) DO NOTHING",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns `false` when the channel was not a chatbot channel.
pub async fn remove_chatbot_channel(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
) -> anyhow::Result<bool> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;

    let result = sqlx::query(
        "DELETE FROM guild_chatbot_channels WHERE guild_id = $1 AND channel_id = $2",
    )
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}
