use anyhow::Context as _;

use crate::database::Database;
use crate::model::translation_config::{GreetingChannel, GuildTranslationConfig};

pub async fn get_translation_config(
    db: &Database,
    guild_id: u64,
) -> anyhow::Result<GuildTranslationConfig> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let row: Option<(Option<String>, Option<bool>, Option<i64>, Option<i64>)> = sqlx::query_as(
        "SELECT language, auto_translate, welcome_channel_id, goodbye_channel_id
         FROM guild_translation_config WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?;

    let Some((language, auto_translate, welcome_channel_id, goodbye_channel_id)) = row else {
        return Ok(GuildTranslationConfig::default());
    };

    Ok(GuildTranslationConfig {
        language,
        auto_translate,
        welcome_channel_id: welcome_channel_id
            .map(u64::try_from)
            .transpose()
            .context("welcome_channel_id out of u64 range")?,
        goodbye_channel_id: goodbye_channel_id
            .map(u64::try_from)
            .transpose()
            .context("goodbye_channel_id out of u64 range")?,
    })
}

pub async fn get_guild_language(db: &Database, guild_id: u64) -> anyhow::Result<Option<String>> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    let language: Option<String> =
        sqlx::query_scalar("SELECT language FROM guild_translation_config WHERE guild_id = $1")
            .bind(guild_id_i64)
            .fetch_optional(db.pool())
            .await?
            .flatten();

    Ok(language)
}

pub async fn set_guild_language(db: &Database, guild_id: u64, language: &str) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_translation_config (guild_id, language)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE
         SET language = EXCLUDED.language, updated_at = NOW()",
    )
    .bind(guild_id_i64)
    .bind(language)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn set_auto_translate(db: &Database, guild_id: u64, enabled: bool) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;

    sqlx::query(
        "INSERT INTO guild_translation_config (guild_id, auto_translate)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE
         SET auto_translate = EXCLUDED.auto_translate, updated_at = NOW()",
    )
    .bind(guild_id_i64)
    .bind(enabled)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn set_greeting_channel_id(
    db: &Database,
    guild_id: u64,
    kind: GreetingChannel,
    channel_id: u64,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let channel_id_i64 = i64::try_from(channel_id).context("channel_id out of i64 range")?;
    let column = kind.column();

    sqlx::query(&format!(
        "INSERT INTO guild_translation_config (guild_id, {column})
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE
         SET {column} = EXCLUDED.{column}, updated_at = NOW()"
    ))
    .bind(guild_id_i64)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub async fn clear_greeting_channel_id(
    db: &Database,
    guild_id: u64,
    kind: GreetingChannel,
) -> anyhow::Result<()> {
    let guild_id_i64 = i64::try_from(guild_id).context("guild_id out of i64 range")?;
    let column = kind.column();

    sqlx::query(&format!(
        "UPDATE guild_translation_config
         SET {column} = NULL, updated_at = NOW()
         WHERE guild_id = $1"
    ))
    .bind(guild_id_i64)
    .execute(db.pool())
    .await?;

    Ok(())
}
