use crate::Database;

/// Record that the bot left a guild through the admin command.
pub async fn record_guild_leave(
    db: &Database,
    guild_id: u64,
    guild_name: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO guild_audit (guild_id, action, detail) VALUES ($1, $2, $3)")
        .bind(guild_id as i64)
        .bind("leave")
        .bind(guild_name)
        .execute(db.pool())
        .await?;

    Ok(())
}

/// Record an invite created for a guild through the admin command.
pub async fn record_invite_created(
    db: &Database,
    guild_id: u64,
    invite_code: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO guild_audit (guild_id, action, detail) VALUES ($1, $2, $3)")
        .bind(guild_id as i64)
        .bind("invite")
        .bind(invite_code)
        .execute(db.pool())
        .await?;

    Ok(())
}
