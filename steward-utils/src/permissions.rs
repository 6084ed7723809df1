use twilight_http::Client;
use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

/// Check whether a message author holds operator rights for admin commands.
///
/// Operator means effective `ADMINISTRATOR` on the guild. The gateway
/// member payload carries resolved permissions when available; otherwise the
/// member's roles are fetched and folded. Returns `Ok(false)` outside a
/// guild context.
pub async fn is_operator(http: &Client, msg: &MessageCreate) -> anyhow::Result<bool> {
    let Some(perms) = resolve_author_permissions(http, msg).await? else {
        return Ok(false);
    };

    Ok(perms.contains(Permissions::ADMINISTRATOR))
}

async fn resolve_author_permissions(
    http: &Client,
    msg: &MessageCreate,
) -> anyhow::Result<Option<Permissions>> {
    if let Some(perms) = msg.member.as_ref().and_then(|member| member.permissions) {
        return Ok(Some(perms));
    }

    let Some(guild_id) = msg.guild_id else {
        return Ok(None);
    };

    let member = http
        .guild_member(guild_id, msg.author.id)
        .await?
        .model()
        .await?;
    let roles = http.roles(guild_id).await?.models().await?;

    let mut resolved = Permissions::empty();
    for role in roles {
        // The everyone role shares the guild's ID.
        if role.id == guild_id.cast() || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    Ok(Some(resolved))
}
