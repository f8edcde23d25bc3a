use crate::scope::Scope;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Manage bot settings for this server
#[poise::command(
    prefix_command,
    slash_command,
    subcommands("get", "set", "list"),
    subcommand_required,
    required_permissions = "MANAGE_GUILD",
    guild_only
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show one setting
#[poise::command(prefix_command, slash_command)]
pub async fn get(
    ctx: Context<'_>,
    #[description = "Setting name"] setting: String,
) -> Result<(), Error> {
    let scope = guild_scope(ctx)?;
    let value = ctx.data().settings.get(scope, &setting, "").await?;

    ctx.say(format!("`{}` = {}", setting.to_lowercase(), display_value(&value)))
        .await?;
    Ok(())
}

/// Change one setting. Pass an empty value to switch a flag off.
#[poise::command(prefix_command, slash_command)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Setting name"] setting: String,
    #[description = "New value (max 30 characters)"]
    #[rest]
    value: Option<String>,
) -> Result<(), Error> {
    let scope = guild_scope(ctx)?;
    let value = value.unwrap_or_default();
    ctx.data().settings.set(scope, &setting, &value).await?;

    ctx.say(format!(
        "✅ `{}` set to {}",
        setting.to_lowercase(),
        display_value(&value)
    ))
    .await?;
    Ok(())
}

/// List every setting stored for this server
#[poise::command(prefix_command, slash_command)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let scope = guild_scope(ctx)?;
    let entries = ctx.data().settings.list(scope).await?;

    if entries.is_empty() {
        ctx.say("📭 No settings stored for this server.").await?;
        return Ok(());
    }

    let body = entries
        .iter()
        .map(|(name, value)| format!("`{}` = {}", name, display_value(value)))
        .collect::<Vec<_>>()
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title("⚙️ Server Settings")
        .description(body)
        .color(0x5865F2);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn guild_scope(ctx: Context<'_>) -> Result<Scope, Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    Ok(Scope::from(guild_id))
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "*(empty)*".to_string()
    } else {
        format!("`{}`", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(""), "*(empty)*");
        assert_eq!(display_value("True"), "`True`");
    }
}
