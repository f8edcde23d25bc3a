use crate::{Context, Error};
use tracing::info;

/// Pings the bot to make sure it's awake
#[poise::command(prefix_command, slash_command, required_bot_permissions = "SEND_MESSAGES")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let latency = ctx.ping().await;
    ctx.say(format!("{:.2}ms latency", latency.as_secs_f64() * 1000.0))
        .await?;
    Ok(())
}

/// Register or unregister application commands
#[poise::command(prefix_command, required_permissions = "MANAGE_GUILD", hide_in_help)]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    Ok(())
}

/// Shut down the bot (Owner only)
#[poise::command(prefix_command, slash_command, owners_only, hide_in_help)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    info!("Shutdown command received from owner: {}", ctx.author().name);
    ctx.say("👋 Shutting down...").await?;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
