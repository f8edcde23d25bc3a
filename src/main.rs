use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use tallybot::scope::Scope;
use tallybot::{commands, config::Config, db::Database, Data, Error};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();
    let status_message = config.status_message.clone();

    let db = Database::new(&config)?;
    db.ensure_schema()?;

    let mut owners = HashSet::new();
    if let Some(owner_id) = config.owner_id {
        owners.insert(serenity::UserId::new(owner_id));
    }

    let data = Data::new(config, db);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                stripped_dynamic_prefix: Some(strip_prefix),
                case_insensitive_commands: true,
                ..Default::default()
            },
            owners,
            on_error: |error| Box::pin(on_error(error)),
            post_command: |ctx| Box::pin(record_command(ctx)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                ctx.set_activity(Some(serenity::ActivityData::custom(status_message)));
                info!("Bot ready");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MESSAGES;

    let mut client = serenity::ClientBuilder::new(&discord_token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}

fn strip_prefix<'a>(
    _ctx: &'a serenity::Context,
    msg: &'a serenity::Message,
    data: &'a Data,
) -> poise::BoxFuture<'a, Result<Option<(&'a str, &'a str)>, Error>> {
    Box::pin(async move { Ok(data.config.split_prefix(&msg.content)) })
}

async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if new_message.author.bot {
            return Ok(());
        }
        if let Some(guild_id) = new_message.guild_id {
            data.stats.increment(guild_id, "messages", 1, "").await?;
        }
    }
    Ok(())
}

/// Counts every successful command, per guild and bot-wide.
async fn record_command(ctx: tallybot::Context<'_>) {
    let name = ctx.command().qualified_name.clone();
    let stats = &ctx.data().stats;

    if let Some(guild_id) = ctx.guild_id() {
        if let Err(e) = stats.increment(guild_id, "commands", 1, &name).await {
            warn!("Failed to record command {} for guild {}: {}", name, guild_id, e);
        }
    }
    if let Err(e) = stats.increment(Scope::Global, "commands", 1, &name).await {
        warn!("Failed to record command {}: {}", name, e);
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().qualified_name, error);
            if let Err(e) = ctx.say(format!("Error handling that command: {}", error)).await {
                error!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            if let Err(e) = ctx.say("You don't have permission to use this command.").await {
                error!("Failed to report missing permissions: {}", e);
            }
        }
        poise::FrameworkError::UnknownCommand { ctx, msg, .. } => {
            if let Err(e) = msg.channel_id.say(ctx, "Unknown command").await {
                error!("Failed to report unknown command: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
