use crate::{Context, Error};

/// Displays help for commands
///
/// With no argument this lists every visible command. With a command name
/// it shows the full help for that command.
#[poise::command(prefix_command, slash_command, track_edits)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help for"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let footer = format!(
        "{}\nUse `help <command>` for details on a command.",
        ctx.data().config.description
    );
    let config = poise::builtins::HelpConfiguration {
        extra_text_at_bottom: &footer,
        ..Default::default()
    };
    poise::builtins::help(ctx, command.as_deref(), config).await?;
    Ok(())
}
