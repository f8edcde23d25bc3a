use crate::scope::Scope;
use crate::services::FetchOptions;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Usage statistics
#[poise::command(prefix_command, slash_command, subcommands("show", "top"), subcommand_required)]
pub async fn stats(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show one counter
#[poise::command(prefix_command, slash_command)]
pub async fn show(
    ctx: Context<'_>,
    #[description = "Stat name, e.g. messages"] stat: String,
    #[description = "Sub-stat, e.g. a command name"] sub_stat: Option<String>,
    #[description = "Only count the last N days"]
    #[max = 3650]
    days: Option<u32>,
    #[description = "Use bot-wide stats instead of this server's"] global: Option<bool>,
) -> Result<(), Error> {
    let scope = resolve_scope(ctx, global.unwrap_or(false));
    let sub_stat = sub_stat.unwrap_or_default();
    let value = ctx.data().stats.get(scope, &stat, &sub_stat, days).await?;

    let label = if sub_stat.is_empty() {
        format!("`{}`", stat)
    } else {
        format!("`{}` / `{}`", stat, sub_stat)
    };
    let window = match days {
        Some(d) => format!(" over the last {} days", d),
        None => String::new(),
    };

    match value {
        Some(n) => ctx.say(format!("📊 {} is **{}**{} ({})", label, n, window, scope)).await?,
        None => ctx.say(format!("📭 No data for {}{} ({})", label, window, scope)).await?,
    };
    Ok(())
}

/// Rank the sub-stats of a counter
#[poise::command(prefix_command, slash_command)]
pub async fn top(
    ctx: Context<'_>,
    #[description = "Stat name, e.g. commands"] stat: String,
    #[description = "How many entries to show"]
    #[min = 1]
    #[max = 25]
    count: Option<usize>,
    #[description = "How many days back to look"]
    #[max = 3650]
    days: Option<u32>,
    #[description = "Show the least used instead"] ascending: Option<bool>,
    #[description = "Only sub-stats containing this text"] filter: Option<String>,
    #[description = "Use bot-wide stats instead of this server's"] global: Option<bool>,
) -> Result<(), Error> {
    let scope = resolve_scope(ctx, global.unwrap_or(false));

    let mut options = FetchOptions::default();
    if let Some(count) = count {
        options = options.with_limit(count.min(25));
    }
    if let Some(days) = days {
        options = options.with_days(days);
    }
    if ascending.unwrap_or(false) {
        options = options.ascending();
    }
    if let Some(filter) = filter.filter(|f| !f.is_empty()) {
        options = options.with_submatch(filter);
    }
    let days = options.days;

    let rows = ctx.data().stats.fetch(scope, &stat, options).await?;
    if rows.is_empty() {
        ctx.say(format!("📭 No `{}` data in the last {} days ({})", stat, days, scope))
            .await?;
        return Ok(());
    }

    let embed = serenity::CreateEmbed::new()
        .title(format!("📊 Top `{}`", stat))
        .description(format_ranking(&rows))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Last {} days, {}",
            days, scope
        )))
        .color(0x5865F2);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn resolve_scope(ctx: Context<'_>, global: bool) -> Scope {
    if global {
        Scope::Global
    } else {
        Scope::from(ctx.guild_id())
    }
}

fn format_ranking(rows: &[(String, i64)]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, (sub_stat, total))| {
            let name = if sub_stat.is_empty() { "(none)" } else { sub_stat.as_str() };
            format!("{}. {} — **{}**", i + 1, name, total)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
