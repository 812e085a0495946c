use super::Context;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use verdant_content::Language;
use verdant_editor::ListEditor;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Dotted content path (empty for the whole document)
    #[arg(default_value = "")]
    pub path: String,

    /// Language for list titles (en, es)
    #[arg(short, long, default_value = "en")]
    pub lang: String,

    /// Print raw JSON even for lists
    #[arg(long)]
    pub json: bool,
}

pub async fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let language = Language::from_key(&args.lang)
        .ok_or_else(|| anyhow!("Unknown language: {}. Use: en, es", args.lang))?;

    let store = ctx.store();
    let mut session = ctx.open_session(&store).await?;

    let value = session
        .get(&args.path)
        .cloned()
        .ok_or_else(|| anyhow!("Nothing at '{}'", args.path))?;

    match value {
        Value::Array(items) if !args.json => {
            let editor = ListEditor::<Value>::new(&mut session, args.path.clone())
                .with_language(language);
            println!(
                "{} {} ({} items)",
                "📋".bright_blue(),
                args.path.bright_white(),
                items.len()
            );
            for (index, title) in editor.titles(&session).iter().enumerate() {
                let id = items[index].get("id").and_then(Value::as_str).unwrap_or("");
                println!("  {:>3}. {} {}", index, title, id.dimmed());
            }
        }
        Value::String(text) => println!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }

    Ok(())
}
