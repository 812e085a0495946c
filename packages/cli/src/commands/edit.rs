//! Mutating commands. Each runs one session: fetch, mutate, publish.

use super::{parse_value, publish_outcome, Context};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde_json::{json, Value};
use verdant_content::{ContentPath, ContentSchema, NodeKind};
use verdant_editor::MutationEffect;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Dotted content path, e.g. homePage.welcome.slogan.en
    pub path: String,

    /// New value (JSON, or plain text)
    pub value: String,

    /// Skip checking the path against the document shape
    #[arg(long)]
    pub unchecked: bool,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Path of the list, e.g. team or projects.0.activities
    pub list: String,

    /// Item template as JSON (an id is assigned)
    #[arg(short, long)]
    pub template: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Path of the list
    pub list: String,

    /// Position of the item to remove
    pub index: usize,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Path of the list
    pub list: String,

    /// Current position
    pub from: usize,

    /// New position
    pub to: usize,
}

pub async fn edit(args: EditArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let mut session = ctx.open_session(&store).await?;
    let value = parse_value(&args.value);

    let effect = if args.unchecked {
        session.edit(&args.path, value)?
    } else {
        let path = ContentSchema::shared().validate_str(&args.path)?;
        session.edit_checked(&path, value)?
    };

    if !effect.is_noop() {
        println!("  {} Set {}", "✓".green(), args.path.bright_white());
    }
    publish_outcome(&mut session, &store, &effect).await
}

pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let path: ContentPath = args.list.parse()?;
    if ContentSchema::shared().validate(&path)? != NodeKind::List {
        bail!("'{}' is not a list in the content document", args.list);
    }

    let template = match &args.template {
        Some(raw) => parse_value(raw),
        None => json!({}),
    };

    let store = ctx.store();
    let mut session = ctx.open_session(&store).await?;
    let insert = session.add_list_item(&args.list, template)?;

    println!(
        "  {} Added item {} to {}{}",
        "✓".green(),
        insert.index,
        args.list.bright_white(),
        insert
            .id
            .as_deref()
            .map(|id| format!(" (id {})", id))
            .unwrap_or_default()
    );

    let effect = MutationEffect::Inserted {
        index: insert.index,
    };
    publish_outcome(&mut session, &store, &effect).await
}

pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let mut session = ctx.open_session(&store).await?;

    let effect = match session.remove_list_item(&args.list, args.index)? {
        Some(item) => {
            let id = item.get("id").and_then(Value::as_str).unwrap_or("");
            println!(
                "  {} Removed item {} from {} {}",
                "✓".green(),
                args.index,
                args.list.bright_white(),
                id.dimmed()
            );
            MutationEffect::Removed {
                index: args.index,
                item,
            }
        }
        None => MutationEffect::Noop {
            reason: format!("{} has no item {}", args.list, args.index),
        },
    };

    publish_outcome(&mut session, &store, &effect).await
}

pub async fn move_item(args: MoveArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    let mut session = ctx.open_session(&store).await?;

    let effect = if session.move_list_item(&args.list, args.from, args.to)? {
        println!(
            "  {} Moved {} item {} → {}",
            "✓".green(),
            args.list.bright_white(),
            args.from,
            args.to
        );
        MutationEffect::Moved {
            from: args.from,
            to: args.to,
        }
    } else {
        MutationEffect::Noop {
            reason: format!(
                "cannot move {} → {} in {} ({} items)",
                args.from,
                args.to,
                args.list,
                session.list_len(&args.list)
            ),
        }
    };

    publish_outcome(&mut session, &store, &effect).await
}
