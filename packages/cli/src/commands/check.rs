use super::Context;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use verdant_content::ContentSchema;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Content path to validate; omit to audit the stored document
    pub path: Option<String>,
}

pub async fn check(args: CheckArgs, ctx: &Context) -> Result<()> {
    match args.path {
        Some(path) => check_path(&path),
        None => audit_store(ctx).await,
    }
}

fn check_path(path: &str) -> Result<()> {
    let schema = ContentSchema::shared();
    match schema.validate_str(path) {
        Ok(parsed) => {
            let kind = schema.validate(&parsed)?;
            println!("  {} {} ({:?})", "✓".green(), path.bright_white(), kind);
            Ok(())
        }
        Err(e) => {
            println!("  {} {} - {}", "✗".red(), path.bright_white(), e);
            bail!("Invalid content path")
        }
    }
}

async fn audit_store(ctx: &Context) -> Result<()> {
    let store = ctx.store();
    if !store.exists().await {
        bail!("No content store at {}", store.path().display());
    }

    println!("🔍 {} {}", "Checking".green().bold(), store.path().display());
    let report = store.load().await?;
    let document = &report.document;

    println!(
        "   {} projects, {} activities, {} team members, {} blog posts",
        document.projects.len(),
        document.projects.iter().map(|p| p.activities.len()).sum::<usize>(),
        document.team.len(),
        document.blog.len()
    );

    let mut problems = 0;

    for fault in &report.faults {
        problems += 1;
        println!(
            "  {} section {} is unreadable: {}",
            "✗".red(),
            fault.section.bright_white(),
            fault.message
        );
    }

    for slide in document.dangling_slide_links() {
        problems += 1;
        println!(
            "  {} hero slide {} links to missing {}/{}",
            "⚠️".yellow(),
            slide.id.bright_white(),
            slide.project_id.as_deref().unwrap_or("-"),
            slide.activity_id.as_deref().unwrap_or("-")
        );
    }

    println!();
    if problems == 0 {
        println!("{}", "✅ No problems found".green().bold());
        Ok(())
    } else {
        bail!("{} problem(s) found", problems)
    }
}
