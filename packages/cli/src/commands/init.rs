use super::Context;
use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use verdant_content::ContentDocument;
use verdant_store::JsonFileContentStore;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Public URL prefix for media files
    #[arg(long, default_value = "/media")]
    pub media_url: String,

    /// Force overwrite existing config and content
    #[arg(short, long)]
    pub force: bool,
}

pub async fn init(args: InitArgs, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Verdant content...".bright_blue().bold());

    let config = Config {
        media_base_url: args.media_url,
        ..ctx.config.clone()
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    // Create media directory if it doesn't exist
    let media_root = config.get_media_root(&ctx.cwd);
    if !media_root.exists() {
        fs::create_dir_all(&media_root)?;
        println!("  {} Created {}/", "✓".green(), config.media_root);
    }

    // Blank content store
    let store_path = config.get_store_path(&ctx.cwd);
    if store_path.exists() && !args.force {
        println!("  {} Kept existing {}", "•".dimmed(), config.store_path);
    } else {
        JsonFileContentStore::create(&store_path, &ContentDocument::blank()).await?;
        println!("  {} Created {}", "✓".green(), config.store_path);
    }

    println!();
    println!("{}", "✅ Content initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: verdant edit homePage.welcome.slogan.en \"Grow With Us\"");
    println!("  2. Run: verdant add team");
    println!("  3. Run: verdant show team");

    Ok(())
}
