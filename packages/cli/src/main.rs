mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use commands::{
    add, check, edit, init, media, move_item, remove, show, AddArgs, CheckArgs, Context, EditArgs,
    InitArgs, MediaCommand, MoveArgs, RemoveArgs, ShowArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Verdant CLI - edit the site's bilingual content
#[derive(Parser, Debug)]
#[command(name = "verdant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Settings that take precedence over verdant.config.json
#[derive(Args, Debug)]
struct Overrides {
    /// Content store file
    #[arg(long, global = true, env = "VERDANT_STORE")]
    store: Option<String>,

    /// Media library directory
    #[arg(long, global = true, env = "VERDANT_MEDIA_ROOT")]
    media_root: Option<String>,

    /// Public URL prefix of media files
    #[arg(long, global = true, env = "VERDANT_MEDIA_URL")]
    media_base_url: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(store) = self.store {
            config.store_path = store;
        }
        if let Some(media_root) = self.media_root {
            config.media_root = media_root;
        }
        if let Some(media_base_url) = self.media_base_url {
            config.media_base_url = media_base_url;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create config, a blank content store and the media folder
    Init(InitArgs),

    /// Print the value at a content path
    Show(ShowArgs),

    /// Set the value at a content path and publish
    Edit(EditArgs),

    /// Append an item to a list and publish
    Add(AddArgs),

    /// Remove a list item and publish
    Remove(RemoveArgs),

    /// Move a list item and publish
    Move(MoveArgs),

    /// Validate a content path, or audit the stored document
    Check(CheckArgs),

    /// Manage the media library
    Media {
        #[command(subcommand)]
        command: MediaCommand,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let mut config = Config::load(&cwd)?;
    cli.overrides.apply(&mut config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context { cwd, config };

    match cli.command {
        Command::Init(args) => init(args, &ctx).await,
        Command::Show(args) => show(args, &ctx).await,
        Command::Edit(args) => edit(args, &ctx).await,
        Command::Add(args) => add(args, &ctx).await,
        Command::Remove(args) => remove(args, &ctx).await,
        Command::Move(args) => move_item(args, &ctx).await,
        Command::Check(args) => check(args, &ctx).await,
        Command::Media { command } => media(command, &ctx).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
