use super::{publish_outcome, Context};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;
use verdant_content::{ContentSchema, MediaStore};

#[derive(Debug, Subcommand)]
pub enum MediaCommand {
    /// List folders and files
    Ls {
        /// Folder relative to the media root
        #[arg(default_value = "")]
        path: String,
    },

    /// Upload a local file
    Upload {
        /// Local file to upload
        file: PathBuf,

        /// Destination folder
        #[arg(long, default_value = "")]
        to: String,

        /// Stored filename (defaults to the local name)
        #[arg(long)]
        name: Option<String>,

        /// Also write the file URL into this content path and publish
        #[arg(long)]
        set: Option<String>,
    },

    /// Delete a file
    Rm {
        /// Folder containing the file
        path: String,

        /// Filename to delete
        filename: String,
    },

    /// Create a folder
    Mkdir { path: String },

    /// Delete an empty folder
    Rmdir { path: String },
}

pub async fn media(command: MediaCommand, ctx: &Context) -> Result<()> {
    let media = ctx.media();

    match command {
        MediaCommand::Ls { path } => {
            let listing = media.list_entries(&path).await?;
            println!("📁 /{}", path.bright_white());
            for dir in &listing.directories {
                println!("  {}/", dir.bright_blue());
            }
            for file in &listing.files {
                println!(
                    "  {} {} {}",
                    file.name,
                    format!("{} B", file.size).dimmed(),
                    file.url.dimmed()
                );
            }
            if listing.directories.is_empty() && listing.files.is_empty() {
                println!("  {}", "(empty)".dimmed());
            }
        }

        MediaCommand::Upload {
            file,
            to,
            name,
            set,
        } => {
            // Check the content path before touching the media library
            let target = set
                .as_deref()
                .map(|path| ContentSchema::shared().validate_str(path))
                .transpose()?;

            let filename = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or_else(|| anyhow!("Cannot derive a filename from {}", file.display()))?,
            };
            let bytes = tokio::fs::read(&file).await?;
            let stored = media.upload(&to, &filename, &bytes).await?;
            println!("  {} Uploaded {} → {}", "✓".green(), filename, stored.url);

            if let Some(path) = target {
                let store = ctx.store();
                let mut session = ctx.open_session(&store).await?;
                let effect = session.edit_checked(&path, stored.url.clone())?;
                println!("  {} Set {}", "✓".green(), path.to_string().bright_white());
                publish_outcome(&mut session, &store, &effect).await?;
            }
        }

        MediaCommand::Rm { path, filename } => {
            media.delete_file(&path, &filename).await?;
            println!("  {} Deleted {}", "✓".green(), filename);
        }

        MediaCommand::Mkdir { path } => {
            media.create_folder(&path).await?;
            println!("  {} Created {}/", "✓".green(), path);
        }

        MediaCommand::Rmdir { path } => {
            media.delete_folder(&path).await?;
            println!("  {} Deleted {}/", "✓".green(), path);
        }
    }

    Ok(())
}
