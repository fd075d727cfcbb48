//! Command-line interface
//!
//! Argument parsing, the interactive menu and output rendering. The
//! [`PostStore`] does the work; this layer only prompts and prints.

pub mod args;
pub mod menu;
pub mod render;

use std::io::Write;

use anyhow::Result;

use crate::models::normalize_tag_name;
use crate::services::PostStore;

pub use args::{Cli, Commands, CreateArgs};

/// Run one command against the store, writing its output to `out`
///
/// `json` switches the read commands and `create` to JSON output. The menu
/// always prints text.
pub async fn execute<W: Write>(
    store: &PostStore,
    command: Commands,
    json: bool,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Menu => {
            let mut prompter = menu::default_prompter();
            menu::run(store, prompter.as_mut(), out).await?;
        }
        Commands::Create(args) => {
            let post = store
                .create_post(&args.title, &args.content, &args.tags)
                .await?;
            if json {
                render::json(out, &post)?;
            } else {
                render::created(out, &post)?;
            }
        }
        Commands::List => {
            let posts = store.list_posts().await?;
            if json {
                render::json(out, &posts)?;
            } else {
                render::post_list(out, &posts)?;
            }
        }
        Commands::View { title } => {
            let post = store.get_post_by_title(&title).await?;
            if json {
                render::json(out, &post)?;
            } else {
                render::post_detail(out, &title, post.as_ref())?;
            }
        }
        Commands::Search { tag } => {
            let tag = normalize_tag_name(&tag);
            let posts = store.find_posts_by_tag(&tag).await?;
            if json {
                render::json(out, &posts)?;
            } else {
                render::tagged_posts(out, &tag, &posts)?;
            }
        }
        Commands::Tags => {
            let tags = store.list_tags().await?;
            if json {
                render::json(out, &tags)?;
            } else {
                render::tag_list(out, &tags)?;
            }
        }
    }
    Ok(())
}
