//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "blog-manager",
    author,
    version,
    about = "Manage blog posts and their tags from the terminal",
    long_about = "Create, list, view and search blog posts stored in SQLite or MySQL. \
                  Run without a subcommand for the interactive menu."
)]
pub struct Cli {
    /// Configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Database URL, overriding the configuration file. The driver follows
    /// the URL scheme.
    #[arg(long, global = true, env = "BLOG_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Create a new post
    Create(CreateArgs),
    /// List all post titles, newest first
    List,
    /// Show a post by its exact title
    View {
        /// Post title
        title: String,
    },
    /// Find posts carrying a tag
    Search {
        /// Tag name (case-insensitive)
        tag: String,
    },
    /// List tags with the number of posts using each
    Tags,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// Post title
    #[arg(long, short = 't')]
    pub title: String,

    /// Post body
    #[arg(long)]
    pub content: String,

    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
}

impl Cli {
    /// The command to run, falling back to the interactive menu
    pub fn subcommand_or_menu(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_menu() {
        let cli = Cli::try_parse_from(["blog-manager"]).unwrap();

        assert_eq!(cli.subcommand_or_menu(), Commands::Menu);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "blog-manager",
            "create",
            "--title",
            "Hello",
            "--content",
            "World",
            "--tags",
            "rust, cli",
        ])
        .unwrap();

        assert_eq!(
            cli.subcommand_or_menu(),
            Commands::Create(CreateArgs {
                title: "Hello".to_string(),
                content: "World".to_string(),
                tags: "rust, cli".to_string(),
            })
        );
    }

    #[test]
    fn test_create_tags_optional() {
        let cli = Cli::try_parse_from(["blog-manager", "create", "-t", "Hello", "--content", "World"])
            .unwrap();

        match cli.subcommand_or_menu() {
            Commands::Create(args) => assert_eq!(args.tags, ""),
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_title() {
        assert!(Cli::try_parse_from(["blog-manager", "create", "--content", "World"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "blog-manager",
            "search",
            "Rust",
            "--json",
            "-v",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();

        assert_eq!(cli.subcommand_or_menu(), Commands::Search { tag: "Rust".to_string() });
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_database_url_from_environment() {
        let _guard = crate::config::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        std::env::set_var("BLOG_DATABASE_URL", "mysql://blog@db.example.com/blog");

        let from_env = Cli::try_parse_from(["blog-manager", "list"]).unwrap();
        let from_flag = Cli::try_parse_from([
            "blog-manager",
            "list",
            "--database-url",
            "sqlite:flag.db",
        ])
        .unwrap();
        std::env::remove_var("BLOG_DATABASE_URL");
        let unset = Cli::try_parse_from(["blog-manager", "list"]).unwrap();

        assert_eq!(
            from_env.database_url.as_deref(),
            Some("mysql://blog@db.example.com/blog")
        );
        assert_eq!(from_flag.database_url.as_deref(), Some("sqlite:flag.db"));
        assert!(unset.database_url.is_none());
    }

    #[test]
    fn test_parse_view_with_spaces() {
        let cli = Cli::try_parse_from(["blog-manager", "view", "My First Post"]).unwrap();
        assert_eq!(cli.subcommand_or_menu(), Commands::View { title: "My First Post".to_string() });
    }
}
