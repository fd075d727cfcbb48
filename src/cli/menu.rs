//! Interactive menu
//!
//! Loops over the five menu actions until the user exits. Input comes from a
//! [`Prompter`]: `inquire` widgets on a terminal, plain numbered lines when
//! stdin is piped. A failed action is reported and the loop carries on.

use std::fmt;
use std::io::{self, BufRead, IsTerminal, Write};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use inquire::{InquireError, Select, Text};

use super::render;
use crate::models::normalize_tag_name;
use crate::services::PostStore;

const INVALID_CHOICE: &str = "Invalid choice. Please enter a number between 1 and 5.";

/// Menu entries, numbered 1 to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreatePost,
    ListPosts,
    ViewPost,
    SearchByTag,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::CreatePost,
        MenuChoice::ListPosts,
        MenuChoice::ViewPost,
        MenuChoice::SearchByTag,
        MenuChoice::Exit,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::CreatePost => 1,
            MenuChoice::ListPosts => 2,
            MenuChoice::ViewPost => 3,
            MenuChoice::SearchByTag => 4,
            MenuChoice::Exit => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuChoice::CreatePost => "Create a new post",
            MenuChoice::ListPosts => "View all post titles",
            MenuChoice::ViewPost => "View specific post content",
            MenuChoice::SearchByTag => "Search posts by tag",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MenuChoice::ALL
            .into_iter()
            .find(|choice| choice.number().to_string() == s)
            .ok_or_else(|| format!("'{}' is not a menu option", s))
    }
}

/// Source of menu input
pub trait Prompter {
    /// Ask for a menu entry. `None` means the input was not a valid choice.
    fn choose(&mut self) -> Result<Option<MenuChoice>>;

    /// Ask for a line of free text
    fn text(&mut self, message: &str) -> Result<String>;
}

/// Terminal prompts using `inquire`
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn choose(&mut self) -> Result<Option<MenuChoice>> {
        let selection = Select::new("Blog Post Manager", MenuChoice::ALL.to_vec())
            .with_help_message("↑↓ to move, enter to select, esc to cancel")
            .prompt();

        match selection {
            Ok(choice) => Ok(Some(choice)),
            Err(InquireError::OperationCanceled) => Ok(None),
            Err(InquireError::OperationInterrupted) => Ok(Some(MenuChoice::Exit)),
            Err(e) => Err(e).context("Failed to read menu choice"),
        }
    }

    fn text(&mut self, message: &str) -> Result<String> {
        Text::new(message)
            .prompt()
            .with_context(|| format!("Failed to read input for '{}'", message))
    }
}

/// Line-oriented prompts for piped input
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn choose(&mut self) -> Result<Option<MenuChoice>> {
        writeln!(self.output, "Blog Post Manager")?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}", choice)?;
        }
        write!(self.output, "Enter your choice (1-5): ")?;
        self.output.flush()?;

        // End of input ends the session
        let Some(line) = self.read_line()? else {
            return Ok(Some(MenuChoice::Exit));
        };
        Ok(line.parse().ok())
    }

    fn text(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{} ", message)?;
        self.output.flush()?;

        match self.read_line()? {
            Some(line) => Ok(line),
            None => bail!("Input closed while waiting for '{}'", message),
        }
    }
}

/// Pick the prompter matching the attached stdin
pub fn default_prompter() -> Box<dyn Prompter> {
    if io::stdin().is_terminal() {
        Box::new(InquirePrompter)
    } else {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stdout()))
    }
}

/// Run the menu loop until the user chooses Exit
///
/// # Errors
/// Only prompt failures end the loop early; store errors are printed and the
/// menu is shown again.
pub async fn run<P, W>(store: &PostStore, prompter: &mut P, out: &mut W) -> Result<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    loop {
        let Some(choice) = prompter.choose()? else {
            writeln!(out, "{}", INVALID_CHOICE)?;
            continue;
        };

        if choice == MenuChoice::Exit {
            writeln!(out, "Goodbye!")?;
            return Ok(());
        }

        if let Err(e) = perform(store, choice, prompter, out).await {
            writeln!(out, "Error: {:#}", e)?;
        }
        writeln!(out)?;
    }
}

async fn perform<P, W>(
    store: &PostStore,
    choice: MenuChoice,
    prompter: &mut P,
    out: &mut W,
) -> Result<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    match choice {
        MenuChoice::CreatePost => {
            let title = prompter.text("Enter post title:")?;
            let content = prompter.text("Enter post content:")?;
            let tags = prompter.text("Enter tags (comma-separated):")?;

            let post = store.create_post(&title, &content, &tags).await?;
            render::created(out, &post)?;
        }
        MenuChoice::ListPosts => {
            let posts = store.list_posts().await?;
            render::post_list(out, &posts)?;
        }
        MenuChoice::ViewPost => {
            let title = prompter.text("Enter post title to view:")?;

            let post = store.get_post_by_title(&title).await?;
            render::post_detail(out, &title, post.as_ref())?;
        }
        MenuChoice::SearchByTag => {
            let tag = normalize_tag_name(&prompter.text("Enter tag to search for:")?);

            let posts = store.find_posts_by_tag(&tag).await?;
            render::tagged_posts(out, &tag, &posts)?;
        }
        MenuChoice::Exit => {}
    }
    Ok(())
}
