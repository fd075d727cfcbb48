//! Output formatting for the CLI
//!
//! Every renderer writes to an `io::Write` so the menu and the one-shot
//! commands share the same text, and tests can capture it.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{PostSummary, PostWithTags, TagWithCount, TaggedPost};

/// Format a creation timestamp for display
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write `value` as pretty-printed JSON followed by a newline
pub fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn created<W: Write>(out: &mut W, post: &PostWithTags) -> io::Result<()> {
    writeln!(
        out,
        "Post '{}' created successfully with tags: {}",
        post.post.title,
        post.tags.join(", ")
    )
}

pub fn post_list<W: Write>(out: &mut W, posts: &[PostSummary]) -> io::Result<()> {
    if posts.is_empty() {
        return writeln!(out, "No posts found.");
    }

    writeln!(out, "All Posts:")?;
    for post in posts {
        writeln!(out, "{}. {}", post.id, post.title)?;
    }
    Ok(())
}

/// Render a single post, or the not-found message for `title`
pub fn post_detail<W: Write>(
    out: &mut W,
    title: &str,
    post: Option<&PostWithTags>,
) -> io::Result<()> {
    let Some(post) = post else {
        return writeln!(out, "Post '{}' not found.", title);
    };

    let tags = if post.tags.is_empty() {
        "No tags".to_string()
    } else {
        post.tags.join(", ")
    };

    writeln!(out, "Title: {}", post.post.title)?;
    writeln!(out, "Date: {}", format_timestamp(&post.post.created_at))?;
    writeln!(out, "Tags: {}", tags)?;
    writeln!(out)?;
    writeln!(out, "Content:")?;
    writeln!(out, "{}", post.post.content)
}

pub fn tagged_posts<W: Write>(out: &mut W, tag: &str, posts: &[TaggedPost]) -> io::Result<()> {
    if posts.is_empty() {
        return writeln!(out, "No posts found with tag '{}'.", tag);
    }

    writeln!(out, "Posts tagged with '{}':", tag)?;
    for post in posts {
        writeln!(
            out,
            "{}. {} ({})",
            post.id,
            post.title,
            format_timestamp(&post.created_at)
        )?;
    }
    Ok(())
}

pub fn tag_list<W: Write>(out: &mut W, tags: &[TagWithCount]) -> io::Result<()> {
    if tags.is_empty() {
        return writeln!(out, "No tags found.");
    }

    writeln!(out, "Tags:")?;
    for entry in tags {
        let noun = if entry.post_count == 1 { "post" } else { "posts" };
        writeln!(out, "{} ({} {})", entry.tag.name, entry.post_count, noun)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, Tag};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("render failed");
        String::from_utf8(buf).expect("output is not utf-8")
    }

    fn ts() -> DateTime<Utc> {
        "2024-03-01T10:15:30Z".parse().unwrap()
    }

    fn sample_post(tags: &[&str]) -> PostWithTags {
        PostWithTags::new(
            Post {
                id: 1,
                title: "First Post".to_string(),
                content: "Hello, world!".to_string(),
                created_at: ts(),
            },
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&ts()), "2024-03-01 10:15:30");
    }

    #[test]
    fn test_created_message() {
        let text = render(|out| created(out, &sample_post(&["python", "web"])));
        assert_eq!(text, "Post 'First Post' created successfully with tags: python, web\n");
    }

    #[test]
    fn test_post_list() {
        let posts = vec![
            PostSummary { id: 2, title: "Second".to_string() },
            PostSummary { id: 1, title: "First".to_string() },
        ];

        assert_eq!(render(|out| post_list(out, &posts)), "All Posts:\n2. Second\n1. First\n");
        assert_eq!(render(|out| post_list(out, &[])), "No posts found.\n");
    }

    #[test]
    fn test_post_detail() {
        let post = sample_post(&["python", "web"]);
        let text = render(|out| post_detail(out, "First Post", Some(&post)));

        assert_eq!(
            text,
            "Title: First Post\nDate: 2024-03-01 10:15:30\nTags: python, web\n\nContent:\nHello, world!\n"
        );
    }

    #[test]
    fn test_post_detail_without_tags() {
        let post = sample_post(&[]);
        let text = render(|out| post_detail(out, "First Post", Some(&post)));

        assert!(text.contains("Tags: No tags\n"));
    }

    #[test]
    fn test_post_detail_not_found() {
        let text = render(|out| post_detail(out, "Missing", None));
        assert_eq!(text, "Post 'Missing' not found.\n");
    }

    #[test]
    fn test_tagged_posts() {
        let posts = vec![TaggedPost {
            id: 3,
            title: "Tagged".to_string(),
            created_at: ts(),
        }];

        assert_eq!(
            render(|out| tagged_posts(out, "rust", &posts)),
            "Posts tagged with 'rust':\n3. Tagged (2024-03-01 10:15:30)\n"
        );
        assert_eq!(
            render(|out| tagged_posts(out, "go", &[])),
            "No posts found with tag 'go'.\n"
        );
    }

    #[test]
    fn test_tag_list() {
        let tags = vec![
            TagWithCount::new(Tag { id: 1, name: "rust".to_string() }, 2),
            TagWithCount::new(Tag { id: 2, name: "web".to_string() }, 1),
        ];

        assert_eq!(
            render(|out| tag_list(out, &tags)),
            "Tags:\nrust (2 posts)\nweb (1 post)\n"
        );
        assert_eq!(render(|out| tag_list(out, &[])), "No tags found.\n");
    }

    #[test]
    fn test_json_output() {
        let text = render(|out| json(out, &sample_post(&["rust"])));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["title"], "First Post");
        assert_eq!(value["tags"], serde_json::json!(["rust"]));
        assert!(text.ends_with('\n'));
    }
}
