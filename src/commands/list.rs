//! List site content

use anyhow::Result;

use crate::content::Post;
use crate::Site;

/// Print every published post, newest first
pub fn run(site: &Site) -> Result<()> {
    let posts = site.content_loader().load_posts()?;

    println!("Posts ({}):", posts.len());
    for post in &posts {
        println!("  {}", format_line(post));
    }

    Ok(())
}

fn format_line(post: &Post) -> String {
    let mark = if post.featured { "*" } else { " " };
    format!(
        "{} {} {} [{}]",
        mark,
        post.date.format("%Y-%m-%d"),
        post.title,
        post.slug
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::tests::fixture_posts;

    #[test]
    fn test_format_line_marks_featured() {
        let posts = fixture_posts();
        assert_eq!(
            format_line(&posts[0]),
            "* 2024-01-15 My First Bot [my-first-bot]"
        );
        assert_eq!(
            format_line(&posts[1]),
            "  2024-02-03 Learning Rust [learning-rust]"
        );
    }
}
