//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Site;

/// Create a new post file with a front-matter scaffold
pub fn create_post(site: &Site, title: &str) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title: {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let front_matter = FrontMatter {
        title: Some(title.to_string()),
        slug: Some(slug),
        date: Some(chrono::Local::now().format("%Y-%m-%d").to_string()),
        category: Some("General".to_string()),
        read_time: Some("1 min read".to_string()),
        featured: false,
        draft: false,
    };
    let yaml = serde_yaml::to_string(&front_matter)?;
    fs::write(&file_path, format!("---\n{}---\n\n", yaml))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
