//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# CodeFlare site configuration

# Site
title: CodeFlare
subtitle: Learn to code in the AI era
description: Real stories, honest experiences, and practical tips from my coding journey.
author: Rayan
email: ''

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: posts
static_dir: static
public_dir: public

# Display
date_format: M/D/YYYY
featured_excerpt_length: 200
excerpt_length: 150
default_theme: system

# Post bodies are trusted markup; set to true to strip scripts and handlers
sanitize_content: false

highlight:
  theme: base16-ocean.dark
  line_number: false

menu:
  - name: Home
    path: /
  - name: About
    path: /about
  - name: Blog
    path: /blog
  - name: Subscribe
    path: /subscribe

home:
  headline: Learn to code in the AI era
  tagline: Real stories, honest experiences, and practical tips from my coding journey.
  cards:
    - title: Latest Blog Posts
      description: Fresh insights, tutorials, and stories from the coding trenches.
      link: /blog
    - title: Weekly Newsletter
      description: Get coding tips, AI insights, and motivation delivered to your inbox.
      link: /subscribe

about:
  intro: >-
    A passionate developer and educator on a mission to make AI development
    accessible and exciting for everyone.
  stats:
    - label: Articles Published
      value: 50+
    - label: Community Members
      value: 1000+
    - label: Years of Experience
      value: 5+
    - label: Coffee Consumed
      value: "∞"
  story:
    - >-
      My journey into the world of programming began over 5 years ago when I wrote
      my first "Hello, World!" program. What started as curiosity quickly became a
      passion that has shaped my entire career and life philosophy.
    - >-
      CodeFlare was born from my desire to share this excitement with others. AI
      development shouldn't be intimidating or exclusive.
  values:
    - title: Clean Code
      description: Code that's not just functional, but readable, maintainable, and elegant.
    - title: Community
      description: A supportive community where developers can learn, share, and grow together.

newsletter:
  enable: true
  store: subscribers.json
  welcome_message: Welcome to the CodeFlare community!
"#;

const STYLE: &str = r#":root {
  --bg: #ffffff;
  --fg: #1a1a2e;
  --muted: #6b7280;
  --primary: #7c3aed;
  --accent: #06b6d4;
  --card: #f8f8fc;
}

[data-theme="dark"] {
  --bg: #0f0f1a;
  --fg: #e5e7eb;
  --muted: #9ca3af;
  --card: #1a1a2e;
}

@media (prefers-color-scheme: dark) {
  [data-theme="system"] {
    --bg: #0f0f1a;
    --fg: #e5e7eb;
    --muted: #9ca3af;
    --card: #1a1a2e;
  }
}

body {
  margin: 0;
  font-family: system-ui, sans-serif;
  background: var(--bg);
  color: var(--fg);
}

main { max-width: 64rem; margin: 0 auto; padding: 2rem 1rem; }
a { color: var(--primary); }

.site-nav { display: flex; align-items: center; gap: 1.5rem; padding: 1rem; }
.site-nav .nav-items { display: flex; gap: 1rem; list-style: none; margin: 0; padding: 0; }
.site-nav a.active { font-weight: 600; text-decoration: underline; }

.gradient-text {
  background: linear-gradient(90deg, var(--primary), var(--accent));
  -webkit-background-clip: text;
  background-clip: text;
  color: transparent;
}

.post-featured, .post-card, .feature-card {
  background: var(--card);
  border-radius: 0.75rem;
  padding: 1.5rem;
  margin-bottom: 1.5rem;
}

.post-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(18rem, 1fr)); gap: 1.5rem; }
.post-meta { color: var(--muted); font-size: 0.875rem; display: flex; gap: 0.75rem; }
.badge { border-radius: 999px; padding: 0 0.5rem; background: var(--primary); color: #fff; }
.button { display: inline-block; padding: 0.5rem 1.25rem; border-radius: 0.5rem; background: var(--primary); color: #fff; text-decoration: none; }
.button.outline { background: transparent; color: var(--primary); border: 1px solid var(--primary); }
.error { color: #dc2626; }
"#;

const SAMPLE_POST: &str = r#"---
title: Building My First AI Bot
slug: my-first-bot
date: {date}
category: AI
read_time: 5 min read
featured: true
---

I finally shipped my first chat bot. It answers questions about my own blog
posts, and it only took three rewrites.

## Wiring it up

```python
def reply(message):
    return model.complete(prompt=message)
```

The hard part was not the model. It was everything around it.
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let files = [
        ("_config.yml", CONFIG.to_string()),
        ("posts/my-first-bot.md", SAMPLE_POST.replace("{date}", &date)),
        ("static/style.css", STYLE.to_string()),
    ];

    for (relative, content) in files {
        let path = target_dir.join(relative);
        if path.exists() {
            tracing::warn!("Skipping existing file: {:?}", path);
            continue;
        }
        fs::write(&path, content)?;
        tracing::debug!("Created: {:?}", path);
    }

    Ok(())
}
