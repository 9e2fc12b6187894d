//! Emitting new article files in the frontmatter format the viewer reads.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::app::{LecternError, Result};

const SAMPLE_BODY: &str = r#"# Welcome to the Article Library

This sample article illustrates how Markdown is rendered in the application. It includes several typical elements you may rely on when writing long-form documentation.

## Key Features

- **Headings** from level one through level three
- Paragraph text with thoughtful spacing
- Inline code such as `npm install` for command snippets
- Syntax highlighted code blocks

```javascript
function greet(name) {
  return `Hello, ${name}!`
}

console.log(greet('reader'))
```

## Pull quotes

> Great documentation is just like great storytelling. It guides the reader with clarity and intentional structure.

### Next steps

1. Replace this Markdown file with your own content.
2. Add more entries to the library in your config.
3. Pick a code theme that suits your terminal.

| Status | Description |
| ------ | ----------- |
| ✅     | Markdown file loaded and displayed |
| 🛠️    | Ready for customization |

Happy writing!"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub author: String,
    /// `YYYY-MM-DD`
    pub created: String,
    pub content: String,
}

impl ArticleDraft {
    /// An empty draft dated today.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            author: String::new(),
            created: today(),
            content: String::new(),
        }
    }

    /// A draft exercising headings, lists, code, quotes and tables.
    pub fn sample() -> Self {
        Self {
            title: "Sample Article".to_string(),
            summary: "A comprehensive example demonstrating various Markdown features.".to_string(),
            author: "Article Library Team".to_string(),
            created: today(),
            content: SAMPLE_BODY.to_string(),
        }
    }

    /// The full file text. Values are written unquoted.
    pub fn to_markdown(&self) -> String {
        format!(
            "---\ntitle: {}\nsummary: {}\nauthor: {}\ncreated: {}\n---\n\n{}",
            self.title, self.summary, self.author, self.created, self.content
        )
    }

    /// Slugified title with an `.md` extension, or `article.md` for an
    /// empty title.
    pub fn file_name(&self) -> String {
        if self.title.is_empty() {
            return "article.md".to_string();
        }

        let mut slug = String::with_capacity(self.title.len());
        let mut in_gap = false;
        for c in self.title.to_lowercase().chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                slug.push(c);
                in_gap = false;
            } else if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        }
        format!("{}.md", slug)
    }

    /// Write the draft into `dir` and return the file's path.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn write_to(&self, dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        if path.exists() && !force {
            return Err(LecternError::Other(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        std::fs::create_dir_all(dir)?;
        std::fs::write(&path, self.to_markdown())?;
        info!("Wrote article {}", path.display());
        Ok(path)
    }
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self::new()
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
