use std::path::Path;

use chrono::NaiveDate;
use url::Url;

use crate::app::{AppContext, LecternError, Result};
use crate::authoring::ArticleDraft;
use crate::cli::NewArgs;
use crate::config::{ColorConfig, Config};
use crate::domain::{ArticleSource, ParsedArticle, RenderState};
use crate::pipeline::ArticlePipeline;
use crate::render::terminal::{document_lines, header_lines, to_plain_text};

/// Column width used for rules when printing to stdout.
pub const SHOW_WIDTH: usize = 80;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Article source for a path given on the command line. Absolute
/// filesystem paths become `file://` URLs so they bypass the base.
pub fn source_for(path: &str) -> ArticleSource {
    if Path::new(path).is_absolute() {
        if let Ok(url) = Url::from_file_path(path) {
            return ArticleSource::new(url.to_string());
        }
    }
    ArticleSource::new(path)
}

pub async fn show(ctx: &AppContext, path: &str, title: Option<String>) -> Result<()> {
    let mut source = source_for(path);
    if let Some(title) = title {
        source = source.with_title(title);
    }
    print!("{}", render_article(ctx, source, SHOW_WIDTH).await?);
    Ok(())
}

/// Fetch and render an article as plain text: header, rule, then body.
pub async fn render_article(ctx: &AppContext, source: ArticleSource, width: usize) -> Result<String> {
    let mut pipeline = ctx.pipeline();
    pipeline.set_source(source);
    let article = load(&mut pipeline).await?;

    let (header, document) = ctx.present(pipeline.source(), &article);
    let edit_url = pipeline.source().and_then(|s| ctx.edit_url(s));

    let colors = ColorConfig::default();
    let mut lines = header_lines(&header, edit_url.as_deref(), &colors, width);
    lines.extend(document_lines(&document, &colors, width));
    Ok(to_plain_text(&lines))
}

pub async fn meta(ctx: &AppContext, path: &str, json: bool) -> Result<()> {
    print!("{}", frontmatter_text(ctx, path, json).await?);
    Ok(())
}

/// The article's frontmatter as `key: value` lines, or as a JSON object.
pub async fn frontmatter_text(ctx: &AppContext, path: &str, json: bool) -> Result<String> {
    let mut pipeline = ctx.pipeline();
    pipeline.set_source(source_for(path));
    let article = load(&mut pipeline).await?;

    if json {
        let mut out = serde_json::to_string_pretty(&article.frontmatter)
            .map_err(|e| LecternError::Other(e.to_string()))?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for (key, value) in article.frontmatter.iter() {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    Ok(out)
}

async fn load(pipeline: &mut ArticlePipeline) -> Result<ParsedArticle> {
    match pipeline.settle().await {
        RenderState::Loaded(article) => Ok(article.clone()),
        RenderState::Error(message) => Err(LecternError::Load(message.clone())),
        RenderState::Loading => Err(LecternError::Load("No article selected".to_string())),
    }
}

pub fn new_article(options: &NewArgs) -> Result<()> {
    let draft = build_draft(options)?;

    if options.stdout {
        print!("{}", draft.to_markdown());
        return Ok(());
    }

    let path = draft.write_to(&options.output, options.force)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Start from an empty or sample draft and apply the given fields.
pub fn build_draft(options: &NewArgs) -> Result<ArticleDraft> {
    let mut draft = if options.sample {
        ArticleDraft::sample()
    } else {
        ArticleDraft::new()
    };

    if let Some(title) = &options.title {
        draft.title = title.clone();
    }
    if let Some(summary) = &options.summary {
        draft.summary = summary.clone();
    }
    if let Some(author) = &options.author {
        draft.author = author.clone();
    }
    if let Some(created) = &options.created {
        NaiveDate::parse_from_str(created, "%Y-%m-%d").map_err(|_| {
            LecternError::Other(format!("Invalid created date (expected YYYY-MM-DD): {}", created))
        })?;
        draft.created = created.clone();
    }
    if let Some(path) = &options.content_file {
        draft.content = std::fs::read_to_string(path)?;
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::file_fetcher::FileFetcher;
    use std::sync::Arc;

    fn context(dir: &Path) -> AppContext {
        AppContext::with_fetcher(
            &Config::default(),
            Some(dir.display().to_string()),
            Arc::new(FileFetcher::new()),
        )
    }

    #[tokio::test]
    async fn test_render_article_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.md"),
            "---\ntitle: Hello\nauthor: Ada\ncreated: 2024-03-05\n---\n\nSome *text*.",
        )
        .unwrap();

        let ctx = context(dir.path());
        let text = render_article(&ctx, ArticleSource::new("a.md"), 10)
            .await
            .unwrap();

        assert_eq!(
            text,
            "Hello\n\
             By Ada · March 5, 2024\n\
             Edit this article: https://github.com/article-library/articles/edit/main/public/a.md\n\
             \n\
             ──────────\n\
             \n\
             Some text.\n"
        );
    }

    #[tokio::test]
    async fn test_render_article_uses_fallback_title() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "Just a body").unwrap();

        let ctx = context(dir.path());
        let text = render_article(&ctx, ArticleSource::new("b.md").with_title("Fallback"), 4)
            .await
            .unwrap();
        assert!(text.starts_with("Fallback\n"));
        assert!(text.ends_with("Just a body\n"));
    }

    #[tokio::test]
    async fn test_missing_article_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());

        let err = render_article(&ctx, ArticleSource::new("missing.md"), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, LecternError::Load(_)));
        assert_eq!(
            err.to_string(),
            "Unable to display the article: Failed to load article (status 404)"
        );
    }

    #[tokio::test]
    async fn test_frontmatter_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.md"),
            "---\ntitle: \"Quoted\"\nauthor: Ada\n---\nBody",
        )
        .unwrap();
        let ctx = context(dir.path());

        let text = frontmatter_text(&ctx, "a.md", false).await.unwrap();
        assert_eq!(text, "author: Ada\ntitle: Quoted\n");

        let json = frontmatter_text(&ctx, "a.md", true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Quoted");
        assert_eq!(value["author"], "Ada");
    }

    #[tokio::test]
    async fn test_absolute_paths_bypass_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abs.md");
        std::fs::write(&path, "---\ntitle: Abs\n---\nBody").unwrap();

        let source = source_for(&path.display().to_string());
        assert!(source.path.starts_with("file://"));
        assert_eq!(source_for("notes.md").path, "notes.md");

        let ctx = context(Path::new("/nonexistent"));
        let text = frontmatter_text(&ctx, &path.display().to_string(), false)
            .await
            .unwrap();
        assert_eq!(text, "title: Abs\n");
    }

    #[test]
    fn test_build_draft_overrides_sample() {
        let options = NewArgs {
            title: Some("Mine".to_string()),
            created: Some("2024-01-02".to_string()),
            sample: true,
            ..Default::default()
        };
        let draft = build_draft(&options).unwrap();

        assert_eq!(draft.title, "Mine");
        assert_eq!(draft.author, "Article Library Team");
        assert_eq!(draft.created, "2024-01-02");
    }

    #[test]
    fn test_build_draft_rejects_bad_date() {
        let options = NewArgs {
            created: Some("March 5".to_string()),
            ..Default::default()
        };
        assert!(build_draft(&options).is_err());
    }

    #[test]
    fn test_new_article_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = dir.path().join("body.md");
        std::fs::write(&body, "# Body").unwrap();

        let options = NewArgs {
            title: Some("My First Post".to_string()),
            summary: Some("S".to_string()),
            author: Some("A".to_string()),
            created: Some("2024-03-05".to_string()),
            content_file: Some(body),
            output: dir.path().to_path_buf(),
            ..Default::default()
        };
        new_article(&options).unwrap();

        let written = std::fs::read_to_string(dir.path().join("my-first-post.md")).unwrap();
        assert_eq!(
            written,
            "---\ntitle: My First Post\nsummary: S\nauthor: A\ncreated: 2024-03-05\n---\n\n# Body"
        );
    }
}
