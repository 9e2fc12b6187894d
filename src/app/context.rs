use std::sync::Arc;

use crate::app::error::Result;
use crate::config::{Config, LibraryConfig};
use crate::domain::{ArticleHeader, ArticleSource, ParsedArticle};
use crate::fetcher::{DefaultFetcher, Fetcher};
use crate::pipeline::ArticlePipeline;
use crate::render::{Document, Highlighter, MarkdownRenderer};

pub struct AppContext {
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub renderer: Arc<MarkdownRenderer>,
    pub library: LibraryConfig,
}

impl AppContext {
    /// Build the context from config. `base_url` overrides the configured base.
    pub fn new(config: &Config, base_url: Option<String>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(DefaultFetcher::new()?);
        Ok(Self::with_fetcher(config, base_url, fetcher))
    }

    pub fn with_fetcher(
        config: &Config,
        base_url: Option<String>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        let mut library = config.library.clone();
        if let Some(base_url) = base_url {
            library.base_url = base_url;
        }

        let highlighter = Highlighter::new(&library.code_theme);
        let renderer = Arc::new(MarkdownRenderer::new(highlighter));

        Self {
            fetcher,
            renderer,
            library,
        }
    }

    /// A fresh pipeline resolving against the library base.
    pub fn pipeline(&self) -> ArticlePipeline {
        ArticlePipeline::new(self.fetcher.clone(), self.library.base_url.clone())
    }

    pub fn edit_url(&self, source: &ArticleSource) -> Option<String> {
        source.edit_url(&self.library.edit_url_template)
    }

    /// Header and rendered body for a loaded article.
    pub fn present(
        &self,
        source: Option<&ArticleSource>,
        article: &ParsedArticle,
    ) -> (ArticleHeader, Document) {
        let fallback = source.and_then(|s| s.title.as_deref());
        let header = ArticleHeader::derive(&article.frontmatter, fallback);
        let document = self.renderer.render(&article.body);
        (header, document)
    }
}
