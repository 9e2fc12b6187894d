use ratatui::widgets::ListState;

use crate::app::AppContext;
use crate::domain::{ArticleHeader, ArticleSource, RenderState};
use crate::pipeline::ArticlePipeline;
use crate::render::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Library,
    Article,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Library => ActivePane::Article,
            ActivePane::Article => ActivePane::Library,
        }
    }

    pub fn prev(self) -> Self {
        // Only two panes, so both directions toggle
        self.next()
    }
}

/// What the article pane shows, rebuilt whenever the pipeline state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleView {
    Empty,
    Loading,
    Error(String),
    Loaded {
        header: ArticleHeader,
        document: Document,
        edit_url: Option<String>,
    },
}

pub const PAGE_SIZE: usize = 10;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TuiApp {
    pub active_pane: ActivePane,
    pub articles: Vec<ArticleSource>,
    pub index: usize,
    pub list_state: ListState,
    pub view: ArticleView,
    pub article_scroll: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub maximized: bool,
    ticks: usize,
}

impl TuiApp {
    pub fn new(articles: Vec<ArticleSource>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            active_pane: ActivePane::Library,
            articles,
            index: 0,
            list_state,
            view: ArticleView::Empty,
            article_scroll: 0,
            should_quit: false,
            status_message: None,
            maximized: false,
            ticks: 0,
        }
    }

    pub fn selected_article(&self) -> Option<&ArticleSource> {
        self.articles.get(self.index)
    }

    /// Start loading the selected article and focus the article pane.
    pub fn open_selected(&mut self, pipeline: &mut ArticlePipeline) {
        if let Some(source) = self.selected_article() {
            pipeline.set_source(source.clone());
            self.article_scroll = 0;
            self.active_pane = ActivePane::Article;
        }
    }

    /// Rebuild the article view from the pipeline's current state.
    pub fn sync_view(&mut self, ctx: &AppContext, pipeline: &ArticlePipeline) {
        self.view = match pipeline.current_state() {
            _ if pipeline.source().is_none() => ArticleView::Empty,
            RenderState::Loading => ArticleView::Loading,
            RenderState::Error(message) => ArticleView::Error(message.clone()),
            RenderState::Loaded(article) => {
                let (header, document) = ctx.present(pipeline.source(), article);
                ArticleView::Loaded {
                    header,
                    document,
                    edit_url: pipeline.source().and_then(|s| ctx.edit_url(s)),
                }
            }
        };
    }

    pub fn edit_url(&self) -> Option<&str> {
        match &self.view {
            ArticleView::Loaded { edit_url, .. } => edit_url.as_deref(),
            _ => None,
        }
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.ticks % SPINNER.len()]
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Library => {
                if self.index > 0 {
                    self.index -= 1;
                    self.list_state.select(Some(self.index));
                }
            }
            ActivePane::Article => {
                self.article_scroll = self.article_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Library => {
                if self.index + 1 < self.articles.len() {
                    self.index += 1;
                    self.list_state.select(Some(self.index));
                }
            }
            ActivePane::Article => {
                self.article_scroll = self.article_scroll.saturating_add(1);
            }
        }
    }

    pub fn next_page(&mut self) {
        match self.active_pane {
            ActivePane::Library => {
                let max_index = self.articles.len().saturating_sub(1);
                self.index = (self.index + PAGE_SIZE).min(max_index);
                self.list_state.select(Some(self.index));
            }
            ActivePane::Article => {
                self.article_scroll = self.article_scroll.saturating_add(PAGE_SIZE as u16);
            }
        }
    }

    pub fn prev_page(&mut self) {
        match self.active_pane {
            ActivePane::Library => {
                self.index = self.index.saturating_sub(PAGE_SIZE);
                self.list_state.select(Some(self.index));
            }
            ActivePane::Article => {
                self.article_scroll = self.article_scroll.saturating_sub(PAGE_SIZE as u16);
            }
        }
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        if self.maximized {
            self.active_pane = ActivePane::Article;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetcher::Fetcher;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn library(n: usize) -> Vec<ArticleSource> {
        (0..n)
            .map(|i| ArticleSource::new(format!("a{}.md", i)))
            .collect()
    }

    struct StaticFetcher;

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &str) -> crate::app::Result<String> {
            Ok("---\nauthor: Ada\n---\n# Body".to_string())
        }
    }

    #[test]
    fn test_library_navigation_is_bounded() {
        let mut app = TuiApp::new(library(3));

        app.move_up();
        assert_eq!(app.index, 0);

        app.move_down();
        app.move_down();
        app.move_down();
        assert_eq!(app.index, 2);
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn test_paging() {
        let mut app = TuiApp::new(library(25));

        app.next_page();
        assert_eq!(app.index, 10);
        app.next_page();
        app.next_page();
        assert_eq!(app.index, 24);
        app.prev_page();
        assert_eq!(app.index, 14);

        app.active_pane = ActivePane::Article;
        app.next_page();
        app.move_up();
        assert_eq!(app.article_scroll, 9);
        assert_eq!(app.index, 14);
    }

    #[test]
    fn test_empty_library() {
        let mut app = TuiApp::new(Vec::new());
        app.move_down();
        app.next_page();
        assert_eq!(app.index, 0);
        assert!(app.selected_article().is_none());
    }

    #[test]
    fn test_maximize_focuses_article() {
        let mut app = TuiApp::new(library(1));
        app.toggle_maximize();
        assert!(app.maximized);
        assert_eq!(app.active_pane, ActivePane::Article);
        app.toggle_maximize();
        assert!(!app.maximized);
    }

    #[test]
    fn test_pane_cycle() {
        assert_eq!(ActivePane::Library.next(), ActivePane::Article);
        assert_eq!(ActivePane::Article.next(), ActivePane::Library);
        assert_eq!(ActivePane::Library.prev(), ActivePane::Article);
    }

    #[test]
    fn test_spinner_advances() {
        let mut app = TuiApp::new(Vec::new());
        let first = app.spinner();
        app.tick();
        assert_ne!(app.spinner(), first);
    }

    #[tokio::test]
    async fn test_open_selected_loads_into_view() {
        let ctx = AppContext::with_fetcher(&Config::default(), None, Arc::new(StaticFetcher));
        let mut pipeline = ctx.pipeline();
        let mut app = TuiApp::new(vec![ArticleSource::new("notes.md").with_title("Notes")]);

        app.sync_view(&ctx, &pipeline);
        assert_eq!(app.view, ArticleView::Empty);

        app.open_selected(&mut pipeline);
        app.sync_view(&ctx, &pipeline);
        assert_eq!(app.view, ArticleView::Loading);
        assert_eq!(app.active_pane, ActivePane::Article);

        pipeline.settle().await;
        app.sync_view(&ctx, &pipeline);
        match &app.view {
            ArticleView::Loaded { header, edit_url, .. } => {
                assert_eq!(header.title.as_deref(), Some("Notes"));
                assert_eq!(
                    edit_url.as_deref(),
                    Some("https://github.com/article-library/articles/edit/main/public/notes.md")
                );
            }
            other => panic!("expected loaded view, got {:?}", other),
        }
        assert!(app.edit_url().is_some());
    }
}
