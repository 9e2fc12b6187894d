//! Fetch-and-parse lifecycle for a single article view.
//!
//! ```text
//! set_source ─► Loading ─► fetch task ─► (generation, outcome) ─► Error | Loaded
//! ```
//!
//! Each fetch runs as its own tokio task and reports back over a channel
//! tagged with the generation it was started under. The pipeline applies an
//! outcome only if that generation is still current, so a slow response for
//! an article the user already navigated away from can never overwrite the
//! newer one.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::LecternError;
use crate::domain::{ArticleSource, ParsedArticle, RenderState};
use crate::fetcher::{resolve, Fetcher};
use crate::frontmatter;

/// Result of one fetch attempt, sent back from its task.
#[derive(Debug)]
struct FetchOutcome {
    generation: u64,
    result: std::result::Result<ParsedArticle, String>,
}

pub struct ArticlePipeline {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    base_url: String,
    source: Option<ArticleSource>,
    state: RenderState,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl ArticlePipeline {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, base_url: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            base_url: base_url.into(),
            source: None,
            state: RenderState::Loading,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn current_state(&self) -> &RenderState {
        &self.state
    }

    pub fn source(&self) -> Option<&ArticleSource> {
        self.source.as_ref()
    }

    /// Bumped every time a new fetch is started.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Point the view at `source`.
    ///
    /// A different path starts a new fetch and supersedes any in flight.
    /// The same path only refreshes the fallback title.
    pub fn set_source(&mut self, source: ArticleSource) {
        if let Some(current) = &self.source {
            if current.same_article(&source) {
                self.source = Some(source);
                return;
            }
        }

        self.source = Some(source);
        self.start_fetch();
    }

    /// Fetch the current source again.
    pub fn reload(&mut self) {
        if self.source.is_some() {
            self.start_fetch();
        }
    }

    /// Apply every outcome that has already arrived. Never blocks.
    ///
    /// Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait until the current fetch has finished and return the final state.
    /// Returns immediately when no source was ever set.
    pub async fn settle(&mut self) -> &RenderState {
        while self.source.is_some() && self.state.is_loading() {
            match self.rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
        &self.state
    }

    fn start_fetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;

        if let Some(handle) = self.in_flight.take() {
            debug!("Superseding in-flight fetch");
            handle.abort();
        }

        let Some(source) = self.source.as_ref() else {
            return;
        };

        if source.is_empty() {
            self.state = RenderState::Error("No article selected".to_string());
            return;
        }

        let url = resolve(&source.path, &self.base_url);
        self.state = RenderState::Loading;
        info!("Loading article {} from {}", source.path, url);

        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let load = async {
                let text = fetcher.fetch_text(&url).await?;
                Ok::<_, LecternError>(frontmatter::split(&text))
            };
            // A panicking fetcher must still report, or `settle` waits forever.
            let result = match AssertUnwindSafe(load).catch_unwind().await {
                Ok(Ok(article)) => Ok(article),
                Ok(Err(e)) => {
                    warn!("Failed to load {}: {}", url, e);
                    Err(e.to_string())
                }
                Err(_) => {
                    warn!("Fetch task for {} panicked", url);
                    Err("Failed to load article".to_string())
                }
            };
            // The receiver lives as long as the pipeline; a send error only
            // means the view was dropped.
            let _ = tx.send(FetchOutcome { generation, result });
        }));
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Discarding stale result (generation {} < {})",
                outcome.generation, self.generation
            );
            return false;
        }

        self.in_flight = None;
        self.state = match outcome.result {
            Ok(article) => RenderState::Loaded(article),
            Err(message) => RenderState::Error(message),
        };
        true
    }
}

impl Drop for ArticlePipeline {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::app::Result;

    /// Serves canned responses, each held back until its gate is opened.
    #[derive(Default)]
    struct GatedFetcher {
        routes: Mutex<HashMap<String, (Arc<Notify>, u16, String)>>,
        requested: Mutex<Vec<String>>,
    }

    impl GatedFetcher {
        fn route(&self, url: &str, status: u16, body: &str) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.routes.lock().unwrap().insert(
                url.to_string(),
                (gate.clone(), status, body.to_string()),
            );
            gate
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for GatedFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            let route = self.routes.lock().unwrap().get(url).cloned();
            let Some((gate, status, body)) = route else {
                return Err(LecternError::Other(format!("no route for {}", url)));
            };
            gate.notified().await;
            if (200..300).contains(&status) {
                Ok(body)
            } else {
                Err(LecternError::Status {
                    status,
                    url: url.to_string(),
                })
            }
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl Fetcher for PanickingFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            panic!("transport blew up on {}", url);
        }
    }

    fn pipeline(fetcher: &Arc<GatedFetcher>) -> ArticlePipeline {
        ArticlePipeline::new(fetcher.clone(), "/articles/")
    }

    #[tokio::test]
    async fn test_loads_and_splits_article() {
        let fetcher = Arc::new(GatedFetcher::default());
        fetcher
            .route("/articles/a.md", 200, "---\ntitle: A\n---\nHello")
            .notify_one();

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("a.md"));
        assert!(pipeline.current_state().is_loading());

        let article = pipeline.settle().await.article().cloned().unwrap();
        assert_eq!(article.frontmatter.get("title"), Some("A"));
        assert_eq!(article.body, "Hello");
        assert_eq!(fetcher.requested(), vec!["/articles/a.md"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error_with_code() {
        let fetcher = Arc::new(GatedFetcher::default());
        fetcher.route("/articles/missing.md", 404, "").notify_one();

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("missing.md"));

        let message = pipeline.settle().await.error().unwrap().to_string();
        assert!(message.contains("404"), "message: {}", message);
    }

    #[tokio::test]
    async fn test_transport_error_is_error_state() {
        let fetcher = Arc::new(GatedFetcher::default());
        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("nowhere.md"));

        let state = pipeline.settle().await;
        assert!(state.error().unwrap().contains("no route"));
    }

    #[tokio::test]
    async fn test_panicking_fetch_becomes_error() {
        let mut pipeline = ArticlePipeline::new(Arc::new(PanickingFetcher), "/articles/");
        pipeline.set_source(ArticleSource::new("a.md"));

        let state = tokio::time::timeout(Duration::from_secs(2), pipeline.settle())
            .await
            .expect("settle should not hang on a panicking fetch")
            .clone();
        assert_eq!(state, RenderState::Error("Failed to load article".to_string()));

        // The pipeline keeps working after the panic.
        pipeline.reload();
        assert!(pipeline.current_state().is_loading());
    }

    #[tokio::test]
    async fn test_newer_source_wins_when_older_resolves_later() {
        let fetcher = Arc::new(GatedFetcher::default());
        let gate_a = fetcher.route("/articles/a.md", 200, "---\ntitle: A\n---\nfrom a");
        let gate_b = fetcher.route("/articles/b.md", 200, "---\ntitle: B\n---\nfrom b");

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("a.md"));
        pipeline.set_source(ArticleSource::new("b.md"));

        gate_b.notify_one();
        let article = pipeline.settle().await.article().cloned().unwrap();
        assert_eq!(article.body, "from b");

        gate_a.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pipeline.poll());
        assert_eq!(pipeline.current_state().article().unwrap().body, "from b");
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let fetcher = Arc::new(GatedFetcher::default());
        fetcher.route("/articles/b.md", 200, "from b");

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("a.md"));
        let stale_generation = pipeline.generation();
        pipeline.set_source(ArticleSource::new("b.md"));

        let applied = pipeline.apply(FetchOutcome {
            generation: stale_generation,
            result: Ok(ParsedArticle {
                body: "from a".to_string(),
                ..Default::default()
            }),
        });
        assert!(!applied);
        assert!(pipeline.current_state().is_loading());

        let applied = pipeline.apply(FetchOutcome {
            generation: stale_generation,
            result: Err("Failed to load article (status 500)".to_string()),
        });
        assert!(!applied);
        assert!(pipeline.current_state().is_loading());
    }

    #[tokio::test]
    async fn test_same_path_does_not_refetch() {
        let fetcher = Arc::new(GatedFetcher::default());
        fetcher.route("/articles/a.md", 200, "body").notify_one();

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("a.md"));
        pipeline.settle().await;
        let generation = pipeline.generation();

        pipeline.set_source(ArticleSource::new("a.md").with_title("Renamed"));
        assert_eq!(pipeline.generation(), generation);
        assert_eq!(pipeline.source().unwrap().title.as_deref(), Some("Renamed"));
        assert!(pipeline.current_state().article().is_some());
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_fetches_again() {
        let fetcher = Arc::new(GatedFetcher::default());
        let gate = fetcher.route("/articles/a.md", 200, "body");
        gate.notify_one();

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("a.md"));
        pipeline.settle().await;

        pipeline.reload();
        assert!(pipeline.current_state().is_loading());
        gate.notify_one();
        assert!(pipeline.settle().await.article().is_some());
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_path_is_error_without_fetch() {
        let fetcher = Arc::new(GatedFetcher::default());
        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new(""));

        assert_eq!(
            pipeline.current_state(),
            &RenderState::Error("No article selected".to_string())
        );
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_error_then_new_source_recovers() {
        let fetcher = Arc::new(GatedFetcher::default());
        fetcher.route("/articles/bad.md", 500, "").notify_one();
        fetcher.route("/articles/good.md", 200, "ok").notify_one();

        let mut pipeline = pipeline(&fetcher);
        pipeline.set_source(ArticleSource::new("bad.md"));
        assert!(pipeline.settle().await.error().is_some());

        pipeline.set_source(ArticleSource::new("good.md"));
        assert!(pipeline.current_state().is_loading());
        assert_eq!(pipeline.settle().await.article().unwrap().body, "ok");
    }

    #[test]
    fn test_poll_without_runtime_activity() {
        tokio_test::block_on(async {
            let fetcher = Arc::new(GatedFetcher::default());
            let mut pipeline = pipeline(&fetcher);
            assert!(!pipeline.poll());
            assert!(pipeline.current_state().is_loading());
            assert!(pipeline.source().is_none());
        });
    }
}
