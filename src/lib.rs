//! # Lectern
//!
//! A terminal viewer for Markdown articles that carry a frontmatter header.
//!
//! ## Architecture
//!
//! Lectern follows a small pipeline:
//!
//! ```text
//! Resolve → Fetch → Split frontmatter → Render → UI
//! ```
//!
//! - [`fetcher`]: Path resolution plus HTTP and filesystem transports
//! - [`frontmatter`]: Splits the `---` delimited header from the body
//! - [`pipeline`]: Loading / Error / Loaded lifecycle with stale-result discard
//! - [`render`]: Markdown to a block tree, with syntax highlighted code
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Render an article relative to a directory
//! lectern --base ./public/articles show sample-article.md
//!
//! # Print its frontmatter as JSON
//! lectern --base https://example.com/articles meta sample-article.md --json
//!
//! # Write a new article from the sample
//! lectern new --sample --output ./public/articles
//!
//! # Launch TUI
//! lectern tui
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// the renderer and the library settings.
pub mod app;

/// Creating new article files.
pub mod authoring;

/// Configuration management.
///
/// Loads from `~/.config/lectern/config.toml`, supporting:
/// - The article library and its base location
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Command-line interface using clap.
///
/// - `show <path>` - Render an article as text
/// - `meta <path>` - Print the frontmatter
/// - `new` - Write a new article file
/// - `tui [paths]` - Launch the TUI
pub mod cli;

/// Core domain models.
///
/// - [`ArticleSource`](domain::ArticleSource): What to load and its fallback title
/// - [`ParsedArticle`](domain::ParsedArticle): Frontmatter plus body
/// - [`RenderState`](domain::RenderState): Loading, error or loaded
pub mod domain;

/// Article transports.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait returning the article text
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`FileFetcher`](fetcher::file_fetcher::FileFetcher): Local files and `file://` URLs
pub mod fetcher;

/// Frontmatter splitting.
///
/// [`split`](frontmatter::split) separates the leading `---` block of flat
/// `key: value` lines from the Markdown body. It never fails.
pub mod frontmatter;

/// Fetch-and-parse lifecycle for one article view.
pub mod pipeline;

/// Markdown rendering.
///
/// pulldown-cmark builds the block tree; syntect highlights fenced code.
pub mod render;

/// Terminal user interface.
///
/// Two-pane layout built with ratatui:
/// - Library pane (article list)
/// - Article pane (header and rendered body)
///
/// Keybindings: j/k navigate, Tab switches panes, Enter opens,
/// e opens the edit link, R reloads, m maximizes, q quits.
pub mod tui;
