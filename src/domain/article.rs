use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifies an article by its logical path, with an optional title to show
/// when the article's own frontmatter has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ArticleSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Two sources are the same article when their paths match.
    pub fn same_article(&self, other: &ArticleSource) -> bool {
        self.path == other.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Label for list views: the fallback title, else the path.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.path)
    }

    /// Build the "edit this article" URL from a template containing `{path}`.
    ///
    /// Uses the logical path as given (not the resolved location), with
    /// leading slashes stripped. Returns `None` when there is no path.
    pub fn edit_url(&self, template: &str) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        Some(template.replace("{path}", self.path.trim_start_matches('/')))
    }
}

/// Flat `key: value` metadata read from the head of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, String>);

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fm = Frontmatter::new();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

/// Result of splitting a raw article into metadata and Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArticle {
    pub frontmatter: Frontmatter,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://github.com/acme/articles/edit/main/public/{path}";

    #[test]
    fn test_edit_url_strips_leading_slashes() {
        let source = ArticleSource::new("//articles/intro.md");
        assert_eq!(
            source.edit_url(TEMPLATE).as_deref(),
            Some("https://github.com/acme/articles/edit/main/public/articles/intro.md")
        );
    }

    #[test]
    fn test_edit_url_uses_unresolved_path() {
        let source = ArticleSource::new("notes/today.md");
        assert_eq!(
            source.edit_url(TEMPLATE).as_deref(),
            Some("https://github.com/acme/articles/edit/main/public/notes/today.md")
        );
    }

    #[test]
    fn test_edit_url_none_without_path() {
        assert_eq!(ArticleSource::new("").edit_url(TEMPLATE), None);
    }

    #[test]
    fn test_same_article_ignores_title() {
        let a = ArticleSource::new("a.md").with_title("First");
        let b = ArticleSource::new("a.md").with_title("Second");
        assert!(a.same_article(&b));
        assert!(!a.same_article(&ArticleSource::new("b.md")));
    }

    #[test]
    fn test_display_title_falls_back_to_path() {
        assert_eq!(ArticleSource::new("a.md").display_title(), "a.md");
        assert_eq!(
            ArticleSource::new("a.md").with_title("").display_title(),
            "a.md"
        );
        assert_eq!(
            ArticleSource::new("a.md").with_title("Intro").display_title(),
            "Intro"
        );
    }

    #[test]
    fn test_frontmatter_get_non_empty() {
        let fm: Frontmatter = [("title", ""), ("author", "Ada")].into_iter().collect();
        assert_eq!(fm.get("title"), Some(""));
        assert_eq!(fm.get_non_empty("title"), None);
        assert_eq!(fm.get_non_empty("author"), Some("Ada"));
        assert_eq!(fm.len(), 2);
    }
}
