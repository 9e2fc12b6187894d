/// Combine a logical article path with the base location articles are
/// served from.
///
/// Empty paths and absolute URLs (`https://…`, `//host/…`) come back
/// unchanged. Anything else is joined to `base_url` with exactly one `/`, so
/// the same path works whether the library is served from a root or a
/// sub-path.
pub fn resolve(path: &str, base_url: &str) -> String {
    if path.is_empty() || is_absolute_url(path) {
        return path.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `^([A-Za-z][A-Za-z0-9+.-]*:)?//`
fn is_absolute_url(path: &str) -> bool {
    path.starts_with("//") || url_scheme(path).is_some()
}

/// The scheme of a `scheme://…` URL, if `path` is one.
pub(crate) fn url_scheme(path: &str) -> Option<&str> {
    let (scheme, rest) = path.split_once(':')?;
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));

    (valid_scheme && rest.starts_with("//")).then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_urls_unchanged() {
        assert_eq!(resolve("http://x/y", "/base"), "http://x/y");
        assert_eq!(resolve("https://x/y.md", "/base/"), "https://x/y.md");
        assert_eq!(resolve("//cdn.example.com/a.md", "/base"), "//cdn.example.com/a.md");
        assert_eq!(resolve("file:///tmp/a.md", "/base"), "file:///tmp/a.md");
    }

    #[test]
    fn test_empty_path_unchanged() {
        assert_eq!(resolve("", "/base"), "");
        assert_eq!(resolve("", "https://example.com/"), "");
    }

    #[test]
    fn test_relative_join_single_slash() {
        assert_eq!(resolve("a/b", "/base/"), "/base/a/b");
        assert_eq!(resolve("/a/b", "/base"), "/base/a/b");
        assert_eq!(resolve("///a/b", "/base///"), "/base/a/b");
        assert_eq!(resolve("a.md", "https://example.com/docs/"), "https://example.com/docs/a.md");
    }

    #[test]
    fn test_root_base() {
        assert_eq!(resolve("articles/a.md", "/"), "/articles/a.md");
        assert_eq!(resolve("articles/a.md", ""), "/articles/a.md");
    }

    #[test]
    fn test_url_scheme() {
        assert_eq!(url_scheme("https://x/y"), Some("https"));
        assert_eq!(url_scheme("ftp://host/a.md"), Some("ftp"));
        assert_eq!(url_scheme("//cdn.example.com/a.md"), None);
        assert_eq!(url_scheme("notes:draft.md"), None);
        assert_eq!(url_scheme("a.md"), None);
    }

    #[test]
    fn test_colon_without_slashes_is_relative() {
        assert_eq!(resolve("notes:draft.md", "/base"), "/base/notes:draft.md");
        assert_eq!(resolve("1http://x", "/base"), "/base/1http://x");
    }
}
