use chrono::NaiveDate;

use super::Frontmatter;

/// Author/date line shown under an article's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Byline {
    pub author: Option<String>,
    /// `created`, already formatted for display.
    pub date: Option<String>,
}

impl Byline {
    pub fn display(&self) -> String {
        match (&self.author, &self.date) {
            (Some(author), Some(date)) => format!("By {} · {}", author, date),
            (Some(author), None) => format!("By {}", author),
            (None, Some(date)) => date.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Header elements derived from an article's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleHeader {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub byline: Option<Byline>,
}

impl ArticleHeader {
    /// Derive the header, falling back to `fallback_title` when the
    /// frontmatter has no usable title.
    pub fn derive(frontmatter: &Frontmatter, fallback_title: Option<&str>) -> Self {
        let title = frontmatter
            .get_non_empty("title")
            .or(fallback_title.filter(|t| !t.is_empty()))
            .map(String::from);

        let summary = frontmatter.get_non_empty("summary").map(String::from);

        let author = frontmatter.get_non_empty("author").map(String::from);
        let date = frontmatter.get_non_empty("created").map(format_created);
        let byline = if author.is_some() || date.is_some() {
            Some(Byline { author, date })
        } else {
            None
        };

        Self {
            title,
            summary,
            byline,
        }
    }
}

/// Format a `YYYY-MM-DD` value as a long date such as "March 5, 2024".
///
/// The value is read as a calendar date, never as a timestamp, so no timezone
/// can move it to a neighbouring day. Values that do not parse are returned
/// as written.
pub fn format_created(created: &str) -> String {
    match NaiveDate::parse_from_str(created.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => created.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(pairs: &[(&str, &str)]) -> Frontmatter {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_title_from_frontmatter() {
        let header = ArticleHeader::derive(&fm(&[("title", "Hello")]), Some("Fallback"));
        assert_eq!(header.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_title_falls_back_when_empty() {
        let header = ArticleHeader::derive(&fm(&[("title", "")]), Some("Fallback"));
        assert_eq!(header.title.as_deref(), Some("Fallback"));
    }

    #[test]
    fn test_title_omitted_without_any_source() {
        let header = ArticleHeader::derive(&Frontmatter::new(), None);
        assert_eq!(header.title, None);

        let header = ArticleHeader::derive(&Frontmatter::new(), Some(""));
        assert_eq!(header.title, None);
    }

    #[test]
    fn test_summary_only_when_non_empty() {
        let header = ArticleHeader::derive(&fm(&[("summary", "")]), None);
        assert_eq!(header.summary, None);

        let header = ArticleHeader::derive(&fm(&[("summary", "Short")]), None);
        assert_eq!(header.summary.as_deref(), Some("Short"));
    }

    #[test]
    fn test_byline_with_author_only() {
        let header = ArticleHeader::derive(&fm(&[("author", "Ada"), ("created", "")]), None);
        let byline = header.byline.unwrap();
        assert_eq!(byline.author.as_deref(), Some("Ada"));
        assert_eq!(byline.date, None);
        assert_eq!(byline.display(), "By Ada");
    }

    #[test]
    fn test_byline_with_date_only() {
        let header = ArticleHeader::derive(&fm(&[("created", "2024-03-05")]), None);
        let byline = header.byline.unwrap();
        assert_eq!(byline.date.as_deref(), Some("March 5, 2024"));
        assert_eq!(byline.display(), "March 5, 2024");
    }

    #[test]
    fn test_byline_absent_when_both_empty() {
        let header = ArticleHeader::derive(&fm(&[("author", ""), ("title", "T")]), None);
        assert_eq!(header.byline, None);
    }

    #[test]
    fn test_byline_display_both() {
        let header = ArticleHeader::derive(
            &fm(&[("author", "Ada"), ("created", "2023-12-31")]),
            None,
        );
        assert_eq!(
            header.byline.unwrap().display(),
            "By Ada · December 31, 2023"
        );
    }

    #[test]
    fn test_format_created_is_calendar_date() {
        assert_eq!(format_created("2024-01-01"), "January 1, 2024");
        assert_eq!(format_created("1999-12-31"), "December 31, 1999");
    }

    #[test]
    fn test_format_created_keeps_unparseable_value() {
        assert_eq!(format_created("last spring"), "last spring");
        assert_eq!(format_created("2024-13-01"), "2024-13-01");
    }
}
