use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::warn;

use super::{Rgb, StyledSpan};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax highlighter for fenced code blocks, bound to one color theme.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    /// Load the bundled syntaxes and the named bundled theme.
    ///
    /// An unknown theme name falls back to [`DEFAULT_THEME`].
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme_name) {
            Some(theme) => theme,
            None => {
                warn!(
                    "Unknown code theme {:?}, using {}",
                    theme_name, DEFAULT_THEME
                );
                themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };

        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Whether `language` names a syntax we can highlight (name or extension).
    pub fn supports(&self, language: &str) -> bool {
        self.syntaxes.find_syntax_by_token(language).is_some()
    }

    /// Highlight `text` as `language`, one `Vec` of spans per line.
    ///
    /// Returns `None` for unknown languages or when the syntax definition
    /// fails on the input; callers show such blocks as plain code.
    pub fn highlight(&self, text: &str, language: &str) -> Option<Vec<Vec<StyledSpan>>> {
        let syntax = self.syntaxes.find_syntax_by_token(language)?;
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(text) {
            let ranges = match highlighter.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => ranges,
                Err(e) => {
                    warn!("Highlighting {} failed: {}", language, e);
                    return None;
                }
            };

            let spans = ranges
                .into_iter()
                .filter_map(|(style, piece)| {
                    let piece = piece.trim_end_matches(['\n', '\r']);
                    if piece.is_empty() {
                        return None;
                    }
                    Some(StyledSpan {
                        text: piece.to_string(),
                        fg: Rgb(style.foreground.r, style.foreground.g, style.foreground.b),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                        underline: style.font_style.contains(FontStyle::UNDERLINE),
                    })
                })
                .collect();
            lines.push(spans);
        }

        Some(lines)
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &[StyledSpan]) -> String {
        line.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_supports_names_and_extensions() {
        let highlighter = Highlighter::default();
        assert!(highlighter.supports("javascript"));
        assert!(highlighter.supports("js"));
        assert!(highlighter.supports("rust"));
        assert!(highlighter.supports("rs"));
        assert!(!highlighter.supports("definitely-not-a-language"));
    }

    #[test]
    fn test_highlight_preserves_text_per_line() {
        let highlighter = Highlighter::default();
        let code = "function greet(name) {\n\n  return name\n}";
        let lines = highlighter.highlight(code, "javascript").unwrap();

        assert_eq!(lines.len(), 4);
        assert_eq!(line_text(&lines[0]), "function greet(name) {");
        assert!(lines[1].is_empty());
        assert_eq!(line_text(&lines[2]), "  return name");
        assert_eq!(line_text(&lines[3]), "}");
    }

    #[test]
    fn test_highlight_unknown_language() {
        assert!(Highlighter::default().highlight("x", "nope-lang").is_none());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let highlighter = Highlighter::new("no-such-theme");
        assert!(highlighter.highlight("let x = 1;", "rust").is_some());
    }
}
