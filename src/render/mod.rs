//! Markdown body to displayable structure.
//!
//! [`MarkdownRenderer`] turns an article body into a [`Document`] of blocks and
//! inlines. Fenced code that names a known language is highlighted up front,
//! so hosts only have to map [`StyledSpan`]s to their own colors.
//! [`terminal`] does that mapping for ratatui.

pub mod highlight;
pub mod markdown;
pub mod terminal;

pub use highlight::Highlighter;
pub use markdown::MarkdownRenderer;

pub use pulldown_cmark::Alignment;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    List {
        /// Number of the first item for ordered lists.
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    BlockQuote(Vec<Block>),
    Code(CodeBlock),
    Table {
        alignments: Vec<Alignment>,
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    /// `Some(checked)` for task list items.
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeBlock {
    Highlighted {
        language: String,
        lines: Vec<Vec<StyledSpan>>,
    },
    Plain {
        language: Option<String>,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { dest: String, content: Vec<Inline> },
    Image { dest: String, alt: String },
    SoftBreak,
    HardBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A run of highlighted code text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub fg: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Flatten inlines to their visible text. Breaks become spaces.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(inlines, &mut out);
    out
}

fn push_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link {
                content: children, ..
            } => push_plain_text(children, out),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
        }
    }
}
