use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

use super::{plain_text, Block, CodeBlock, Document, Highlighter, Inline, ListItem};

/// Renders article bodies with tables, strikethrough and task lists enabled.
/// Bare URLs in text are linked.
pub struct MarkdownRenderer {
    highlighter: Highlighter,
}

impl MarkdownRenderer {
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn options() -> Options {
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
    }

    pub fn render(&self, body: &str) -> Document {
        let mut builder = Builder::new(self);
        for event in Parser::new_ext(body, Self::options()) {
            builder.event(event);
        }
        builder.finish()
    }

    /// Build a code block, highlighting it when the language is known.
    ///
    /// Exactly one trailing newline is removed first; the Markdown parser
    /// always leaves one at the end of fenced content.
    pub fn code_block(&self, language: Option<String>, mut text: String) -> CodeBlock {
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        match language {
            Some(language) if self.highlighter.supports(&language) => {
                match self.highlighter.highlight(&text, &language) {
                    Some(lines) => CodeBlock::Highlighted { language, lines },
                    None => CodeBlock::Plain {
                        language: Some(language),
                        text,
                    },
                }
            }
            language => CodeBlock::Plain { language, text },
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(Highlighter::default())
    }
}

enum SpanKind {
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
}

/// One open element while walking the event stream. Every `Start` event
/// pushes exactly one frame and every `End` pops one.
enum Frame {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item {
        task: Option<bool>,
        blocks: Vec<Block>,
        inlines: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    Table {
        alignments: Vec<Alignment>,
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Row {
        head: bool,
        cells: Vec<Vec<Inline>>,
    },
    Cell(Vec<Inline>),
    Span {
        kind: SpanKind,
        inlines: Vec<Inline>,
    },
    Image {
        dest: String,
        alt: Vec<Inline>,
    },
    Ignored,
}

struct Builder<'r> {
    renderer: &'r MarkdownRenderer,
    stack: Vec<Frame>,
}

impl<'r> Builder<'r> {
    fn new(renderer: &'r MarkdownRenderer) -> Self {
        Self {
            renderer,
            stack: vec![Frame::Root(Vec::new())],
        }
    }

    fn finish(mut self) -> Document {
        while self.stack.len() > 1 {
            self.close();
        }
        match self.stack.pop() {
            Some(Frame::Root(blocks)) => Document { blocks },
            _ => Document::default(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.to_string())),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_block(Block::Rule),
            Event::TaskListMarker(checked) => self.mark_task(checked),
            Event::FootnoteReference(label) => {
                self.push_inline(Inline::Text(format!("[^{}]", label)))
            }
            // raw HTML is not rendered
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                inlines: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                language: match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(String::from)
                    }
                    CodeBlockKind::Indented => None,
                },
                text: String::new(),
            },
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                task: None,
                blocks: Vec::new(),
                inlines: Vec::new(),
            },
            Tag::Table(alignments) => Frame::Table {
                alignments,
                header: Vec::new(),
                rows: Vec::new(),
            },
            Tag::TableHead => Frame::Row {
                head: true,
                cells: Vec::new(),
            },
            Tag::TableRow => Frame::Row {
                head: false,
                cells: Vec::new(),
            },
            Tag::TableCell => Frame::Cell(Vec::new()),
            Tag::Emphasis => Frame::Span {
                kind: SpanKind::Emphasis,
                inlines: Vec::new(),
            },
            Tag::Strong => Frame::Span {
                kind: SpanKind::Strong,
                inlines: Vec::new(),
            },
            Tag::Strikethrough => Frame::Span {
                kind: SpanKind::Strikethrough,
                inlines: Vec::new(),
            },
            Tag::Link { dest_url, .. } => Frame::Span {
                kind: SpanKind::Link(dest_url.to_string()),
                inlines: Vec::new(),
            },
            Tag::Image { dest_url, .. } => Frame::Image {
                dest: dest_url.to_string(),
                alt: Vec::new(),
            },
            _ => Frame::Ignored,
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Root(_) | Frame::Ignored => {}
            Frame::Quote(blocks) => self.push_block(Block::BlockQuote(blocks)),
            Frame::List { start, items } => self.push_block(Block::List { start, items }),
            Frame::Item {
                task,
                mut blocks,
                inlines,
            } => {
                flush_inlines(&mut blocks, inlines);
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(ListItem { task, blocks });
                }
            }
            Frame::Paragraph(inlines) => {
                if !inlines.is_empty() {
                    self.push_block(Block::Paragraph(autolink(inlines)));
                }
            }
            Frame::Heading { level, inlines } => self.push_block(Block::Heading {
                level,
                content: autolink(inlines),
            }),
            Frame::Code { language, text } => {
                let code = self.renderer.code_block(language, text);
                self.push_block(Block::Code(code));
            }
            Frame::Table {
                alignments,
                header,
                rows,
            } => self.push_block(Block::Table {
                alignments,
                header,
                rows,
            }),
            Frame::Row { head, cells } => {
                if let Some(Frame::Table { header, rows, .. }) = self.stack.last_mut() {
                    if head {
                        *header = cells;
                    } else {
                        rows.push(cells);
                    }
                }
            }
            Frame::Cell(inlines) => {
                if let Some(Frame::Row { cells, .. }) = self.stack.last_mut() {
                    cells.push(autolink(inlines));
                }
            }
            Frame::Span { kind, inlines } => {
                let inline = match kind {
                    SpanKind::Emphasis => Inline::Emphasis(autolink(inlines)),
                    SpanKind::Strong => Inline::Strong(autolink(inlines)),
                    SpanKind::Strikethrough => Inline::Strikethrough(autolink(inlines)),
                    SpanKind::Link(dest) => Inline::Link {
                        dest,
                        content: inlines,
                    },
                };
                self.push_inline(inline);
            }
            Frame::Image { dest, alt } => self.push_inline(Inline::Image {
                dest,
                alt: plain_text(&alt),
            }),
        }
    }

    fn text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame::Code { text: code, .. }) => code.push_str(text),
            Some(Frame::Ignored) => {}
            _ => self.push_inline(Inline::Text(text.to_string())),
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        let target = match self.stack.last_mut() {
            Some(Frame::Paragraph(inlines))
            | Some(Frame::Heading { inlines, .. })
            | Some(Frame::Cell(inlines))
            | Some(Frame::Span { inlines, .. })
            | Some(Frame::Item { inlines, .. })
            | Some(Frame::Image { alt: inlines, .. }) => inlines,
            Some(Frame::Root(_)) | Some(Frame::Quote(_)) => {
                self.push_block(Block::Paragraph(autolink(vec![inline])));
                return;
            }
            _ => return,
        };

        if let (Some(Inline::Text(last)), Inline::Text(next)) = (target.last_mut(), &inline) {
            last.push_str(next);
            return;
        }
        target.push(inline);
    }

    fn push_block(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(Frame::Root(blocks)) | Some(Frame::Quote(blocks)) => blocks.push(block),
            Some(Frame::Item {
                blocks, inlines, ..
            }) => {
                flush_inlines(blocks, std::mem::take(inlines));
                blocks.push(block);
            }
            _ => {}
        }
    }

    fn mark_task(&mut self, checked: bool) {
        for frame in self.stack.iter_mut().rev() {
            if let Frame::Item { task, .. } = frame {
                *task = Some(checked);
                return;
            }
        }
    }
}

/// Loose inline content in a tight list item becomes a paragraph.
fn flush_inlines(blocks: &mut Vec<Block>, inlines: Vec<Inline>) {
    if !inlines.is_empty() {
        blocks.push(Block::Paragraph(autolink(inlines)));
    }
}

const URL_PREFIXES: [&str; 3] = ["https://", "http://", "www."];

/// Turn bare `http://`, `https://` and `www.` URLs in text runs into links.
///
/// Only direct text children are scanned. Existing links, code and nested
/// spans are left as they are; spans run this on their own content when
/// they close.
fn autolink(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Text(text) => link_text(&text, &mut out),
            other => out.push(other),
        }
    }
    out
}

fn link_text(text: &str, out: &mut Vec<Inline>) {
    let mut plain_from = 0;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        let at_boundary = match prev {
            None => true,
            Some(p) => p.is_whitespace() || matches!(p, '*' | '_' | '~' | '('),
        };
        prev = Some(c);
        if i < plain_from || !at_boundary {
            continue;
        }
        let Some(url) = bare_url(&text[i..]) else {
            continue;
        };

        if i > plain_from {
            out.push(Inline::Text(text[plain_from..i].to_string()));
        }
        let dest = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Inline::Link {
            dest,
            content: vec![Inline::Text(url.to_string())],
        });
        plain_from = i + url.len();
    }

    if plain_from < text.len() {
        out.push(Inline::Text(text[plain_from..].to_string()));
    }
}

/// The URL at the start of `s`, without trailing punctuation or an
/// unbalanced closing parenthesis.
fn bare_url(s: &str) -> Option<&str> {
    let prefix = URL_PREFIXES.iter().find(|p| s.starts_with(**p))?;
    let end = s
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(s.len());

    let mut url = &s[..end];
    loop {
        if let Some(trimmed) =
            url.strip_suffix(['?', '!', '.', ',', ':', '*', '_', '~', '\'', '"'])
        {
            url = trimmed;
        } else if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        } else {
            break;
        }
    }

    let host = url.get(prefix.len()..)?;
    host.chars()
        .next()
        .filter(|c| c.is_alphanumeric())
        .map(|_| url)
}
