//! Lay out a rendered [`Document`] as styled ratatui lines.
//!
//! The same lines feed the TUI article pane and, flattened to plain text,
//! the `show` command.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::{plain_text, Alignment, Block, CodeBlock, Document, Inline, StyledSpan};
use crate::config::ColorConfig;
use crate::domain::ArticleHeader;

/// Lines for the title, summary, byline and edit link, followed by a rule.
/// Empty when the header has nothing to show.
pub fn header_lines(
    header: &ArticleHeader,
    edit_url: Option<&str>,
    colors: &ColorConfig,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(title) = &header.title {
        lines.push(Line::from(Span::styled(
            title.clone(),
            Style::default()
                .fg(colors.title)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(summary) = &header.summary {
        lines.push(Line::from(Span::styled(
            summary.clone(),
            Style::default()
                .fg(colors.summary)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(byline) = &header.byline {
        lines.push(Line::from(Span::styled(
            byline.display(),
            Style::default().fg(colors.byline),
        )));
    }
    if let Some(url) = edit_url {
        lines.push(Line::from(Span::styled(
            format!("Edit this article: {}", url),
            Style::default().fg(colors.edit_link),
        )));
    }

    if !lines.is_empty() {
        lines.push(Line::default());
        lines.push(rule(colors, width));
        lines.push(Line::default());
    }
    lines
}

pub fn document_lines(document: &Document, colors: &ColorConfig, width: usize) -> Vec<Line<'static>> {
    blocks_lines(&document.blocks, colors, width, true)
}

/// Flatten lines to text, one `\n`-terminated row each.
pub fn to_plain_text(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        for span in &line.spans {
            out.push_str(&span.content);
        }
        out.push('\n');
    }
    out
}

fn blocks_lines(
    blocks: &[Block],
    colors: &ColorConfig,
    width: usize,
    spaced: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if spaced && i > 0 {
            lines.push(Line::default());
        }
        lines.extend(block_lines(block, colors, width));
    }
    lines
}

fn block_lines(block: &Block, colors: &ColorConfig, width: usize) -> Vec<Line<'static>> {
    match block {
        Block::Heading { level, content } => {
            let mut style = Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD);
            if *level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let marker = format!("{} ", "#".repeat(*level as usize));
            let lines = inline_lines(content, style, colors);
            prefix_lines(lines, Span::styled(marker.clone(), style), " ".repeat(marker.len()))
        }
        Block::Paragraph(inlines) => inline_lines(inlines, Style::default(), colors),
        Block::List { start, items } => {
            let mut lines = Vec::new();
            for (i, item) in items.iter().enumerate() {
                let mut bullet = match start {
                    Some(n) => format!("{}. ", n + i as u64),
                    None => "• ".to_string(),
                };
                match item.task {
                    Some(true) => bullet.push_str("[x] "),
                    Some(false) => bullet.push_str("[ ] "),
                    None => {}
                }
                let indent = " ".repeat(bullet.chars().count());
                let mut inner = blocks_lines(&item.blocks, colors, width, false);
                if inner.is_empty() {
                    inner.push(Line::default());
                }
                lines.extend(prefix_lines(inner, Span::raw(bullet), indent));
            }
            lines
        }
        Block::BlockQuote(blocks) => {
            let bar = Style::default().fg(colors.quote);
            blocks_lines(blocks, colors, width, true)
                .into_iter()
                .map(|line| prepend(line, Span::styled("│ ", bar)))
                .map(|line| line.patch_style(Style::default().add_modifier(Modifier::ITALIC)))
                .collect()
        }
        Block::Code(code) => code_lines(code, colors),
        Block::Table {
            alignments,
            header,
            rows,
        } => table_lines(alignments, header, rows, colors),
        Block::Rule => vec![rule(colors, width)],
    }
}

fn code_lines(code: &CodeBlock, colors: &ColorConfig) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(colors.quote)
        .add_modifier(Modifier::ITALIC);
    let mut lines = Vec::new();

    match code {
        CodeBlock::Highlighted {
            language,
            lines: code,
        } => {
            lines.push(Line::from(Span::styled(language.clone(), label_style)));
            for spans in code {
                let mut line = vec![Span::raw("  ")];
                line.extend(spans.iter().map(highlighted_span));
                lines.push(Line::from(line));
            }
        }
        CodeBlock::Plain { language, text } => {
            if let Some(language) = language {
                lines.push(Line::from(Span::styled(language.clone(), label_style)));
            }
            let style = Style::default().fg(colors.code_block);
            for row in text.split('\n') {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(row.to_string(), style),
                ]));
            }
        }
    }
    lines
}

fn highlighted_span(span: &StyledSpan) -> Span<'static> {
    let mut style = Style::default().fg(Color::Rgb(span.fg.0, span.fg.1, span.fg.2));
    if span.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if span.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if span.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(span.text.clone(), style)
}

fn table_lines(
    alignments: &[Alignment],
    header: &[Vec<Inline>],
    rows: &[Vec<Vec<Inline>>],
    colors: &ColorConfig,
) -> Vec<Line<'static>> {
    let header: Vec<String> = header.iter().map(|cell| plain_text(cell)).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| plain_text(cell)).collect())
        .collect();

    let columns = std::iter::once(header.len())
        .chain(rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in std::iter::once(&header).chain(rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(Span::raw(cell.as_str()).width());
        }
    }

    let border = Style::default().fg(colors.quote);
    let format_row = |cells: &[String], style: Style| -> Line<'static> {
        let mut spans = Vec::new();
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", border));
            }
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let alignment = alignments.get(i).copied().unwrap_or(Alignment::None);
            spans.push(Span::styled(pad(cell, *width, alignment), style));
        }
        Line::from(spans)
    };

    let mut lines = vec![format_row(&header, Style::default().add_modifier(Modifier::BOLD))];
    let separator = widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(separator, border)));
    for row in &rows {
        lines.push(format_row(row, Style::default()));
    }
    lines
}

fn pad(cell: &str, width: usize, alignment: Alignment) -> String {
    let fill = width.saturating_sub(Span::raw(cell).width());
    match alignment {
        Alignment::Right => format!("{}{}", " ".repeat(fill), cell),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", cell, " ".repeat(fill)),
    }
}

fn inline_lines(inlines: &[Inline], base: Style, colors: &ColorConfig) -> Vec<Line<'static>> {
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    push_inlines(inlines, base, colors, &mut rows);
    rows.into_iter().map(Line::from).collect()
}

fn push_inlines(
    inlines: &[Inline],
    style: Style,
    colors: &ColorConfig,
    rows: &mut Vec<Vec<Span<'static>>>,
) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => push_span(rows, Span::styled(text.clone(), style)),
            Inline::Code(code) => push_span(
                rows,
                Span::styled(code.clone(), style.fg(colors.inline_code)),
            ),
            Inline::Emphasis(children) => {
                push_inlines(children, style.add_modifier(Modifier::ITALIC), colors, rows)
            }
            Inline::Strong(children) => {
                push_inlines(children, style.add_modifier(Modifier::BOLD), colors, rows)
            }
            Inline::Strikethrough(children) => push_inlines(
                children,
                style.add_modifier(Modifier::CROSSED_OUT),
                colors,
                rows,
            ),
            Inline::Link { dest, content } => {
                let link = style.fg(colors.link).add_modifier(Modifier::UNDERLINED);
                push_inlines(content, link, colors, rows);
                if plain_text(content) != *dest {
                    push_span(
                        rows,
                        Span::styled(format!(" <{}>", dest), style.fg(colors.link)),
                    );
                }
            }
            Inline::Image { dest, alt } => {
                let label = if alt.is_empty() { dest } else { alt };
                push_span(
                    rows,
                    Span::styled(format!("[image: {}]", label), style.fg(colors.link)),
                );
            }
            Inline::SoftBreak => push_span(rows, Span::styled(" ", style)),
            Inline::HardBreak => rows.push(Vec::new()),
        }
    }
}

fn push_span(rows: &mut [Vec<Span<'static>>], span: Span<'static>) {
    if let Some(row) = rows.last_mut() {
        row.push(span);
    }
}

fn rule(colors: &ColorConfig, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(colors.quote),
    ))
}

/// Put `first` before the first line and `rest` before every other line.
fn prefix_lines(lines: Vec<Line<'static>>, first: Span<'static>, rest: String) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 {
                first.clone()
            } else {
                Span::raw(rest.clone())
            };
            prepend(line, prefix)
        })
        .collect()
}

fn prepend(line: Line<'static>, prefix: Span<'static>) -> Line<'static> {
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(prefix);
    spans.extend(line.spans);
    Line::from(spans)
}
