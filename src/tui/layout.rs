use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::render::terminal::{document_lines, header_lines};
use crate::tui::app::{ActivePane, ArticleView, TuiApp};

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    if app.maximized {
        render_article_pane(frame, app, rows[0], colors);
    } else {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30), // Library pane
                Constraint::Percentage(70), // Article pane
            ])
            .split(rows[0]);

        render_library_pane(frame, app, panes[0], colors);
        render_article_pane(frame, app, panes[1], colors);
    }
    render_status_bar(frame, app, rows[1], colors);
}

fn border_style(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn render_library_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Library;

    let items: Vec<ListItem> = app
        .articles
        .iter()
        .map(|article| ListItem::new(article.display_title().to_string()))
        .collect();

    let title = format!(
        " Library [{}/{}] ",
        (app.index + 1).min(app.articles.len()),
        app.articles.len()
    );

    let highlight_style = if is_active {
        Style::default()
            .bg(colors.selection_bg_active)
            .fg(colors.selection_fg_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(colors.selection_bg_inactive)
            .fg(colors.selection_fg_inactive)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, colors));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_article_pane(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Article;
    // Borders take two columns
    let width = area.width.saturating_sub(2) as usize;

    let (title, content) = match &app.view {
        ArticleView::Empty => (
            " Article ".to_string(),
            Text::from("Select an article from the library"),
        ),
        ArticleView::Loading => (
            " Article ".to_string(),
            Text::from(format!("{} Loading article…", app.spinner())),
        ),
        ArticleView::Error(message) => (
            " Unable to display the article ".to_string(),
            Text::from(vec![
                Line::from(Span::styled(
                    "Unable to display the article",
                    Style::default()
                        .fg(colors.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::default(),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(colors.error),
                )),
            ]),
        ),
        ArticleView::Loaded {
            header,
            document,
            edit_url,
        } => {
            let mut lines = header_lines(header, edit_url.as_deref(), colors, width);
            lines.extend(document_lines(document, colors, width));
            let title = header
                .title
                .as_deref()
                .or_else(|| app.selected_article().map(|a| a.display_title()))
                .unwrap_or("Article");
            (format!(" {} ", title), Text::from(lines))
        }
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, colors));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.article_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if app.maximized {
        "j/k:Scroll  n/p:Page  e:Edit  R:Reload  m:Exit maximize  q:Quit".to_string()
    } else {
        "j/k:Nav  n/p:Page  Tab:Pane  Enter:Open  e:Edit  R:Reload  m:Max  q:Quit".to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}
