pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::domain::ArticleSource;
use crate::pipeline::ArticlePipeline;

use self::app::{ActivePane, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the viewer over `articles` until the user quits.
pub async fn run(ctx: Arc<AppContext>, config: Arc<Config>, articles: Vec<ArticleSource>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, config, articles).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    ctx: Arc<AppContext>,
    config: Arc<Config>,
    articles: Vec<ArticleSource>,
) -> Result<()> {
    let mut tui_app = TuiApp::new(articles);
    let mut pipeline = ctx.pipeline();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    // Open the first article right away
    if !tui_app.articles.is_empty() {
        tui_app.open_selected(&mut pipeline);
        tui_app.active_pane = ActivePane::Library;
    }
    tui_app.sync_view(&ctx, &pipeline);

    loop {
        if pipeline.poll() {
            tui_app.sync_view(&ctx, &pipeline);
        }

        terminal.draw(|frame| layout::render(frame, &mut tui_app, &config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                tui_app.clear_status();
                let action = config.keybindings.get_action(&key);
                handle_action(action, &mut tui_app, &mut pipeline, &ctx);
            }
            AppEvent::Tick => {
                tui_app.tick();
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(
    action: Action,
    tui_app: &mut TuiApp,
    pipeline: &mut ArticlePipeline,
    ctx: &AppContext,
) {
    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => {
            tui_app.move_up();
        }
        Action::MoveDown => {
            tui_app.move_down();
        }
        Action::NextPage => {
            tui_app.next_page();
        }
        Action::PrevPage => {
            tui_app.prev_page();
        }
        Action::NextPane => {
            tui_app.active_pane = tui_app.active_pane.next();
        }
        Action::PrevPane => {
            tui_app.active_pane = tui_app.active_pane.prev();
        }
        Action::ToggleMaximize => {
            tui_app.toggle_maximize();
        }
        Action::Select => {
            if tui_app.active_pane == ActivePane::Library {
                tui_app.open_selected(pipeline);
                tui_app.sync_view(ctx, pipeline);
            }
        }
        Action::Reload => {
            if pipeline.source().is_some() {
                pipeline.reload();
                tui_app.sync_view(ctx, pipeline);
                tui_app.set_status("Reloading article".to_string());
            }
        }
        Action::OpenEditLink => match tui_app.edit_url().map(str::to_string) {
            Some(url) => {
                info!("Opening edit link {}", url);
                if let Err(e) = open::that(&url) {
                    tui_app.set_status(format!("Failed to open browser: {}", e));
                } else {
                    tui_app.set_status(format!("Opened {}", url));
                }
            }
            None => {
                tui_app.set_status("No edit link for this article".to_string());
            }
        },
        Action::None => {}
    }
}
