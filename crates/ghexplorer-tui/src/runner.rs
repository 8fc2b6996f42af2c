// TUI event loop and terminal management
use crate::app::{App, InputMode, Retry, View};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ghexplorer_core::{CatalogSource, Repository, SearchController};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How long to wait for terminal input before checking for search updates
const TICK: Duration = Duration::from_millis(50);

pub async fn run_tui<S>(
    mut app: App,
    mut controller: SearchController<S>,
    load_more_threshold: usize,
    mouse_enabled: bool,
) -> anyhow::Result<()>
where
    S: CatalogSource<Record = Repository> + 'static,
{
    let mut updates = controller.subscribe();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(
        &mut terminal,
        &mut app,
        &mut controller,
        &mut updates,
        load_more_threshold,
    );

    // Restore terminal even if the loop bailed out
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

fn event_loop<S>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    controller: &mut SearchController<S>,
    updates: &mut tokio::sync::watch::Receiver<ghexplorer_core::SearchState<Repository>>,
    load_more_threshold: usize,
) -> anyhow::Result<()>
where
    S: CatalogSource<Record = Repository> + 'static,
{
    loop {
        let applied = controller.drain_events();
        if applied > 0 {
            tracing::debug!("Applied {} controller events", applied);
        }
        if updates.has_changed()? {
            let state = updates.borrow_and_update().clone();
            app.set_search_state(state);
        }

        terminal.draw(|f| crate::ui::render(f, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, controller, key, load_more_threshold);
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        app.next_result();
                        maybe_load_more(app, controller, load_more_threshold);
                    }
                    MouseEventKind::ScrollUp => app.previous_result(),
                    _ => {}
                },
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key<S>(
    app: &mut App,
    controller: &mut SearchController<S>,
    key: KeyEvent,
    load_more_threshold: usize,
) where
    S: CatalogSource<Record = Repository> + 'static,
{
    app.clear_notice();

    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter => {
                controller.on_explicit_submit();
                app.enter_normal_mode();
            }
            KeyCode::Char(c) => {
                app.search_input.push(c);
                controller.on_query_text_changed(&app.search_input);
            }
            KeyCode::Backspace => {
                app.search_input.pop();
                controller.on_query_text_changed(&app.search_input);
            }
            KeyCode::Esc => {
                app.enter_normal_mode();
            }
            KeyCode::Down => {
                app.enter_normal_mode();
                app.next_result();
            }
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Esc if app.view == View::Favorites => app.toggle_view(),
            KeyCode::Char('j') | KeyCode::Down => {
                app.next_result();
                maybe_load_more(app, controller, load_more_threshold);
            }
            KeyCode::Char('k') | KeyCode::Up => app.previous_result(),
            KeyCode::Char('f') => app.toggle_selected_favorite(),
            KeyCode::Char('F') => app.toggle_view(),
            KeyCode::Char('d') => app.remove_selected_favorite(),
            KeyCode::Char('t') => app.toggle_dark_mode(),
            KeyCode::Enter => match app.retry_action() {
                Some(Retry::Submit) => controller.on_explicit_submit(),
                Some(Retry::LoadMore) => {
                    controller.on_load_more_requested();
                }
                None => open_selected(app),
            },
            KeyCode::Char('o') => open_selected(app),
            KeyCode::Char('y') => copy_share_message(app),
            _ => {}
        },
    }
}

fn maybe_load_more<S>(app: &App, controller: &mut SearchController<S>, threshold: usize)
where
    S: CatalogSource<Record = Repository> + 'static,
{
    if app.near_end(threshold) && controller.on_load_more_requested() {
        tracing::debug!("Requested page {}", controller.state().page);
    }
}

fn open_selected(app: &mut App) {
    if let Some(repo) = app.selected_repository() {
        let url = repo.url.clone();
        if let Err(e) = open::that(&url) {
            app.notice = Some(format!("Failed to open browser: {}", e));
        }
    }
}

fn copy_share_message(app: &mut App) {
    let Some(message) = app.selected_repository().map(|r| r.share_message()) else {
        return;
    };

    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(message));
    app.notice = Some(match copied {
        Ok(()) => "Share message copied to clipboard".to_string(),
        Err(e) => format!("Failed to copy to clipboard: {}", e),
    });
}
