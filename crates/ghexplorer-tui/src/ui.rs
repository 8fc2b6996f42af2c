// UI rendering logic
use crate::app::{App, InputMode, StatusKind, View};
use crate::palette::Palette;
use ghexplorer_core::Repository;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Descriptions in the result list are cut to this many characters
pub const DESCRIPTION_MAX_CHARS: usize = 60;

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.palette();
    let screen_height = frame.area().height;

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.foreground)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3.min(screen_height / 6)), // Header
            Constraint::Length(3.min(screen_height / 8)), // Search input
            Constraint::Min(5),                           // Main content
            Constraint::Length(1),                        // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, &palette, chunks[0]);
    render_search_input(frame, app, &palette, chunks[1]);

    // Narrow terminals get an even split, wide ones favor the list
    let (list_pct, detail_pct) = if frame.area().width < 100 {
        (50, 50)
    } else {
        (60, 40)
    };
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(list_pct),
            Constraint::Percentage(detail_pct),
        ])
        .split(chunks[2]);

    match app.view {
        View::Search => render_results_list(frame, app, &palette, content_chunks[0]),
        View::Favorites => render_favorites_list(frame, app, &palette, content_chunks[0]),
    }
    render_details(frame, app, &palette, content_chunks[1]);
    render_status_bar(frame, app, &palette, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let theme = if app.preferences.dark_mode() { "dark" } else { "light" };

    let line = Line::from(vec![
        Span::styled(
            " GitHub Explorer ",
            Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("★ ", Style::default().fg(palette.stars)),
        Span::styled(
            format!("{} favorites", app.favorites.len()),
            Style::default().fg(palette.stars).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("theme: {}", theme), Style::default().fg(palette.muted)),
    ]);

    let header = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        )
        .alignment(Alignment::Left);
    frame.render_widget(header, area);
}

fn render_search_input(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Searching if app.view == View::Search => {
            Style::default().fg(palette.border_focused)
        }
        _ => Style::default().fg(palette.border),
    };

    let input = Paragraph::new(app.search_input.as_str())
        .style(Style::default().fg(palette.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search GitHub repositories (ESC to navigate, / to search)")
                .border_style(input_style),
        );
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching && app.view == View::Search {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn repository_item<'a>(repo: &'a Repository, is_favorite: bool, palette: &Palette) -> ListItem<'a> {
    let marker = if is_favorite {
        Span::styled("★ ", Style::default().fg(palette.stars))
    } else {
        Span::raw("  ")
    };

    let title = Line::from(vec![
        marker,
        Span::styled(
            repo.full_name.as_str(),
            Style::default().fg(palette.foreground).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("⭐ {}", format_number(repo.stars)),
            Style::default().fg(palette.stars),
        ),
    ]);
    let description = Line::from(Span::styled(
        format!("  {}", repo.short_description(DESCRIPTION_MAX_CHARS)),
        Style::default().fg(palette.muted),
    ));

    ListItem::new(vec![title, description])
}

fn render_results_list(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .map(|repo| repository_item(repo, app.is_favorite(repo), palette))
        .collect();

    let title = match (app.search.results.len(), app.search.is_loading()) {
        (0, false) => " Results ".to_string(),
        (0, true) => " Results (loading...) ".to_string(),
        (n, false) => format!(" Results ({}) ", n),
        (n, true) => format!(" Results ({}, loading...) ", n),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(list_border(app, palette)),
        )
        .highlight_style(Style::default().bg(palette.selected_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_favorites_list(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    if app.favorites.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No favorites yet. Press f on a result to add one.",
                Style::default().fg(palette.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Favorites "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .favorites
        .list()
        .iter()
        .map(|repo| repository_item(repo, true, palette))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Favorites ({}) ", app.favorites.len()))
                .border_style(list_border(app, palette)),
        )
        .highlight_style(Style::default().bg(palette.selected_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.favorites_state);
}

fn list_border(app: &App, palette: &Palette) -> Style {
    if app.input_mode == InputMode::Normal {
        Style::default().fg(palette.border_focused)
    } else {
        Style::default().fg(palette.border)
    }
}

fn render_details(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .border_style(Style::default().fg(palette.border));

    let Some(repo) = app.selected_repository() else {
        let hint = Paragraph::new(Span::styled(
            "Select a repository to see its details",
            Style::default().fg(palette.muted),
        ))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    };

    let label = Style::default().fg(palette.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            repo.full_name.as_str(),
            Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Owner:    ", label),
            Span::raw(repo.owner.login.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Stars:    ", label),
            Span::styled(format_number(repo.stars), Style::default().fg(palette.stars)),
        ]),
        Line::from(vec![
            Span::styled("Forks:    ", label),
            Span::styled(format_number(repo.forks), Style::default().fg(palette.forks)),
        ]),
        Line::from(vec![
            Span::styled("Language: ", label),
            Span::styled(
                repo.language.as_deref().unwrap_or("Unknown"),
                Style::default().fg(palette.language),
            ),
        ]),
        Line::from(vec![
            Span::styled("Issues:   ", label),
            Span::raw(repo.open_issues.to_string()),
        ]),
    ];

    if let Some(updated) = repo.updated_at {
        lines.push(Line::from(vec![
            Span::styled("Updated:  ", label),
            Span::raw(updated.format("%Y-%m-%d").to_string()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(
        repo.description.as_deref().unwrap_or("No description"),
    ));

    if !repo.topics.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            repo.topics.join(" · "),
            Style::default().fg(palette.info),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(repo.url.as_str(), label)));

    let details = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(details, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (message, kind) = app.status_line();
    let color = match kind {
        StatusKind::Info => palette.info,
        StatusKind::Busy => palette.warning,
        StatusKind::Error => palette.error,
    };

    let keys = match (app.view, app.input_mode) {
        (View::Search, InputMode::Searching) => "ESC: navigate | ENTER: search",
        (View::Search, InputMode::Normal) => {
            "j/k: move | /: search | ENTER: open or retry | f: favorite | F: favorites | y: copy | t: theme | q: quit"
        }
        (View::Favorites, _) => "j/k: move | d: remove | F: back | o: open | y: copy | t: theme | q: quit",
    };

    let status = Line::from(vec![
        Span::styled(message, Style::default().fg(color)),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::styled(keys, Style::default().fg(palette.muted)),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

// Helper function to format numbers with K/M suffixes
fn format_number(num: u32) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}k", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghexplorer_core::{Favorites, Preferences};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5k");
        assert_eq!(format_number(2_300_000), "2.3M");
    }

    #[test]
    fn test_render_idle_screen() {
        let mut app = App::new(Favorites::in_memory(), Preferences::in_memory());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("GitHub Explorer"));
        assert!(text.contains("Start typing to search repositories"));
    }

    #[test]
    fn test_results_title_shows_loading() {
        let mut app = App::new(Favorites::in_memory(), Preferences::in_memory());
        let mut state: ghexplorer_core::SearchState<Repository> = ghexplorer_core::SearchState::idle();
        state.query = ghexplorer_core::Query::new("tokio");
        state.status = ghexplorer_core::SearchStatus::Loading;
        app.set_search_state(state);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Results (loading...)"));
        assert!(text.contains("Searching for \"tokio\"..."));
    }
}
