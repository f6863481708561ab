mod movie_detail;
mod movie_list;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode, Screen};

pub fn render(frame: &mut Frame, app: &App) {
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::List => movie_list::render(frame, app, chunks[1]),
        Screen::Detail => movie_detail::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let feed = &app.feed;

    let title = match app.screen {
        Screen::Detail => match app.selected_movie() {
            Some(movie) => format!("marquee - {}", movie.title),
            None => "marquee - Movie".to_string(),
        },
        Screen::List => match feed.search_query() {
            Some(query) => format!(
                "marquee - Search \"{}\" ({})  avg {:.1}",
                query,
                app.visible().len(),
                feed.average_rating(app.filter)
            ),
            None => {
                let progress = match feed.total_pages() {
                    Some(total) => format!(
                        "  page {}/{}",
                        feed.current_page().saturating_sub(1).min(total),
                        total
                    ),
                    None => String::new(),
                };
                format!(
                    "marquee - {} ({})  avg {:.1}{}",
                    app.filter,
                    app.visible().len(),
                    feed.average_rating(app.filter),
                    progress
                )
            }
        },
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(palette.bar_bg));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();

    let status = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled("/", Style::default().fg(palette.accent)),
            Span::styled(app.search_input.clone(), Style::default().fg(palette.fg)),
            Span::styled("_", Style::default().fg(palette.muted)),
        ])
    } else if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(palette.error),
        )])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(palette.accent),
        )])
    } else if app.feed.is_batch_loading() {
        let pending: Vec<String> = app.feed.in_flight().iter().map(|p| p.to_string()).collect();
        let text = if pending.is_empty() {
            "Loading...".to_string()
        } else {
            format!("Loading page {}...", pending.join(", "))
        };
        Line::from(vec![Span::styled(text, Style::default().fg(palette.busy))])
    } else {
        let help = match app.screen {
            Screen::List => {
                "j/k/g/G: nav | Enter: open | f: fav | Tab: all/favs | /: search | r: refresh | t: theme | q: quit"
            }
            Screen::Detail => "j/k: scroll | f: fav | o: browser | y: copy url | t: theme | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(palette.muted))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(palette.bar_bg));
    frame.render_widget(status_bar, area);
}
