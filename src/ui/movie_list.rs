use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::Filter;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let movies = app.visible();
    let title = format!(" {} ", app.filter);

    if movies.is_empty() {
        let message = if app.feed.is_searching() {
            "No results"
        } else if app.filter == Filter::Favorites {
            "No favorites yet. Press f on a movie to add it."
        } else if app.feed.is_batch_loading() {
            "Loading movies..."
        } else {
            "No movies loaded. Press r to refresh."
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(palette.muted));
        frame.render_widget(empty, area);
        return;
    }

    let w = area.width.saturating_sub(2) as usize;
    let fixed = 14; // star(2) + space(1) + year(4) + spaces(2) + rating(3) + spaces(2)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == app.index {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };

            let star = if movie.favorite { "★" } else { " " };
            let title = if movie.title.chars().count() > flex {
                let cut: String = movie.title.chars().take(flex.saturating_sub(3)).collect();
                format!("{}...", cut)
            } else {
                movie.title.clone()
            };
            let year = movie
                .release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "----".to_string());

            let line = Line::from(vec![
                Span::styled(format!("{} ", star), Style::default().fg(palette.favorite)),
                Span::raw(" "),
                Span::styled(format!("{:<flex$}", title), style),
                Span::raw("  "),
                Span::styled(year, Style::default().fg(palette.muted)),
                Span::raw("  "),
                Span::styled(
                    format!("{:>3.1}", movie.vote_average),
                    Style::default().fg(palette.muted),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(palette.highlight));

    let mut state = ListState::default();
    state.select(Some(app.index));

    frame.render_stateful_widget(list, area, &mut state);
}
