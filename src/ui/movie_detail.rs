use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let block = Block::default().borders(Borders::ALL).title(" Movie ");

    let Some(movie) = app.selected_movie() else {
        let empty = Paragraph::new("Movie no longer loaded")
            .block(block)
            .style(Style::default().fg(palette.muted));
        frame.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(palette.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Released: ", label),
            Span::raw(if movie.release_date.is_empty() {
                "unknown".to_string()
            } else {
                movie.release_date.clone()
            }),
        ]),
        Line::from(vec![
            Span::styled("Rating:   ", label),
            Span::raw(format!("{:.1} / 10", movie.vote_average)),
        ]),
    ];

    if app.feed.is_favorite(movie.id) {
        lines.push(Line::from(Span::styled(
            "★ Favorite",
            Style::default().fg(palette.favorite),
        )));
    }

    if let Some(poster) = movie.poster_url() {
        lines.push(Line::from(vec![
            Span::styled("Poster:   ", label),
            Span::raw(poster),
        ]));
    }

    lines.push(Line::from(""));
    if movie.overview.is_empty() {
        lines.push(Line::from(Span::styled("No overview available.", label)));
    } else {
        lines.extend(movie.overview.lines().map(|l| Line::from(l.to_string())));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(palette.fg))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(paragraph, area);
}
