use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::{render_titles, shimmer, truncate};
use crate::app::{App, ARTWORK_ROWS};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_titles(frame, "Enjoy some random artpieces from the museum", chunks[0]);

    let Some(artworks) = app.artworks.data() else {
        shimmer::render(frame, "Artworks", ARTWORK_ROWS, chunks[1]);
        return;
    };

    if artworks.is_empty() {
        let block = Block::default().borders(Borders::ALL).title("Artworks");
        let empty = Paragraph::new("No artworks found")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let width = chunks[1].width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = artworks
        .iter()
        .enumerate()
        .map(|(i, artwork)| {
            let title_style = if i == app.artwork_cursor.index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let image = artwork.image_url().unwrap_or_else(|| "-".to_string());

            ListItem::new(Text::from(vec![
                Line::from(Span::styled(truncate(&artwork.title, width), title_style)),
                Line::from(Span::styled(
                    truncate(artwork.description().unwrap_or_default(), width),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    truncate(&image, width),
                    Style::default().fg(Color::DarkGray),
                )),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Artworks ({})", artworks.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default()
        .with_offset(app.artwork_cursor.offset)
        .with_selected(Some(app.artwork_cursor.index));

    frame.render_stateful_widget(list, chunks[1], &mut state);
}
