use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::{render_titles, shimmer, truncate};
use crate::app::{App, EXHIBITION_ROWS};
use crate::pagination::PaginationState;
use crate::types::Exhibition;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_titles(frame, "Available Exhibitions", chunks[0]);
    render_timer(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);

    if app.exhibitions.is_fetching_next_page() {
        let caption = Paragraph::new("Loading More Exhibitions...")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(caption, chunks[3]);
    }
}

fn render_timer(frame: &mut Frame, app: &App, area: Rect) {
    let Some(label) = &app.timer.label else {
        return;
    };
    let line = Line::from(vec![
        Span::styled("Next exhibition in ", Style::default().fg(Color::Gray)),
        Span::styled(
            label.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let Some(exhibitions) = &app.exhibition_list else {
        shimmer::render(frame, "Exhibitions", EXHIBITION_ROWS, area);
        return;
    };

    let count = exhibitions.len();
    if count == 0 {
        let block = Block::default().borders(Borders::ALL).title("Exhibitions");
        let empty = Paragraph::new("No exhibitions available")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = exhibitions
        .iter()
        .enumerate()
        .map(|(i, exhibition)| {
            let selected = i == app.exhibition_cursor.index;
            ListItem::new(item_text(exhibition, selected, width))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(list_title(app, count)))
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default()
        .with_offset(app.exhibition_cursor.offset)
        .with_selected(Some(app.exhibition_cursor.index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn list_title(app: &App, count: usize) -> String {
    let pages = match app.exhibitions.state() {
        PaginationState::Ready { pages } | PaginationState::LoadingMore { pages } => pages,
        PaginationState::Idle | PaginationState::Loading => 0,
    };
    let last = app.exhibitions.data().and_then(|pages| pages.last());
    let total = last.and_then(|page| page.pagination.total);
    let total_pages = last.and_then(|page| page.pagination.total_pages);

    let mut title = match total {
        Some(total) => format!("Exhibitions ({} of {}", count, total),
        None => format!("Exhibitions ({}", count),
    };
    match total_pages {
        Some(total_pages) => title.push_str(&format!(", page {}/{})", pages, total_pages)),
        None => title.push_str(&format!(", {} pages)", pages)),
    }
    if !app.exhibitions.has_next_page() {
        title.push_str(" - end");
    }
    title
}

/// Exactly `EXHIBITION_ROWS` lines per exhibition
fn item_text(exhibition: &Exhibition, selected: bool, width: usize) -> Text<'static> {
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let description = exhibition
        .short_description
        .as_deref()
        .map(|d| d.replace('\n', " "))
        .unwrap_or_default();
    let image = exhibition
        .image_url
        .as_deref()
        .map(|url| format!("image: {}", url))
        .unwrap_or_else(|| "image: -".to_string());
    let link = match exhibition.link() {
        Some(_) => Line::from(Span::styled("See more ↗", Style::default().fg(Color::Cyan))),
        None => Line::raw(""),
    };

    Text::from(vec![
        Line::from(Span::styled(truncate(&exhibition.title, width), title_style)),
        Line::from(Span::styled(
            truncate(&description, width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate(&image, width),
            Style::default().fg(Color::DarkGray),
        )),
        link,
    ])
}
