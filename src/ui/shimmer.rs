use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Relative bar widths for the rows of one placeholder item
const BAR_WIDTHS: [u16; 4] = [60, 90, 40, 20];

/// Grey bars standing in for list items that have not loaded yet
pub fn render(frame: &mut Frame, title: &str, rows_per_item: u16, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let lines = placeholder_lines(inner_width, inner_height, rows_per_item);

    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let placeholder = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(placeholder, area);
}

pub fn placeholder_lines(width: u16, height: u16, rows_per_item: u16) -> Vec<Line<'static>> {
    let rows_per_item = rows_per_item.max(1);
    (0..height)
        .map(|row| {
            let slot = (row % rows_per_item) as usize;
            // Last row of each item is a spacer
            if slot + 1 == rows_per_item as usize && rows_per_item > 1 {
                return Line::raw("");
            }
            let percent = BAR_WIDTHS[slot % BAR_WIDTHS.len()];
            let bar = (u32::from(width) * u32::from(percent) / 100) as usize;
            Line::raw("░".repeat(bar))
        })
        .collect()
}
