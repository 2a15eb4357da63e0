//! Control pad widget - the region the pointer plays on

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the pad and return its inner area, which is the control region
pub fn render_control_pad(
    frame: &mut Frame,
    area: Rect,
    pointer: Option<Position>,
    generating: bool,
) -> Rect {
    let border = if generating {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .title(" Pad ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hints = Paragraph::new(vec![
        Line::from("high pitch"),
        Line::from("← x: level / filter →"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, inner);

    if let Some(cell) = pointer.filter(|&cell| inner.contains(cell)) {
        if let Some(c) = frame.buffer_mut().cell_mut(cell) {
            c.set_char('●').set_fg(Color::Yellow);
        }
    }

    inner
}
