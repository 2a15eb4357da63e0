//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render the scope; the trace is only drawn while the synth is generating
pub fn render_waveform(frame: &mut Frame, area: Rect, scope: &[f32], visible: bool) {
    let block = Block::default()
        .title(format!(" Waveform ({} samples) ", scope.len()))
        .borders(Borders::ALL);

    let data: Vec<(f64, f64)> = if visible {
        scope
            .iter()
            .enumerate()
            .map(|(i, &sample)| (i as f64, sample as f64))
            .collect()
    } else {
        Vec::new()
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    // Band-pass resonance can overshoot unity slightly.
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, scope.len().max(1) as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.1, 1.1])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
