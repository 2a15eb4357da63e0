//! Parameter readout - axis labels, selections and scope level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use xypad::synth::ParameterSummary;

/// Level of the current scope contents
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self::default();
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_parameters(
    frame: &mut Frame,
    area: Rect,
    summary: &ParameterSummary,
    stats: &AudioStats,
    sample_rate: f32,
    generating: bool,
) {
    let block = Block::default().title(" xypad ").borders(Borders::ALL);

    let (state, state_color) = if generating {
        ("● Playing", Color::Green)
    } else {
        ("○ Idle", Color::Yellow)
    };

    let status = Line::from(vec![
        Span::styled(format!("{state}  "), Style::default().fg(state_color)),
        Span::styled(
            format!("{}  ", summary.waveform.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Filter: {}  ", summary.filter.label()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(vec![
        status,
        Line::from(summary.x_axis_label()),
        Line::from(summary.y_axis_label()),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}
