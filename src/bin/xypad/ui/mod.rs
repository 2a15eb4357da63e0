//! TUI module for xypad
//!
//! Control pad on the left third, scope, spectrum and parameter readout on the right.

mod control_pad;
mod parameters;
mod spectrum;
mod waveform;

use std::{sync::Arc, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use tracing::trace;

use xypad::{
    dsp::{FilterKind, Waveform},
    synth::{ControlGeometry, InputEvent, ParameterController},
    WaveformSnapshot, SNAPSHOT_LEN,
};

use control_pad::render_control_pad;
use parameters::{render_parameters, AudioStats};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use waveform::render_waveform;

/// Redraw / input poll interval (~60fps)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// UI application state
pub struct UiApp {
    /// Pointer and selection state, publishes to the audio thread
    controller: ParameterController,
    /// Scope shared with the audio callback
    snapshot: Arc<WaveformSnapshot>,
    /// Local copy of the scope, refreshed on each display signal
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    stats: AudioStats,
    sample_rate: f32,
    /// Inner area of the control pad from the last frame, in terminal cells
    control_area: Rect,
    /// Terminal cell under the held pointer
    pointer: Option<Position>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: ParameterController,
        snapshot: Arc<WaveformSnapshot>,
        sample_rate: f32,
    ) -> Self {
        Self {
            controller,
            snapshot,
            scope: vec![0.0; SNAPSHOT_LEN],
            spectrum: SpectrumAnalyzer::new(SNAPSHOT_LEN, sample_rate),
            stats: AudioStats::default(),
            sample_rate,
            control_area: Rect::default(),
            pointer: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            // Retry a publish the audio queue rejected last frame
            self.controller.flush();

            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code)
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Copy the scope when the audio thread has raised the display signal
    fn poll_scope(&mut self) {
        if !self.snapshot.take_update() {
            return;
        }
        self.snapshot.read_into(&mut self.scope);
        self.spectrum.update(&self.scope);
        self.stats = AudioStats::from_buffer(&self.scope);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let event = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::SelectWaveform(Waveform::Sine),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                InputEvent::SelectWaveform(Waveform::PulseTrain)
            }
            KeyCode::Char('n') | KeyCode::Char('N') => InputEvent::SelectFilter(FilterKind::None),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                InputEvent::SelectFilter(FilterKind::LowPass)
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                InputEvent::SelectFilter(FilterKind::HighPass)
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                InputEvent::SelectFilter(FilterKind::BandPass)
            }
            _ => return,
        };
        self.controller.handle(event);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let cell = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((x, y)) = self.to_local(cell) {
                    self.pointer = Some(cell);
                    self.controller.handle(InputEvent::PointerDown { x, y });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                // Drags that leave the pad are dropped; the last value inside stays.
                if let Some((x, y)) = self.to_local(cell) {
                    self.pointer = Some(cell);
                    self.controller.handle(InputEvent::PointerDrag { x, y });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.pointer = None;
                self.controller.handle(InputEvent::PointerUp);
            }
            _ => {}
        }
    }

    /// Translate a terminal cell into control-region coordinates
    fn to_local(&self, cell: Position) -> Option<(f32, f32)> {
        let area = self.control_area;
        let x = cell.x.checked_sub(area.x)? as f32;
        let y = cell.y.checked_sub(area.y)? as f32;

        match self.controller.geometry().check(x, y) {
            Ok(()) => Some((x, y)),
            Err(err) => {
                trace!(%err, "pointer outside control pad");
                None
            }
        }
    }

    /// Keep the controller's geometry in step with the pad's inner area
    fn sync_control_area(&mut self, inner: Rect) {
        if inner == self.control_area {
            return;
        }
        self.control_area = inner;

        // The last cell on each axis maps to the end of its range.
        let geometry = ControlGeometry::new(
            inner.width.saturating_sub(1) as f32,
            inner.height.saturating_sub(1) as f32,
        );
        self.controller.handle(InputEvent::Resize(geometry));
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),    // Pad and views
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
            .split(rows[0]);

        let views = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),         // Waveform
                Constraint::Percentage(35), // Spectrum
                Constraint::Length(5),      // Parameters
            ])
            .split(columns[1]);

        let generating = self.controller.is_generating();

        let inner = render_control_pad(frame, columns[0], self.pointer, generating);
        self.sync_control_area(inner);

        render_waveform(frame, views[0], &self.scope, generating);
        render_spectrum(frame, views[1], self.spectrum.data());
        render_parameters(
            frame,
            views[2],
            &self.controller.summary(),
            &self.stats,
            self.sample_rate,
            generating,
        );

        let help = Paragraph::new(
            " [S] Sine  [P] Pulses  [N] No filter  [L] Low pass  [H] High pass  [B] Band pass  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[1]);
    }
}
