//! Spectrum view of the scope snapshot
//!
//! Hann-windowed FFT of the 512-sample scope, sampled at log-spaced frequencies.

use std::{f32::consts::PI, sync::Arc};

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of points drawn
const SPECTRUM_POINTS: usize = 40;

/// Floor for silent bins
const FLOOR_DB: f64 = -100.0;

/// The generator tops out at 5 kHz; show a little beyond for pulse harmonics.
const MAX_DISPLAY_HZ: f32 = 8_000.0;
const MIN_DISPLAY_HZ: f32 = 20.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// (frequency_hz, fft_index) for each drawn point
    points: Vec<(f64, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(len);

        let window = (0..len)
            .map(|i| {
                if len > 1 {
                    0.5 * (1.0 - (2.0 * PI * i as f32 / (len - 1) as f32).cos())
                } else {
                    1.0
                }
            })
            .collect();

        let sample_rate = if sample_rate > 0.0 { sample_rate } else { 44_100.0 };
        let max_hz = (sample_rate / 2.0).min(MAX_DISPLAY_HZ).max(MIN_DISPLAY_HZ + 1.0) as f64;
        let min_hz = MIN_DISPLAY_HZ as f64;
        let last_index = (len / 2).saturating_sub(1);

        let points: Vec<(f64, usize)> = (0..SPECTRUM_POINTS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_POINTS - 1) as f64;
                let hz = min_hz * (max_hz / min_hz).powf(t);
                let index = (hz * len as f64 / sample_rate as f64).round() as usize;
                (hz, index.min(last_index))
            })
            .collect();

        let spectrum = points.iter().map(|&(hz, _)| (hz, FLOOR_DB)).collect();

        Self {
            window,
            points,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); len],
            spectrum,
        }
    }

    /// Recompute from a full scope; buffers of any other length are ignored
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() || buffer.is_empty() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }

        self.fft.process(&mut self.scratch);

        for ((hz, db), &(point_hz, index)) in self.spectrum.iter_mut().zip(&self.points) {
            let power = self.scratch[index].norm_sqr().max(1e-12);
            *hz = point_hz;
            *db = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_hz = spectrum.iter().map(|&(hz, _)| hz).fold(1.0, f64::max);
    let max_db = spectrum.iter().map(|&(_, db)| db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, max_hz])
                .labels(vec!["0".to_string(), format!("{:.0} Hz", max_hz)])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_peaks_near_its_frequency() {
        let sample_rate = 48_000.0;
        let len = 512;
        let mut analyzer = SpectrumAnalyzer::new(len, sample_rate);

        let tone: Vec<f32> = (0..len)
            .map(|n| (2.0 * PI * 1_000.0 * n as f32 / sample_rate).sin())
            .collect();
        analyzer.update(&tone);

        let (peak_hz, _) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, FLOOR_DB), |best, p| if p.1 > best.1 { p } else { best });
        assert!(
            (600.0..1_600.0).contains(&peak_hz),
            "peak at {peak_hz} Hz"
        );
    }

    #[test]
    fn wrong_length_is_ignored() {
        let mut analyzer = SpectrumAnalyzer::new(512, 44_100.0);
        analyzer.update(&[1.0; 100]);
        assert!(analyzer.data().iter().all(|&(_, db)| db == FLOOR_DB));
    }
}
