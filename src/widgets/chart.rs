//! Chart widgets: price chart (braille dots) and sparkline (block chars)

use std::collections::VecDeque;

use ratatui::prelude::*;

use crate::api::types::ChartSeries;
use crate::themes::Theme;

const BRAILLE_BASE: u32 = 0x2800;
/// Braille dot bits for a 2x4 cell grid.
const BRAILLE_BITS: [[u32; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Rendered model for one symbol/timeframe selection. A new load
/// replaces the whole instance; nothing is merged into an old chart.
pub struct PriceChart {
    pub symbol: String,
    pub series: ChartSeries,
    /// Present when the series is locally synthesized placeholder
    /// data; carries the reason the real fetch failed.
    pub sample_note: Option<String>,
}

impl PriceChart {
    pub fn new(symbol: impl Into<String>, series: ChartSeries) -> Self {
        Self {
            symbol: symbol.into(),
            series,
            sample_note: None,
        }
    }

    pub fn sample(symbol: impl Into<String>, series: ChartSeries, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            series,
            sample_note: Some(reason.into()),
        }
    }

    pub fn is_sample(&self) -> bool {
        self.sample_note.is_some()
    }

    /// Title line shown above the plot.
    pub fn title(&self) -> String {
        let tf = if self.series.timeframe.is_empty() {
            String::new()
        } else {
            format!(" · {}", self.series.timeframe)
        };
        match &self.sample_note {
            Some(reason) => format!("{}{} · SAMPLE DATA ({reason})", self.symbol, tf),
            None => format!("{}{}", self.symbol, tf),
        }
    }

    /// Render the chart: close-price line, high/low band when the
    /// payload carries OHLC, volume strip at the bottom.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height < 4 || area.width < 12 {
            return;
        }

        let prices = &self.series.prices;
        if prices.is_empty() {
            let msg = "No data";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            buf.set_string(x, area.y + area.height / 2, msg, Style::default().fg(theme.text_muted));
            return;
        }

        let line_color = if self.is_sample() {
            theme.warning
        } else {
            theme.accent
        };

        let has_volume = !self.series.volumes.is_empty();
        let volume_rows: u16 = if has_volume { 1 } else { 0 };

        // Layout: y labels on the left, x labels and volume at the bottom.
        let y_label_width: u16 = 9;
        let chart_x = area.x + y_label_width;
        let chart_width = area.width.saturating_sub(y_label_width);
        let chart_height = area.height.saturating_sub(1 + volume_rows);
        if chart_width == 0 || chart_height == 0 {
            return;
        }

        // Scale over everything that will be drawn.
        let mut min_val = f64::INFINITY;
        let mut max_val = f64::NEG_INFINITY;
        for &p in prices {
            min_val = min_val.min(p);
            max_val = max_val.max(p);
        }
        if self.series.has_ohlc() {
            for &h in &self.series.high {
                max_val = max_val.max(h);
            }
            for &l in &self.series.low {
                min_val = min_val.min(l);
            }
        }
        let range = if (max_val - min_val).abs() < f64::EPSILON {
            1.0
        } else {
            max_val - min_val
        };

        let grid_w = chart_width as usize * 2;
        let grid_h = chart_height as usize * 4;
        let mut grid = vec![vec![0u8; grid_w]; grid_h];
        let mut cell_color =
            vec![vec![None::<Color>; chart_width as usize]; chart_height as usize];

        let n = prices.len();
        let gx_of = |i: usize| -> usize {
            if n < 2 {
                0
            } else {
                (i as f64 / (n - 1) as f64 * (grid_w - 1) as f64).round() as usize
            }
        };
        let gy_of = |v: f64| -> usize {
            let normalized = ((v - min_val) / range).clamp(0.0, 1.0);
            ((1.0 - normalized) * (grid_h - 1) as f64).round() as usize
        };

        let mark = |gx: usize, gy: usize, color: Color,
                        grid: &mut Vec<Vec<u8>>,
                        cell_color: &mut Vec<Vec<Option<Color>>>| {
            let gx = gx.min(grid_w - 1);
            let gy = gy.min(grid_h - 1);
            grid[gy][gx] = 1;
            let cx = gx / 2;
            let cy = gy / 4;
            if cx < chart_width as usize && cy < chart_height as usize {
                cell_color[cy][cx] = Some(color);
            }
        };

        // High/low band first so the close line overdraws it.
        if self.series.has_ohlc() {
            for i in 0..n {
                let gx = gx_of(i);
                let top = gy_of(self.series.high[i]);
                let bottom = gy_of(self.series.low[i]);
                for gy in top..=bottom {
                    mark(gx, gy, theme.border, &mut grid, &mut cell_color);
                }
            }
        }

        // Close line with Bresenham segments between samples.
        for i in 0..n.saturating_sub(1) {
            let (mut cx, mut cy) = (gx_of(i) as i32, gy_of(prices[i]) as i32);
            let (x1, y1) = (gx_of(i + 1) as i32, gy_of(prices[i + 1]) as i32);
            let dx = (x1 - cx).abs();
            let dy = -(y1 - cy).abs();
            let sx = if cx < x1 { 1 } else { -1 };
            let sy = if cy < y1 { 1 } else { -1 };
            let mut err = dx + dy;
            loop {
                mark(cx as usize, cy as usize, line_color, &mut grid, &mut cell_color);
                if cx == x1 && cy == y1 {
                    break;
                }
                let e2 = 2 * err;
                if e2 >= dy {
                    err += dy;
                    cx += sx;
                }
                if e2 <= dx {
                    err += dx;
                    cy += sy;
                }
            }
        }
        if n == 1 {
            mark(0, gy_of(prices[0]), line_color, &mut grid, &mut cell_color);
        }

        // Rasterize the braille grid.
        for cy in 0..chart_height as usize {
            for cx in 0..chart_width as usize {
                let mut bits: u32 = 0;
                for (row, row_bits) in BRAILLE_BITS.iter().enumerate() {
                    for (col, bit) in row_bits.iter().enumerate() {
                        let gy = cy * 4 + row;
                        let gx = cx * 2 + col;
                        if gy < grid_h && gx < grid_w && grid[gy][gx] != 0 {
                            bits |= bit;
                        }
                    }
                }
                if bits != 0 {
                    let ch = char::from_u32(BRAILLE_BASE + bits).unwrap_or(' ');
                    if let Some(cell) = buf.cell_mut((chart_x + cx as u16, area.y + cy as u16)) {
                        cell.set_char(ch);
                        let color = cell_color[cy][cx].unwrap_or(line_color);
                        cell.set_style(Style::default().fg(color));
                    }
                }
            }
        }

        // Y-axis labels: top, middle, bottom.
        let labels = [
            (area.y, max_val),
            (area.y + chart_height / 2, (max_val + min_val) / 2.0),
            (area.y + chart_height.saturating_sub(1), min_val),
        ];
        for (y, value) in labels {
            let text = format!("{:>8}", compact_value(value));
            buf.set_string(area.x, y, &text, Style::default().fg(theme.text_muted));
        }

        // Volume strip under the plot.
        let mut next_y = area.y + chart_height;
        if has_volume {
            render_bars(
                &self.series.volumes,
                Rect::new(chart_x, next_y, chart_width, 1),
                buf,
                theme.text_muted,
            );
            next_y += 1;
        }

        // X-axis: first and last time labels.
        if let (Some(first), Some(last)) = (self.series.labels.first(), self.series.labels.last()) {
            let style = Style::default().fg(theme.text_muted);
            buf.set_string(chart_x, next_y, first, style);
            let last_x = (chart_x + chart_width).saturating_sub(last.len() as u16);
            if last_x > chart_x + first.len() as u16 {
                buf.set_string(last_x, next_y, last, style);
            }
        }
    }
}

fn compact_value(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else {
        format!("{v:.2}")
    }
}

/// Render a slice of values as one row of block-character bars,
/// resampled to the available width.
fn render_bars(values: &[f64], area: Rect, buf: &mut Buffer, color: Color) {
    if values.is_empty() || area.width == 0 || area.height == 0 {
        return;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return;
    }
    let width = area.width as usize;
    for x in 0..width {
        let idx = x * values.len() / width;
        let normalized = (values[idx] / max).clamp(0.0, 1.0);
        let level = (normalized * 7.0).round() as usize;
        if let Some(cell) = buf.cell_mut((area.x + x as u16, area.y)) {
            cell.set_char(SPARK_CHARS[level.min(7)]);
            cell.set_style(Style::default().fg(color));
        }
    }
}

/// Rolling sparkline fed by live price pushes, rendered in one row.
pub struct Sparkline {
    data: VecDeque<f64>,
    max_points: usize,
}

impl Sparkline {
    pub fn new(max_points: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(max_points),
            max_points,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.data.len() >= self.max_points {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.data.back().copied()
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, color: Color) {
        if area.height == 0 || area.width == 0 || self.data.is_empty() {
            return;
        }

        let visible = area.width as usize;
        let start = self.data.len().saturating_sub(visible);
        let window: Vec<f64> = self.data.iter().skip(start).copied().collect();

        let min = window.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = if (max - min).abs() < f64::EPSILON {
            1.0
        } else {
            max - min
        };

        for (i, &value) in window.iter().enumerate() {
            let normalized = ((value - min) / range).clamp(0.0, 1.0);
            let level = (normalized * 7.0).round() as usize;
            if let Some(cell) = buf.cell_mut((area.x + i as u16, area.y)) {
                cell.set_char(SPARK_CHARS[level.min(7)]);
                cell.set_style(Style::default().fg(color));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_caps_its_window() {
        let mut spark = Sparkline::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            spark.push(v);
        }
        assert_eq!(spark.len(), 3);
        assert_eq!(spark.last(), Some(4.0));
    }

    #[test]
    fn sample_charts_carry_their_reason_in_the_title() {
        let chart = PriceChart::sample("BTCUSDT", ChartSeries::default(), "network error");
        assert!(chart.is_sample());
        assert!(chart.title().contains("SAMPLE DATA"));
        assert!(chart.title().contains("network error"));

        let live = PriceChart::new("BTCUSDT", ChartSeries::default());
        assert!(!live.is_sample());
        assert!(!live.title().contains("SAMPLE"));
    }

    #[test]
    fn compact_values_scale_units() {
        assert_eq!(compact_value(950.0), "950.00");
        assert_eq!(compact_value(42_000.0), "42.0K");
        assert_eq!(compact_value(1_250_000.0), "1.3M");
    }
}
