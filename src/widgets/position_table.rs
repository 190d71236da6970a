//! Position table widget - open positions with P&L coloring

use ratatui::prelude::*;

use crate::api::types::Position;
use crate::format;
use crate::themes::Theme;

/// Sort mode for the position table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSort {
    Symbol,
    PnlDesc,
    SizeDesc,
    RoeDesc,
}

impl PositionSort {
    pub fn next(self) -> Self {
        match self {
            Self::Symbol => Self::PnlDesc,
            Self::PnlDesc => Self::SizeDesc,
            Self::SizeDesc => Self::RoeDesc,
            Self::RoeDesc => Self::Symbol,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::PnlDesc => "P&L",
            Self::SizeDesc => "Size",
            Self::RoeDesc => "ROE",
        }
    }
}

/// Position table widget
pub struct PositionTable {
    positions: Vec<Position>,
    selected: usize,
    sort_mode: PositionSort,
}

impl PositionTable {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            selected: 0,
            sort_mode: PositionSort::Symbol,
        }
    }

    /// Replace the snapshot wholesale.
    pub fn update(&mut self, positions: Vec<Position>) {
        self.positions = positions;
        self.apply_sort();
        if self.selected >= self.positions.len() && !self.positions.is_empty() {
            self.selected = self.positions.len() - 1;
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort_mode = self.sort_mode.next();
        self.apply_sort();
    }

    pub fn sort_label(&self) -> &'static str {
        self.sort_mode.label()
    }

    fn apply_sort(&mut self) {
        match self.sort_mode {
            PositionSort::Symbol => self.positions.sort_by(|a, b| a.symbol.cmp(&b.symbol)),
            PositionSort::PnlDesc => self.positions.sort_by(|a, b| {
                b.unrealized_pnl
                    .partial_cmp(&a.unrealized_pnl)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            PositionSort::SizeDesc => self.positions.sort_by(|a, b| {
                b.size
                    .abs()
                    .partial_cmp(&a.size.abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            PositionSort::RoeDesc => self.positions.sort_by(|a, b| {
                b.roe.partial_cmp(&a.roe).unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.selected < self.positions.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn selected_position(&self) -> Option<&Position> {
        self.positions.get(self.selected)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if self.positions.is_empty() {
            let text = "No open positions";
            buf.set_string(
                area.x + (area.width.saturating_sub(text.len() as u16)) / 2,
                area.y + area.height / 2,
                text,
                Style::default().fg(theme.text_muted),
            );
            return;
        }

        let header = ["Symbol", "Size", "Entry", "Mark", "uP&L", "ROE"];
        let widths = [9u16, 10, 11, 11, 11, 8];
        let header_style = Style::default().fg(theme.text_primary).bold();

        let mut x = area.x;
        for (i, col) in header.iter().enumerate() {
            buf.set_string(x, area.y, *col, header_style);
            x += widths[i] + 1;
        }

        let total_width: u16 = widths.iter().sum::<u16>() + widths.len() as u16 - 1;
        let sep = "─".repeat(total_width.min(area.width) as usize);
        buf.set_string(area.x, area.y + 1, &sep, Style::default().fg(theme.border));

        let data_start_y = area.y + 2;
        let visible_rows = (area.height as usize).saturating_sub(2);
        let scroll_offset = self.selected.saturating_sub(visible_rows.saturating_sub(1));

        for (i, pos) in self
            .positions
            .iter()
            .skip(scroll_offset)
            .take(visible_rows)
            .enumerate()
        {
            let y = data_start_y + i as u16;
            if y >= area.bottom() {
                break;
            }

            let is_selected = (i + scroll_offset) == self.selected;
            let row_style = if is_selected {
                Style::default().bg(theme.surface)
            } else {
                Style::default()
            };
            let pnl_color = theme.signed_color(pos.unrealized_pnl);
            let roe_color = theme.signed_color(pos.roe);

            let cells = [
                (pos.symbol.clone(), theme.text_primary),
                (format::quantity(pos.size), theme.text_secondary),
                (format::price(pos.entry_price), theme.text_muted),
                (format::price(pos.mark_price), theme.text_secondary),
                (format::signed_currency(pos.unrealized_pnl), pnl_color),
                (format::signed_percentage(pos.roe), roe_color),
            ];

            let mut x = area.x;
            for (j, (text, color)) in cells.iter().enumerate() {
                buf.set_string(x, y, text, row_style.fg(*color));
                x += widths[j] + 1;
            }
        }
    }
}

impl Default for PositionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(symbol: &str, pnl: f64) -> Position {
        Position {
            symbol: symbol.to_string(),
            unrealized_pnl: pnl,
            ..Default::default()
        }
    }

    #[test]
    fn update_replaces_the_snapshot_and_clamps_selection() {
        let mut table = PositionTable::new();
        table.update(vec![position("A", 0.0), position("B", 0.0), position("C", 0.0)]);
        table.down();
        table.down();
        assert_eq!(table.selected_position().unwrap().symbol, "C");

        table.update(vec![position("A", 0.0)]);
        assert_eq!(table.selected_position().unwrap().symbol, "A");
    }

    #[test]
    fn pnl_sort_puts_winners_first() {
        let mut table = PositionTable::new();
        table.cycle_sort(); // Symbol -> PnlDesc
        table.update(vec![position("A", -5.0), position("B", 10.0)]);
        assert_eq!(table.selected_position().unwrap().symbol, "B");
        assert_eq!(table.sort_label(), "P&L");
    }
}
