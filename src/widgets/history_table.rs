//! Trade history table - immutable snapshot of past fills

use ratatui::prelude::*;

use crate::api::types::HistoryEntry;
use crate::format;
use crate::themes::Theme;

/// Trade history table widget
pub struct HistoryTable {
    entries: Vec<HistoryEntry>,
    scroll: usize,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scroll: 0,
        }
    }

    /// Replace the snapshot wholesale.
    pub fn update(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.scroll = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll < self.entries.len().saturating_sub(1) {
            self.scroll += 1;
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if self.entries.is_empty() {
            let text = "No trading history";
            buf.set_string(
                area.x + (area.width.saturating_sub(text.len() as u16)) / 2,
                area.y + area.height / 2,
                text,
                Style::default().fg(theme.text_muted),
            );
            return;
        }

        let header = ["Time", "Symbol", "Side", "Size", "Price", "Fee", "P&L"];
        let widths = [17u16, 9, 5, 10, 11, 9, 11];
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

        for (i, entry) in self
            .entries
            .iter()
            .skip(self.scroll)
            .take(visible_rows)
            .enumerate()
        {
            let y = data_start_y + i as u16;
            if y >= area.bottom() {
                break;
            }

            let side_color = if entry.side.eq_ignore_ascii_case("buy") {
                theme.success
            } else {
                theme.error
            };
            let pnl_color = theme.signed_color(entry.pnl);

            // Timestamps arrive as ISO strings; show them to the minute.
            let time: String = entry.time.chars().take(16).collect();

            let cells = [
                (time, theme.text_muted),
                (entry.symbol.clone(), theme.text_primary),
                (entry.side.to_uppercase(), side_color),
                (format::quantity(entry.size), theme.text_secondary),
                (format::price(entry.price), theme.text_secondary),
                (format::price(entry.fee), theme.text_muted),
                (format::signed_currency(entry.pnl), pnl_color),
            ];

            let mut x = area.x;
            for (j, (text, color)) in cells.iter().enumerate() {
                buf.set_string(x, y, text, Style::default().fg(*color));
                x += widths[j] + 1;
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_resets_scroll() {
        let mut table = HistoryTable::new();
        table.update(vec![HistoryEntry::default(), HistoryEntry::default()]);
        table.scroll_down();
        assert_eq!(table.scroll, 1);
        table.update(vec![HistoryEntry::default()]);
        assert_eq!(table.scroll, 0);
    }

    #[test]
    fn scroll_stays_in_bounds() {
        let mut table = HistoryTable::new();
        table.update(vec![HistoryEntry::default()]);
        table.scroll_down();
        table.scroll_down();
        assert_eq!(table.scroll, 0);
        table.scroll_up();
        assert_eq!(table.scroll, 0);
    }
}
