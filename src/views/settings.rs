//! Settings - trading configuration editor
//!
//! Loads the configuration from the service when the view is entered
//! and writes it back wholesale on save. Option fields cycle through
//! fixed choices; numeric fields take free input and are validated
//! locally before the save request is built.

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::api::types::TradeSettings;
use crate::api::ApiError;
use crate::themes::Theme;
use crate::ui::panels::Panel;
use crate::views::Command;

const PAIRS: [&str; 5] = ["DOT_USDT", "BTC_USDT", "ETH_USDT", "BNB_USDT", "SOL_USDT"];
const STRATEGIES: [&str; 5] = [
    "RSI_STRATEGY",
    "VOLUME_FILTER_STRATEGY",
    "ADVANCED_STRATEGY",
    "GRID_TRADING_STRATEGY",
    "DCA_STRATEGY",
];

/// One editable row. Empty `options` means free numeric input.
#[derive(Debug, Clone)]
struct SettingItem {
    key: &'static str,
    label: &'static str,
    value: String,
    options: Vec<String>,
}

pub struct SettingsView {
    theme: Theme,
    items: Vec<SettingItem>,
    selected: usize,
    editing: bool,
    edit_buffer: String,
    edit_index: usize,
    loading: bool,
    saving: bool,
    loaded: bool,
    message: Option<(String, bool)>, // (message, is_error)
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            theme: Theme::load(),
            items: Self::build_items(&TradeSettings::default()),
            selected: 0,
            editing: false,
            edit_buffer: String::new(),
            edit_index: 0,
            loading: false,
            saving: false,
            loaded: false,
            message: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True while a field edit is active; the app then routes every
    /// key here instead of treating it as a global shortcut.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn set_saving(&mut self) {
        self.saving = true;
    }

    /// Fill the form from a fetched configuration.
    pub fn apply_settings(&mut self, result: Result<TradeSettings, ApiError>) {
        self.loading = false;
        match result {
            Ok(settings) => {
                self.items = Self::build_items(&settings);
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
                self.loaded = true;
            }
            Err(e) => {
                tracing::warn!("settings load failed: {e}");
                self.message = Some((format!("Load failed: {e}"), true));
            }
        }
    }

    /// Reconcile after the dispatched save resolves.
    pub fn apply_save_outcome(&mut self, success: bool) {
        self.saving = false;
        if success {
            self.message = Some(("Settings saved".to_string(), false));
        }
    }

    fn build_items(settings: &TradeSettings) -> Vec<SettingItem> {
        let options = |values: &[&str]| values.iter().map(|s| s.to_string()).collect();
        vec![
            SettingItem {
                key: "trading_pair",
                label: "Trading pair",
                value: settings.trading_pair.clone(),
                options: options(&PAIRS),
            },
            SettingItem {
                key: "position_size",
                label: "Position size",
                value: settings.position_size.to_string(),
                options: Vec::new(),
            },
            SettingItem {
                key: "leverage",
                label: "Leverage",
                value: settings.leverage.to_string(),
                options: Vec::new(),
            },
            SettingItem {
                key: "stop_loss_percentage",
                label: "Stop loss %",
                value: settings.stop_loss_percentage.to_string(),
                options: Vec::new(),
            },
            SettingItem {
                key: "take_profit_percentage",
                label: "Take profit %",
                value: settings.take_profit_percentage.to_string(),
                options: Vec::new(),
            },
            SettingItem {
                key: "trailing_stop_percentage",
                label: "Trailing stop %",
                value: settings.trailing_stop_percentage.to_string(),
                options: Vec::new(),
            },
            SettingItem {
                key: "default_strategy",
                label: "Default strategy",
                value: settings.default_strategy.clone(),
                options: options(&STRATEGIES),
            },
        ]
    }

    /// Assemble the configuration to write back, or report the first
    /// field that fails numeric validation.
    fn build_settings(&self) -> std::result::Result<TradeSettings, String> {
        let mut settings = TradeSettings::default();
        for item in &self.items {
            match item.key {
                "trading_pair" => settings.trading_pair = item.value.clone(),
                "default_strategy" => settings.default_strategy = item.value.clone(),
                "leverage" => {
                    settings.leverage = item
                        .value
                        .parse()
                        .map_err(|_| format!("Invalid leverage: {}", item.value))?;
                }
                numeric => {
                    let parsed: f64 = item
                        .value
                        .parse()
                        .map_err(|_| format!("Invalid {}: {}", item.label, item.value))?;
                    match numeric {
                        "position_size" => settings.position_size = parsed,
                        "stop_loss_percentage" => settings.stop_loss_percentage = parsed,
                        "take_profit_percentage" => settings.take_profit_percentage = parsed,
                        "trailing_stop_percentage" => settings.trailing_stop_percentage = parsed,
                        _ => {}
                    }
                }
            }
        }
        Ok(settings)
    }

    fn begin_edit(&mut self) {
        let Some(item) = self.items.get(self.selected) else {
            return;
        };
        if item.options.is_empty() {
            self.edit_buffer = item.value.clone();
        } else {
            self.edit_index = item
                .options
                .iter()
                .position(|o| o == &item.value)
                .unwrap_or(0);
        }
        self.editing = true;
    }

    /// Commit the in-progress edit. Changing the default strategy also
    /// pushes the update to the service right away, independent of a
    /// later save.
    fn commit_edit(&mut self) -> Option<Command> {
        let mut command = None;
        if let Some(item) = self.items.get_mut(self.selected) {
            let previous = item.value.clone();
            if item.options.is_empty() {
                item.value = self.edit_buffer.trim().to_string();
            } else if let Some(option) = item.options.get(self.edit_index) {
                item.value = option.clone();
            }
            if item.key == "default_strategy" && item.value != previous {
                command = Some(Command::UpdateStrategy(item.value.clone()));
            }
        }
        self.editing = false;
        command
    }
}

impl Default for SettingsView {
    fn default() -> Self {
        Self::new()
    }
}

impl super::ViewTrait for SettingsView {
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let bg = Block::default().style(Style::default().bg(self.theme.background));
        frame.render_widget(bg, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(1)])
            .margin(1)
            .split(area);

        let panel = Panel::new(&self.theme)
            .title("Trading Settings")
            .focused(self.editing)
            .busy(self.loading || self.saving);
        let inner = panel.inner(chunks[0]);
        frame.render_widget(panel.block(), chunks[0]);

        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let is_editing = self.editing && is_selected;

            let value = if is_editing {
                if item.options.is_empty() {
                    format!("{}▏", self.edit_buffer)
                } else {
                    format!(
                        "< {} >",
                        item.options.get(self.edit_index).unwrap_or(&item.value)
                    )
                }
            } else {
                item.value.clone()
            };

            lines.push(Line::from(vec![
                Span::styled(
                    if is_selected { "> " } else { "  " },
                    Style::default().fg(self.theme.accent),
                ),
                Span::styled(
                    format!("{:<18}", item.label),
                    Style::default().fg(if is_selected {
                        self.theme.accent
                    } else {
                        self.theme.text_primary
                    }),
                ),
                Span::styled(
                    value,
                    Style::default().fg(if is_editing {
                        self.theme.warning
                    } else {
                        self.theme.text_secondary
                    }),
                ),
            ]));
        }

        if let Some((message, is_error)) = &self.message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(if *is_error {
                    self.theme.error
                } else {
                    self.theme.success
                }),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let footer = if self.editing {
            Line::from(vec![
                Span::styled("[Enter]", Style::default().fg(self.theme.accent)),
                Span::styled(" Confirm  ", Style::default().fg(self.theme.text_secondary)),
                Span::styled("[Esc]", Style::default().fg(self.theme.accent)),
                Span::styled(" Cancel", Style::default().fg(self.theme.text_secondary)),
            ])
        } else {
            Line::from(vec![
                Span::styled("[↑/↓]", Style::default().fg(self.theme.accent)),
                Span::styled(" Navigate  ", Style::default().fg(self.theme.text_secondary)),
                Span::styled("[Enter]", Style::default().fg(self.theme.accent)),
                Span::styled(" Edit  ", Style::default().fg(self.theme.text_secondary)),
                Span::styled("[s]", Style::default().fg(self.theme.accent)),
                Span::styled(" Save", Style::default().fg(self.theme.text_secondary)),
            ])
        };
        frame.render_widget(Paragraph::new(footer), chunks[1]);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) -> Result<super::ViewAction> {
        use super::ViewAction;
        self.message = None;

        if self.editing {
            let free_input = self
                .items
                .get(self.selected)
                .map(|i| i.options.is_empty())
                .unwrap_or(false);
            match key {
                KeyCode::Esc => self.editing = false,
                KeyCode::Enter => {
                    if let Some(command) = self.commit_edit() {
                        return Ok(ViewAction::Dispatch(command));
                    }
                }
                KeyCode::Left | KeyCode::Char('h') if !free_input => {
                    self.edit_index = self.edit_index.saturating_sub(1);
                }
                KeyCode::Right | KeyCode::Char('l') if !free_input => {
                    let max = self
                        .items
                        .get(self.selected)
                        .map(|i| i.options.len().saturating_sub(1))
                        .unwrap_or(0);
                    self.edit_index = (self.edit_index + 1).min(max);
                }
                KeyCode::Backspace if free_input => {
                    self.edit_buffer.pop();
                }
                KeyCode::Char(c) if free_input && (c.is_ascii_digit() || c == '.') => {
                    self.edit_buffer.push(c);
                }
                _ => {}
            }
            return Ok(ViewAction::Continue);
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.items.len().saturating_sub(1));
            }
            KeyCode::Enter => self.begin_edit(),
            KeyCode::Char('s') => {
                if self.saving {
                    return Ok(ViewAction::Continue);
                }
                match self.build_settings() {
                    Ok(settings) => {
                        return Ok(ViewAction::Dispatch(Command::SaveSettings(settings)));
                    }
                    Err(message) => self.message = Some((message, true)),
                }
            }
            _ => {}
        }
        Ok(ViewAction::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DEFAULT_STRATEGY;

    #[test]
    fn defaults_round_trip_through_the_form() {
        let view = SettingsView::new();
        let settings = view.build_settings().unwrap();
        assert_eq!(settings.default_strategy, DEFAULT_STRATEGY);
        assert_eq!(settings.leverage, 10);
        assert_eq!(settings.stop_loss_percentage, 1.5);
    }

    #[test]
    fn garbage_numeric_input_blocks_the_save() {
        let mut view = SettingsView::new();
        if let Some(item) = view.items.iter_mut().find(|i| i.key == "position_size") {
            item.value = "..".to_string();
        }
        assert!(view.build_settings().is_err());
    }

    #[test]
    fn committing_a_new_default_strategy_dispatches_the_update() {
        let mut view = SettingsView::new();
        view.selected = view
            .items
            .iter()
            .position(|i| i.key == "default_strategy")
            .unwrap();
        view.begin_edit();
        view.edit_index = 0; // RSI_STRATEGY, different from the default
        match view.commit_edit() {
            Some(Command::UpdateStrategy(name)) => assert_eq!(name, "RSI_STRATEGY"),
            other => panic!("expected strategy update command, got {other:?}"),
        }

        // Re-committing the same value dispatches nothing.
        view.begin_edit();
        assert!(view.commit_edit().is_none());
    }

    #[test]
    fn loaded_settings_replace_the_form_wholesale() {
        let mut view = SettingsView::new();
        view.set_loading();
        view.apply_settings(Ok(TradeSettings {
            default_strategy: "DCA_STRATEGY".to_string(),
            leverage: 20,
            ..Default::default()
        }));
        let settings = view.build_settings().unwrap();
        assert_eq!(settings.default_strategy, "DCA_STRATEGY");
        assert_eq!(settings.leverage, 20);
        assert!(view.is_loaded());
    }
}
