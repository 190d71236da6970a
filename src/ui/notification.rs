//! Notification overlay
//!
//! Transient toast-style messages rendered in the top-right corner.
//! Every command outcome and connectivity transition reports through
//! here; notifications expire on their own and never block input.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap};

use crate::themes::Theme;

/// Severity of a notification, controls border color and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single transient message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: Option<String>,
    pub level: NotificationLevel,
    created: Instant,
    lifetime: Duration,
}

impl Notification {
    fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        let lifetime = match level {
            NotificationLevel::Error => Duration::from_secs(8),
            NotificationLevel::Warning => Duration::from_secs(6),
            _ => Duration::from_secs(4),
        };
        Self {
            title: title.into(),
            message: None,
            level,
            created: Instant::now(),
            lifetime,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title)
    }

    /// Attach a body line below the title.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn expired(&self) -> bool {
        self.created.elapsed() >= self.lifetime
    }

    fn color(&self, theme: &Theme) -> Color {
        match self.level {
            NotificationLevel::Info => theme.info,
            NotificationLevel::Success => theme.success,
            NotificationLevel::Warning => theme.warning,
            NotificationLevel::Error => theme.error,
        }
    }
}

/// Holds and renders the active notifications.
pub struct NotificationManager {
    items: Vec<Notification>,
    max_visible: usize,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Drop expired notifications. Call once per frame.
    pub fn cleanup(&mut self) {
        self.items.retain(|n| !n.expired());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the newest notifications stacked in the top-right corner.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let width = 40.min(area.width.saturating_sub(2));
        if width < 10 {
            return;
        }

        let mut y = area.y + 1;
        let newest = self.items.iter().rev().take(self.max_visible);
        for notification in newest {
            let has_body = notification.message.is_some();
            let height: u16 = if has_body { 4 } else { 3 };
            if y + height > area.bottom() {
                break;
            }

            let toast_area = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
            Clear.render(toast_area, buf);

            let color = notification.color(theme);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme.surface));
            let inner = block.inner(toast_area);
            block.render(toast_area, buf);

            let mut lines = vec![Line::from(Span::styled(
                notification.title.clone(),
                Style::default().fg(color).bold(),
            ))];
            if let Some(ref message) = notification.message {
                lines.push(Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(theme.text_secondary),
                )));
            }
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .render(inner, buf);

            y += height;
        }
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_retains_fresh_notifications() {
        let mut manager = NotificationManager::new();
        manager.push(Notification::info("hello"));
        manager.cleanup();
        assert!(!manager.is_empty());
    }

    #[test]
    fn errors_outlive_infos() {
        let info = Notification::info("i");
        let error = Notification::error("e");
        assert!(error.lifetime > info.lifetime);
    }
}
