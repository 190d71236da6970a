//! Styled panel component
//!
//! Consistent bordered panels for the dashboard regions. A panel can
//! mark itself busy while a request for its region is in flight; the
//! title then carries a spinner-style suffix.

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Padding};

use crate::themes::Theme;

/// Panel border emphasis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelStyle {
    #[default]
    Default,
    /// Highlighted border for the focused region.
    Focused,
    /// Error state, e.g. a region showing stale data after a failure.
    Error,
}

/// A styled panel wrapping one dashboard region.
#[derive(Clone)]
pub struct Panel<'a> {
    title: Option<String>,
    style: PanelStyle,
    theme: &'a Theme,
    busy: bool,
}

impl<'a> Panel<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            title: None,
            style: PanelStyle::Default,
            theme,
            busy: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        if focused {
            self.style = PanelStyle::Focused;
        }
        self
    }

    pub fn style(mut self, style: PanelStyle) -> Self {
        self.style = style;
        self
    }

    /// Mark the region as having a request in flight.
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Build the Block widget.
    pub fn block(&self) -> Block<'a> {
        let (border_color, title_color) = match self.style {
            PanelStyle::Default => (self.theme.border, self.theme.text_secondary),
            PanelStyle::Focused => (self.theme.border_focused, self.theme.accent),
            PanelStyle::Error => (self.theme.error, self.theme.error),
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1));

        if let Some(ref title) = self.title {
            let text = if self.busy {
                format!(" {title} ⋯ ")
            } else {
                format!(" {title} ")
            };
            block = block
                .title(text)
                .title_style(Style::default().fg(title_color).bold());
        }

        block
    }

    /// Inner area after borders and padding.
    pub fn inner(&self, area: Rect) -> Rect {
        self.block().inner(area)
    }
}
