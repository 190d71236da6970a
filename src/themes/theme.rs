//! Theme structure and color utilities

use ratatui::style::Color;

/// Theme colors with semantic organization
#[derive(Clone, Debug)]
pub struct Theme {
    /// Main background color
    pub background: Color,
    /// Card/panel background (slightly elevated)
    pub surface: Color,

    /// Primary text - headers, active items, important content
    pub text_primary: Color,
    /// Secondary text - descriptions, labels, less important
    pub text_secondary: Color,
    /// Muted text - hints, disabled states, timestamps
    pub text_muted: Color,

    /// Primary accent color
    pub accent: Color,

    /// Success - gains, running states, confirmations
    pub success: Color,
    /// Warning - caution, attention needed
    pub warning: Color,
    /// Error - losses, failures, disconnects
    pub error: Color,
    /// Info - informational, neutral
    pub info: Color,

    /// Default border color
    pub border: Color,
    /// Focused/active border color
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Default dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(24, 26, 32),
            surface: Color::Rgb(36, 40, 48),

            text_primary: Color::Rgb(235, 237, 240),
            text_secondary: Color::Rgb(168, 173, 183),
            text_muted: Color::Rgb(120, 124, 132),

            accent: Color::Rgb(96, 175, 255),

            success: Color::Rgb(122, 205, 156),
            warning: Color::Rgb(240, 210, 130),
            error: Color::Rgb(245, 108, 108),
            info: Color::Rgb(137, 180, 250),

            border: Color::Rgb(58, 63, 74),
            border_focused: Color::Rgb(96, 175, 255),
        }
    }

    /// Load the theme, honoring the accent override from config.
    pub fn load() -> Self {
        let mut theme = Self::dark();
        if let Some(hex) = crate::config::accent_override() {
            if let Some(color) = Self::hex_to_color(&hex) {
                theme.accent = color;
                theme.border_focused = color;
            }
        }
        theme
    }

    /// Convert hex string to Color
    pub fn hex_to_color(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color::Rgb(r, g, b))
    }

    /// Color for a signed value (profit/loss coloring).
    pub fn signed_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.success
        } else {
            self.error
        }
    }

    /// Get status indicator color
    pub fn status_color(&self, status: &str) -> Color {
        match status.to_lowercase().as_str() {
            "running" | "active" | "live" | "connected" | "enabled" | "ok" => self.success,
            "warning" | "degraded" | "slow" => self.warning,
            "error" | "failed" | "disconnected" | "disabled" => self.error,
            "info" | "pending" | "starting" => self.info,
            _ => self.text_muted,
        }
    }

    /// Get status dot character
    pub fn status_dot(&self, active: bool) -> &'static str {
        if active {
            "●"
        } else {
            "○"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_leading_hash() {
        assert_eq!(
            Theme::hex_to_color("#ff6b6b"),
            Some(Color::Rgb(255, 107, 107))
        );
        assert_eq!(Theme::hex_to_color("0088ff"), Some(Color::Rgb(0, 136, 255)));
        assert_eq!(Theme::hex_to_color("xyz"), None);
        assert_eq!(Theme::hex_to_color("#12345"), None);
    }

    #[test]
    fn status_colors_map_lifecycle_words() {
        let theme = Theme::dark();
        assert_eq!(theme.status_color("Active"), theme.success);
        assert_eq!(theme.status_color("disconnected"), theme.error);
        assert_eq!(theme.status_color("whatever"), theme.text_muted);
    }
}
