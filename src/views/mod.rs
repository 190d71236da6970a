//! View modules for the dashboard screens

use anyhow::Result;
use ratatui::prelude::*;

use crate::api::types::{TradeRequest, TradeSettings};

pub mod analysis;
pub mod charts;
pub mod history;
pub mod overview;
pub mod settings;
pub mod trade;

/// Available views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    History,
    Charts,
    Trade,
    Analysis,
    Settings,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::History => "History",
            Self::Charts => "Charts",
            Self::Trade => "Trade",
            Self::Analysis => "Analysis",
            Self::Settings => "Settings",
        }
    }

    /// Order used by the tab bar and Tab-key cycling.
    pub const ALL: [View; 6] = [
        View::Overview,
        View::History,
        View::Charts,
        View::Trade,
        View::Analysis,
        View::Settings,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// A state-changing or fetching request a view asks the app to
/// dispatch. The app spawns the request and routes the outcome back.
#[derive(Debug, Clone)]
pub enum Command {
    ToggleAutoTrading(bool),
    SubmitTrade(TradeRequest),
    SaveSettings(TradeSettings),
    UpdateStrategy(String),
    TestStrategy { strategy: String, symbol: String },
    LoadChart { symbol: String, timeframe: String },
    RunAnalysis(String),
}

/// Action returned by a view's key handler
pub enum ViewAction {
    /// Key handled, stay in current view
    Continue,
    /// Request to navigate back to the overview
    Back,
    /// Ask the app to dispatch a command
    Dispatch(Command),
}

/// Trait for views that can be rendered
pub trait ViewTrait {
    /// Render the view
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;

    /// Handle key input
    fn handle_key(&mut self, _key: crossterm::event::KeyCode) -> Result<ViewAction> {
        Ok(ViewAction::Continue)
    }
}
