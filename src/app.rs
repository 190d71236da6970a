//! Main application structure and event loop
//!
//! The app owns every piece of shared state explicitly: the API
//! client, the push-channel receiver, the poll timer, the per-action
//! busy flags, and the view instances. One loop drives everything:
//! drain push events, drain command outcomes, tick the poll scheduler,
//! draw, then handle input.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::stream::{self, PriceUpdate, PushEvent};
use crate::api::types::{
    Analysis, ChartSeries, StrategyTest, TradeRequest, TradeSide, TradeValidation,
};
use crate::api::{ApiClient, ApiError};
use crate::format;
use crate::themes::Theme;
use crate::ui::{ConfirmDialog, DialogResult, HelpOverlay, Notification, NotificationManager, StatusBar};
use crate::views::{
    analysis::AnalysisView, charts::ChartsView, history::HistoryView, overview::OverviewView,
    settings::SettingsView, trade::TradeView, Command, View, ViewAction, ViewTrait,
};

/// Actions that require a confirmation dialog before dispatch
#[derive(Debug)]
enum PendingAction {
    ToggleAutoTrading(bool),
    SubmitTrade(TradeRequest),
}

/// Result of a dispatched command, delivered over the outcome channel
enum CommandOutcome {
    AutoTrading {
        enable: bool,
        result: Result<String, ApiError>,
    },
    Trade(Result<TradeValidation, ApiError>),
    SettingsSaved(Result<String, ApiError>),
    SettingsLoaded(Result<crate::api::types::TradeSettings, ApiError>),
    StrategyUpdated {
        name: String,
        result: Result<String, ApiError>,
    },
    StrategyTested(Result<StrategyTest, ApiError>),
    Chart {
        symbol: String,
        timeframe: String,
        result: Result<ChartSeries, ApiError>,
    },
    Analysis {
        symbol: String,
        result: Result<Analysis, ApiError>,
    },
}

/// Main application state
pub struct App {
    current_view: View,
    overview: OverviewView,
    history: HistoryView,
    charts: ChartsView,
    trade: TradeView,
    analysis: AnalysisView,
    settings: SettingsView,

    theme: Theme,
    client: ApiClient,
    notifications: NotificationManager,
    help_overlay: HelpOverlay,
    confirm_dialog: Option<ConfirmDialog>,
    pending_action: Option<PendingAction>,
    should_quit: bool,

    // Poll scheduler
    poll_interval: Duration,
    last_poll: Instant,

    // Command outcome channel
    outcome_tx: mpsc::UnboundedSender<CommandOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<CommandOutcome>,
    auto_trading_busy: bool,

    // Push channel
    push_rx: Option<mpsc::Receiver<PushEvent>>,
    connected: bool,
    last_connect_attempt: Instant,
    last_price: Option<PriceUpdate>,
}

impl App {
    pub fn new() -> Self {
        info!("Initializing dashboard");
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let poll_interval = crate::config::poll_interval();

        Self {
            current_view: View::Overview,
            overview: OverviewView::new(),
            history: HistoryView::new(),
            charts: ChartsView::new(),
            trade: TradeView::new(),
            analysis: AnalysisView::new(),
            settings: SettingsView::new(),
            theme: Theme::load(),
            client: ApiClient::new(&crate::config::api_url()),
            notifications: NotificationManager::new(),
            help_overlay: HelpOverlay::new(),
            confirm_dialog: None,
            pending_action: None,
            should_quit: false,
            poll_interval,
            // First loop iteration runs a full poll immediately
            last_poll: Instant::now() - poll_interval,
            outcome_tx,
            outcome_rx,
            auto_trading_busy: false,
            push_rx: None,
            connected: false,
            last_connect_attempt: Instant::now() - crate::config::reconnect_interval(),
            last_price: None,
        }
    }

    /// One poll tick: refresh the volatile regions concurrently. Each
    /// refresh applies its own result; one failing never blocks the
    /// others. Awaiting the whole tick means at most one cycle is in
    /// flight at a time.
    async fn refresh_poll(&mut self) {
        let (balance, positions, status, strategy) = tokio::join!(
            self.client.balance(),
            self.client.positions(),
            self.client.auto_trading_status(),
            self.client.strategy(),
        );
        self.overview.apply_balance(balance);
        self.overview.apply_positions(positions);
        self.overview.apply_auto_trading(status);
        self.overview.apply_strategy(strategy);
        self.trade
            .set_available_balance(self.overview.available_balance());
        self.last_poll = Instant::now();
    }

    async fn refresh_history(&mut self) {
        self.history.apply_history(self.client.history().await);
    }

    /// Targeted reconciliation after a successful trade.
    async fn refresh_after_trade(&mut self) {
        let (balance, positions, history) = tokio::join!(
            self.client.balance(),
            self.client.positions(),
            self.client.history(),
        );
        self.overview.apply_balance(balance);
        self.overview.apply_positions(positions);
        self.history.apply_history(history);
        self.trade
            .set_available_balance(self.overview.available_balance());
    }

    /// Targeted reconciliation of the strategy region.
    async fn refresh_strategy_region(&mut self) {
        let (status, strategy) = tokio::join!(
            self.client.auto_trading_status(),
            self.client.strategy(),
        );
        self.overview.apply_auto_trading(status);
        self.overview.apply_strategy(strategy);
    }

    /// Reconnect the push channel while disconnected, on a fixed cadence.
    fn maintain_push_channel(&mut self) {
        if self.push_rx.is_some()
            || self.last_connect_attempt.elapsed() < crate::config::reconnect_interval()
        {
            return;
        }
        debug!("connecting push channel");
        self.push_rx = Some(stream::connect(&crate::config::ws_url()));
        self.last_connect_attempt = Instant::now();
    }

    /// Drain pushed events without blocking the frame.
    fn drain_push_events(&mut self) {
        let mut events = Vec::new();
        let mut closed = false;
        match self.push_rx.as_mut() {
            Some(rx) => loop {
                match rx.try_recv() {
                    Ok(event) => events.push(event),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        closed = true;
                        break;
                    }
                }
            },
            None => return,
        }

        for event in events {
            match event {
                PushEvent::Connected => {
                    if !self.connected {
                        self.connected = true;
                        self.notifications.push(
                            Notification::success("Connected")
                                .message("Live push channel established"),
                        );
                    }
                }
                PushEvent::Disconnected => closed = true,
                PushEvent::Price(update) => {
                    self.overview.push_price(&update);
                    self.last_price = Some(update);
                }
            }
        }

        if closed {
            self.push_rx = None;
            if self.connected {
                self.connected = false;
                self.notifications.push(
                    Notification::warning("Disconnected")
                        .message(format!("Push channel lost: {}", crate::config::ws_url())),
                );
            }
        }
    }

    /// Spawn a dispatched command; its outcome arrives on the channel.
    fn dispatch_command(&mut self, command: Command) {
        match command {
            Command::ToggleAutoTrading(enable) => {
                if self.auto_trading_busy {
                    return;
                }
                self.auto_trading_busy = true;
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.set_auto_trading(enable).await;
                    let _ = tx.send(CommandOutcome::AutoTrading { enable, result });
                });
            }
            Command::SubmitTrade(request) => {
                // Large buy orders get a confirmation dialog first.
                if let Some(dialog) = self.large_trade_dialog(&request) {
                    self.pending_action = Some(PendingAction::SubmitTrade(request));
                    self.confirm_dialog = Some(dialog);
                    return;
                }
                self.spawn_trade(request);
            }
            Command::SaveSettings(settings) => {
                self.settings.set_saving();
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.save_settings(&settings).await;
                    let _ = tx.send(CommandOutcome::SettingsSaved(result));
                });
            }
            Command::UpdateStrategy(name) => {
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.update_strategy(&name).await;
                    let _ = tx.send(CommandOutcome::StrategyUpdated { name, result });
                });
            }
            Command::TestStrategy { strategy, symbol } => {
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.test_strategy(&strategy, &symbol).await;
                    let _ = tx.send(CommandOutcome::StrategyTested(result));
                });
            }
            Command::LoadChart { symbol, timeframe } => {
                self.charts.set_loading();
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.chart_data(&symbol, &timeframe).await;
                    let _ = tx.send(CommandOutcome::Chart {
                        symbol,
                        timeframe,
                        result,
                    });
                });
            }
            Command::RunAnalysis(symbol) => {
                self.analysis.set_loading();
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.analysis(&symbol).await;
                    let _ = tx.send(CommandOutcome::Analysis { symbol, result });
                });
            }
        }
    }

    fn spawn_trade(&mut self, request: TradeRequest) {
        self.trade.set_submitting();
        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = client.submit_trade(&request).await;
            let _ = tx.send(CommandOutcome::Trade(result));
        });
    }

    /// Build a confirmation dialog for a buy that would use more than
    /// half the available balance. The cost estimate uses the limit
    /// price, or the latest pushed price for the symbol; with neither
    /// known the remote validation is the only guard.
    fn large_trade_dialog(&self, request: &TradeRequest) -> Option<ConfirmDialog> {
        if request.side != TradeSide::Buy {
            return None;
        }
        let available = self.overview.available_balance();
        let price = request.price.or_else(|| {
            self.last_price
                .as_ref()
                .filter(|p| p.symbol == request.symbol)
                .map(|p| p.price)
        })?;
        let estimated = request.quantity * price;
        if available <= 0.0 || estimated <= available * 0.5 {
            return None;
        }
        Some(
            ConfirmDialog::new(
                "Large Order",
                format!(
                    "This order will use about {} of your available balance. Proceed?",
                    format::currency(estimated)
                ),
            )
            .detail("Estimated cost", format::currency(estimated))
            .detail("Available", format::currency(available)),
        )
    }

    /// Apply one command outcome: clear the busy flag, notify, and
    /// re-fetch only the affected regions.
    async fn process_outcome(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::AutoTrading { enable, result } => {
                self.auto_trading_busy = false;
                match result {
                    Ok(message) => {
                        let title = if enable {
                            "Auto trading enabled"
                        } else {
                            "Auto trading disabled"
                        };
                        self.notifications.push(Notification::success(title).message(message));
                        self.refresh_strategy_region().await;
                    }
                    Err(e) => {
                        self.notifications.push(
                            Notification::error("Auto trading").message(e.to_string()),
                        );
                    }
                }
            }
            CommandOutcome::Trade(result) => {
                self.trade.apply_outcome(result.is_ok());
                match result {
                    Ok(validation) => {
                        let mut note = Notification::success("Trade executed");
                        if let Some(warning) = validation.warnings.first() {
                            note = note.message(warning.clone());
                        }
                        self.notifications.push(note);
                        self.refresh_after_trade().await;
                    }
                    Err(ApiError::Rejected(message)) => {
                        self.notifications.push(
                            Notification::error("Trade validation failed").message(message),
                        );
                    }
                    Err(e) => {
                        self.notifications
                            .push(Notification::error("Trade failed").message(e.to_string()));
                    }
                }
            }
            CommandOutcome::SettingsSaved(result) => {
                self.settings.apply_save_outcome(result.is_ok());
                match result {
                    Ok(_) => {
                        self.notifications.push(Notification::success("Settings saved"));
                        // The saved default strategy shows up on the
                        // next strategy refresh; fetch it now.
                        self.refresh_strategy_region().await;
                    }
                    Err(e) => {
                        self.notifications
                            .push(Notification::error("Save failed").message(e.to_string()));
                    }
                }
            }
            CommandOutcome::SettingsLoaded(result) => {
                self.settings.apply_settings(result);
            }
            CommandOutcome::StrategyUpdated { name, result } => match result {
                Ok(_) => {
                    self.notifications.push(
                        Notification::success("Strategy updated")
                            .message(format!("Strategy updated to {name}")),
                    );
                    self.refresh_strategy_region().await;
                }
                Err(e) => {
                    self.notifications
                        .push(Notification::error("Strategy update").message(e.to_string()));
                }
            },
            CommandOutcome::StrategyTested(result) => match result {
                Ok(test) => {
                    self.notifications.push(
                        Notification::success("Strategy test completed").message(format!(
                            "{} on {}: {} ({} candles)",
                            format::strategy_label(&test.strategy),
                            test.symbol,
                            test.signal_summary(),
                            test.market_data_points,
                        )),
                    );
                }
                Err(e) => {
                    self.notifications
                        .push(Notification::error("Strategy test failed").message(e.to_string()));
                }
            },
            CommandOutcome::Chart {
                symbol,
                timeframe,
                result,
            } => {
                self.charts.apply_chart(&symbol, &timeframe, result);
            }
            CommandOutcome::Analysis { symbol, result } => {
                if let Err(ref e) = result {
                    self.notifications
                        .push(Notification::error("Analysis failed").message(e.to_string()));
                }
                self.analysis.apply_analysis(&symbol, result);
            }
        }
    }

    /// Switch views, loading on-demand regions on first entry.
    async fn switch_view(&mut self, view: View) {
        if self.current_view == view {
            return;
        }
        debug!("switching to view {view:?}");
        self.current_view = view;
        match view {
            View::History if !self.history.is_loaded() => self.refresh_history().await,
            View::Charts if self.charts.needs_load() => {
                self.dispatch_command(Command::LoadChart {
                    symbol: self.charts.symbol().to_string(),
                    timeframe: self.charts.timeframe().to_string(),
                });
            }
            View::Settings => {
                self.settings.set_loading();
                let client = self.client.clone();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.settings().await;
                    let _ = tx.send(CommandOutcome::SettingsLoaded(result));
                });
            }
            _ => {}
        }
    }

    /// Refresh whatever the current view shows.
    async fn refresh_current_view(&mut self) {
        match self.current_view {
            View::Overview => self.refresh_poll().await,
            View::History => self.refresh_history().await,
            View::Charts => self.dispatch_command(Command::LoadChart {
                symbol: self.charts.symbol().to_string(),
                timeframe: self.charts.timeframe().to_string(),
            }),
            View::Analysis => {
                self.dispatch_command(Command::RunAnalysis(self.analysis.symbol().to_string()))
            }
            View::Trade | View::Settings => {}
        }
        self.notifications
            .push(Notification::info("Refreshed").message("View data refreshed"));
    }

    fn confirm_auto_trading_toggle(&mut self) {
        if self.auto_trading_busy {
            return;
        }
        let enable = !self.overview.auto_trading_running();
        let message = if enable {
            "Enable auto trading? The engine will trade with the active strategy."
        } else {
            "Disable auto trading? Open positions are left untouched."
        };
        self.pending_action = Some(PendingAction::ToggleAutoTrading(enable));
        self.confirm_dialog = Some(ConfirmDialog::new("Auto Trading", message));
    }

    fn execute_pending_action(&mut self) {
        match self.pending_action.take() {
            Some(PendingAction::ToggleAutoTrading(enable)) => {
                self.dispatch_command(Command::ToggleAutoTrading(enable));
            }
            Some(PendingAction::SubmitTrade(request)) => {
                self.spawn_trade(request);
            }
            None => {}
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, view) in View::ALL.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default()));
            }
            let style = if *view == self.current_view {
                Style::default().fg(self.theme.background).bg(self.theme.accent).bold()
            } else {
                Style::default().fg(self.theme.text_secondary)
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, view.title()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    async fn delegate_to_view(&mut self, key: KeyCode) -> Result<()> {
        let action = match self.current_view {
            View::Overview => self.overview.handle_key(key)?,
            View::History => self.history.handle_key(key)?,
            View::Charts => self.charts.handle_key(key)?,
            View::Trade => self.trade.handle_key(key)?,
            View::Analysis => self.analysis.handle_key(key)?,
            View::Settings => self.settings.handle_key(key)?,
        };
        match action {
            ViewAction::Continue => {}
            ViewAction::Back => self.switch_view(View::Overview).await,
            ViewAction::Dispatch(command) => self.dispatch_command(command),
        }
        Ok(())
    }

    /// Handle key press. Returns true when the app should quit.
    async fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        // Confirmation dialog has highest priority
        if let Some(ref mut dialog) = self.confirm_dialog {
            match dialog.handle_key(key) {
                DialogResult::Confirmed => {
                    self.confirm_dialog = None;
                    self.execute_pending_action();
                }
                DialogResult::Cancelled => {
                    self.confirm_dialog = None;
                    self.pending_action = None;
                }
                DialogResult::Pending => {}
            }
            return Ok(false);
        }

        if self.help_overlay.visible {
            self.help_overlay.hide();
            return Ok(false);
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('q' | 'c') = key {
                self.should_quit = true;
                return Ok(true);
            }
        }

        // Free-input contexts swallow everything except Esc/Tab so
        // typing "1.5" into a quantity doesn't jump views.
        let text_entry = (matches!(self.current_view, View::Settings)
            && self.settings.is_editing())
            || (matches!(self.current_view, View::Trade) && self.trade.is_text_entry());
        if text_entry && !matches!(key, KeyCode::Tab) {
            if matches!(key, KeyCode::Esc) && !self.settings.is_editing() {
                self.switch_view(View::Overview).await;
                return Ok(false);
            }
            self.delegate_to_view(key).await?;
            return Ok(false);
        }

        match key {
            KeyCode::Char('q') => {
                if matches!(self.current_view, View::Overview) {
                    self.should_quit = true;
                    return Ok(true);
                }
                self.switch_view(View::Overview).await;
            }
            KeyCode::Esc => {
                if matches!(self.current_view, View::Overview) {
                    self.should_quit = true;
                    return Ok(true);
                }
                self.switch_view(View::Overview).await;
            }
            KeyCode::Char('?') => self.help_overlay.show(),
            KeyCode::Tab => {
                let next = self.current_view.next();
                self.switch_view(next).await;
            }
            KeyCode::Char('1') => self.switch_view(View::Overview).await,
            KeyCode::Char('2') => self.switch_view(View::History).await,
            KeyCode::Char('3') => self.switch_view(View::Charts).await,
            KeyCode::Char('4') => self.switch_view(View::Trade).await,
            KeyCode::Char('5') => self.switch_view(View::Analysis).await,
            KeyCode::Char('6') => self.switch_view(View::Settings).await,
            KeyCode::Char('r') => self.refresh_current_view().await,
            KeyCode::Char('a') => self.confirm_auto_trading_toggle(),
            KeyCode::Char('t') => {
                self.dispatch_command(Command::TestStrategy {
                    strategy: self.overview.current_strategy(),
                    symbol: self.charts.symbol().to_string(),
                });
            }
            _ => self.delegate_to_view(key).await?,
        }
        Ok(false)
    }

    /// Run the main event loop
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        // Initial load before the first frame
        self.refresh_poll().await;
        self.refresh_history().await;

        loop {
            self.notifications.cleanup();
            self.maintain_push_channel();
            self.drain_push_events();

            while let Ok(outcome) = self.outcome_rx.try_recv() {
                self.process_outcome(outcome).await;
            }

            if self.last_poll.elapsed() >= self.poll_interval {
                self.refresh_poll().await;
            }

            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1), // Tab bar
                        Constraint::Min(4),    // View
                        Constraint::Length(1), // Status bar
                    ])
                    .split(area);

                self.render_tab_bar(f, chunks[0]);

                let render_result = match self.current_view {
                    View::Overview => self.overview.render(f, chunks[1]),
                    View::History => self.history.render(f, chunks[1]),
                    View::Charts => self.charts.render(f, chunks[1]),
                    View::Trade => self.trade.render(f, chunks[1]),
                    View::Analysis => self.analysis.render(f, chunks[1]),
                    View::Settings => self.settings.render(f, chunks[1]),
                };
                if let Err(e) = render_result {
                    warn!("view render error: {e}");
                }

                let mut status_bar = StatusBar::new(&self.theme)
                    .connected(self.connected)
                    .auto_trading(self.overview.auto_trading_running());
                if let Some(ref update) = self.last_price {
                    status_bar = status_bar
                        .metric(update.symbol.clone(), format::currency(update.price));
                }
                f.render_widget(status_bar, chunks[2]);

                // Overlays on top
                self.notifications.render(area, f.buffer_mut(), &self.theme);
                self.help_overlay.render(area, f.buffer_mut(), &self.theme);
                if let Some(ref dialog) = self.confirm_dialog {
                    dialog.render(area, f.buffer_mut(), &self.theme);
                }
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && self.handle_key(key.code, key.modifiers).await?
                    {
                        break;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
