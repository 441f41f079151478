//! Application core: event loop, status polling, action dispatch.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use i2pm_config::Settings;
use i2pm_core::{BrowserProfiles, Daemon, Endpoint};

use crate::action::{Action, InfoPanel, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, TerminalEvents};
use crate::screens::DashboardScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::status_indicator;

/// How long a notification stays on screen.
const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Grace period between asking the router to start and launching Firefox.
const START_SETTLE: Duration = Duration::from_secs(3);

/// Everything the dashboard needs from the outside world.
pub struct DashboardContext {
    pub daemon: Daemon,
    pub browser: BrowserProfiles,
    pub settings: Settings,
    pub config_path: PathBuf,
}

/// Top-level application state and event loop.
pub struct App {
    ctx: DashboardContext,
    screen: DashboardScreen,
    running: bool,
    /// Info panel drawn over the dashboard, if any.
    overlay: Option<InfoPanel>,
    notification: Option<(Notification, Instant)>,
    /// Label of the control task in flight.
    busy: Option<&'static str>,
    probing: bool,
    last_poll: Option<Instant>,
    refresh_interval: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(ctx: DashboardContext) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let refresh_interval = Duration::from_secs(ctx.settings.dashboard.refresh_interval.max(1));
        let screen = DashboardScreen::new(ctx.settings.clone());
        let notification = ctx.settings.dashboard.show_welcome.then(|| {
            (
                Notification::info("Welcome! Press 1 to start I2P, 8 for help"),
                Instant::now(),
            )
        });

        Self {
            ctx,
            screen,
            running: true,
            overlay: None,
            notification,
            busy: None,
            probing: false,
            last_poll: None,
            refresh_interval,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.screen.init(self.action_tx.clone())?;
        debug!(screen = self.screen.id(), "screen mounted");

        let mut events = TerminalEvents::spawn(Duration::from_millis(250), Duration::from_millis(100));

        info!(
            console = %self.ctx.daemon.endpoint(),
            interval = ?self.refresh_interval,
            "dashboard started"
        );
        self.action_tx.send(Action::Refresh)?;

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = map_key(key, self.overlay.is_some()) {
                        self.action_tx.send(action)?;
                    } else if let Some(action) = self.screen.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::FocusGained => self.action_tx.send(Action::Refresh)?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        drop(events);
        tui.exit();
        info!("dashboard closed");
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if self.poll_due() {
                    self.spawn_probe();
                }
                if let Some((_, shown)) = &self.notification {
                    if shown.elapsed() >= NOTIFICATION_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::Refresh => self.spawn_probe(),

            Action::StatusUpdated(_) => {
                self.probing = false;
                self.last_poll = Some(Instant::now());
                if let Some(follow_up) = self.screen.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }

            Action::StartDaemon => self.spawn_task("Starting I2P", start_task(&self.ctx)),
            Action::StopDaemon => self.spawn_task("Stopping I2P", stop_task(&self.ctx)),
            Action::RestartDaemon => self.spawn_task("Restarting I2P", restart_task(&self.ctx)),
            Action::LaunchBrowser => self.spawn_task("Launching Firefox", browser_task(&self.ctx)),

            Action::TaskFinished(n) => {
                self.busy = None;
                self.notification = Some((n.clone(), Instant::now()));
                self.action_tx.send(Action::Refresh)?;
            }

            Action::ShowInfo(panel) => self.overlay = Some(*panel),
            Action::CloseOverlay => self.overlay = None,

            Action::Render => {}
        }
        Ok(())
    }

    fn poll_due(&self) -> bool {
        !self.probing
            && self
                .last_poll
                .is_none_or(|at| at.elapsed() >= self.refresh_interval)
    }

    /// Probe the router on a background task; the result comes back as
    /// `StatusUpdated`.
    fn spawn_probe(&mut self) {
        if self.probing {
            return;
        }
        self.probing = true;
        let daemon = self.ctx.daemon.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let report = daemon.get_status().await;
            debug!(class = %report.class, peers = report.status.peers, "status polled");
            let _ = tx.send(Action::StatusUpdated(report));
        });
    }

    /// Run a control task in the background. Only one runs at a time.
    fn spawn_task<F>(&mut self, label: &'static str, task: F)
    where
        F: Future<Output = Notification> + Send + 'static,
    {
        if let Some(current) = self.busy {
            self.notification = Some((
                Notification::warning(format!("{current}... please wait")),
                Instant::now(),
            ));
            return;
        }
        self.busy = Some(label);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Action::TaskFinished(task.await));
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // Dashboard
            Constraint::Length(1), // Notification
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.screen.render(frame, layout[0]);
        self.render_notification(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(panel) = self.overlay {
            self.render_overlay(frame, area, panel);
        }
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect) {
        let Some((notif, _)) = &self.notification else {
            return;
        };
        let (color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };
        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];

        match self.screen.report() {
            Some(report) => spans.push(status_indicator::badge_span(report.class)),
            None => spans.push(Span::styled("◐ probing", Style::default().fg(theme::ELECTRIC_YELLOW))),
        }

        if let Some(at) = self.screen.last_update() {
            let ago = Duration::from_secs(at.elapsed().as_secs());
            spans.push(Span::styled(
                format!(" │ updated {} ago", humantime::format_duration(ago)),
                theme::key_hint(),
            ));
        }

        if let Some(label) = self.busy {
            spans.push(Span::styled(
                format!(" │ ◐ {label}..."),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }

        spans.push(Span::styled(" │ 1-8 actions  r refresh  q quit", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, panel: InfoPanel) {
        let lines = info_lines(panel, &self.ctx);
        let height = u16::try_from(lines.len() + 4).unwrap_or(u16::MAX).min(area.height.saturating_sub(2));
        let width = 64u16.min(area.width.saturating_sub(4));

        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        let overlay_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, overlay_area);
        let block = Block::default()
            .title(panel.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let mut text = lines;
        text.push(Line::from(""));
        text.push(Line::from(Span::styled("  Press any key to continue", theme::key_hint())));
        frame.render_widget(Paragraph::new(text), inner);
    }
}

// ── Key mapping ─────────────────────────────────────────────────────

/// Map a key press to an action. With an overlay open, any key closes it.
pub(crate) fn map_key(key: KeyEvent, overlay_open: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if overlay_open {
        return Some(Action::CloseOverlay);
    }

    let action = match key.code {
        KeyCode::Char('q' | 'Q') => Action::Quit,
        KeyCode::Char('r' | 'R') => Action::Refresh,
        KeyCode::Char('1') => Action::StartDaemon,
        KeyCode::Char('2') => Action::StopDaemon,
        KeyCode::Char('3') => Action::RestartDaemon,
        KeyCode::Char('4') => Action::LaunchBrowser,
        KeyCode::Char('5') => Action::ShowInfo(InfoPanel::Config),
        KeyCode::Char('6') => Action::ShowInfo(InfoPanel::Logs),
        KeyCode::Char('7') => Action::ShowInfo(InfoPanel::Reset),
        KeyCode::Char('8') => Action::ShowInfo(InfoPanel::Help),
        _ => return None,
    };
    Some(action)
}

// ── Info panels ─────────────────────────────────────────────────────

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {text}"), Style::default().fg(theme::NEON_CYAN)))
}

fn item(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(format!("    {}", text.into()), theme::label()))
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {text}"), Style::default().fg(theme::ELECTRIC_YELLOW)))
}

pub(crate) fn info_lines(panel: InfoPanel, ctx: &DashboardContext) -> Vec<Line<'static>> {
    match panel {
        InfoPanel::Config => vec![
            heading("Configuration File:"),
            item(ctx.config_path.display().to_string()),
            Line::from(""),
            hint("Edit with: i2p-manager config"),
        ],
        InfoPanel::Logs => {
            let location = ctx
                .daemon
                .log_path()
                .map_or_else(|| "not found".to_owned(), |p| p.display().to_string());
            vec![
                heading("Log File:"),
                item(location),
                Line::from(""),
                heading("View Logs:"),
                item("i2p-manager logs"),
                item("i2p-manager logs -f  (follow)"),
            ]
        }
        InfoPanel::Reset => vec![
            Line::from(Span::styled(
                "  Reset requires confirmation.",
                Style::default().fg(theme::ERROR_RED),
            )),
            hint("Use: i2p-manager reset"),
        ],
        InfoPanel::Help => vec![
            heading("Dashboard Keys:"),
            item("1-8: Quick actions"),
            item("R: Refresh status"),
            item("Q: Quit dashboard"),
            Line::from(""),
            heading("Command-line usage:"),
            item("i2p-manager <command>"),
            Line::from(""),
            heading("Resources:"),
            item(format!(
                "Router Console: {}",
                Endpoint::console(ctx.settings.i2pd.console_port)
            )),
            item("I2P Forum: http://i2pforum.i2p"),
            item("Planet I2P: http://planet.i2p"),
        ],
    }
}

// ── Control tasks ───────────────────────────────────────────────────

fn start_task(ctx: &DashboardContext) -> impl Future<Output = Notification> + Send + 'static {
    let daemon = ctx.daemon.clone();
    let browser = ctx.browser.clone();
    let profile = ctx.settings.firefox.profile_name.clone();
    async move {
        if daemon.is_running().await {
            return Notification::info("I2P is already running");
        }
        if let Err(e) = daemon.start().await {
            warn!(error = %e, "start failed");
            return Notification::error(e.to_string());
        }
        tokio::time::sleep(START_SETTLE).await;
        match browser.launch(&profile) {
            Ok(()) => Notification::success(
                "I2P started, Firefox launched. Wait 10-30 minutes for network integration",
            ),
            Err(e) => Notification::warning(format!("I2P started, but Firefox did not launch: {e}")),
        }
    }
}

fn stop_task(ctx: &DashboardContext) -> impl Future<Output = Notification> + Send + 'static {
    let daemon = ctx.daemon.clone();
    async move {
        match daemon.stop().await {
            Ok(()) => Notification::success("I2P stopped"),
            Err(e) => Notification::error(e.to_string()),
        }
    }
}

fn restart_task(ctx: &DashboardContext) -> impl Future<Output = Notification> + Send + 'static {
    let daemon = ctx.daemon.clone();
    async move {
        match daemon.restart().await {
            Ok(()) => Notification::success("I2P restarted"),
            Err(e) => Notification::error(e.to_string()),
        }
    }
}

fn browser_task(ctx: &DashboardContext) -> impl Future<Output = Notification> + Send + 'static {
    let daemon = ctx.daemon.clone();
    let browser = ctx.browser.clone();
    let profile = ctx.settings.firefox.profile_name.clone();
    async move {
        if let Err(e) = browser.launch(&profile) {
            return Notification::error(e.to_string());
        }
        if daemon.is_running().await {
            Notification::success("Firefox launched")
        } else {
            Notification::warning("Firefox launched, but I2P is not running")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        app_with(Settings::default())
    }

    fn app_with(settings: Settings) -> App {
        let daemon = Daemon::for_console(settings.i2pd.console_port).unwrap();
        App::new(DashboardContext {
            daemon,
            browser: BrowserProfiles::with_profiles_dir("/nonexistent/profiles"),
            settings,
            config_path: PathBuf::from("/home/user/.config/i2p-manager/config.json"),
        })
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn menu_keys_map_to_actions() {
        let cases = [
            ('1', Action::StartDaemon),
            ('2', Action::StopDaemon),
            ('3', Action::RestartDaemon),
            ('4', Action::LaunchBrowser),
            ('5', Action::ShowInfo(InfoPanel::Config)),
            ('6', Action::ShowInfo(InfoPanel::Logs)),
            ('7', Action::ShowInfo(InfoPanel::Reset)),
            ('8', Action::ShowInfo(InfoPanel::Help)),
            ('r', Action::Refresh),
            ('R', Action::Refresh),
            ('q', Action::Quit),
            ('Q', Action::Quit),
        ];
        for (c, expected) in cases {
            assert_eq!(map_key(key(KeyCode::Char(c)), false), Some(expected), "key {c:?}");
        }
        assert_eq!(map_key(key(KeyCode::Char('9')), false), None);
    }

    #[test]
    fn ctrl_c_quits_even_over_overlay() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, true), Some(Action::Quit));
        assert_eq!(map_key(ctrl_c, false), Some(Action::Quit));
    }

    #[test]
    fn any_key_closes_overlay() {
        assert_eq!(map_key(key(KeyCode::Enter), true), Some(Action::CloseOverlay));
        assert_eq!(map_key(key(KeyCode::Char('1')), true), Some(Action::CloseOverlay));
    }

    #[test]
    fn overlay_opens_and_closes() {
        let mut app = app();
        app.process_action(&Action::ShowInfo(InfoPanel::Config)).unwrap();
        let text = draw(&app);
        assert!(text.contains("Configuration File:"));
        assert!(text.contains("/home/user/.config/i2p-manager/config.json"));
        assert!(text.contains("Press any key to continue"));

        app.process_action(&Action::CloseOverlay).unwrap();
        assert!(!draw(&app).contains("Configuration File:"));
    }

    #[test]
    fn help_lists_console_url() {
        let app = app();
        let text: String = info_lines(InfoPanel::Help, &app.ctx)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Router Console: http://127.0.0.1:7070"));
        assert!(text.contains("http://i2pforum.i2p"));
    }

    #[test]
    fn finished_task_notifies_and_requests_refresh() {
        let mut app = app();
        app.busy = Some("Stopping I2P");
        app.process_action(&Action::TaskFinished(Notification::success("I2P stopped")))
            .unwrap();

        assert!(app.busy.is_none());
        assert!(draw(&app).contains("✓ I2P stopped"));
        assert_eq!(app.action_rx.try_recv().unwrap(), Action::Refresh);
    }

    #[test]
    fn status_update_ends_probe_and_schedules_next() {
        let mut app = app();
        app.probing = true;
        assert!(!app.poll_due());

        let report = i2pm_core::DaemonStatus::stopped().into();
        app.process_action(&Action::StatusUpdated(report)).unwrap();
        assert!(!app.probing);
        assert!(!app.poll_due());
        assert!(draw(&app).contains("○ DISCONNECTED"));
    }

    #[test]
    fn welcome_follows_setting() {
        assert!(draw(&app()).contains("Welcome!"));

        let mut settings = Settings::default();
        settings.dashboard.show_welcome = false;
        assert!(!draw(&app_with(settings)).contains("Welcome!"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = app();
        app.process_action(&Action::Quit).unwrap();
        assert!(!app.running);
    }
}
