//! Dashboard screen: router status at a glance plus the quick-actions menu.
//!
//! Layout:
//! ┌─ I2P EASY MANAGER ───────────────────────────────────────────┐
//! ├─ Connection Status ──────────┬─ Network Info ────────────────┤
//! │ badge / router / proxy / url │ peers / tunnels / progress    │
//! ├─ Quick Actions ──────────────┴───────────────────────────────┤
//! └──────────────────────────────────────────────────────────────┘

use std::time::Instant;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use i2pm_config::Settings;
use i2pm_core::{ConnectivityClass, Endpoint, StatusReport};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

/// Menu rows: (key, label) pairs for the left and right columns.
const MENU: [[(&str, &str); 2]; 4] = [
    [("1", "Start I2P"), ("5", "View Configuration")],
    [("2", "Stop I2P"), ("6", "View Logs")],
    [("3", "Restart I2P"), ("7", "Reset Everything")],
    [("4", "Launch Browser"), ("8", "Help & About")],
];

pub struct DashboardScreen {
    settings: Settings,
    report: Option<StatusReport>,
    last_update: Option<Instant>,
}

impl DashboardScreen {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            report: None,
            last_update: None,
        }
    }

    pub fn report(&self) -> Option<&StatusReport> {
        self.report.as_ref()
    }

    /// When the last probe result arrived.
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    fn panel(title: &str) -> Block<'_> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default())
    }

    fn field<'a>(label: &'a str, value: impl Into<String>, style: Style) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{label}: "), theme::label()),
            Span::styled(value.into(), style),
        ])
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = format!("I2P EASY MANAGER v{}", self.settings.version);
        let header = Paragraph::new(Line::from(Span::styled(title, theme::banner())))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_focused()),
            );
        frame.render_widget(header, area);
    }

    fn status_lines(&self) -> Vec<Line<'_>> {
        let Some(report) = self.report else {
            return vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Checking status...",
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                )),
            ];
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", theme::label()),
                status_indicator::badge_span(report.class),
            ]),
            Line::from(""),
        ];

        if report.status.running {
            let i2pd = &self.settings.i2pd;
            let console = Endpoint::console(i2pd.console_port);
            lines.push(Self::field("Router", "Running", Style::default().fg(theme::SUCCESS_GREEN)));
            lines.push(Self::field(
                "Proxy",
                format!("{}:{}", i2pd.host, i2pd.http_port),
                theme::address(),
            ));
            lines.push(Self::field("Console", console.to_string(), theme::address()));
        } else {
            lines.push(Self::field("Router", "Stopped", Style::default().fg(theme::ERROR_RED)));
            lines.push(Self::field("Proxy", "Unavailable", theme::muted()));
            lines.push(Self::field("Console", "Unavailable", theme::muted()));
        }
        lines
    }

    fn network_lines(&self) -> Vec<Line<'_>> {
        let counters = self.report.filter(|r| r.status.running);
        let Some(report) = counters else {
            return vec![
                Line::from(""),
                Self::field("Known Peers", "N/A", theme::muted()),
                Line::from(""),
                Self::field("Active Tunnels", "N/A", theme::muted()),
                Line::from(""),
                Line::from(Span::styled(
                    ConnectivityClass::Disconnected.headline(),
                    theme::muted(),
                )),
            ];
        };

        let counter = Style::default().fg(theme::ELECTRIC_YELLOW);
        let class = report.class;
        vec![
            Line::from(""),
            Self::field("Known Peers", report.status.peers.to_string(), counter),
            Line::from(""),
            Self::field("Active Tunnels", report.status.tunnels.to_string(), counter),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} {}", status_indicator::status_char(class), class.headline()),
                Style::default().fg(theme::class_color(class)),
            )),
            Line::from(Span::styled(class.hint(), theme::muted())),
        ]
    }

    fn render_menu(frame: &mut Frame, area: Rect) {
        let entry = |key: &'static str, label: &'static str| {
            vec![
                Span::styled(format!("[{key}] "), theme::key_hint_key()),
                Span::styled(format!("{label:<22}"), theme::label()),
            ]
        };

        let mut lines: Vec<Line> = MENU
            .into_iter()
            .map(|[(lk, ll), (rk, rl)]| {
                let mut spans = entry(lk, ll);
                spans.extend(entry(rk, rl));
                Line::from(spans)
            })
            .collect();
        lines.push(Line::from(""));
        let mut last = entry("R", "Refresh Status");
        last.extend(entry("Q", "Quit"));
        lines.push(Line::from(last));

        let menu = Paragraph::new(lines).block(
            Self::panel("Quick Actions").border_style(Style::default().fg(theme::SUCCESS_GREEN)),
        );
        frame.render_widget(menu, area);
    }
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StatusUpdated(report) = action {
            self.report = Some(*report);
            self.last_update = Some(Instant::now());
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3),  // Header
            Constraint::Min(10),    // Status + network
            Constraint::Length(8),  // Menu
        ])
        .split(area);

        self.render_header(frame, layout[0]);

        let body = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[1]);
        frame.render_widget(
            Paragraph::new(self.status_lines()).block(Self::panel("Connection Status")),
            body[0],
        );
        frame.render_widget(
            Paragraph::new(self.network_lines()).block(Self::panel("Network Info")),
            body[1],
        );

        Self::render_menu(frame, layout[2]);
    }

    fn id(&self) -> &str {
        "dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use i2pm_core::DaemonStatus;

    use super::*;

    fn draw(screen: &DashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|frame| screen.render(frame, frame.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn with_status(status: DaemonStatus) -> DashboardScreen {
        let mut screen = DashboardScreen::new(Settings::default());
        screen.update(&Action::StatusUpdated(status.into())).unwrap();
        screen
    }

    #[test]
    fn before_first_probe_shows_checking() {
        let screen = DashboardScreen::new(Settings::default());
        let text = draw(&screen);
        assert!(text.contains("I2P EASY MANAGER v0.1.0"));
        assert!(text.contains("Checking status..."));
        assert!(text.contains("[1] Start I2P"));
        assert!(text.contains("[8] Help & About"));
        assert!(text.contains("[Q] Quit"));
        assert!(screen.last_update().is_none());
    }

    #[test]
    fn stopped_router_is_unavailable() {
        let text = draw(&with_status(DaemonStatus::stopped()));
        assert!(text.contains("○ DISCONNECTED"));
        assert!(text.contains("Router: Stopped"));
        assert!(text.contains("Proxy: Unavailable"));
        assert!(text.contains("Known Peers: N/A"));
        assert!(text.contains("I2P is not running"));
    }

    #[test]
    fn connected_router_shows_counters_and_addresses() {
        let screen = with_status(DaemonStatus::running_with(8, 156));
        let text = draw(&screen);
        assert!(text.contains("● CONNECTED"));
        assert!(text.contains("Router: Running"));
        assert!(text.contains("Proxy: 127.0.0.1:4444"));
        assert!(text.contains("Console: http://127.0.0.1:7070"));
        assert!(text.contains("Known Peers: 156"));
        assert!(text.contains("Active Tunnels: 8"));
        assert!(text.contains("Fully Integrated"));
        assert!(text.contains("Ready to browse I2P"));
        assert!(screen.last_update().is_some());
    }

    #[test]
    fn early_router_shows_progress_hint() {
        let text = draw(&with_status(DaemonStatus::running_with(2, 4)));
        assert!(text.contains("◐ CONNECTING"));
        assert!(text.contains("Building connections..."));
        assert!(text.contains("(10-30 min on first run)"));
    }
}
