//! Dashboard colours and the semantic styles built from them.

use ratatui::style::{Color, Modifier, Style};

use i2pm_core::ConnectivityClass;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Header banner text.
pub fn banner() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Border for a focused panel or overlay.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Field labels in the status panels.
pub fn label() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Values that are unavailable while the router is down.
pub fn muted() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Addresses and URLs.
pub fn address() -> Style {
    Style::default().fg(NEON_CYAN)
}

/// Key hint text (e.g., "q quit  r refresh").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Colour for a connectivity class.
pub fn class_color(class: ConnectivityClass) -> Color {
    match class {
        ConnectivityClass::Disconnected => ERROR_RED,
        ConnectivityClass::Connecting | ConnectivityClass::Integrating => ELECTRIC_YELLOW,
        ConnectivityClass::Connected => SUCCESS_GREEN,
    }
}
