//! Connectivity indicator: ●/○/◐ with color mapping.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use i2pm_core::ConnectivityClass;

use crate::theme;

/// The dot for a class: filled when connected, empty when down, half while
/// the router is still integrating.
pub fn status_char(class: ConnectivityClass) -> &'static str {
    match class {
        ConnectivityClass::Connected => "●",
        ConnectivityClass::Disconnected => "○",
        ConnectivityClass::Connecting | ConnectivityClass::Integrating => "◐",
    }
}

/// Dot followed by the upper-case badge, e.g. `● CONNECTED`.
pub fn badge_span(class: ConnectivityClass) -> Span<'static> {
    Span::styled(
        format!("{} {}", status_char(class), class.badge()),
        Style::default()
            .fg(theme::class_color(class))
            .add_modifier(Modifier::BOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_match_classes() {
        assert_eq!(badge_span(ConnectivityClass::Connected).content, "● CONNECTED");
        assert_eq!(badge_span(ConnectivityClass::Disconnected).content, "○ DISCONNECTED");
        assert_eq!(badge_span(ConnectivityClass::Connecting).content, "◐ CONNECTING");
        assert_eq!(badge_span(ConnectivityClass::Integrating).content, "◐ INTEGRATING");
    }
}
