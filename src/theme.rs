use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::presets;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Interpret a stored preference. Empty means "never saved"; anything
    /// other than "dark" means light.
    pub fn from_saved(raw: &str) -> Self {
        match raw {
            "" | "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> ThemePalette {
        match self {
            Theme::Dark => ThemePalette {
                background: Color::Rgb(0x0b, 0x0b, 0x0c),
                surface: Color::Rgb(0x12, 0x12, 0x14),
                border: Color::Rgb(0x1f, 0x1f, 0x21),
                text: Color::Rgb(0xe6, 0xe6, 0xe6),
                muted: Color::Rgb(0x9c, 0xa3, 0xaf),
                accent: Color::Rgb(0xf5, 0x9e, 0x0b),
                highlight: Color::Rgb(0x4a, 0xde, 0x80),
                danger: Color::Rgb(0xef, 0x44, 0x44),
                play_area: Color::Rgb(0x0a, 0x18, 0x28),
            },
            Theme::Light => ThemePalette {
                background: Color::Rgb(0xfa, 0xfa, 0xfa),
                surface: Color::Rgb(0xff, 0xff, 0xff),
                border: Color::Rgb(0xd4, 0xd4, 0xd8),
                text: Color::Rgb(0x18, 0x18, 0x1b),
                muted: Color::Rgb(0x52, 0x52, 0x5b),
                accent: Color::Rgb(0xd9, 0x77, 0x06),
                highlight: Color::Rgb(0x16, 0xa3, 0x4a),
                danger: Color::Rgb(0xdc, 0x26, 0x26),
                play_area: Color::Rgb(0xe0, 0xf2, 0xfe),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
    pub danger: Color,
    pub play_area: Color,
}

/// The header switch. Its knob springs between the moon (0) and sun (1) end.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeToggle {
    theme: Theme,
    toggled_at: Option<Duration>,
}

impl ThemeToggle {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            toggled_at: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self, now: Duration) -> Theme {
        self.theme = self.theme.toggled();
        self.toggled_at = Some(now);
        info!(theme = %self.theme, "theme toggled");
        self.theme
    }

    /// Knob position in `[0, 1]` (springs may overshoot slightly)
    pub fn knob_position(&self, now: Duration) -> f64 {
        let target = match self.theme {
            Theme::Dark => 0.0,
            Theme::Light => 1.0,
        };
        let Some(toggled_at) = self.toggled_at else {
            return target;
        };
        let from = 1.0 - target;
        let t = presets::SPRING.progress(now.saturating_sub(toggled_at));
        from + (target - from) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn saved_values_are_read_leniently() {
        assert_eq!(Theme::from_saved("dark"), Theme::Dark);
        assert_eq!(Theme::from_saved("light"), Theme::Light);
        assert_eq!(Theme::from_saved(""), Theme::Dark);
        assert_eq!(Theme::from_saved("solarized"), Theme::Light);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!(Theme::Light.to_string(), "light");
    }

    #[test]
    fn toggle_flips_and_knob_springs_over() {
        let mut toggle = ThemeToggle::new(Theme::Dark);
        assert_eq!(toggle.knob_position(Duration::ZERO), 0.0);

        let now = Duration::from_secs(10);
        assert_eq!(toggle.toggle(now), Theme::Light);
        assert_eq!(toggle.knob_position(now), 0.0);
        assert_eq!(toggle.knob_position(now + Duration::from_secs(2)), 1.0);

        toggle.toggle(now + Duration::from_secs(3));
        assert_eq!(toggle.theme(), Theme::Dark);
        assert_eq!(toggle.knob_position(now + Duration::from_secs(3)), 1.0);
    }

    #[test]
    fn palettes_differ() {
        assert_ne!(Theme::Dark.palette(), Theme::Light.palette());
    }
}
