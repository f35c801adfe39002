use ratatui::{buffer::Buffer, style::Style};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::page::{Hit, PageLayout, TOGGLE_WIDTH};
use crate::theme::{Theme, ThemePalette};

use super::{bold, control_style, put, rule};

const TITLE: &str = "termfolio";
const NAV: &str = "game · skills · projects";
const KNOB: &str = "●";
const TRACK: &str = "·";

pub(super) fn render(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let header = layout.header;
    let line = header.y + 1;

    put(buf, header.x + 2, line, TITLE, bold().fg(palette.accent));
    let nav_x = header.x + 2 + TITLE.width() as u16 + 4;
    if nav_x + (NAV.width() as u16) < layout.theme_toggle.x.saturating_sub(3) {
        put(buf, nav_x, line, NAV, Style::default().fg(palette.muted));
    }

    render_toggle(app, layout, palette, buf);
    rule(buf, header.bottom() - 1, palette.border);
}

/// `☾ [●···]` when dark, `☀ [···●]` when light; the knob springs between ends
fn render_toggle(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let rect = layout.theme_toggle;
    if rect.width < TOGGLE_WIDTH {
        return;
    }
    let toggle = app.theme();
    let track_len = TOGGLE_WIDTH - 2;
    let knob = toggle.knob_position(app.now()).clamp(0.0, 1.0);
    let knob_at = (knob * f64::from(track_len - 1)).round() as u16;

    let border = control_style(app, Hit::ThemeToggle, Style::default().fg(palette.border));
    put(buf, rect.x, rect.y, "[", border);
    for i in 0..track_len {
        let (symbol, style) = if i == knob_at {
            (KNOB, bold().fg(palette.accent))
        } else {
            (TRACK, Style::default().fg(palette.muted))
        };
        put(buf, rect.x + 1 + i, rect.y, symbol, style);
    }
    put(buf, rect.x + 1 + track_len, rect.y, "]", border);

    let icon = match toggle.theme() {
        Theme::Dark => "☾",
        Theme::Light => "☀",
    };
    if rect.x >= 2 {
        put(
            buf,
            rect.x - 2,
            rect.y,
            icon,
            Style::default().fg(palette.text),
        );
    }
}
