mod game;
mod header;
mod projects;
mod skills;

use std::str::FromStr;
use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::page::{centered, Hit, PageLayout};
use crate::presets::{self, Pose};
use crate::theme::ThemePalette;

const FOOTER_HINT: &str =
    "q quit · t theme · ←/→ skills · ↑/↓ projects · o/g/c open · PgUp/PgDn scroll";

type SectionRenderer = fn(&App, &PageLayout, &ThemePalette, &mut Buffer);

/// The page is drawn one section at a time into a buffer positioned in page
/// coordinates; only rows inside the viewport are copied to the terminal.
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout_for(area.width, area.height);
        let palette = self.theme().theme().palette();
        let base = Style::default().bg(palette.background).fg(palette.text);
        buf.set_style(area, base);

        let top = self.viewport().top_within(&layout);
        let bottom = top.saturating_add(area.height);
        let sections: [(Rect, SectionRenderer); 5] = [
            (layout.header, header::render),
            (layout.game, game::render),
            (layout.skills, skills::render),
            (layout.projects, projects::render),
            (layout.footer, render_footer),
        ];

        for (rect, draw) in sections {
            if rect.is_empty() || rect.bottom() <= top || rect.y >= bottom {
                continue;
            }
            let mut section = Buffer::empty(rect);
            section.set_style(rect, base);
            draw(self, &layout, &palette, &mut section);
            blit(&section, top, area, buf);
        }
    }
}

fn blit(section: &Buffer, top: u16, area: Rect, buf: &mut Buffer) {
    let src = section.area;
    let last = src.bottom().min(top.saturating_add(area.height));
    for y in src.y.max(top)..last {
        for x in src.x..src.right().min(area.width) {
            if let (Some(cell), Some(dst)) = (
                section.cell((x, y)),
                buf.cell_mut((area.x + x, area.y + (y - top))),
            ) {
                *dst = cell.clone();
            }
        }
    }
}

fn render_footer(_app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let footer = layout.footer;
    rule(buf, footer.y, palette.border);
    let hint = Rect::new(footer.x, footer.y + 1, footer.width, 1);
    let at = centered(hint, FOOTER_HINT);
    put(
        buf,
        at.x,
        at.y,
        FOOTER_HINT,
        Style::default().fg(palette.muted),
    );
}

/// Write `text` at `(x, y)` if that cell exists, clipped to the buffer edge
pub(crate) fn put(buf: &mut Buffer, x: u16, y: u16, text: &str, style: Style) {
    let area = buf.area;
    if x < area.x || x >= area.right() || y < area.y || y >= area.bottom() {
        return;
    }
    buf.set_stringn(x, y, text, usize::from(area.right() - x), style);
}

/// Write `text` so it ends at the right edge of `area`
pub(crate) fn put_right(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let width = (text.width() as u16).min(area.width);
    put(buf, area.right() - width, y, text, style);
}

/// Horizontal line across the whole buffer
pub(crate) fn rule(buf: &mut Buffer, y: u16, color: Color) {
    let area = buf.area;
    let line = "─".repeat(usize::from(area.width));
    put(buf, area.x, y, &line, Style::default().fg(color));
}

/// True while a value that changed at `changed_at` should still look "popped"
pub(crate) fn popped(changed_at: Option<Duration>, now: Duration) -> bool {
    changed_at.is_some_and(|at| !presets::QUICK.is_done(now.saturating_sub(at)))
}

/// Clickable controls invert while pressed and stand out once the pointer
/// has rested on them
pub(crate) fn control_style(app: &App, hit: Hit, base: Style) -> Style {
    let tapped = app.pressed_for(hit).map(|t| presets::TAP.pose(t));
    if tapped.is_some_and(|pose| pose.scale < 1.0) {
        return base.add_modifier(Modifier::REVERSED);
    }
    let hovered = app.hovered_for(hit).map(|t| presets::HOVER.pose(t));
    if hovered.is_some_and(|pose| pose.scale > 1.0) {
        return base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    base
}

/// Half transparent poses are drawn dim
pub(crate) fn posed(style: Style, pose: Pose) -> Style {
    if pose.is_faded() {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// `rect` narrowed to `scale` of its width around the same center
pub(crate) fn scale_rect(rect: Rect, scale: f64) -> Rect {
    if scale >= 1.0 {
        return rect;
    }
    let width = (f64::from(rect.width) * scale.max(0.0)).round() as u16;
    let width = width.min(rect.width);
    let x = rect.x + (rect.width - width) / 2;
    Rect::new(x, rect.y, width, rect.height)
}

pub(crate) fn hex_color(hex: &str, fallback: Color) -> Color {
    Color::from_str(hex).unwrap_or(fallback)
}

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{CALL_TO_ACTION_LABEL, PLAY_AGAIN_LABEL, START_LABEL, TARGET_GLYPH};
    use crate::preferences::{MemoryPreferenceStore, Preferences};
    use crate::session::SessionConfig;
    use crate::theme::Theme;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use rand::{rngs::StdRng, SeedableRng};

    const W: u16 = 100;
    const H: u16 = 30;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn test_app(theme: Theme) -> App {
        let store = MemoryPreferenceStore::new(Preferences { theme });
        let mut app = App::new(
            SessionConfig::default(),
            StdRng::seed_from_u64(3),
            Box::new(store),
        )
        .unwrap();
        app.on_resize(W, H);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn pointer(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.on_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn draw(app: &App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.y..area.bottom())
            .map(|y| {
                (area.x..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn text(buf: &Buffer) -> String {
        rows(buf).join("\n")
    }

    /// Screen cell where `needle` starts, for rows made of single-char cells
    fn find(buf: &Buffer, needle: &str) -> Option<(u16, u16)> {
        rows(buf).iter().enumerate().find_map(|(y, row)| {
            let byte = row.find(needle)?;
            Some((row[..byte].chars().count() as u16, y as u16))
        })
    }

    #[test]
    fn idle_page_shows_header_and_start_button() {
        let app = test_app(Theme::Dark);
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("termfolio"));
        assert!(screen.contains(START_LABEL));
        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Time: 15s"));
    }

    #[test]
    fn running_page_draws_targets() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(1200));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains(TARGET_GLYPH));
        assert!(!screen.contains(START_LABEL));
    }

    #[test]
    fn countdown_turns_red_near_the_end() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(9000));
        let buf = draw(&app, W, H);
        let (x, y) = find(&buf, "Time: 6s").unwrap();
        assert_ne!(buf[(x, y)].fg, Theme::Dark.palette().danger);

        app.on_frame(ms(10_000));
        let buf = draw(&app, W, H);
        let (x, y) = find(&buf, "Time: 5s").unwrap();
        assert_eq!(buf[(x, y)].fg, Theme::Dark.palette().danger);
    }

    #[test]
    fn end_sequence_reveals_in_order() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(15_200));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("Game Over!"));
        assert!(!screen.contains("Final score"));

        app.on_frame(ms(15_700));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("Final score: 0"));
        assert!(!screen.contains("chaos into clarity"));

        app.on_frame(ms(17_000));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("I enjoy turning chaos into clarity."));
        assert!(!screen.contains("Here are a few examples."));
        assert!(!screen.contains(CALL_TO_ACTION_LABEL));

        app.on_frame(ms(21_000));
        press(&mut app, KeyCode::Home);
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("Here are a few examples."));
        assert!(screen.contains(CALL_TO_ACTION_LABEL));
        assert!(screen.contains("Play Again"));
    }

    #[test]
    fn game_over_springs_up_from_half_width() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(15_000));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("me Ov"));
        assert!(!screen.contains("Game Over!"));

        app.on_frame(ms(17_000));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("Game Over!"));
    }

    #[test]
    fn project_cards_enter_one_after_another() {
        let mut app = test_app(Theme::Dark);
        app.on_frame(ms(1000));
        for _ in 0..10 {
            press(&mut app, KeyCode::PageDown);
        }
        let titles: Vec<String> = app
            .projects()
            .projects()
            .iter()
            .map(|p| p.title.clone())
            .collect();

        app.on_frame(ms(1050));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains(&titles[0]));
        assert!(!screen.contains(&titles[2]));

        app.on_frame(ms(2000));
        let screen = text(&draw(&app, W, H));
        assert!(titles.iter().all(|t| screen.contains(t.as_str())));
    }

    #[test]
    fn buttons_react_to_hover_and_press() {
        let mut app = test_app(Theme::Dark);
        let button = app.layout().start_button;
        pointer(&mut app, MouseEventKind::Moved, button.x + 1, button.y);
        let buf = draw(&app, W, H);
        let cell = &buf[(button.x, button.y)];
        assert!(!cell.modifier.contains(Modifier::UNDERLINED));

        app.on_frame(ms(250));
        let buf = draw(&app, W, H);
        let (x, y) = find(&buf, START_LABEL).unwrap();
        assert!(buf[(x, y)].modifier.contains(Modifier::UNDERLINED));

        // the click starts the game, so press the toggle instead
        let toggle = app.layout().theme_toggle;
        pointer(
            &mut app,
            MouseEventKind::Down(MouseButton::Left),
            toggle.x,
            toggle.y,
        );
        app.on_frame(ms(300));
        let buf = draw(&app, W, H);
        let cell = &buf[(toggle.x, toggle.y)];
        assert!(cell.modifier.contains(Modifier::REVERSED));

        pointer(
            &mut app,
            MouseEventKind::Up(MouseButton::Left),
            toggle.x,
            toggle.y,
        );
        let buf = draw(&app, W, H);
        let cell = &buf[(toggle.x, toggle.y)];
        assert!(!cell.modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn play_again_fades_in_last() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(16_400));
        let screen = text(&draw(&app, W, H));
        assert!(!screen.contains(PLAY_AGAIN_LABEL));

        app.on_frame(ms(16_700));
        let buf = draw(&app, W, H);
        let (x, y) = find(&buf, PLAY_AGAIN_LABEL).unwrap();
        assert!(buf[(x, y)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn scrolled_page_shows_projects_and_footer() {
        let mut app = test_app(Theme::Dark);
        for _ in 0..10 {
            press(&mut app, KeyCode::PageDown);
        }
        app.on_frame(ms(1000));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("Projects"));
        assert!(screen.contains("Deploy Radar"));
        assert!(screen.contains("q quit"));
        assert!(!screen.contains("termfolio"));
    }

    #[test]
    fn skill_bars_fill_after_the_delay() {
        let mut app = test_app(Theme::Dark);
        press(&mut app, KeyCode::PageDown);
        let screen = text(&draw(&app, W, H));
        assert!(!screen.contains("TypeScript"));

        // cards have scaled in, bars are still empty
        app.on_frame(ms(400));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains("TypeScript"));
        assert!(screen.contains('░'));
        assert!(!screen.contains('█'));

        app.on_frame(ms(2500));
        let screen = text(&draw(&app, W, H));
        assert!(screen.contains('█'));
    }

    #[test]
    fn theme_sets_the_background() {
        let light = test_app(Theme::Light);
        let buf = draw(&light, W, H);
        assert_eq!(buf[(0, 0)].bg, Theme::Light.palette().background);

        let dark = test_app(Theme::Dark);
        let buf = draw(&dark, W, H);
        assert_eq!(buf[(0, 0)].bg, Theme::Dark.palette().background);
    }

    #[test]
    fn tiny_terminals_do_not_panic() {
        let mut app = test_app(Theme::Dark);
        app.start();
        app.on_frame(ms(3000));
        for (w, h) in [(1, 1), (10, 5), (12, 4), (200, 3), (30, 100)] {
            app.on_resize(w, h);
            let buf = draw(&app, w, h);
            assert_eq!(buf.area, Rect::new(0, 0, w, h));
        }
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(
            hex_color("#3B82F6", Color::Reset),
            Color::Rgb(0x3b, 0x82, 0xf6)
        );
        assert_eq!(hex_color("nonsense", Color::Reset), Color::Reset);
    }

    #[test]
    fn pop_lasts_for_the_quick_transition() {
        assert!(!popped(None, ms(10)));
        assert!(popped(Some(ms(1000)), ms(1100)));
        assert!(!popped(Some(ms(1000)), ms(1200)));
    }
}
