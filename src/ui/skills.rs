use ratatui::{
    buffer::Buffer,
    style::{Modifier, Style},
    widgets::{Block, Widget},
};

use crate::app::App;
use crate::page::{Hit, PageLayout};
use crate::theme::ThemePalette;

use super::{bold, control_style, hex_color, posed, put, put_right, scale_rect};

const FILLED: &str = "█";
const EMPTY: &str = "░";

pub(super) fn render(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let section = layout.skills;
    let browser = app.skills();
    let now = app.now();

    put(
        buf,
        section.x + 2,
        section.y,
        "Skills",
        bold().fg(palette.accent),
    );
    put(
        buf,
        section.x + 10,
        section.y,
        "←/→ filter",
        Style::default().fg(palette.muted),
    );

    for (i, (category, rect)) in browser
        .categories()
        .iter()
        .zip(&layout.skill_tabs)
        .enumerate()
    {
        let color = hex_color(&category.color, palette.accent);
        let style = if i == browser.selected_index() {
            bold().fg(palette.background).bg(color)
        } else {
            Style::default().fg(palette.muted)
        };
        let style = control_style(app, Hit::SkillTab(i), style);
        let label = format!("  {}  ", category.name);
        buf.set_style(rect.intersection(buf.area), style);
        put(buf, rect.x, rect.y, &label, style);
    }

    for (i, (skill, rect)) in browser
        .visible()
        .into_iter()
        .zip(&layout.skill_cards)
        .enumerate()
    {
        let pose = browser.card_pose(i, now);
        if !pose.is_visible() {
            continue;
        }
        let card = scale_rect(*rect, pose.scale).intersection(buf.area);
        if card.is_empty() {
            continue;
        }
        let color = hex_color(&skill.color, palette.accent);
        let hovered = browser.hovered() == Some(skill.name.as_str());
        let border = if hovered {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.border)
        };
        let block = Block::bordered()
            .border_style(posed(border, pose))
            .style(Style::default().bg(palette.surface));
        let inner = block.inner(card);
        block.render(card, buf);
        if inner.is_empty() {
            continue;
        }

        let name_style = if hovered {
            bold().fg(color)
        } else {
            bold().fg(palette.text)
        };
        let name_style = posed(name_style, pose);
        put(buf, inner.x, inner.y, &skill.name, name_style);
        if inner.height < 2 {
            continue;
        }

        let level = browser.bar_level(i, skill, now);
        let label = browser.label_pose(i, now);
        if label.is_visible() {
            let style = posed(Style::default().fg(palette.muted), label);
            put_right(buf, inner, inner.y, &format!("{level:.0}%"), style);
        }

        let track = browser.track_pose(i, now);
        if !track.is_visible() {
            continue;
        }
        let width = usize::from(inner.width);
        let filled = ((level / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        let bar_y = inner.y + 1;
        put(
            buf,
            inner.x,
            bar_y,
            &FILLED.repeat(filled),
            Style::default().fg(color),
        );
        put(
            buf,
            inner.x + filled as u16,
            bar_y,
            &EMPTY.repeat(width - filled),
            posed(Style::default().fg(palette.border), track),
        );
    }
}
