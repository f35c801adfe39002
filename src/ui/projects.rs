use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::page::{Hit, PageLayout};
use crate::presets::{
    delays, stagger, stagger_item, Pose, Variant, SCALE_IN, SMOOTH, STAGGER_CHILDREN,
};
use crate::projects::ProjectLink;
use crate::theme::ThemePalette;

use super::{bold, posed, put};

const DESCRIPTION_ROWS: u16 = 2;

/// Link rows stay dim until the pointer rests on their card
const LINK_ROW: Variant = Variant {
    from: Pose {
        opacity: 0.5,
        scale: 1.0,
        offset_y: 0.0,
    },
    to: Pose::REST,
    transition: SMOOTH,
};

pub(super) fn render(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let section = layout.projects;
    let gallery = app.projects();
    // cards enter once the section has been scrolled into view
    let entered = app
        .projects_seen_at()
        .map(|seen| app.now().saturating_sub(seen));

    put(
        buf,
        section.x + 2,
        section.y,
        "Projects",
        bold().fg(palette.accent),
    );
    put(
        buf,
        section.x + 12,
        section.y,
        "↑/↓ select · o live · g github · c case study",
        Style::default().fg(palette.muted),
    );

    for (i, (project, rect)) in gallery
        .projects()
        .iter()
        .zip(&layout.project_cards)
        .enumerate()
    {
        let pose = entered.map_or(Pose::REST, |elapsed| stagger_item(i).pose(elapsed));
        if !pose.is_visible() {
            continue;
        }
        let Ok(y) = u16::try_from(i32::from(rect.y) + pose.row_offset()) else {
            continue;
        };
        let card = Rect { y, ..*rect }.intersection(buf.area);
        if card.is_empty() {
            continue;
        }
        let selected = i == gallery.selected_index();
        let border = if selected {
            bold().fg(palette.accent)
        } else {
            Style::default().fg(palette.border)
        };
        let title_style = if selected {
            bold().fg(palette.accent)
        } else {
            bold().fg(palette.text)
        };
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", project.title)).style(title_style))
            .border_style(posed(border, pose))
            .style(Style::default().bg(palette.surface));
        let inner = block.inner(card);
        block.render(card, buf);
        if inner.is_empty() {
            continue;
        }

        let description = Rect::new(
            inner.x,
            inner.y,
            inner.width,
            DESCRIPTION_ROWS.min(inner.height),
        );
        Paragraph::new(project.description.as_str())
            .style(posed(Style::default().fg(palette.text), pose))
            .wrap(Wrap { trim: true })
            .render(description, buf);

        // tags pop in one by one after their card
        let tags_y = inner.y + DESCRIPTION_ROWS + 1;
        let mut x = inner.x;
        for (t, tech) in project.technologies.iter().enumerate() {
            let tag = format!("[{tech}]");
            let tag_pose = entered.map_or(Pose::REST, |elapsed| {
                let delay = stagger(i, STAGGER_CHILDREN) + stagger(t, delays::SHORT);
                SCALE_IN.delayed(delay).pose(elapsed)
            });
            if tag_pose.is_visible() {
                let style = posed(Style::default().fg(palette.highlight), tag_pose);
                put(buf, x, tags_y, &tag, style);
            }
            x = x.saturating_add(tag.width() as u16 + 1);
        }

        let links = ProjectLink::available(project)
            .into_iter()
            .map(|l| format!("{l} ({})", l.key()))
            .join("  ");
        let link_style = if selected {
            bold().fg(palette.accent)
        } else {
            Style::default().fg(palette.muted)
        };
        let link_pose = match app.hovered_for(Hit::ProjectCard(i)) {
            Some(rested) => LINK_ROW.pose(rested),
            None if selected => Pose::REST,
            None => LINK_ROW.from,
        };
        let link_style = posed(link_style, link_pose);
        let links_y = tags_y + 1;
        put(buf, inner.x, links_y, &links, link_style);
    }
}
