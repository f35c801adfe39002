use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Widget},
};

use crate::app::App;
use crate::page::{
    centered, Hit, PageLayout, CALL_TO_ACTION_LABEL, PLAY_AGAIN_LABEL, START_LABEL, TARGET_GLYPH,
};
use crate::presets::{delays, Pose, Variant, BOUNCE, FADE_IN, SLIDE_UP};
use crate::session::{EndStage, Phase};
use crate::theme::ThemePalette;

use super::{bold, control_style, popped, posed, put, put_right};

const TITLE: &str = " Whack-a-Bug ";
const TAGLINE: &str = "I enjoy turning chaos into clarity.";
const TAGLINE_MORE: &str = "Here are a few examples.";
const LOW_TIME_SECS: u32 = 5;

/// "Game Over!" springs up from half its width
const TITLE_POP: Variant = Variant {
    from: Pose {
        opacity: 1.0,
        scale: 0.5,
        offset_y: 0.0,
    },
    to: Pose::REST,
    transition: BOUNCE,
};

pub(super) fn render(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let panel = layout.game_panel.intersection(buf.area);
    if panel.is_empty() {
        return;
    }
    Block::bordered()
        .title(Line::from(TITLE).style(bold().fg(palette.accent)))
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.surface))
        .render(panel, buf);

    match app.game().phase() {
        Phase::Idle => {
            render_scoreboard(app, layout, palette, buf);
            render_play_area(layout, palette, buf);
            render_idle(app, layout, palette, buf);
        }
        Phase::Running => {
            render_scoreboard(app, layout, palette, buf);
            render_play_area(layout, palette, buf);
            render_targets(app, layout, buf);
            render_splats(app, layout, buf);
        }
        Phase::Ended => render_ended(app, layout, palette, buf),
    }
}

fn render_scoreboard(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let game = app.game();
    let session = game.session();
    let now = app.now();
    let row = layout.scoreboard;

    let score_style = if popped(game.score_changed_at(), now) {
        bold().fg(palette.highlight)
    } else {
        bold().fg(palette.text)
    };
    put(
        buf,
        row.x + 1,
        row.y,
        &format!("Score: {}", session.score),
        score_style,
    );

    let mut time_style = if session.is_running() && session.countdown <= LOW_TIME_SECS {
        bold().fg(palette.danger)
    } else {
        bold().fg(palette.text)
    };
    if popped(game.countdown_changed_at(), now) {
        time_style = time_style.add_modifier(Modifier::REVERSED);
    }
    let time = format!("Time: {}s", session.countdown);
    put_right(buf, inset(row), row.y, &time, time_style);
}

fn inset(r: Rect) -> Rect {
    Rect::new(r.x + 1, r.y, r.width.saturating_sub(2), r.height)
}

fn render_play_area(layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let frame = layout.play_area_frame.intersection(buf.area);
    if frame.is_empty() {
        return;
    }
    Block::bordered()
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.play_area))
        .render(frame, buf);
}

fn render_idle(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let area = layout.play_area;
    let prompt = format!(
        "Smash as many bugs as you can in {} seconds",
        app.game().session().config.length_secs
    );
    let line = Rect::new(
        area.x,
        layout.start_button.y.saturating_sub(2),
        area.width,
        1,
    );
    let at = centered(line, &prompt);
    put(buf, at.x, at.y, &prompt, Style::default().fg(palette.text));

    let button = layout.start_button;
    let style = bold().fg(palette.background).bg(palette.accent);
    let style = control_style(app, Hit::StartButton, style);
    put(buf, button.x, button.y, START_LABEL, style);
}

fn render_targets(app: &App, layout: &PageLayout, buf: &mut Buffer) {
    for target in app.game().session().targets() {
        let (x, y) = layout.target_cell(target.position);
        let (r, g, b) = target.color.rgb();
        put(buf, x, y, TARGET_GLYPH, bold().fg(Color::Rgb(r, g, b)));
    }
}

fn render_splats(app: &App, layout: &PageLayout, buf: &mut Buffer) {
    let area = layout.play_area;
    for p in &app.splats().particles {
        let x = area.x + p.x as u16;
        let y = area.y + p.y as u16;
        let (r, g, b) = p.color.rgb();
        let mut style = Style::default().fg(Color::Rgb(r, g, b));
        if p.vitality() < 0.4 {
            style = style.add_modifier(Modifier::DIM);
        }
        put(buf, x, y, &p.symbol.to_string(), style);
    }
}

/// One line of the end screen: shown from `stage` on, entering `delay`
/// after that stage began
struct EndLine {
    rect: Rect,
    text: String,
    style: Style,
    stage: EndStage,
    variant: Variant,
    delay: Duration,
    /// set for lines that are buttons
    hit: Option<Hit>,
}

fn render_ended(app: &App, layout: &PageLayout, palette: &ThemePalette, buf: &mut Buffer) {
    let game = app.game();
    let session = game.session();
    let stage = session.end_stage.unwrap_or(EndStage::Summary);
    let rows = &layout.end_rows;

    let lines = [
        EndLine {
            rect: rows.title,
            text: "Game Over!".to_owned(),
            style: bold().fg(palette.accent),
            stage: EndStage::Summary,
            variant: TITLE_POP,
            delay: delays::NONE,
            hit: None,
        },
        EndLine {
            rect: rows.score,
            text: format!("Final score: {}", session.score),
            style: bold().fg(palette.text),
            stage: EndStage::Summary,
            variant: FADE_IN,
            delay: delays::EXTRA_LONG,
            hit: None,
        },
        EndLine {
            rect: rows.tagline,
            text: TAGLINE.to_owned(),
            style: Style::default().fg(palette.text),
            stage: EndStage::Message,
            variant: SLIDE_UP,
            delay: Duration::from_millis(800),
            hit: None,
        },
        EndLine {
            rect: rows.tagline_more,
            text: TAGLINE_MORE.to_owned(),
            style: Style::default().fg(palette.muted),
            stage: EndStage::Message,
            variant: SLIDE_UP,
            delay: Duration::from_millis(1000),
            hit: None,
        },
        EndLine {
            rect: rows.call_to_action,
            text: CALL_TO_ACTION_LABEL.to_owned(),
            style: bold().fg(palette.background).bg(palette.accent),
            stage: EndStage::Closing,
            variant: SLIDE_UP,
            delay: Duration::from_millis(1200),
            hit: Some(Hit::CallToAction),
        },
        EndLine {
            rect: rows.play_again,
            text: PLAY_AGAIN_LABEL.to_owned(),
            style: bold().fg(palette.highlight),
            stage: EndStage::Summary,
            variant: FADE_IN,
            delay: Duration::from_millis(1500),
            hit: Some(Hit::PlayAgain),
        },
    ];

    for line in lines {
        if stage < line.stage {
            continue;
        }
        let entered = match line.stage {
            EndStage::Summary => game.ended_at(),
            _ if line.stage == stage => game.stage_entered_at(),
            // an earlier stage, settled long ago
            _ => Duration::ZERO,
        };
        let elapsed = app.now().saturating_sub(entered);
        let pose = line.variant.delayed(line.delay).pose(elapsed);
        if !pose.is_visible() {
            continue;
        }
        let mut style = posed(line.style, pose);
        if let Some(hit) = line.hit {
            style = control_style(app, hit, style);
        }
        let Ok(y) = u16::try_from(i32::from(line.rect.y) + pose.row_offset()) else {
            continue;
        };
        let text = shrink(&line.text, pose.scale);
        let at = centered(Rect::new(line.rect.x, y, line.rect.width, 1), &text);
        put(buf, at.x, at.y, &text, style);
    }
}

/// Middle `scale` share of `text`; glyphs can't shrink, so a small line is
/// a shorter one
fn shrink(text: &str, scale: f64) -> String {
    if scale >= 1.0 {
        return text.to_owned();
    }
    let count = text.chars().count();
    let keep = ((count as f64 * scale.max(0.0)).round() as usize).min(count);
    text.chars().skip((count - keep) / 2).take(keep).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_keeps_the_middle() {
        assert_eq!(shrink("Game Over!", 1.2), "Game Over!");
        assert_eq!(shrink("Game Over!", 1.0), "Game Over!");
        assert_eq!(shrink("Game Over!", 0.5), "me Ov");
        assert_eq!(shrink("Game Over!", 0.0), "");
    }
}
