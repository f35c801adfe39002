//! Geometry of the scrollable page and the viewport looking at it.
//!
//! Everything here is in page coordinates: row 0 is the top of the header
//! no matter where the viewport currently is.

use std::time::Duration;

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use crate::animation::{Easing, Tween};
use crate::session::{Phase, Position, Target, TargetId};

pub const HEADER_HEIGHT: u16 = 3;
pub const MIN_GAME_HEIGHT: u16 = 20;
pub const SECTION_TITLE_HEIGHT: u16 = 2;
pub const TABS_HEIGHT: u16 = 2;
pub const SKILL_COLUMNS: u16 = 2;
pub const SKILL_CARD_HEIGHT: u16 = 4;
pub const PROJECT_CARD_HEIGHT: u16 = 7;
pub const FOOTER_HEIGHT: u16 = 2;
const MARGIN: u16 = 2;

pub const TARGET_GLYPH: &str = "(ж)";
pub const TARGET_WIDTH: u16 = 3;

pub const START_LABEL: &str = "[ START GAME ]";
pub const PLAY_AGAIN_LABEL: &str = "[ Play Again ]";
pub const CALL_TO_ACTION_LABEL: &str = "[ View My Projects → ]";
pub const TOGGLE_WIDTH: u16 = 6;

pub const SCROLL_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Anchor {
    Game,
    Skills,
    Projects,
}

/// One row per line of the end-of-session screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndRows {
    pub title: Rect,
    pub score: Rect,
    pub tagline: Rect,
    pub tagline_more: Rect,
    pub call_to_action: Rect,
    pub play_again: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u16,
    pub viewport_height: u16,
    pub header: Rect,
    pub theme_toggle: Rect,
    pub game: Rect,
    pub game_panel: Rect,
    pub scoreboard: Rect,
    pub play_area_frame: Rect,
    pub play_area: Rect,
    pub start_button: Rect,
    pub end_rows: EndRows,
    pub skills: Rect,
    pub skill_tabs: Vec<Rect>,
    pub skill_cards: Vec<Rect>,
    pub projects: Rect,
    pub project_cards: Vec<Rect>,
    pub footer: Rect,
    pub height: u16,
}

/// Things a click can land on, besides targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    ThemeToggle,
    StartButton,
    PlayAgain,
    CallToAction,
    SkillTab(usize),
    SkillCard(usize),
    ProjectCard(usize),
}

fn inner(r: Rect) -> Rect {
    Rect::new(
        r.x.saturating_add(1),
        r.y.saturating_add(1),
        r.width.saturating_sub(2),
        r.height.saturating_sub(2),
    )
}

fn row(area: Rect, y: u16) -> Rect {
    Rect::new(area.x, y, area.width, 1)
}

/// Rect of `label` centered horizontally in a one-row `area`
pub fn centered(area: Rect, label: &str) -> Rect {
    let width = (label.width() as u16).min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, 1)
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
}

impl PageLayout {
    /// Lay out the whole page for a `width` x `viewport_height` terminal.
    pub fn compute(
        width: u16,
        viewport_height: u16,
        tab_labels: &[&str],
        skill_count: usize,
        project_count: usize,
    ) -> Self {
        let content_width = width.saturating_sub(MARGIN * 2);

        let header = Rect::new(0, 0, width, HEADER_HEIGHT);
        let theme_toggle = Rect::new(
            width.saturating_sub(MARGIN + TOGGLE_WIDTH),
            1,
            TOGGLE_WIDTH.min(width),
            1,
        );

        let game_height = viewport_height
            .saturating_sub(HEADER_HEIGHT)
            .max(MIN_GAME_HEIGHT);
        let game = Rect::new(0, header.bottom(), width, game_height);
        let game_panel = Rect::new(
            MARGIN,
            game.y + 1,
            content_width,
            game_height.saturating_sub(2),
        );
        let panel_inner = inner(game_panel);
        let scoreboard = Rect::new(panel_inner.x, panel_inner.y, panel_inner.width, 2);
        let play_area_frame = Rect::new(
            panel_inner.x,
            panel_inner.y + 2,
            panel_inner.width,
            panel_inner.height.saturating_sub(2),
        );
        let play_area = inner(play_area_frame);

        let middle = play_area.y + play_area.height / 2;
        let start_button = centered(row(play_area, middle + 1), START_LABEL);

        let top = panel_inner.y + panel_inner.height.saturating_sub(9) / 2;
        let end_rows = EndRows {
            title: row(panel_inner, top),
            score: row(panel_inner, top + 1),
            tagline: row(panel_inner, top + 3),
            tagline_more: row(panel_inner, top + 4),
            call_to_action: centered(row(panel_inner, top + 6), CALL_TO_ACTION_LABEL),
            play_again: centered(row(panel_inner, top + 8), PLAY_AGAIN_LABEL),
        };

        let skills_y = game.bottom();
        let tabs_y = skills_y + SECTION_TITLE_HEIGHT;
        let mut skill_tabs = Vec::with_capacity(tab_labels.len());
        let mut x = MARGIN;
        for label in tab_labels {
            let w = label.width() as u16 + 4;
            let clipped = w.min(width.saturating_sub(x));
            skill_tabs.push(Rect::new(x, tabs_y, clipped, 1));
            x = x.saturating_add(w + 1).min(width);
        }

        let grid_y = tabs_y + TABS_HEIGHT;
        let column_width = content_width.saturating_sub(SKILL_COLUMNS - 1) / SKILL_COLUMNS;
        let skill_cards: Vec<Rect> = (0..skill_count)
            .map(|i| {
                let col = i as u16 % SKILL_COLUMNS;
                let line = i as u16 / SKILL_COLUMNS;
                Rect::new(
                    MARGIN + col * (column_width + 1),
                    grid_y + line * SKILL_CARD_HEIGHT,
                    column_width,
                    SKILL_CARD_HEIGHT,
                )
            })
            .collect();
        let grid_rows = (skill_count as u16).div_ceil(SKILL_COLUMNS);
        let skills_height = SECTION_TITLE_HEIGHT + TABS_HEIGHT + grid_rows * SKILL_CARD_HEIGHT + 1;
        let skills = Rect::new(0, skills_y, width, skills_height);

        let projects_y = skills.bottom();
        let cards_y = projects_y + SECTION_TITLE_HEIGHT;
        let project_cards: Vec<Rect> = (0..project_count)
            .map(|i| {
                Rect::new(
                    MARGIN,
                    cards_y + i as u16 * (PROJECT_CARD_HEIGHT + 1),
                    content_width,
                    PROJECT_CARD_HEIGHT,
                )
            })
            .collect();
        let projects_height =
            SECTION_TITLE_HEIGHT + project_count as u16 * (PROJECT_CARD_HEIGHT + 1);
        let projects = Rect::new(0, projects_y, width, projects_height);

        let footer = Rect::new(0, projects.bottom(), width, FOOTER_HEIGHT);

        Self {
            width,
            viewport_height,
            header,
            theme_toggle,
            game,
            game_panel,
            scoreboard,
            play_area_frame,
            play_area,
            start_button,
            end_rows,
            skills,
            skill_tabs,
            skill_cards,
            projects,
            project_cards,
            footer,
            height: footer.bottom(),
        }
    }

    pub fn anchor_offset(&self, anchor: Anchor) -> u16 {
        match anchor {
            Anchor::Game => self.game.y,
            Anchor::Skills => self.skills.y,
            Anchor::Projects => self.projects.y,
        }
    }

    pub fn max_offset(&self) -> u16 {
        self.height.saturating_sub(self.viewport_height)
    }

    /// Top-left cell of a target, clamped so the whole glyph stays inside
    pub fn target_cell(&self, position: Position) -> (u16, u16) {
        let area = self.play_area;
        let max_x = area.right().saturating_sub(TARGET_WIDTH).max(area.x);
        let max_y = area.bottom().saturating_sub(1).max(area.y);
        let x = area.x + (f64::from(area.width) * position.x / 100.0) as u16;
        let y = area.y + (f64::from(area.height) * position.y / 100.0) as u16;
        (x.min(max_x), y.min(max_y))
    }

    /// Topmost target under the page cell `(x, y)`; later spawns sit on top.
    pub fn target_at(&self, targets: &[Target], x: u16, y: u16) -> Option<TargetId> {
        targets.iter().rev().find_map(|t| {
            let (tx, ty) = self.target_cell(t.position);
            (y == ty && x >= tx && x < tx + TARGET_WIDTH).then_some(t.id)
        })
    }

    /// Control under the page cell `(x, y)`. Game buttons only exist in the
    /// phase that shows them.
    pub fn hit(&self, x: u16, y: u16, phase: Phase) -> Option<Hit> {
        if contains(self.theme_toggle, x, y) {
            return Some(Hit::ThemeToggle);
        }
        if let Some(i) = self.skill_tabs.iter().position(|r| contains(*r, x, y)) {
            return Some(Hit::SkillTab(i));
        }
        if let Some(i) = self.skill_cards.iter().position(|r| contains(*r, x, y)) {
            return Some(Hit::SkillCard(i));
        }
        if let Some(i) = self.project_cards.iter().position(|r| contains(*r, x, y)) {
            return Some(Hit::ProjectCard(i));
        }
        match phase {
            Phase::Idle if contains(self.start_button, x, y) => Some(Hit::StartButton),
            Phase::Ended if contains(self.end_rows.play_again, x, y) => Some(Hit::PlayAgain),
            Phase::Ended if contains(self.end_rows.call_to_action, x, y) => Some(Hit::CallToAction),
            _ => None,
        }
    }
}

/// Which slice of the page the terminal shows, and any scroll in flight
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    offset: f64,
    scroll: Option<Tween>,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// First page row on screen
    pub fn top(&self) -> u16 {
        self.offset.round().max(0.0) as u16
    }

    /// First page row on screen for `layout`, even if the page shrank since
    /// the offset was last clamped
    pub fn top_within(&self, layout: &PageLayout) -> u16 {
        self.top().min(layout.max_offset())
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Manual scrolling wins over an animation in flight.
    pub fn scroll_by(&mut self, rows: i32, layout: &PageLayout) {
        self.cancel_scroll();
        let target = (f64::from(self.top()) + f64::from(rows)).max(0.0);
        self.offset = target.min(f64::from(layout.max_offset()));
    }

    pub fn jump_to(&mut self, anchor: Anchor, layout: &PageLayout) {
        self.cancel_scroll();
        self.offset = f64::from(layout.anchor_offset(anchor).min(layout.max_offset()));
    }

    /// Start an eased scroll towards `anchor`; the clock starts on the next frame.
    pub fn scroll_to(&mut self, anchor: Anchor, layout: &PageLayout) {
        let to = f64::from(layout.anchor_offset(anchor).min(layout.max_offset()));
        self.scroll = Some(Tween::new(self.offset, to, SCROLL_DURATION, Easing::EaseInOutCubic));
    }

    pub fn cancel_scroll(&mut self) {
        self.scroll = None;
    }

    /// Advance the scroll animation by one frame.
    pub fn on_frame(&mut self, now: Duration) {
        let Some(tween) = self.scroll.as_mut() else {
            return;
        };
        let sample = tween.sample(now);
        self.offset = sample.value;
        if sample.done {
            self.scroll = None;
        }
    }

    /// Keep the offset valid after the page or terminal changed size.
    pub fn clamp(&mut self, layout: &PageLayout) {
        self.offset = self.offset.clamp(0.0, f64::from(layout.max_offset()));
    }
}
