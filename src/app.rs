use std::time::Duration;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::content::{load_projects, load_skills};
use crate::effects::Splats;
use crate::error::ContentError;
use crate::game::{GameController, Signal};
use crate::page::{Anchor, Hit, PageLayout, Viewport, TARGET_WIDTH};
use crate::preferences::{PreferenceStore, Preferences};
use crate::projects::{ProjectGallery, ProjectLink};
use crate::session::{EndStage, Phase, SessionConfig};
use crate::skills::SkillsBrowser;
use crate::theme::{Theme, ThemeToggle};

const WHEEL_ROWS: i32 = 3;
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// What the event loop should do after an input was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    /// open this URL in the system browser
    Open(String),
}

/// The whole page: game, skills, projects, theme and where the terminal is
/// looking. Time is whatever the caller last passed to [`App::on_frame`].
pub struct App {
    game: GameController,
    viewport: Viewport,
    skills: SkillsBrowser,
    projects: ProjectGallery,
    theme: ThemeToggle,
    store: Box<dyn PreferenceStore>,
    splats: Splats,
    /// control under the pointer and when it got there
    hovered: Option<(Hit, Duration)>,
    /// control under a held left button
    pressed: Option<(Hit, Duration)>,
    projects_seen_at: Option<Duration>,
    now: Duration,
    size: (u16, u16),
}

impl App {
    pub fn new(
        config: SessionConfig,
        rng: StdRng,
        store: Box<dyn PreferenceStore>,
    ) -> Result<Self, ContentError> {
        let theme = store.load().theme;
        Ok(Self {
            game: GameController::new(config, rng),
            viewport: Viewport::new(),
            skills: SkillsBrowser::new(load_skills()?),
            projects: ProjectGallery::new(load_projects()?),
            theme: ThemeToggle::new(theme),
            store,
            splats: Splats::new(),
            hovered: None,
            pressed: None,
            projects_seen_at: None,
            now: Duration::ZERO,
            size: DEFAULT_SIZE,
        })
    }

    /// Use `theme` for this run without touching the saved preference
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = ThemeToggle::new(theme);
        self
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn skills(&self) -> &SkillsBrowser {
        &self.skills
    }

    pub fn projects(&self) -> &ProjectGallery {
        &self.projects
    }

    pub fn theme(&self) -> &ThemeToggle {
        &self.theme
    }

    pub fn splats(&self) -> &Splats {
        &self.splats
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// How long the pointer has rested on `hit`, if it is there now
    pub fn hovered_for(&self, hit: Hit) -> Option<Duration> {
        held_for(self.hovered, hit, self.now)
    }

    /// How long the left button has been held on `hit`
    pub fn pressed_for(&self, hit: Hit) -> Option<Duration> {
        held_for(self.pressed, hit, self.now)
    }

    /// When the projects section first scrolled into view
    pub fn projects_seen_at(&self) -> Option<Duration> {
        self.projects_seen_at
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn layout(&self) -> PageLayout {
        self.layout_for(self.size.0, self.size.1)
    }

    pub fn layout_for(&self, width: u16, height: u16) -> PageLayout {
        let tabs: Vec<&str> = self
            .skills
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        PageLayout::compute(
            width,
            height,
            &tabs,
            self.skills.visible().len(),
            self.projects.projects().len(),
        )
    }

    /// Advance game timers, the page scroll and the splats to `now`.
    pub fn on_frame(&mut self, now: Duration) {
        self.now = self.now.max(now);
        let signals = self.game.advance_to(self.now);
        let layout = self.layout();
        for signal in signals {
            match signal {
                Signal::ScrollTo(anchor) => {
                    debug!(%anchor, "scrolling page");
                    self.viewport.scroll_to(anchor, &layout);
                }
            }
        }
        self.viewport.on_frame(self.now);
        self.relayout();

        let area = layout.play_area;
        self.splats
            .on_frame(self.now, f64::from(area.width), f64::from(area.height));
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.relayout();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        let layout = self.layout();
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return self.quit();
            }
            KeyCode::Char('q') | KeyCode::Esc => return self.quit(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.game.phase() != Phase::Running {
                    self.start();
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Left => {
                self.skills.select_previous(self.now);
                self.relayout();
            }
            KeyCode::Right => {
                self.skills.select_next(self.now);
                self.relayout();
            }
            KeyCode::Up => self.projects.select_previous(),
            KeyCode::Down => self.projects.select_next(),
            KeyCode::Char('j') => self.viewport.scroll_by(1, &layout),
            KeyCode::Char('k') => self.viewport.scroll_by(-1, &layout),
            KeyCode::PageDown => self.viewport.scroll_by(page_rows(&layout), &layout),
            KeyCode::PageUp => self.viewport.scroll_by(-page_rows(&layout), &layout),
            KeyCode::Home => self.viewport.jump_to(Anchor::Game, &layout),
            KeyCode::Char(c) => {
                if let Some(link) = ProjectLink::ALL.into_iter().find(|l| l.key() == c) {
                    return self.open_link(link);
                }
            }
            _ => {}
        }
        self.note_visible_sections();
        Control::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) -> Control {
        let layout = self.layout();
        let x = mouse.column;
        let y = mouse.row.saturating_add(self.viewport.top_within(&layout));
        match mouse.kind {
            MouseEventKind::ScrollDown => self.viewport.scroll_by(WHEEL_ROWS, &layout),
            MouseEventKind::ScrollUp => self.viewport.scroll_by(-WHEEL_ROWS, &layout),
            MouseEventKind::Moved => self.hover(&layout, x, y),
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = layout.hit(x, y, self.game.phase());
                self.pressed = hit.map(|h| (h, self.now));
                self.click(&layout, x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => self.pressed = None,
            _ => {}
        }
        self.note_visible_sections();
        Control::Continue
    }

    /// Start a new session, or replay after one ended
    pub fn start(&mut self) {
        self.viewport.cancel_scroll();
        self.splats.clear();
        self.game.start(self.now);
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.theme.toggle(self.now);
        if let Err(err) = self.store.save(&Preferences { theme }) {
            warn!(error = %err, "failed to save preferences");
        }
    }

    pub fn open_link(&self, link: ProjectLink) -> Control {
        match self.projects.link(link) {
            Some(url) => Control::Open(url.to_owned()),
            None => Control::Continue,
        }
    }

    pub fn teardown(&mut self) {
        self.game.teardown();
        self.viewport.cancel_scroll();
        self.splats.clear();
    }

    fn quit(&mut self) -> Control {
        self.teardown();
        Control::Quit
    }

    /// Re-clamp the scroll offset after anything that can change the page height
    fn relayout(&mut self) {
        let layout = self.layout();
        self.viewport.clamp(&layout);
        self.note_visible_sections();
    }

    fn note_visible_sections(&mut self) {
        if self.projects_seen_at.is_some() {
            return;
        }
        let layout = self.layout();
        let top = self.viewport.top_within(&layout);
        let bottom = top.saturating_add(layout.viewport_height);
        if layout.projects.y < bottom && layout.projects.bottom() > top {
            self.projects_seen_at = Some(self.now);
        }
    }

    fn hover(&mut self, layout: &PageLayout, x: u16, y: u16) {
        let hit = layout.hit(x, y, self.game.phase());
        if self.hovered.map(|(h, _)| h) != hit {
            self.hovered = hit.map(|h| (h, self.now));
        }
        match hit {
            Some(Hit::SkillCard(i)) => {
                let name = self.skills.visible().get(i).map(|s| s.name.clone());
                self.skills.hover(name.as_deref());
            }
            Some(Hit::ProjectCard(i)) => {
                self.skills.hover(None);
                self.projects.select(i);
            }
            _ => self.skills.hover(None),
        }
    }

    fn click(&mut self, layout: &PageLayout, x: u16, y: u16) {
        if let Some(id) = layout.target_at(self.game.session().targets(), x, y) {
            let Some(target) = self.game.dismiss(id) else {
                return;
            };
            let (tx, ty) = layout.target_cell(target.position);
            let area = layout.play_area;
            self.splats.burst(
                f64::from(tx - area.x) + f64::from(TARGET_WIDTH) / 2.0,
                f64::from(ty - area.y),
                target.color,
            );
            return;
        }

        match layout.hit(x, y, self.game.phase()) {
            Some(Hit::ThemeToggle) => self.toggle_theme(),
            Some(Hit::StartButton) | Some(Hit::PlayAgain) => self.start(),
            Some(Hit::CallToAction) => {
                if self.game.session().end_stage == Some(EndStage::Closing) {
                    self.viewport.scroll_to(Anchor::Projects, layout);
                }
            }
            Some(Hit::SkillTab(i)) => {
                self.skills.select(i, self.now);
                self.relayout();
            }
            Some(Hit::ProjectCard(i)) => self.projects.select(i),
            Some(Hit::SkillCard(_)) | None => {}
        }
    }
}

fn held_for(state: Option<(Hit, Duration)>, hit: Hit, now: Duration) -> Option<Duration> {
    state
        .filter(|(h, _)| *h == hit)
        .map(|(_, since)| now.saturating_sub(since))
}

fn page_rows(layout: &PageLayout) -> i32 {
    i32::from(layout.viewport_height.saturating_sub(1).max(1))
}
