use std::time::Duration;

use crate::animation::EASE_OUT;
use crate::content::{Category, Skill, SkillCatalog};
use crate::presets::{delays, stagger, Pose, Transition, FADE_IN, SCALE_IN};

/// Bars fill over a second, each one starting a little after the previous
const BAR_FILL: Transition = Transition::new(Duration::from_secs(1), EASE_OUT);
const BAR_STAGGER: Duration = Duration::from_millis(50);

/// Category filter plus hover state for the skills grid
#[derive(Debug, Clone)]
pub struct SkillsBrowser {
    catalog: SkillCatalog,
    selected: usize,
    hovered: Option<String>,
    filter_changed_at: Duration,
}

impl SkillsBrowser {
    pub fn new(catalog: SkillCatalog) -> Self {
        Self {
            catalog,
            selected: 0,
            hovered: None,
            filter_changed_at: Duration::ZERO,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.catalog.categories.get(self.selected)
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn visible(&self) -> Vec<&Skill> {
        match self.selected_category() {
            Some(category) => self
                .catalog
                .skills
                .iter()
                .filter(|s| category.matches(s))
                .collect(),
            None => self.catalog.skills.iter().collect(),
        }
    }

    pub fn select(&mut self, index: usize, now: Duration) {
        if index >= self.catalog.categories.len() || index == self.selected {
            return;
        }
        self.selected = index;
        self.hovered = None;
        self.filter_changed_at = now;
    }

    pub fn select_next(&mut self, now: Duration) {
        let count = self.catalog.categories.len();
        if count > 0 {
            self.select((self.selected + 1) % count, now);
        }
    }

    pub fn select_previous(&mut self, now: Duration) {
        let count = self.catalog.categories.len();
        if count > 0 {
            self.select((self.selected + count - 1) % count, now);
        }
    }

    pub fn hover(&mut self, name: Option<&str>) {
        self.hovered = name.map(str::to_owned);
    }

    pub fn filter_changed_at(&self) -> Duration {
        self.filter_changed_at
    }

    fn since_filter_change(&self, now: Duration) -> Duration {
        now.saturating_sub(self.filter_changed_at)
    }

    /// Entry pose of the `index`-th visible card; cards scale in one after
    /// another whenever the filter changes
    pub fn card_pose(&self, index: usize, now: Duration) -> Pose {
        let delay = stagger(index, BAR_STAGGER);
        SCALE_IN.delayed(delay).pose(self.since_filter_change(now))
    }

    /// The empty bar track fades in shortly after its card
    pub fn track_pose(&self, index: usize, now: Duration) -> Pose {
        let delay = delays::MEDIUM + stagger(index, BAR_STAGGER);
        FADE_IN.delayed(delay).pose(self.since_filter_change(now))
    }

    /// The percentage label appears once its bar is mostly filled
    pub fn label_pose(&self, index: usize, now: Duration) -> Pose {
        let delay = delays::EXTRA_LONG + delays::LONG + stagger(index, BAR_STAGGER);
        FADE_IN.delayed(delay).pose(self.since_filter_change(now))
    }

    /// Current bar width for the `index`-th visible skill, as a percentage
    pub fn bar_level(&self, index: usize, skill: &Skill, now: Duration) -> f64 {
        let transition = BAR_FILL.with_delay(delays::EXTRA_LONG + stagger(index, BAR_STAGGER));
        f64::from(skill.level) * transition.progress(self.since_filter_change(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::load_skills;

    fn browser() -> SkillsBrowser {
        SkillsBrowser::new(load_skills().unwrap())
    }

    #[test]
    fn all_is_selected_initially() {
        let b = browser();
        assert_eq!(b.selected_category().unwrap().id, "all");
        assert_eq!(b.visible().len(), 12);
    }

    #[test]
    fn selecting_filters_by_category() {
        let mut b = browser();
        let backend = b
            .categories()
            .iter()
            .position(|c| c.id == "backend")
            .unwrap();
        b.select(backend, Duration::from_secs(1));
        let names: Vec<&str> = b.visible().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Python", "Node.js", "FastAPI"]);
        assert_eq!(b.filter_changed_at(), Duration::from_secs(1));
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let mut b = browser();
        b.select_previous(Duration::ZERO);
        assert_eq!(b.selected_category().unwrap().id, "ai");
        b.select_next(Duration::ZERO);
        assert_eq!(b.selected_category().unwrap().id, "all");
    }

    #[test]
    fn changing_filter_clears_hover() {
        let mut b = browser();
        b.hover(Some("Redis"));
        assert_eq!(b.hovered(), Some("Redis"));
        b.select_next(Duration::ZERO);
        assert_eq!(b.hovered(), None);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut b = browser();
        b.select(99, Duration::from_secs(5));
        assert_eq!(b.selected_index(), 0);
        assert_eq!(b.filter_changed_at(), Duration::ZERO);
    }

    #[test]
    fn bars_fill_with_stagger() {
        let b = browser();
        let skills = b.visible();
        let first = skills[0];
        assert_eq!(b.bar_level(0, first, Duration::from_millis(400)), 0.0);
        assert_eq!(
            b.bar_level(0, first, Duration::from_millis(1500)),
            f64::from(first.level)
        );

        // second bar is 50ms behind the first
        let a = b.bar_level(0, skills[1], Duration::from_millis(1000));
        let c = b.bar_level(1, skills[1], Duration::from_millis(1000));
        assert!(a > c);
    }

    #[test]
    fn bars_decelerate_towards_their_level() {
        let b = browser();
        let skill = b.visible()[0];
        let level = f64::from(skill.level);
        // half way through the fill the bar is already well past half
        let mid = b.bar_level(0, skill, Duration::from_millis(1000));
        assert!(mid > level * 0.6, "{mid} of {level}");
        assert!(mid < level);
    }

    #[test]
    fn cards_scale_in_before_tracks_and_labels() {
        let mut b = browser();
        b.select_next(Duration::from_secs(2));
        let at = |ms: u64| Duration::from_secs(2) + Duration::from_millis(ms);

        assert!(!b.card_pose(0, at(0)).is_visible());
        assert!(b.card_pose(0, at(0)).scale < 1.0);
        assert_eq!(b.card_pose(0, at(300)), Pose::REST);
        assert!(!b.card_pose(2, at(50)).is_visible());

        assert!(!b.track_pose(0, at(150)).is_visible());
        assert!(b.track_pose(0, at(300)).is_visible());
        assert!(!b.label_pose(0, at(750)).is_visible());
        assert_eq!(b.label_pose(0, at(1300)), Pose::REST);
    }
}
