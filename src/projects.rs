use crate::content::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ProjectLink {
    #[strum(serialize = "Case Study")]
    CaseStudy,
    #[strum(serialize = "Live Demo")]
    Live,
    #[strum(serialize = "GitHub")]
    GitHub,
}

impl ProjectLink {
    pub const ALL: [ProjectLink; 3] = [
        ProjectLink::CaseStudy,
        ProjectLink::Live,
        ProjectLink::GitHub,
    ];

    pub fn url(self, project: &Project) -> Option<&str> {
        match self {
            ProjectLink::CaseStudy => project.case_study_url.as_deref(),
            ProjectLink::Live => project.live_url.as_deref(),
            ProjectLink::GitHub => project.github_url.as_deref(),
        }
    }

    pub fn key(self) -> char {
        match self {
            ProjectLink::CaseStudy => 'c',
            ProjectLink::Live => 'o',
            ProjectLink::GitHub => 'g',
        }
    }

    /// Links the project actually has, in display order
    pub fn available(project: &Project) -> Vec<ProjectLink> {
        Self::ALL
            .into_iter()
            .filter(|l| l.url(project).is_some())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProjectGallery {
    projects: Vec<Project>,
    selected: usize,
}

impl ProjectGallery {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            selected: 0,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.projects.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.projects.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn link(&self, link: ProjectLink) -> Option<&str> {
        self.selected().and_then(|p| link.url(p))
    }
}
