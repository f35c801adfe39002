use include_dir::{include_dir, Dir};
use serde::Deserialize;

use crate::error::ContentError;

static CONTENT_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/content");

const SKILLS_FILE: &str = "skills.json";
const PROJECTS_FILE: &str = "projects.json";

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: u8,
    pub category: String,
    pub color: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, skill: &Skill) -> bool {
        self.id == Self::ALL || self.id == skill.category
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SkillCatalog {
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub case_study_url: Option<String>,
}

pub fn load_skills() -> Result<SkillCatalog, ContentError> {
    read_json(SKILLS_FILE)
}

pub fn load_projects() -> Result<Vec<Project>, ContentError> {
    read_json(PROJECTS_FILE)
}

fn read_json<T: for<'de> Deserialize<'de>>(file_name: &'static str) -> Result<T, ContentError> {
    let file = CONTENT_DIR
        .get_file(file_name)
        .ok_or(ContentError::Missing(file_name))?;
    let text = file
        .contents_utf8()
        .ok_or(ContentError::NotUtf8(file_name))?;
    serde_json::from_str(text).map_err(|source| ContentError::Parse {
        file: file_name,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_catalog_loads() {
        let catalog = load_skills().unwrap();
        assert_eq!(catalog.skills.len(), 12);
        assert_eq!(catalog.categories.len(), 6);
        assert_eq!(catalog.categories[0].id, Category::ALL);
        assert!(catalog.skills.iter().all(|s| s.level <= 100));
    }

    #[test]
    fn every_skill_belongs_to_a_known_category() {
        let catalog = load_skills().unwrap();
        for skill in &catalog.skills {
            assert!(
                catalog.categories.iter().any(|c| c.id == skill.category),
                "{} has unknown category {}",
                skill.name,
                skill.category
            );
        }
    }

    #[test]
    fn projects_load_with_optional_links() {
        let projects = load_projects().unwrap();
        assert!(!projects.is_empty());
        assert!(projects.iter().all(|p| !p.technologies.is_empty()));
        assert!(projects.iter().any(|p| p.live_url.is_none()));
    }

    #[test]
    fn all_category_matches_everything() {
        let catalog = load_skills().unwrap();
        let all = &catalog.categories[0];
        assert!(catalog.skills.iter().all(|s| all.matches(s)));
    }
}
