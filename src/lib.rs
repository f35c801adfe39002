pub mod animation;
pub mod app;
pub mod app_dirs;
pub mod content;
pub mod effects;
pub mod error;
pub mod game;
pub mod page;
pub mod preferences;
pub mod presets;
pub mod projects;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod skills;
pub mod theme;
pub mod ui;
