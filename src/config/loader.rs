//! Layered settings loading.
//!
//! Layers, later wins: programmed defaults < user config < project
//! `scopetrack.toml` < explicit override file. A broken layer is skipped with a
//! warning event rather than failing the whole load.

use super::defaults::default_settings;
use super::settings::TrackerSettings;
use super::user::{CONFIG_FILE_NAME, load_user_config};
use super::merge_all;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsLoadOutcome {
    pub settings: TrackerSettings,
    pub events: Vec<SettingsEvent>,
}

impl SettingsLoadOutcome {
    /// Forward collected events to the logger.
    pub fn log_events(&self) {
        for event in &self.events {
            match event.kind {
                SettingsEventKind::Info => {
                    log::info!(target: "scopetrack::config", "{}", event.message)
                }
                SettingsEventKind::Warning => {
                    log::warn!(target: "scopetrack::config", "{}", event.message)
                }
            }
        }
    }

    pub fn has_warnings(&self) -> bool {
        self.events
            .iter()
            .any(|event| event.kind == SettingsEventKind::Warning)
    }
}

pub fn load_settings(root_path: Option<&Path>, override_path: Option<&Path>) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let defaults = Some(default_settings());
    let user_config = load_user_config_with_events(&mut events);
    let project_settings = root_path
        .map(|root| root.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
        .and_then(|path| load_toml_file(&path, &mut events));
    let override_settings = override_path.and_then(|path| load_toml_file(path, &mut events));

    let settings = merge_all(&[defaults, user_config, project_settings, override_settings])
        .unwrap_or_else(default_settings);

    SettingsLoadOutcome { settings, events }
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<TrackerSettings> {
    match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(settings)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_toml_file(path: &Path, events: &mut Vec<SettingsEvent>) -> Option<TrackerSettings> {
    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        path.display()
    )));

    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<TrackerSettings>(&contents) {
            Ok(settings) => {
                events.push(SettingsEvent::info(format!(
                    "Successfully loaded {}",
                    path.display()
                )));
                Some(settings)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {}: {}",
                path.display(),
                err
            )));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_ANONYMOUS_LABEL;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    struct XdgGuard(Option<std::ffi::OsString>);

    impl XdgGuard {
        fn point_at(path: &Path) -> Self {
            let original = env::var_os("XDG_CONFIG_HOME");
            // SAFETY: callers are serialized by #[serial(xdg_env)]
            unsafe {
                env::set_var("XDG_CONFIG_HOME", path);
            }
            Self(original)
        }
    }

    impl Drop for XdgGuard {
        fn drop(&mut self) {
            // SAFETY: callers are serialized by #[serial(xdg_env)]
            unsafe {
                match self.0.take() {
                    Some(original) => env::set_var("XDG_CONFIG_HOME", original),
                    None => env::remove_var("XDG_CONFIG_HOME"),
                }
            }
        }
    }

    #[test]
    #[serial(xdg_env)]
    fn test_load_settings_merges_user_project_and_override() {
        // Given a user config, a project config and an override file
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let _guard = XdgGuard::point_at(user_dir.path());

        fs::create_dir_all(user_dir.path().join("scopetrack")).unwrap();
        fs::write(
            user_dir.path().join("scopetrack").join(CONFIG_FILE_NAME),
            "maxLabelDepth = 4\ndecoration = \"user\"",
        )
        .unwrap();
        fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            "decoration = \"project\"\nlanguage = \"javascript\"",
        )
        .unwrap();
        let override_file = project_dir.path().join("override.toml");
        fs::write(&override_file, "wordPattern = \"[a-z]+\"").unwrap();

        // When loading all layers
        let outcome = load_settings(Some(project_dir.path()), Some(&override_file));

        // Then later layers win field by field and defaults fill the rest
        let settings = outcome.settings;
        assert_eq!(settings.max_label_depth, Some(4));
        assert_eq!(settings.decoration.as_deref(), Some("project"));
        assert_eq!(settings.language.as_deref(), Some("javascript"));
        assert_eq!(settings.word_pattern.as_deref(), Some("[a-z]+"));
        assert_eq!(settings.anonymous_label.as_deref(), Some(DEFAULT_ANONYMOUS_LABEL));
        assert!(!outcome.events.is_empty());
    }

    #[test]
    #[serial(xdg_env)]
    fn test_broken_project_config_degrades_to_warning() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let _guard = XdgGuard::point_at(user_dir.path());
        fs::write(project_dir.path().join(CONFIG_FILE_NAME), "maxLabelDepth = [").unwrap();

        let outcome = load_settings(Some(project_dir.path()), None);

        assert!(outcome.has_warnings());
        assert_eq!(outcome.settings, default_settings());
    }

    #[test]
    #[serial(xdg_env)]
    fn test_missing_override_file_is_warning() {
        let user_dir = TempDir::new().unwrap();
        let _guard = XdgGuard::point_at(user_dir.path());

        let outcome = load_settings(None, Some(Path::new("/nonexistent/scopetrack.toml")));

        assert!(outcome.has_warnings());
        assert_eq!(outcome.settings, default_settings());
    }
}
