use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use gpui::*;
use gpui_component::{Theme, ThemeMode};
use snafu::{ResultExt, Snafu};

pub const SETTINGS_DIRECTORY_NAME: &str = "videochat";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Key of the persisted dark-mode flag, stored as `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

type FlagMap = BTreeMap<String, String>;

/// Durable string key/value flags.
pub trait FlagStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Flags kept in a JSON object on disk.
pub struct JsonFlagStorage {
    flags: Arc<ArcSwap<FlagMap>>,
    config_path: PathBuf,
}

impl JsonFlagStorage {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".videochat"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let flags = Self::load_from_disk(&config_path);
        Self {
            flags: Arc::new(ArcSwap::from_pointee(flags)),
            config_path,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    fn load_from_disk(path: &Path) -> FlagMap {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
            return FlagMap::new();
        }

        let figment = Figment::from(Serialized::defaults(FlagMap::new())).merge(Json::file(path));

        match figment.extract::<FlagMap>() {
            Ok(flags) => flags,
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                FlagMap::new()
            }
        }
    }

    fn persist(&self, flags: &FlagMap) -> Result<(), SettingsError> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-settings-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(flags).context(SerializeConfigSnafu {
            stage: "serialize-settings-json",
        })?;

        let temp_path = self.config_path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-settings-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.config_path).context(RenameTempFileSnafu {
            stage: "rename-temporary-settings-file",
            from: temp_path,
            to: self.config_path.clone(),
        })?;

        tracing::info!("saved settings to {:?}", self.config_path);
        Ok(())
    }
}

impl FlagStorage for JsonFlagStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.flags.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut flags = FlagMap::clone(&self.flags.load());
        flags.insert(key.to_string(), value.to_string());
        self.persist(&flags)?;
        self.flags.store(Arc::new(flags));
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SettingsError {
    #[snafu(display("failed to create settings directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize settings on `{stage}`: {source}"))]
    SerializeConfig {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write settings file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace settings file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Initial dark-mode flag: a stored value wins, otherwise the platform preference.
///
/// Any stored value other than `"true"` means light mode.
pub fn resolve_dark_mode(stored: Option<&str>, system_prefers_dark: bool) -> bool {
    match stored {
        Some(value) => value == "true",
        None => system_prefers_dark,
    }
}

pub fn system_prefers_dark(appearance: WindowAppearance) -> bool {
    matches!(
        appearance,
        WindowAppearance::Dark | WindowAppearance::VibrantDark
    )
}

pub fn flag_value(dark_mode: bool) -> &'static str {
    if dark_mode { "true" } else { "false" }
}

pub fn theme_mode(dark_mode: bool) -> ThemeMode {
    if dark_mode {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// Dark-mode flag of the running session.
///
/// Set once the first theme is applied and on every toggle. It can differ from
/// the file when the last write failed.
struct SessionDarkMode(bool);

impl Global for SessionDarkMode {}

fn set_session_dark_mode(dark_mode: bool, cx: &mut App) {
    cx.set_global(SessionDarkMode(dark_mode));
}

/// Dark-mode flag to apply: the session value once there is one, otherwise the
/// stored flag with the platform preference as fallback.
pub fn session_dark_mode(storage: &dyn FlagStorage, cx: &App) -> bool {
    match cx.try_global::<SessionDarkMode>() {
        Some(session) => session.0,
        None => resolve_dark_mode(
            storage.get(DARK_MODE_KEY).as_deref(),
            system_prefers_dark(cx.window_appearance()),
        ),
    }
}

/// Applies the session theme mode globally, reading the stored flag on first use.
///
/// Safe to call again after a theme reload: a toggled session mode is kept even
/// when it never reached disk.
pub fn apply_session_theme(storage: &dyn FlagStorage, cx: &mut App) -> bool {
    let dark_mode = session_dark_mode(storage, cx);
    set_session_dark_mode(dark_mode, cx);
    Theme::change(theme_mode(dark_mode), None, cx);
    dark_mode
}

/// Dark-mode flag shared by the window, persisted on every toggle.
pub struct ThemeState {
    storage: Box<dyn FlagStorage>,
    dark_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChanged {
    pub dark_mode: bool,
}

impl EventEmitter<ThemeChanged> for ThemeState {}

impl ThemeState {
    pub fn new(cx: &mut App) -> Entity<Self> {
        Self::with_storage(Box::new(JsonFlagStorage::load()), cx)
    }

    pub fn with_storage(storage: Box<dyn FlagStorage>, cx: &mut App) -> Entity<Self> {
        let dark_mode = apply_session_theme(storage.as_ref(), cx);
        cx.new(|_| Self { storage, dark_mode })
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    pub fn toggle(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.dark_mode = !self.dark_mode;
        set_session_dark_mode(self.dark_mode, cx);
        Theme::change(theme_mode(self.dark_mode), Some(window), cx);
        cx.refresh_windows();

        // Persistence failures never undo the toggle for the running session.
        if let Err(error) = self.storage.set(DARK_MODE_KEY, flag_value(self.dark_mode)) {
            tracing::error!("failed to persist theme flag: {error}");
        }

        cx.emit(ThemeChanged {
            dark_mode: self.dark_mode,
        });
        cx.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_flag_wins_over_platform_preference() {
        assert!(resolve_dark_mode(Some("true"), false));
        assert!(!resolve_dark_mode(Some("false"), true));
        assert!(!resolve_dark_mode(Some("yes"), true));
    }

    #[test]
    fn missing_flag_follows_platform_preference() {
        assert!(resolve_dark_mode(None, true));
        assert!(!resolve_dark_mode(None, false));
    }

    #[test]
    fn dark_appearances_prefer_dark() {
        assert!(system_prefers_dark(WindowAppearance::Dark));
        assert!(system_prefers_dark(WindowAppearance::VibrantDark));
        assert!(!system_prefers_dark(WindowAppearance::Light));
        assert!(!system_prefers_dark(WindowAppearance::VibrantLight));
    }

    #[test]
    fn flag_is_written_and_read_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let storage = JsonFlagStorage::new(path.clone());
        assert_eq!(storage.get(DARK_MODE_KEY), None);

        storage
            .set(DARK_MODE_KEY, flag_value(true))
            .expect("flag persisted");
        assert_eq!(storage.get(DARK_MODE_KEY).as_deref(), Some("true"));

        let reloaded = JsonFlagStorage::new(path.clone());
        assert_eq!(reloaded.get(DARK_MODE_KEY).as_deref(), Some("true"));

        reloaded
            .set(DARK_MODE_KEY, flag_value(false))
            .expect("flag persisted");
        let raw = std::fs::read_to_string(&path).expect("settings file");
        assert!(raw.contains("\"darkMode\": \"false\""));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[gpui::test]
    fn session_mode_outlives_a_failed_write(cx: &mut TestAppContext) {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = JsonFlagStorage::new(dir.path().join(SETTINGS_FILE_NAME));
        storage
            .set(DARK_MODE_KEY, flag_value(false))
            .expect("flag persisted");

        cx.update(|cx| {
            assert!(!session_dark_mode(&storage, cx));

            // A toggle whose write failed leaves the file on "false".
            set_session_dark_mode(true, cx);
            assert!(session_dark_mode(&storage, cx));
            assert!(session_dark_mode(&JsonFlagStorage::new(storage.config_path.clone()), cx));
        });
    }

    #[test]
    fn unreadable_file_falls_back_to_no_flag() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "{ not json").expect("write garbage");

        let storage = JsonFlagStorage::new(path);
        assert_eq!(storage.get(DARK_MODE_KEY), None);
    }
}
