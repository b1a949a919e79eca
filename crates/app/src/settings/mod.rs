pub mod state;

pub use state::{
    DARK_MODE_KEY, FlagStorage, JsonFlagStorage, SettingsError, ThemeChanged, ThemeState,
    apply_session_theme, resolve_dark_mode, session_dark_mode,
};
