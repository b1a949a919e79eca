use gpui::*;
use gpui_component::{Root, ThemeRegistry};
use tracing_subscriber::EnvFilter;

use videochat::app::{
    ChatAppShell, NewChat, Quit, ToggleSidebar, ToggleTheme, default_themes_path,
};
use videochat::settings::{JsonFlagStorage, apply_session_theme};

/// Application entry point.
///
/// Bootstraps the GPUI application with:
/// 1. Tracing output filtered by `RUST_LOG`
/// 2. Asset loading via gpui-component-assets
/// 3. gpui-component initialization (required for Root, themes and prompts)
/// 4. Theme loading/watching from ./themes, then the session light/dark mode
/// 5. Global key bindings for the shell actions
/// 6. Window creation with the Root wrapper around the shell
fn main() {
    // Initialize tracing; set RUST_LOG=debug to see store transitions
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create application with bundled assets
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(|cx| {
        // Initialize gpui-component - REQUIRED before any Root usage
        gpui_component::init(cx);

        // Attempt to load and watch themes from ./themes directory.
        // This is non-fatal: if the directory doesn't exist or is empty,
        // the app falls back to default built-in themes. Every reload re-applies
        // the session mode, so an in-session toggle survives a theme edit.
        if let Err(err) = ThemeRegistry::watch_dir(default_themes_path(), cx, |cx| {
            apply_session_theme(&JsonFlagStorage::load(), cx);
            tracing::info!("theme directory watch initialized");
        }) {
            tracing::warn!(
                "failed to watch themes directory: {}. using default themes",
                err
            );
            apply_session_theme(&JsonFlagStorage::load(), cx);
        }

        // Quit is handled globally; the other actions are handled by the shell
        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });

        // Global keyboard shortcuts
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("cmd-n", NewChat, None),
            KeyBinding::new("cmd-b", ToggleSidebar, None),
            KeyBinding::new("cmd-shift-t", ToggleTheme, None),
        ]);

        // Spawn async window creation to ensure all initialization is complete
        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1100.), px(760.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some("VideoChat".into()),
                        appears_transparent: true,
                        traffic_light_position: Some(point(px(9.), px(9.))),
                        ..Default::default()
                    }),
                    // Linux/FreeBSD draw their own title area with client decorations
                    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
                    window_decorations: Some(WindowDecorations::Client),
                    #[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
                    window_decorations: None,
                    ..Default::default()
                };

                // Root is REQUIRED by gpui-component for prompts and overlays
                cx.open_window(options, |window, cx| {
                    let shell = cx.new(|cx| ChatAppShell::new(window, cx));
                    cx.new(|cx| Root::new(shell, window, cx))
                })
                .expect("failed to open main window");

                cx.activate(true);
            })
        })
        .detach();
    });
}
