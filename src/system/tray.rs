use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::App;

use crate::core::control::ControlHandle;

/// Tray menu: open or hide the workspace, and quit.
pub fn build_tray(app: &App, control: ControlHandle, default_route: String) -> tauri::Result<()> {
    let open_item = MenuItem::with_id(app, "open", "Open Workspace", true, None::<&str>)?;
    let hide_item = MenuItem::with_id(app, "hide", "Hide Workspace", true, None::<&str>)?;
    let separator = PredefinedMenuItem::separator(app)?;
    let quit_item = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
    let menu = Menu::with_items(app, &[&open_item, &hide_item, &separator, &quit_item])?;

    let mut builder = TrayIconBuilder::new()
        .menu(&menu)
        .on_menu_event(move |app, event| match event.id().as_ref() {
            "quit" => app.exit(0),
            "open" => {
                let control = control.clone();
                let route = default_route.clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = control.open_secondary(route).await {
                        log::error!("[Tray] Failed to open workspace: {}", e);
                    }
                });
            }
            "hide" => {
                let control = control.clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = control.hide_secondary().await {
                        log::error!("[Tray] Failed to hide workspace: {}", e);
                    }
                });
            }
            _ => {}
        });

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }
    builder.build(app)?;
    Ok(())
}
