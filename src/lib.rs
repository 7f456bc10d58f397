// Module declarations
mod api;
mod config;
mod core;
mod shared;
mod system;

use std::sync::Arc;
use std::time::Duration;
use tauri::{Manager, RunEvent};

use crate::config::ESCAPE_HOTKEYS;
use crate::core::control::{self, ControlDeps, ControlHandle, ControlLoop};
use crate::core::escape::EscapeRegistrar;
use crate::core::menu_provider::SettingsMenuProvider;
use crate::shared::settings::AppSettings;
use crate::system::hotkeys::{escape_terminator, GlobalShortcutBackend};
use crate::system::store::PluginWindowStore;
use crate::system::window::backend::TauriWindowBackend;

/// Upper bound on the exit-time cleanup before the process is left to die.
const SHUTDOWN_TIMEOUT_MS: u64 = 1000;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = tauri::Builder::default()
        // Must be registered first so a second launch exits before doing anything
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            log::info!("Second launch detected, re-showing the widget");
            if let Some(control) = app.try_state::<ControlHandle>() {
                let control = control.inner().clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(e) = control.show_widget().await {
                        log::error!("Failed to re-show widget: {}", e);
                    }
                });
            }
        }))
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_store::Builder::default().build())
        .setup(|app| {
            let handle = app.handle().clone();

            // Escape hotkeys go first: they must work even if the rest of setup fails
            let mut hotkeys = GlobalShortcutBackend::new(&handle);
            let escape = EscapeRegistrar::new(ESCAPE_HOTKEYS)
                .register_all(&mut hotkeys, escape_terminator(handle.clone()));
            if !escape.failed.is_empty() {
                log::warn!(
                    "Emergency escape active on {:?}, unavailable on {:?}",
                    escape.registered,
                    escape.failed
                );
            }

            let settings = tauri::async_runtime::block_on(AppSettings::load()).unwrap_or_else(|e| {
                log::error!("Failed to load settings, using defaults: {}", e);
                AppSettings::default()
            });

            let (control, rx) = control::channel();
            let mut control_loop = ControlLoop::new(ControlDeps {
                backend: Box::new(TauriWindowBackend::new(handle.clone(), control.clone())),
                events: Box::new(handle.clone()),
                store: Box::new(PluginWindowStore::open(&handle)?),
                menus: Arc::new(SettingsMenuProvider::new(&settings.menus)),
                settings: settings.clone(),
            });

            // The widget exists before any command can reach the loop
            control_loop.create_widget_window()?;

            app.manage(control.clone());
            tauri::async_runtime::spawn(control_loop.run(rx));
            system::window::cursor::spawn_hover_probe(handle.clone(), control.clone());
            system::tray::build_tray(app, control, default_route(&settings))?;

            log::info!("Widget shell initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Window commands
            api::commands::window::create_widget_window,
            api::commands::window::open_secondary,
            api::commands::window::navigate_secondary,
            api::commands::window::hide_secondary,
            api::commands::window::set_bounds,
            api::commands::window::get_status,
            // Routing commands
            api::commands::routing::request_routing,
            api::commands::routing::reserve_routing_version,
            // Orb and menu input
            api::commands::orb::orb_pointer_down,
            api::commands::orb::orb_pointer_move,
            api::commands::orb::orb_pointer_up,
            api::commands::orb::orb_hover,
            api::commands::menu::menu_toggle,
            api::commands::menu::menu_select,
            api::commands::menu::menu_close,
            // Session commands
            api::commands::session::set_auth_status,
            api::commands::session::set_role,
            // Settings commands
            api::commands::settings::get_settings,
            api::commands::settings::save_settings,
            // System commands
            api::commands::system::log_message,
        ])
        .build(tauri::generate_context!())
        .unwrap_or_else(|e| {
            log::error!("FATAL: Failed to start Tauri application: {}", e);
            std::process::exit(1);
        });

    app.run(|app, event| {
        if let RunEvent::Exit = event {
            if let Some(control) = app.try_state::<ControlHandle>() {
                let control = control.inner().clone();
                tauri::async_runtime::block_on(async move {
                    let shutdown = control.shutdown();
                    if tokio::time::timeout(Duration::from_millis(SHUTDOWN_TIMEOUT_MS), shutdown)
                        .await
                        .is_err()
                    {
                        log::warn!("Control loop did not stop in time, window state may be lost");
                    }
                });
            }
        }
    });
}

/// Route the tray opens: the first menu entry for the configured role.
fn default_route(settings: &AppSettings) -> String {
    settings
        .menus
        .roles
        .get(&settings.menus.role)
        .and_then(|items| items.first())
        .map(|item| item.route.clone())
        .unwrap_or_else(|| "/".to_string())
}
