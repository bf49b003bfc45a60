mod arena;

use std::path::PathBuf;

use arena::ArenaPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use car_combat::diagnostics::DiagnosticsPlugin;
use car_combat::ui::UiPlugin;
use car_combat::CarCombatPlugin;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let window = WindowPlugin {
        primary_window: Some(proving_ground_window()),
        ..default()
    };
    App::new()
        .add_plugins(DefaultPlugins.set(window).set(asset_plugin()))
        .add_plugins((
            CarCombatPlugin,
            UiPlugin,
            DiagnosticsPlugin,
            ArenaPlugin::new(vehicle_dir()),
        ))
        .run();
}

/// `ARENA_VEHICLE_DIR` points the roster at another set of definitions.
fn vehicle_dir() -> PathBuf {
    std::env::var("ARENA_VEHICLE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(arena::DEFAULT_VEHICLE_DIR))
}

#[cfg(target_arch = "wasm32")]
fn proving_ground_window() -> Window {
    Window {
        canvas: Some("#bevy-canvas".into()),
        fit_canvas_to_parent: true,
        present_mode: PresentMode::AutoVsync,
        ..default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn proving_ground_window() -> Window {
    Window {
        title: "Car Combat Proving Ground".into(),
        present_mode: PresentMode::Fifo,
        resolution: (1280.0, 720.0).into(),
        ..default()
    }
}

#[cfg(target_arch = "wasm32")]
fn asset_plugin() -> AssetPlugin {
    AssetPlugin {
        file_path: "assets".into(),
        ..default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_plugin() -> AssetPlugin {
    AssetPlugin {
        watch_for_changes_override: Some(true),
        ..default()
    }
}
