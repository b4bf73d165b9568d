use anyhow::{Context, anyhow};
use bevy::prelude::*;

use pawprint::core::events::LogEvent;
use pawprint::core::resources::{CONFIG_PATH, SheetConfig};
use pawprint::core::{CorePlugin, states::AppState};
use pawprint::data::DataPlugin;
use pawprint::interface::debug_cli::DebugCliPlugin;
use pawprint::inventory::InventoryPlugin;
use pawprint::sheet::SheetPlugin;

fn main() -> anyhow::Result<()> {
    let config = SheetConfig::load(CONFIG_PATH).with_context(|| format!("loading {CONFIG_PATH}"))?;

    let exit = App::new()
        .insert_resource(config)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }), // 不可见窗口，实现“无 UI”
            ..default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(DataPlugin)
        .add_plugins(SheetPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
            next.set(AppState::Loading);
        })
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("exited with code {code}")),
    }
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
