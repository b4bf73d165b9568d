pub mod catalog;
pub mod loader;
pub mod schema;
mod tables;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::core::resources::SheetConfig;
use crate::core::states::AppState;
use catalog::Catalog;
use schema::HomebrewList;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct HomebrewAssets {
    handle: Option<Handle<HomebrewList>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<HomebrewList>()
            .register_asset_loader(loader::HomebrewLoader)
            // 内置表立即可用，自制内容加载完再合并
            .insert_resource(Catalog::builtin())
            .init_resource::<HomebrewAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut homebrew: ResMut<HomebrewAssets>,
    mut next: ResMut<NextState<AppState>>,
    asset_server: Res<AssetServer>,
    config: Res<SheetConfig>,
) {
    if config.homebrew.is_empty() {
        info!("no homebrew configured");
        next.set(AppState::InGame);
        return;
    }
    homebrew.handle = Some(asset_server.load(config.homebrew.clone()));
}

fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    mut catalog: ResMut<Catalog>,
    homebrew: Res<HomebrewAssets>,
    lists: Res<Assets<HomebrewList>>,
    asset_server: Res<AssetServer>,
) {
    let Some(handle) = &homebrew.handle else {
        return;
    };

    if let Some(list) = lists.get(handle) {
        let merged = catalog.extend(list);
        info!(merged, items = catalog.items().len(), "homebrew loaded");
        next.set(AppState::InGame);
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        // 自制内容可有可无，内置表照常使用
        warn!("homebrew not loaded: {err}");
        next.set(AppState::InGame);
    }
}
