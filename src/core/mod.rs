use bevy::prelude::*;

pub mod events;
pub mod resources;
pub mod states;

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 配置若已由 main 读入则保留，否则使用默认值
        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .init_resource::<resources::SheetConfig>();
    }
}
