pub mod components;
pub mod events;
pub mod systems;

use bevy::prelude::*;

use crate::core::states::AppState;
use components::{Bank, Roster};
use events::*;
use systems::*;

/// 角色卡插件：生成卡片、维护银行
pub struct SheetPlugin;

impl Plugin for SheetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Roster>()
            .init_resource::<Bank>()
            .add_event::<DepositItemEvent>()
            .add_event::<WithdrawItemEvent>()
            .add_event::<BankPipsEvent>()
            .add_event::<ShowBankEvent>()
            // 在游戏开始时生成角色卡
            .add_systems(OnEnter(AppState::InGame), spawn_roster)
            .add_systems(
                Update,
                (deposit_item, withdraw_item, bank_pips, show_bank)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
