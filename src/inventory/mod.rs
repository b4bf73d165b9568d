pub mod components;
pub mod error;
pub mod events;
pub mod grid;
pub mod migration;
pub mod placement;
pub mod systems;
pub mod transfer;

use bevy::prelude::*;

use crate::core::states::AppState;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GiveItemEvent>()
            .add_event::<TransferItemEvent>()
            .add_event::<RotateItemEvent>()
            .add_event::<DiscardItemEvent>()
            .add_event::<MarkUsageEvent>()
            .add_event::<AddConditionEvent>()
            .add_event::<FullRestEvent>()
            .add_event::<HandOverEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<ImportSheetEvent>()
            // 串行执行，读入先于其它修改
            .add_systems(
                Update,
                (
                    import_sheet,
                    give_item,
                    transfer_item,
                    rotate_item,
                    discard_item,
                    mark_usage,
                    add_condition,
                    full_rest,
                    hand_over,
                    print_inventory,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
