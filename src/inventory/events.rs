use bevy::prelude::*;

use super::transfer::{DropTarget, Location};
use crate::sheet::components::SheetRecord;

/// 按名字解析出物品，放进背包（放不下落地）
#[derive(Event, Debug, Clone)]
pub struct GiveItemEvent {
    pub sheet: Entity,
    pub name: String,
}

/// 拖放：从 from 挪到 to
#[derive(Event, Debug, Clone)]
pub struct TransferItemEvent {
    pub sheet: Entity,
    pub from: Location,
    pub to: DropTarget,
}

#[derive(Event, Debug, Clone)]
pub struct RotateItemEvent {
    pub sheet: Entity,
    pub at: Location,
}

#[derive(Event, Debug, Clone)]
pub struct DiscardItemEvent {
    pub sheet: Entity,
    pub at: Location,
}

/// 标记（或擦掉）一个使用点
#[derive(Event, Debug, Clone)]
pub struct MarkUsageEvent {
    pub sheet: Entity,
    pub at: Location,
    pub clear: bool,
}

#[derive(Event, Debug, Clone)]
pub struct AddConditionEvent {
    pub sheet: Entity,
    pub name: String,
}

/// 完整休息：清除所有状态
#[derive(Event, Debug, Clone)]
pub struct FullRestEvent {
    pub sheet: Entity,
}

/// 把物品交给另一张卡，落在对方地面
#[derive(Event, Debug, Clone)]
pub struct HandOverEvent {
    pub from: Entity,
    pub at: Location,
    pub to: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct ListInventoryEvent {
    pub sheet: Entity,
}

/// 读入一张存档卡；同名卡会被替换
#[derive(Event, Debug, Clone)]
pub struct ImportSheetEvent {
    pub record: SheetRecord,
}
