//! 持久化记录与旧格式迁移
//!
//! 旧版角色卡只有一个 `inventory` 槽位数组；新版是三张网格 + 地面。
//! 迁移一次性完成并删除旧字段，之后再跑是空操作。

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};

use super::components::{
    BODY_COLS, BODY_ROWS, GridKind, Inventory, Item, PAW_COLS, PAW_ROWS, PlacedItem, SheetRole,
};
use super::error::InventoryError;
use super::grid::Grid;

/// 旧格式的一个槽位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySlot {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub slot_type: String,
    #[serde(default)]
    pub item: Option<Item>,
}

impl LegacySlot {
    /// paw-main / paw-off 也可能只写在 id 上
    fn grid(&self) -> Option<GridKind> {
        let is = |tag: &str| self.slot_type == tag || self.id == tag;
        if is("paw-main") || is("paw-off") {
            Some(GridKind::Paw)
        } else if self.slot_type == "body" {
            Some(GridKind::Body)
        } else if self.slot_type == "pack" {
            Some(GridKind::Pack)
        } else {
            None
        }
    }
}

/// 外部序列化使用的形状：每张网格是 {item,row,col} 列表，地面是物品列表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paw_grid: Option<Vec<PlacedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_grid: Option<Vec<PlacedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack_grid: Option<Vec<PlacedItem>>,
    #[serde(default)]
    pub ground: Vec<Item>,
    /// 旧格式字段，迁移后删除
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<LegacySlot>>,
}

impl InventoryRecord {
    pub fn is_migrated(&self) -> bool {
        self.paw_grid.is_some() && self.body_grid.is_some() && self.pack_grid.is_some()
    }
}

/// 把旧格式升级为网格格式。已有三张网格时什么都不做并返回 false。
/// 缺的网格视为空，已有的网格先校验，旧物品绕开原有物品首次适配，
/// 放不下（或槽位类型不认识）的落到地面。校验失败时 record 不变。
pub fn migrate(record: &mut InventoryRecord, role: SheetRole) -> Result<bool, InventoryError> {
    if record.is_migrated() {
        return Ok(false);
    }

    let (pack_rows, pack_cols) = role.pack_size();
    let existing = |items: &Option<Vec<PlacedItem>>, rows, cols| {
        let grid = Grid::from_items(rows, cols, items.clone().unwrap_or_default());
        grid.check_invariants().map(|()| grid)
    };
    let mut paw = existing(&record.paw_grid, PAW_ROWS, PAW_COLS)?;
    let mut body = existing(&record.body_grid, BODY_ROWS, BODY_COLS)?;
    let mut pack = existing(&record.pack_grid, pack_rows, pack_cols)?;

    if let Some(slots) = record.inventory.take() {
        let mut dropped = 0;
        for slot in slots {
            let kind = slot.grid();
            let Some(item) = slot.item else {
                continue;
            };
            let grid = match kind {
                Some(GridKind::Paw) => &mut paw,
                Some(GridKind::Body) => &mut body,
                Some(GridKind::Pack) => &mut pack,
                None => {
                    record.ground.push(item);
                    dropped += 1;
                    continue;
                }
            };
            if let Err(item) = grid.place(item) {
                record.ground.push(item);
                dropped += 1;
            }
        }
        info!(dropped, "migrated legacy inventory");
    }

    record.paw_grid = Some(paw.into_items());
    record.body_grid = Some(body.into_items());
    record.pack_grid = Some(pack.into_items());
    Ok(true)
}

impl Inventory {
    /// 读入外部记录：必要时先迁移，再校验三张网格的不变量
    pub fn from_record(mut record: InventoryRecord, role: SheetRole) -> Result<Self, InventoryError> {
        if migrate(&mut record, role)? {
            debug!(?role, "record upgraded from legacy slots");
        }
        let mut inventory = Inventory::new(role);
        for (kind, items) in [
            (GridKind::Paw, record.paw_grid),
            (GridKind::Body, record.body_grid),
            (GridKind::Pack, record.pack_grid),
        ] {
            let grid = inventory.grid_mut(kind);
            *grid = Grid::from_items(grid.rows(), grid.cols(), items.unwrap_or_default());
            grid.check_invariants()?;
        }
        inventory.ground = record.ground;
        Ok(inventory)
    }

    pub fn to_record(&self) -> InventoryRecord {
        InventoryRecord {
            paw_grid: Some(self.paw.items().to_vec()),
            body_grid: Some(self.body.items().to_vec()),
            pack_grid: Some(self.pack.items().to_vec()),
            ground: self.ground.clone(),
            inventory: None,
        }
    }
}
