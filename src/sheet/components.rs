use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inventory::components::{GridKind, Inventory, Item, SheetRole};
use crate::inventory::migration::InventoryRecord;
use crate::inventory::transfer::Landing;

/// 角色卡（角色 / 雇工 / NPC）
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub role: SheetRole,
    pub id: Uuid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, role: SheetRole) -> Self {
        let name = name.into();
        Self {
            id: sheet_id(&name),
            name,
            role,
        }
    }

    /// CLI 用：全名、名字第一个词或 uuid，均不区分大小写
    pub fn matches(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || self
                .name
                .split_whitespace()
                .next()
                .is_some_and(|first| first.eq_ignore_ascii_case(token))
            || self.id.to_string().eq_ignore_ascii_case(token)
    }
}

/// 同名卡永远得到同一个 id
pub fn sheet_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// 每张卡的活动日志
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ActivityLog(pub Vec<String>);

impl ActivityLog {
    pub fn push(&mut self, line: impl Into<String>) {
        self.0.push(line.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }
}

/// 按生成顺序记录的角色卡，CLI 可以用序号指代
#[derive(Resource, Debug, Default)]
pub struct Roster(pub Vec<Entity>);

/// 定居点银行：寄存的硬币（pips）与物品
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Bank {
    pub pips: u32,
    pub items: Vec<Item>,
}

impl Bank {
    /// 取款手续费：金额的 1%，向上取整
    pub fn withdrawal_fee(amount: u32) -> u32 {
        amount.div_ceil(100)
    }

    pub fn deposit_pips(&mut self, amount: u32) {
        self.pips = self.pips.saturating_add(amount);
    }

    /// 取出 amount，手续费另从余额扣；余额不足返回 None
    pub fn withdraw_pips(&mut self, amount: u32) -> Option<u32> {
        let fee = Self::withdrawal_fee(amount);
        let cost = amount.checked_add(fee)?;
        if cost > self.pips {
            return None;
        }
        self.pips -= cost;
        Some(fee)
    }

    pub fn deposit(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn withdraw(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

/// 整张卡的存档形状：名字、类型、日志，其余字段与 InventoryRecord 同层
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetRecord {
    pub name: String,
    #[serde(default, rename = "type")]
    pub role: SheetRole,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(flatten)]
    pub inventory: InventoryRecord,
}

impl SheetRecord {
    pub fn capture(sheet: &Sheet, inventory: &Inventory, log: &ActivityLog) -> Self {
        Self {
            name: sheet.name.clone(),
            role: sheet.role,
            log: log.0.clone(),
            inventory: inventory.to_record(),
        }
    }
}

/// 开局物品依次尝试爪、背包，最后落地
pub fn equip_loadout(inventory: &mut Inventory, items: impl IntoIterator<Item = Item>) -> Vec<Landing> {
    items
        .into_iter()
        .map(|item| match inventory.grid_mut(GridKind::Paw).place(item) {
            Ok(at) => Landing::Grid(GridKind::Paw, at),
            Err(item) => inventory.stow(item),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::components::Cell;

    #[test]
    fn sheet_ids_are_stable_per_name() {
        let a = Sheet::new("Ada Thistle", SheetRole::Character);
        let b = Sheet::new("Ada Thistle", SheetRole::Hireling);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, Sheet::new("Pip", SheetRole::Character).id);
    }

    #[test]
    fn sheet_matches_name_first_word_or_uuid() {
        let sheet = Sheet::new("Ada Thistle", SheetRole::Character);
        assert!(sheet.matches("ada thistle"));
        assert!(sheet.matches("ADA"));
        assert!(sheet.matches(&sheet.id.to_string()));
        assert!(!sheet.matches("Thistle"));
    }

    #[test]
    fn loadout_fills_paws_then_pack_then_ground() {
        let mut inv = Inventory::new(SheetRole::Hireling);
        let landings = equip_loadout(
            &mut inv,
            [
                Item::gear("Spear").with_size(2, 1),
                Item::gear("Torches"),
                Item::gear("Rope"),
                Item::gear("Tent").with_size(2, 1),
            ],
        );
        assert_eq!(
            landings,
            vec![
                Landing::Grid(GridKind::Paw, Cell::new(0, 0)),
                Landing::Grid(GridKind::Pack, Cell::new(0, 0)),
                Landing::Grid(GridKind::Pack, Cell::new(0, 1)),
                Landing::Ground,
            ]
        );
        assert!(inv.is_encumbered());
        assert_eq!(inv.item_count(), 4);
    }

    #[test]
    fn withdrawal_fee_rounds_up() {
        assert_eq!(Bank::withdrawal_fee(0), 0);
        assert_eq!(Bank::withdrawal_fee(1), 1);
        assert_eq!(Bank::withdrawal_fee(100), 1);
        assert_eq!(Bank::withdrawal_fee(250), 3);

        let mut bank = Bank::default();
        bank.deposit_pips(120);
        assert_eq!(bank.withdraw_pips(100), Some(1));
        assert_eq!(bank.pips, 19);
        assert_eq!(bank.withdraw_pips(19), None);
        assert_eq!(bank.pips, 19);
        assert_eq!(bank.withdraw_pips(18), Some(1));
        assert_eq!(bank.pips, 0);
    }

    #[test]
    fn bank_items_keep_order() {
        let mut bank = Bank::default();
        bank.deposit(Item::gear("Lantern"));
        bank.deposit(Item::gear("Rope"));
        assert!(bank.withdraw(5).is_none());
        assert_eq!(bank.withdraw(0).map(|i| i.name), Some("Lantern".into()));
        assert_eq!(bank.items.len(), 1);
    }

    #[test]
    fn record_flattens_inventory_fields() {
        let sheet = Sheet::new("Pip", SheetRole::Hireling);
        let mut inv = Inventory::new(SheetRole::Hireling);
        inv.push_ground(Item::gear("Mystery Trinket"));
        let mut log = ActivityLog::default();
        log.push("Hired.");

        let json = serde_json::to_value(SheetRecord::capture(&sheet, &inv, &log)).unwrap();
        assert_eq!(json["name"], "Pip");
        assert_eq!(json["type"], "hireling");
        assert_eq!(json["log"][0], "Hired.");
        assert_eq!(json["ground"][0]["name"], "Mystery Trinket");
        assert!(json["packGrid"].as_array().unwrap().is_empty());
        assert!(json.get("inventory").is_none());
    }
}
