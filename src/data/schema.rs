use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::Deserialize;

use crate::inventory::components::{Item, ItemKind, Usage};

/// 法术模板：名字、描述、充能方式
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpellTemplate {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub recharge: String,
}

/// 状态模板（Exhausted、Hungry ...）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTemplate {
    pub name: String,
    pub effect: String,
    pub clear: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum HomebrewKind {
    Weapon,
    Armour,
    #[default]
    Gear,
}

fn one() -> u32 {
    1
}

fn one_cell() -> usize {
    1
}

/// 自制物品条目，RON 里写起来尽量简单
#[derive(Debug, Clone, Deserialize)]
pub struct HomebrewItem {
    pub name: String,
    #[serde(default)]
    pub kind: HomebrewKind,
    #[serde(default = "one")]
    pub slots: u32,
    #[serde(default = "one_cell")]
    pub width: usize,
    #[serde(default = "one_cell")]
    pub height: usize,
    /// 0 表示没有使用点
    #[serde(default)]
    pub uses: u32,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub defence: u32,
    #[serde(default)]
    pub description: String,
}

impl From<&HomebrewItem> for Item {
    fn from(entry: &HomebrewItem) -> Self {
        let kind = match entry.kind {
            HomebrewKind::Weapon => ItemKind::Weapon {
                damage: entry.damage.clone(),
            },
            HomebrewKind::Armour => ItemKind::Armour {
                defence: entry.defence,
            },
            HomebrewKind::Gear => ItemKind::Gear,
        };
        Item {
            name: entry.name.clone(),
            kind,
            slots: entry.slots,
            width: entry.width.max(1),
            height: entry.height.max(1),
            usage: (entry.uses > 0).then(|| Usage::new(entry.uses)),
            description: (!entry.description.is_empty()).then(|| entry.description.clone()),
        }
    }
}

#[derive(Asset, TypePath, Deserialize, Debug, Default)]
pub struct HomebrewList {
    #[serde(default)]
    pub items: Vec<HomebrewItem>,
    #[serde(default)]
    pub spells: Vec<SpellTemplate>,
}
