//! 物品目录与名字解析
//!
//! `resolve` 是全函数：不论输入什么名字都会得到一件物品。
//! 用户手写或生成器产出的名字不应该让任何流程失败。

use std::collections::HashMap;

use bevy::prelude::*;

use super::schema::{ConditionTemplate, HomebrewList, SpellTemplate};
use super::tables;
use crate::inventory::components::{Item, ItemKind, Usage};

const SPELL_PREFIX: &str = "Spell: ";
const HIRELING_PREFIX: &str = "Hireling: ";
/// 生成的法术物品固定 3 个使用点
const SPELL_USES: u32 = 3;
pub const HIRELING_NOTE: &str = "Hireling (see hireling sheet)";

/// 启动时构建一次的只读目录，作为 Resource 按引用传给解析函数
#[derive(Resource, Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    by_name: HashMap<String, usize>,
    spells: Vec<SpellTemplate>,
    conditions: Vec<ConditionTemplate>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Catalog {
    pub fn new(
        items: Vec<Item>,
        spells: Vec<SpellTemplate>,
        conditions: Vec<ConditionTemplate>,
    ) -> Self {
        let mut catalog = Self {
            spells,
            conditions,
            ..Default::default()
        };
        for item in items {
            catalog.insert_item(item);
        }
        catalog
    }

    pub fn builtin() -> Self {
        Self::new(tables::items(), tables::spells(), tables::conditions())
    }

    /// 同名（不区分大小写）条目会被替换
    pub fn insert_item(&mut self, item: Item) {
        match self.by_name.get(&key(&item.name)) {
            Some(&i) => self.items[i] = item,
            None => {
                self.by_name.insert(key(&item.name), self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn insert_spell(&mut self, spell: SpellTemplate) {
        let k = key(&spell.name);
        match self.spells.iter_mut().find(|s| key(&s.name) == k) {
            Some(existing) => *existing = spell,
            None => self.spells.push(spell),
        }
    }

    /// 合并自制内容，返回新增/替换的条目数
    pub fn extend(&mut self, homebrew: &HomebrewList) -> usize {
        for entry in &homebrew.items {
            self.insert_item(Item::from(entry));
        }
        for spell in &homebrew.spells {
            self.insert_spell(spell.clone());
        }
        homebrew.items.len() + homebrew.spells.len()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn spells(&self) -> &[SpellTemplate] {
        &self.spells
    }

    pub fn find(&self, name: &str) -> Option<&Item> {
        self.by_name.get(&key(name)).map(|&i| &self.items[i])
    }

    pub fn spell(&self, name: &str) -> Option<&SpellTemplate> {
        let k = key(name);
        self.spells.iter().find(|s| key(&s.name) == k)
    }

    pub fn condition_template(&self, name: &str) -> Option<&ConditionTemplate> {
        let k = key(name);
        self.conditions.iter().find(|c| key(&c.name) == k)
    }

    /// 名字 → 物品。顺序：法术前缀、雇工前缀、目录查找、兜底杂物。
    pub fn resolve(&self, name: &str) -> Item {
        if let Some(spell) = name.strip_prefix(SPELL_PREFIX) {
            let spell = spell.trim();
            return Item {
                name: spell.to_string(),
                kind: ItemKind::Spell,
                slots: 1,
                width: 1,
                height: 1,
                usage: Some(Usage::new(SPELL_USES)),
                description: self.spell(spell).map(|t| t.description.clone()),
            };
        }

        if name.starts_with(HIRELING_PREFIX) {
            return Item::gear(name).with_description(HIRELING_NOTE);
        }

        // Clone 出来的是新副本，usage 不会和目录里的模板共享
        match self.find(name) {
            Some(template) => template.clone(),
            None => Item::gear(name),
        }
    }

    /// 状态物品：1×1，描述取状态效果
    pub fn condition(&self, name: &str) -> Item {
        match self.condition_template(name) {
            Some(t) => Item::condition(t.name.clone()).with_description(t.effect.clone()),
            None => Item::condition(name),
        }
    }
}
