use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::grid::Grid;

// 各容器尺寸（行 × 列），固定约定，不可配置
pub const PAW_ROWS: usize = 1;
pub const PAW_COLS: usize = 2;
pub const BODY_ROWS: usize = 1;
pub const BODY_COLS: usize = 2;
pub const PACK_ROWS: usize = 2;
pub const PACK_COLS: usize = 3;
pub const HIRELING_PACK_ROWS: usize = 1;
pub const HIRELING_PACK_COLS: usize = 2;

/// 物品类别；只有武器带伤害、只有护甲带防御
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Weapon {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        damage: String,
    },
    Armour {
        #[serde(default)]
        defence: u32,
    },
    Gear,
    Spell,
    Condition,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Weapon { .. } => "weapon",
            ItemKind::Armour { .. } => "armour",
            ItemKind::Gear => "gear",
            ItemKind::Spell => "spell",
            ItemKind::Condition => "condition",
        }
    }
}

/// 使用点（usage dots）：0 ≤ used ≤ total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UsageRecord")]
pub struct Usage {
    total: u32,
    used: u32,
}

#[derive(Deserialize)]
struct UsageRecord {
    total: u32,
    #[serde(default)]
    used: u32,
}

impl From<UsageRecord> for Usage {
    fn from(r: UsageRecord) -> Self {
        Self {
            total: r.total,
            used: r.used.min(r.total),
        }
    }
}

impl Usage {
    pub fn new(total: u32) -> Self {
        Self { total, used: 0 }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn is_depleted(&self) -> bool {
        self.used >= self.total
    }

    /// 标记一个点；已用尽返回 false
    pub fn mark(&mut self) -> bool {
        if self.is_depleted() {
            return false;
        }
        self.used += 1;
        true
    }

    /// 擦掉一个点；没有可擦的返回 false
    pub fn clear(&mut self) -> bool {
        if self.used == 0 {
            return false;
        }
        self.used -= 1;
        true
    }
}

/// 一件具体物品。Clone 得到的是独立副本（包括 usage）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    /// 逻辑占格数，通常等于 width*height 但不总是
    pub slots: u32,
    pub width: usize,
    pub height: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    /// 最小的 1×1 杂物
    pub fn gear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Gear,
            slots: 1,
            width: 1,
            height: 1,
            usage: None,
            description: None,
        }
    }

    pub fn condition(name: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Condition,
            ..Self::gear(name)
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_usage(mut self, total: u32) -> Self {
        self.usage = Some(Usage::new(total));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn is_condition(&self) -> bool {
        matches!(self.kind, ItemKind::Condition)
    }

    pub fn damage(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Weapon { damage } if !damage.is_empty() => Some(damage),
            _ => None,
        }
    }

    pub fn defence(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Armour { defence } => Some(defence),
            _ => None,
        }
    }
}

/// 网格坐标，锚点指物品左上角
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 放进某个容器的物品，占据 [row,row+height) × [col,col+width)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub item: Item,
    pub row: usize,
    pub col: usize,
}

impl PlacedItem {
    pub fn new(item: Item, anchor: Cell) -> Self {
        Self {
            item,
            row: anchor.row,
            col: anchor.col,
        }
    }

    pub fn anchor(&self) -> Cell {
        Cell::new(self.row, self.col)
    }

    /// 读入的坐标可能任意大，只做减法比较
    pub fn covers(&self, cell: Cell) -> bool {
        cell.row >= self.row
            && cell.row - self.row < self.item.height
            && cell.col >= self.col
            && cell.col - self.col < self.item.width
    }
}

/// 角色卡上的三个容器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKind {
    Paw,
    Body,
    Pack,
}

impl GridKind {
    pub const ALL: [GridKind; 3] = [GridKind::Paw, GridKind::Body, GridKind::Pack];
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GridKind::Paw => "paw",
            GridKind::Body => "body",
            GridKind::Pack => "pack",
        })
    }
}

impl FromStr for GridKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paw" | "paws" => Ok(GridKind::Paw),
            "body" => Ok(GridKind::Body),
            "pack" => Ok(GridKind::Pack),
            other => Err(format!("unknown grid: {other}")),
        }
    }
}

/// 角色卡类型，决定背包尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetRole {
    #[default]
    Character,
    Hireling,
    Npc,
}

impl SheetRole {
    pub fn pack_size(self) -> (usize, usize) {
        match self {
            SheetRole::Character => (PACK_ROWS, PACK_COLS),
            SheetRole::Hireling | SheetRole::Npc => (HIRELING_PACK_ROWS, HIRELING_PACK_COLS),
        }
    }
}

/// 一张卡的全部装备：爪、身、背包各一格网，外加不限量的地面
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Inventory {
    pub(crate) paw: Grid,
    pub(crate) body: Grid,
    pub(crate) pack: Grid,
    pub(crate) ground: Vec<Item>,
}

impl Inventory {
    pub fn new(role: SheetRole) -> Self {
        let (pack_rows, pack_cols) = role.pack_size();
        Self {
            paw: Grid::new(PAW_ROWS, PAW_COLS),
            body: Grid::new(BODY_ROWS, BODY_COLS),
            pack: Grid::new(pack_rows, pack_cols),
            ground: Vec::new(),
        }
    }

    pub fn grid(&self, kind: GridKind) -> &Grid {
        match kind {
            GridKind::Paw => &self.paw,
            GridKind::Body => &self.body,
            GridKind::Pack => &self.pack,
        }
    }

    pub fn grid_mut(&mut self, kind: GridKind) -> &mut Grid {
        match kind {
            GridKind::Paw => &mut self.paw,
            GridKind::Body => &mut self.body,
            GridKind::Pack => &mut self.pack,
        }
    }

    pub fn ground(&self) -> &[Item] {
        &self.ground
    }

    /// 直接丢到地面
    pub fn push_ground(&mut self, item: Item) {
        self.ground.push(item);
    }

    /// 地面有东西即视为超重
    pub fn is_encumbered(&self) -> bool {
        !self.ground.is_empty()
    }

    pub fn item_count(&self) -> usize {
        GridKind::ALL
            .iter()
            .map(|k| self.grid(*k).len())
            .sum::<usize>()
            + self.ground.len()
    }
}
