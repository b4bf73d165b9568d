//! 容器之间（含地面）的搬运与交换
//!
//! 目标格被占时把原物品挤开：新物品只尝试目标锚点，被挤开的物品回到自己的容器
//! 重新首次适配，还放不下就落到地面。任何一步都不会让物品凭空消失。
//! 所有步骤在一份副本上完成，全部落定后才整体替换，调用方不会看到做了一半的交换。

use bevy::log::debug;

use super::components::{Cell, GridKind, Inventory, Item};

/// 物品当前所在位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Grid(GridKind, usize),
    Ground(usize),
}

impl Location {
    fn index(self) -> usize {
        match self {
            Location::Grid(_, i) | Location::Ground(i) => i,
        }
    }

    fn same_list(self, other: Location) -> bool {
        match (self, other) {
            (Location::Grid(a, _), Location::Grid(b, _)) => a == b,
            (Location::Ground(_), Location::Ground(_)) => true,
            _ => false,
        }
    }
}

/// 拖放目标：某个网格的某一格，或地面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Cell(GridKind, Cell),
    Ground,
}

/// 物品最后落在哪
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Grid(GridKind, Cell),
    Ground,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 来源无效、目标越界或拖到自己身上，什么都没变
    Ignored,
    Moved(Landing),
    Swapped {
        incoming: Landing,
        displaced: Landing,
        displaced_name: String,
    },
    /// 空格放不下（两个方向都试过），物品改放地面
    NoFit { name: String },
}

impl TransferOutcome {
    /// 需要写进活动日志的提示
    pub fn message(&self) -> Option<String> {
        match self {
            TransferOutcome::NoFit { name } => {
                Some(format!("{name} doesn't fit there - moved to ground."))
            }
            TransferOutcome::Swapped {
                displaced: Landing::Ground,
                displaced_name,
                ..
            } => Some(format!("{displaced_name} was pushed to the ground.")),
            _ => None,
        }
    }
}

impl Inventory {
    pub fn item(&self, at: Location) -> Option<&Item> {
        match at {
            Location::Grid(kind, i) => self.grid(kind).get(i).map(|p| &p.item),
            Location::Ground(i) => self.ground.get(i),
        }
    }

    /// 只允许改 usage、描述等；改动宽高会破坏网格不变量，请用 rotate
    pub fn item_mut(&mut self, at: Location) -> Option<&mut Item> {
        match at {
            Location::Grid(kind, i) => self.grid_mut(kind).items.get_mut(i).map(|p| &mut p.item),
            Location::Ground(i) => self.ground.get_mut(i),
        }
    }

    /// 从所在容器取下物品，交给调用方（例如转交给另一张卡）
    pub fn take(&mut self, at: Location) -> Option<Item> {
        match at {
            Location::Grid(kind, i) => self.grid_mut(kind).remove(i).map(|p| p.item),
            Location::Ground(i) => (i < self.ground.len()).then(|| self.ground.remove(i)),
        }
    }

    /// 显式丢弃，是物品被销毁的唯一途径
    pub fn discard(&mut self, at: Location) -> Option<Item> {
        self.take(at)
    }

    /// 同一列表里先删下标大的，避免第二次删除时下标错位
    fn take_pair(&mut self, first: Location, second: Location) -> Option<(Item, Item)> {
        if first.same_list(second) && second.index() > first.index() {
            let b = self.take(second)?;
            let a = self.take(first)?;
            Some((a, b))
        } else {
            let a = self.take(first)?;
            let b = self.take(second)?;
            Some((a, b))
        }
    }

    pub fn transfer(&mut self, from: Location, to: DropTarget) -> TransferOutcome {
        if self.item(from).is_none() {
            return TransferOutcome::Ignored;
        }

        let outcome = match to {
            DropTarget::Ground => self.drop_to_ground(from),
            DropTarget::Cell(kind, cell) => {
                let grid = self.grid(kind);
                if cell.row >= grid.rows() || cell.col >= grid.cols() {
                    return TransferOutcome::Ignored;
                }
                match grid.occupant(cell) {
                    Some(i) if from == Location::Grid(kind, i) => TransferOutcome::Ignored,
                    Some(i) => self.swap_into(from, kind, i),
                    None => self.drop_on_empty(from, kind, cell),
                }
            }
        };
        debug!(?from, ?to, ?outcome, "transfer");
        outcome
    }

    fn drop_to_ground(&mut self, from: Location) -> TransferOutcome {
        if matches!(from, Location::Ground(_)) {
            return TransferOutcome::Ignored;
        }
        match self.take(from) {
            Some(item) => {
                self.ground.push(item);
                TransferOutcome::Moved(Landing::Ground)
            }
            None => TransferOutcome::Ignored,
        }
    }

    fn swap_into(&mut self, from: Location, kind: GridKind, occupant: usize) -> TransferOutcome {
        let mut next = self.clone();
        let anchor = next.grid(kind).items[occupant].anchor();
        let Some((displaced, incoming)) = next.take_pair(Location::Grid(kind, occupant), from)
        else {
            return TransferOutcome::Ignored;
        };
        let displaced_name = displaced.name.clone();

        // 新物品只试目标锚点，不旋转
        let incoming = match next.grid_mut(kind).place_at(incoming, anchor) {
            Ok(()) => Landing::Grid(kind, anchor),
            Err(item) => {
                next.ground.push(item);
                Landing::Ground
            }
        };
        // 被挤走的物品回到目标容器，不回到来源容器
        let displaced = match next.grid_mut(kind).place(displaced) {
            Ok(at) => Landing::Grid(kind, at),
            Err(item) => {
                next.ground.push(item);
                Landing::Ground
            }
        };

        *self = next;
        TransferOutcome::Swapped {
            incoming,
            displaced,
            displaced_name,
        }
    }

    fn drop_on_empty(&mut self, from: Location, kind: GridKind, cell: Cell) -> TransferOutcome {
        let mut next = self.clone();
        let Some(item) = next.take(from) else {
            return TransferOutcome::Ignored;
        };

        let grid = next.grid_mut(kind);
        let result = match grid.place_at(item, cell) {
            Ok(()) => Ok(()),
            Err(item) => {
                let rotated = item.rotated();
                grid.place_at(rotated, cell).map_err(|_| item)
            }
        };
        let outcome = match result {
            Ok(()) => TransferOutcome::Moved(Landing::Grid(kind, cell)),
            Err(item) => {
                let name = item.name.clone();
                next.ground.push(item);
                TransferOutcome::NoFit { name }
            }
        };

        *self = next;
        outcome
    }

    /// 网格里走原地旋转规则；地面上的物品没有约束，直接旋转
    pub fn rotate(&mut self, at: Location) -> bool {
        match at {
            Location::Grid(kind, i) => self.grid_mut(kind).rotate_in_place(i),
            Location::Ground(i) => match self.ground.get_mut(i) {
                Some(item) => {
                    item.rotate();
                    true
                }
                None => false,
            },
        }
    }

    /// 放进背包（首次适配），放不下原样交还
    pub fn add_to_pack(&mut self, item: Item) -> Result<Cell, Item> {
        self.pack.place(item)
    }

    /// 状态（condition）也占背包格
    pub fn add_condition(&mut self, condition: Item) -> Result<Cell, Item> {
        self.pack.place(condition)
    }

    /// 背包放不下就丢地面
    pub fn stow(&mut self, item: Item) -> Landing {
        match self.pack.place(item) {
            Ok(at) => Landing::Grid(GridKind::Pack, at),
            Err(item) => {
                self.ground.push(item);
                Landing::Ground
            }
        }
    }

    /// 完整休息：取下网格和地面上的所有状态物品并交给调用方处理
    pub fn clear_conditions(&mut self) -> Vec<Item> {
        let mut cleared = Vec::new();
        for kind in GridKind::ALL {
            let grid = self.grid_mut(kind);
            let (conditions, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut grid.items)
                .into_iter()
                .partition(|p| p.item.is_condition());
            grid.items = kept;
            cleared.extend(conditions.into_iter().map(|p| p.item));
        }
        // 背包满时状态会落地
        let (conditions, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.ground)
            .into_iter()
            .partition(Item::is_condition);
        self.ground = kept;
        cleared.extend(conditions);
        cleared
    }
}
