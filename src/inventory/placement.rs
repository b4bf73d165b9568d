//! 放置 / 旋转 / 移动
//!
//! 首次适配：按行优先扫描锚点，原方向找不到再试旋转后的方向。
//! 不追求最紧凑的摆法，同样的输入永远得到同样的位置。

use super::components::{Cell, Item, PlacedItem};
use super::grid::Grid;

impl Item {
    /// 宽高互换；正方形物品不变
    pub fn rotated(&self) -> Item {
        Item {
            width: self.height,
            height: self.width,
            ..self.clone()
        }
    }

    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.width, &mut self.height);
    }
}

impl Grid {
    /// 行优先第一个能放下的锚点
    pub fn first_fit(&self, item: &Item) -> Option<Cell> {
        (0..self.rows())
            .flat_map(|r| (0..self.cols()).map(move |c| Cell::new(r, c)))
            .find(|at| self.can_place(*at, item, None))
    }

    /// 先原方向、再旋转方向首次适配；放不下时把物品原样交还
    pub fn place(&mut self, item: Item) -> Result<Cell, Item> {
        if let Some(at) = self.first_fit(&item) {
            self.items.push(PlacedItem::new(item, at));
            self.debug_check();
            return Ok(at);
        }
        let rotated = item.rotated();
        if let Some(at) = self.first_fit(&rotated) {
            self.items.push(PlacedItem::new(rotated, at));
            self.debug_check();
            return Ok(at);
        }
        Err(item)
    }

    /// 只在指定锚点、按给定方向放置
    pub fn place_at(&mut self, item: Item, anchor: Cell) -> Result<(), Item> {
        if !self.can_place(anchor, &item, None) {
            return Err(item);
        }
        self.items.push(PlacedItem::new(item, anchor));
        self.debug_check();
        Ok(())
    }

    /// 把已放置的物品挪到新锚点（方向不变）
    pub fn move_item(&mut self, index: usize, anchor: Cell) -> bool {
        let Some(placed) = self.items.get(index) else {
            return false;
        };
        if !self.can_place(anchor, &placed.item, Some(index)) {
            return false;
        }
        let placed = &mut self.items[index];
        placed.row = anchor.row;
        placed.col = anchor.col;
        self.debug_check();
        true
    }

    /// 原地旋转。原锚点放不下时，只在「原锚点左上一格」到网格右下角的范围里找新位置；
    /// 找不到就保持原状返回 false。
    pub fn rotate_in_place(&mut self, index: usize) -> bool {
        let Some(placed) = self.items.get(index) else {
            return false;
        };
        if placed.item.is_square() {
            return true;
        }

        let rotated = placed.item.rotated();
        let origin = placed.anchor();
        let start_row = origin.row.saturating_sub(1);
        let start_col = origin.col.saturating_sub(1);

        let target = std::iter::once(origin)
            .chain(
                (start_row..self.rows())
                    .flat_map(|r| (start_col..self.cols()).map(move |c| Cell::new(r, c))),
            )
            .find(|at| self.can_place(*at, &rotated, Some(index)));

        let Some(at) = target else {
            return false;
        };
        self.items[index] = PlacedItem::new(rotated, at);
        self.debug_check();
        true
    }

    /// 取出指定下标的物品；下标无效时什么也不做
    pub fn remove(&mut self, index: usize) -> Option<PlacedItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}
