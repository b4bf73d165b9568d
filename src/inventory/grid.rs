//! 固定尺寸网格与占用查询
//!
//! 物品数量很少（一个容器最多六格），碰撞检测直接逐件逐格比较即可。

use super::components::{Cell, Item, PlacedItem};
use super::error::InventoryError;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    pub(crate) items: Vec<PlacedItem>,
}

/// 每格被哪件物品（下标）占用；由当前物品列表即时生成，容器一变就作废
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMap {
    cols: usize,
    cells: Vec<Option<usize>>,
}

impl CellMap {
    pub fn get(&self, cell: Cell) -> Option<usize> {
        if cell.col >= self.cols {
            return None;
        }
        self.cells
            .get(cell.row * self.cols + cell.col)
            .copied()
            .flatten()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        cell.col < self.cols
            && cell.row * self.cols + cell.col < self.cells.len()
            && self.get(cell).is_none()
    }

    /// 按行输出，方便打印
    pub fn rows(&self) -> impl Iterator<Item = &[Option<usize>]> {
        self.cells.chunks(self.cols.max(1))
    }
}

/// 物品放在 anchor 时覆盖的全部格子；溢出的坐标饱和到 usize::MAX，必然越界
pub fn occupied_cells(anchor: Cell, item: &Item) -> impl Iterator<Item = Cell> + '_ {
    (0..item.height).flat_map(move |r| {
        (0..item.width)
            .map(move |c| Cell::new(anchor.row.saturating_add(r), anchor.col.saturating_add(c)))
    })
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            items: Vec::new(),
        }
    }

    /// 用已有的物品列表组装网格，不做校验；需要时调用 check_invariants
    pub fn from_items(rows: usize, cols: usize, items: Vec<PlacedItem>) -> Self {
        Self { rows, cols, items }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<PlacedItem> {
        self.items
    }

    pub fn get(&self, index: usize) -> Option<&PlacedItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// 整个占位都在网格内
    fn fits(&self, anchor: Cell, item: &Item) -> bool {
        item.height <= self.rows
            && item.width <= self.cols
            && anchor.row <= self.rows - item.height
            && anchor.col <= self.cols - item.width
    }

    /// 边界 + 碰撞检查；exclude 用于移动/旋转已放置物品时跳过它自己
    pub fn can_place(&self, anchor: Cell, item: &Item, exclude: Option<usize>) -> bool {
        if item.width == 0 || item.height == 0 {
            return false;
        }
        if !self.fits(anchor, item) {
            return false;
        }
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .all(|(_, other)| !occupied_cells(anchor, item).any(|c| other.covers(c)))
    }

    /// 哪件物品占着这一格
    pub fn occupant(&self, cell: Cell) -> Option<usize> {
        self.items.iter().position(|p| p.covers(cell))
    }

    pub fn cell_map(&self) -> CellMap {
        let mut cells = vec![None; self.rows * self.cols];
        for (i, placed) in self.items.iter().enumerate() {
            if !self.fits(placed.anchor(), &placed.item) {
                continue;
            }
            for c in occupied_cells(placed.anchor(), &placed.item) {
                cells[c.row * self.cols + c.col] = Some(i);
            }
        }
        CellMap {
            cols: self.cols,
            cells,
        }
    }

    /// 发现重叠或越界说明有人绕过了引擎直接改列表，这是程序错误。
    /// 先把每件物品都做完边界检查，再比较重叠。
    pub fn check_invariants(&self) -> Result<(), InventoryError> {
        for (i, placed) in self.items.iter().enumerate() {
            if placed.item.width == 0 || placed.item.height == 0 {
                return Err(InventoryError::EmptyFootprint {
                    index: i,
                    name: placed.item.name.clone(),
                });
            }
            if !self.fits(placed.anchor(), &placed.item) {
                let cell = occupied_cells(placed.anchor(), &placed.item)
                    .find(|c| !self.in_bounds(*c))
                    .unwrap_or(placed.anchor());
                return Err(InventoryError::OutOfBounds {
                    index: i,
                    name: placed.item.name.clone(),
                    cell,
                    rows: self.rows,
                    cols: self.cols,
                });
            }
        }
        for (i, placed) in self.items.iter().enumerate() {
            for (j, other) in self.items.iter().enumerate().skip(i + 1) {
                if let Some(cell) =
                    occupied_cells(placed.anchor(), &placed.item).find(|c| other.covers(*c))
                {
                    return Err(InventoryError::Overlap {
                        first: i,
                        second: j,
                        cell,
                    });
                }
            }
        }
        Ok(())
    }

    /// 一次合法的修改之后调用
    pub(crate) fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "grid invariant violated: {:?}",
            self.check_invariants()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_with(items: &[(Item, Cell)]) -> Grid {
        let placed = items
            .iter()
            .cloned()
            .map(|(item, at)| PlacedItem::new(item, at))
            .collect();
        Grid::from_items(2, 3, placed)
    }

    #[test]
    fn bounds_are_checked_for_every_cell() {
        let grid = Grid::new(2, 3);
        let wide = Item::gear("Pole").with_size(2, 1);
        assert!(grid.can_place(Cell::new(1, 1), &wide, None));
        assert!(!grid.can_place(Cell::new(1, 2), &wide, None));
        assert!(!grid.can_place(Cell::new(2, 0), &Item::gear("Rope"), None));
    }

    #[test]
    fn collision_respects_exclude_index() {
        let grid = pack_with(&[(Item::gear("Tent").with_size(2, 1), Cell::new(0, 0))]);
        let probe = Item::gear("Tent").with_size(2, 1);
        assert!(!grid.can_place(Cell::new(0, 1), &probe, None));
        assert!(grid.can_place(Cell::new(0, 1), &probe, Some(0)));
    }

    #[test]
    fn cell_map_marks_every_covered_cell() {
        let grid = pack_with(&[
            (Item::gear("Tent").with_size(2, 1), Cell::new(0, 1)),
            (Item::gear("Rope"), Cell::new(1, 0)),
        ]);
        let map = grid.cell_map();
        assert_eq!(map.get(Cell::new(0, 0)), None);
        assert_eq!(map.get(Cell::new(0, 1)), Some(0));
        assert_eq!(map.get(Cell::new(0, 2)), Some(0));
        assert_eq!(map.get(Cell::new(1, 0)), Some(1));
        assert!(map.is_free(Cell::new(1, 2)));
        assert!(!map.is_free(Cell::new(5, 5)));
        assert_eq!(map.rows().count(), 2);
    }

    #[test]
    fn invariant_check_reports_overlap_and_out_of_bounds() {
        let overlapping = pack_with(&[
            (Item::gear("Tent").with_size(2, 1), Cell::new(0, 0)),
            (Item::gear("Rope"), Cell::new(0, 1)),
        ]);
        assert!(matches!(
            overlapping.check_invariants(),
            Err(InventoryError::Overlap { first: 0, second: 1, .. })
        ));

        let outside = pack_with(&[(Item::gear("Pole").with_size(2, 1), Cell::new(1, 2))]);
        assert!(matches!(
            outside.check_invariants(),
            Err(InventoryError::OutOfBounds { index: 0, .. })
        ));

        assert!(Grid::new(1, 2).check_invariants().is_ok());
    }

    #[test]
    fn huge_coordinates_are_out_of_bounds_not_overflow() {
        // 后一件物品的坐标在前一件做重叠比较之前就要被拦下
        let grid = pack_with(&[
            (Item::gear("A"), Cell::new(0, 0)),
            (Item::gear("B"), Cell::new(usize::MAX, 0)),
        ]);
        assert!(matches!(
            grid.check_invariants(),
            Err(InventoryError::OutOfBounds { index: 1, .. })
        ));

        let wide = Item::gear("Pole").with_size(usize::MAX, 1);
        assert!(!grid.can_place(Cell::new(0, 1), &wide, None));
        assert!(!grid.can_place(Cell::new(0, usize::MAX), &Item::gear("Rope"), None));
        assert_eq!(grid.occupant(Cell::new(usize::MAX, 0)), Some(1));
        assert_eq!(grid.cell_map().get(Cell::new(1, 0)), None);
    }
}
