use thiserror::Error;

use super::components::Cell;

/// 容器不变量被破坏。正常操作不会产生，只在读入外部记录时出现。
#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("items #{first} and #{second} overlap at {cell}")]
    Overlap {
        first: usize,
        second: usize,
        cell: Cell,
    },
    #[error("item #{index} ({name}) covers {cell}, outside the {rows}x{cols} grid")]
    OutOfBounds {
        index: usize,
        name: String,
        cell: Cell,
        rows: usize,
        cols: usize,
    },
    #[error("item #{index} ({name}) has an empty footprint")]
    EmptyFootprint { index: usize, name: String },
}
