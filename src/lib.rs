//! Pawprint：鼠族 TTRPG 角色卡的空间物品栏引擎
//!
//! `inventory` 与 `data::catalog` 是纯逻辑，不依赖任何系统调度；
//! 其余模块把它们包装成 Bevy 插件。

pub mod core;
pub mod data;
pub mod interface;
pub mod inventory;
pub mod sheet;
