use bevy::prelude::*;

use crate::inventory::transfer::Location;

/// 把物品寄存到银行
#[derive(Event, Debug, Clone)]
pub struct DepositItemEvent {
    pub sheet: Entity,
    pub at: Location,
}

/// 从银行取出物品，落在角色卡地面
#[derive(Event, Debug, Clone)]
pub struct WithdrawItemEvent {
    pub sheet: Entity,
    pub index: usize,
}

/// 存入（正数）或取出（负数）硬币
#[derive(Event, Debug, Clone)]
pub struct BankPipsEvent {
    pub amount: i64,
}

/// 打印银行内容
#[derive(Event, Debug, Clone)]
pub struct ShowBankEvent;
