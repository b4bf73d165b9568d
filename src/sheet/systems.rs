use bevy::prelude::*;

use super::components::*;
use super::events::*;
use crate::core::events::LogEvent;
use crate::core::resources::SheetConfig;
use crate::data::catalog::Catalog;
use crate::inventory::components::Inventory;
use crate::inventory::systems::describe;
use crate::inventory::transfer::Landing;

/// 进入游戏时按配置生成角色卡
pub fn spawn_roster(
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    config: Res<SheetConfig>,
    catalog: Res<Catalog>,
) {
    for entry in &config.roster {
        let sheet = Sheet::new(entry.name.clone(), entry.role);
        let mut inventory = Inventory::new(entry.role);
        let mut log = ActivityLog::default();

        let items: Vec<_> = entry.loadout.iter().map(|name| catalog.resolve(name)).collect();
        let names: Vec<_> = items.iter().map(|i| i.name.clone()).collect();
        for (name, landing) in names.iter().zip(equip_loadout(&mut inventory, items)) {
            if landing == Landing::Ground {
                log.push(format!("{name} doesn't fit - placed on ground."));
            }
        }

        info!(sheet = %sheet.name, role = ?sheet.role, items = names.len(), "sheet spawned");
        roster.0.push(commands.spawn((sheet, inventory, log)).id());
    }
}

pub fn deposit_item(
    mut ev_deposit: EventReader<DepositItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut bank: ResMut<Bank>,
    mut sheets: Query<(&Sheet, &mut Inventory, &mut ActivityLog)>,
) {
    for ev in ev_deposit.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let Some(item) = inv.take(ev.at) else {
            out.write(LogEvent(format!("该位置没有物品: {:?}", ev.at)));
            continue;
        };
        let line = format!("Deposited {} in the bank.", item.name);
        bank.deposit(item);
        out.write(LogEvent(format!("[{}] {line}", sheet.name)));
        log.push(line);
    }
}

pub fn withdraw_item(
    mut ev_withdraw: EventReader<WithdrawItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut bank: ResMut<Bank>,
    mut sheets: Query<(&Sheet, &mut Inventory, &mut ActivityLog)>,
) {
    for ev in ev_withdraw.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let Some(item) = bank.withdraw(ev.index) else {
            out.write(LogEvent(format!("银行里没有第 {} 件物品", ev.index)));
            continue;
        };
        let line = format!("Took {} from the bank.", item.name);
        inv.push_ground(item);
        out.write(LogEvent(format!("[{}] {line}", sheet.name)));
        log.push(line);
    }
}

pub fn bank_pips(
    mut ev_pips: EventReader<BankPipsEvent>,
    mut out: EventWriter<LogEvent>,
    mut bank: ResMut<Bank>,
) {
    for ev in ev_pips.read() {
        let amount = u32::try_from(ev.amount.unsigned_abs()).unwrap_or(u32::MAX);
        if ev.amount >= 0 {
            bank.deposit_pips(amount);
            out.write(LogEvent(format!("存入 {amount}p，余额 {}p", bank.pips)));
        } else {
            match bank.withdraw_pips(amount) {
                Some(fee) => {
                    out.write(LogEvent(format!(
                        "取出 {amount}p（手续费 {fee}p），余额 {}p",
                        bank.pips
                    )));
                }
                None => {
                    out.write(LogEvent(format!(
                        "余额不足：需要 {}p，只有 {}p",
                        amount.saturating_add(Bank::withdrawal_fee(amount)),
                        bank.pips
                    )));
                }
            }
        }
    }
}

pub fn show_bank(
    mut ev_show: EventReader<ShowBankEvent>,
    mut out: EventWriter<LogEvent>,
    bank: Res<Bank>,
) {
    if ev_show.is_empty() {
        return;
    }
    ev_show.clear();

    let mut lines = vec![format!("=== Bank: {}p ===", bank.pips)];
    lines.extend(
        bank.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("  #{i} {}", describe(item))),
    );
    if bank.items.is_empty() {
        lines.push("  (empty)".into());
    }
    out.write(LogEvent(lines.join("\n")));
}
