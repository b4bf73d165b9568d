use std::fmt::Write;

use bevy::prelude::*;

use super::components::{GridKind, Inventory, Item};
use super::events::*;
use super::transfer::{Landing, Location, TransferOutcome};
use crate::core::events::LogEvent;
use crate::data::catalog::Catalog;
use crate::sheet::components::{ActivityLog, Roster, Sheet};

type Sheets<'w, 's> = Query<'w, 's, (&'static Sheet, &'static mut Inventory, &'static mut ActivityLog)>;

/// 写进卡片日志，同时转发给控制台
fn note(out: &mut EventWriter<LogEvent>, sheet: &Sheet, log: &mut ActivityLog, line: String) {
    out.write(LogEvent(format!("[{}] {line}", sheet.name)));
    log.push(line);
}

fn missing(out: &mut EventWriter<LogEvent>, at: Location) {
    out.write(LogEvent(format!("该位置没有物品: {at:?}")));
}

/// 处理 give：解析名字后放进背包
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
    catalog: Res<Catalog>,
) {
    for ev in ev_give.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            warn!("未找到角色卡 {:?}", ev.sheet);
            continue;
        };
        let item = catalog.resolve(&ev.name);
        let name = item.name.clone();
        let line = match inv.stow(item) {
            Landing::Grid(kind, at) => format!("Received {name} ({kind} {at})."),
            Landing::Ground => format!("Received {name} - no room in pack, placed on ground."),
        };
        info!(sheet = %sheet.name, item = %name, "give");
        note(&mut out, sheet, &mut log, line);
    }
}

/// 拖放
pub fn transfer_item(
    mut ev_transfer: EventReader<TransferItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_transfer.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let outcome = inv.transfer(ev.from, ev.to);
        if let Some(line) = outcome.message() {
            note(&mut out, sheet, &mut log, line);
        }
        match outcome {
            TransferOutcome::Ignored => {
                out.write(LogEvent("没有任何变化".into()));
            }
            TransferOutcome::Moved(landing) => {
                out.write(LogEvent(format!("moved to {landing:?}")));
            }
            TransferOutcome::Swapped {
                incoming,
                displaced,
                displaced_name,
            } => {
                out.write(LogEvent(format!(
                    "moved to {incoming:?}, {displaced_name} → {displaced:?}"
                )));
            }
            TransferOutcome::NoFit { .. } => {}
        }
    }
}

pub fn rotate_item(
    mut ev_rotate: EventReader<RotateItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_rotate.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let Some(name) = inv.item(ev.at).map(|i| i.name.clone()) else {
            missing(&mut out, ev.at);
            continue;
        };
        if inv.rotate(ev.at) {
            out.write(LogEvent(format!("{name} rotated")));
        } else {
            note(&mut out, sheet, &mut log, format!("No room to rotate {name}."));
        }
    }
}

pub fn discard_item(
    mut ev_discard: EventReader<DiscardItemEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_discard.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        match inv.discard(ev.at) {
            Some(item) => note(&mut out, sheet, &mut log, format!("Discarded {}.", item.name)),
            None => missing(&mut out, ev.at),
        }
    }
}

pub fn mark_usage(
    mut ev_mark: EventReader<MarkUsageEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_mark.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let Some(item) = inv.item_mut(ev.at) else {
            missing(&mut out, ev.at);
            continue;
        };
        let name = item.name.clone();
        let Some(usage) = item.usage.as_mut() else {
            out.write(LogEvent(format!("{name} 没有使用点")));
            continue;
        };
        let changed = if ev.clear { usage.clear() } else { usage.mark() };
        let usage = *usage;
        if !changed {
            out.write(LogEvent(format!("{name}: {}/{} 未变化", usage.used(), usage.total())));
            continue;
        }
        let line = if usage.is_depleted() {
            format!("{name} is used up ({}/{}).", usage.used(), usage.total())
        } else {
            format!("{name}: {}/{} used.", usage.used(), usage.total())
        };
        note(&mut out, sheet, &mut log, line);
    }
}

/// 状态占背包格；背包满了就落地
pub fn add_condition(
    mut ev_condition: EventReader<AddConditionEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
    catalog: Res<Catalog>,
) {
    for ev in ev_condition.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        let condition = catalog.condition(&ev.name);
        let name = condition.name.clone();
        let line = match inv.add_condition(condition) {
            Ok(_) => format!("Gained condition: {name}."),
            Err(condition) => {
                inv.push_ground(condition);
                format!("Gained condition: {name} - pack is full, placed on ground.")
            }
        };
        note(&mut out, sheet, &mut log, line);
    }
}

pub fn full_rest(
    mut ev_rest: EventReader<FullRestEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_rest.read() {
        let Ok((sheet, mut inv, mut log)) = sheets.get_mut(ev.sheet) else {
            continue;
        };
        note(&mut out, sheet, &mut log, "Fully rested.".into());
        for condition in inv.clear_conditions() {
            note(&mut out, sheet, &mut log, format!("Cleared condition: {}", condition.name));
        }
    }
}

/// 转交：从一张卡取下，放到另一张卡的地面
pub fn hand_over(
    mut ev_hand_over: EventReader<HandOverEvent>,
    mut out: EventWriter<LogEvent>,
    mut sheets: Sheets,
) {
    for ev in ev_hand_over.read() {
        let Ok([(from, mut from_inv, mut from_log), (to, mut to_inv, mut to_log)]) =
            sheets.get_many_mut([ev.from, ev.to])
        else {
            out.write(LogEvent("无法转交：需要两张不同的角色卡".into()));
            continue;
        };
        let Some(item) = from_inv.take(ev.at) else {
            missing(&mut out, ev.at);
            continue;
        };
        let name = item.name.clone();
        to_inv.push_ground(item);
        note(&mut out, from, &mut from_log, format!("Gave {name} to {}.", to.name));
        note(&mut out, to, &mut to_log, format!("Received {name} from {}.", from.name));
    }
}

/// 打印一张卡的全部网格与地面
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    mut out: EventWriter<LogEvent>,
    sheets: Query<(&Sheet, &Inventory)>,
) {
    for ev in ev_list.read() {
        match sheets.get(ev.sheet) {
            Ok((sheet, inv)) => {
                out.write(LogEvent(report(sheet, inv)));
            }
            Err(_) => {
                out.write(LogEvent("未找到角色卡".into()));
            }
        }
    }
}

/// 读入存档：同名卡替换类型、库存和日志，否则生成新卡
pub fn import_sheet(
    mut ev_import: EventReader<ImportSheetEvent>,
    mut out: EventWriter<LogEvent>,
    mut commands: Commands,
    mut roster: ResMut<Roster>,
    mut sheets: Query<(&mut Sheet, &mut Inventory, &mut ActivityLog)>,
) {
    for ev in ev_import.read() {
        let record = ev.record.clone();
        let inventory = match Inventory::from_record(record.inventory, record.role) {
            Ok(inventory) => inventory,
            Err(err) => {
                warn!("sheet {} rejected: {err}", record.name);
                out.write(LogEvent(format!("无法读入 {}: {err}", record.name)));
                continue;
            }
        };
        let log = ActivityLog(record.log);

        let existing = roster
            .0
            .iter()
            .copied()
            .find(|e| sheets.get(*e).is_ok_and(|(s, ..)| s.name == record.name));
        match existing.and_then(|e| sheets.get_mut(e).ok()) {
            Some((mut sheet, mut inv, mut old_log)) => {
                // 背包尺寸跟着类型走，两者必须一起换
                sheet.role = record.role;
                *inv = inventory;
                *old_log = log;
                info!(sheet = %record.name, "sheet replaced");
            }
            None => {
                let sheet = Sheet::new(record.name.clone(), record.role);
                let entity = commands.spawn((sheet, inventory, log)).id();
                roster.0.push(entity);
                info!(sheet = %record.name, "sheet imported");
            }
        }
        out.write(LogEvent(format!("已读入 {}", record.name)));
    }
}

/* ---------------------------- 文本输出 ---------------------------- */

pub fn describe(item: &Item) -> String {
    let mut s = format!(
        "{} [{}] {}x{}",
        item.name,
        item.kind.label(),
        item.width,
        item.height
    );
    if let Some(damage) = item.damage() {
        let _ = write!(s, " dmg {damage}");
    }
    if let Some(defence) = item.defence() {
        let _ = write!(s, " def {defence}");
    }
    if let Some(usage) = item.usage {
        let _ = write!(s, " ({}/{})", usage.used(), usage.total());
    }
    s
}

pub fn report(sheet: &Sheet, inv: &Inventory) -> String {
    let mut s = format!("=== {} ({:?}) ===", sheet.name, sheet.role);
    for kind in GridKind::ALL {
        let grid = inv.grid(kind);
        let _ = write!(s, "\n{kind} {}x{}", grid.rows(), grid.cols());
        for row in grid.cell_map().rows() {
            let cells: Vec<String> = row
                .iter()
                .map(|c| c.map_or_else(|| ".".to_string(), |i| i.to_string()))
                .collect();
            let _ = write!(s, "\n  | {} |", cells.join(" "));
        }
        for (i, placed) in grid.items().iter().enumerate() {
            let _ = write!(s, "\n  #{i} {} @{}", describe(&placed.item), placed.anchor());
        }
    }
    let _ = write!(s, "\nground ({})", inv.ground().len());
    for (i, item) in inv.ground().iter().enumerate() {
        let _ = write!(s, "\n  #{i} {}", describe(item));
    }
    if inv.is_encumbered() {
        s.push_str("\n** encumbered **");
    }
    s
}
