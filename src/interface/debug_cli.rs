//! 文字 CLI：读取 stdin → 解析命令 → 发送事件

use anyhow::Context;
use bevy::app::AppExit;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::core::{events::LogEvent, states::AppState};
use crate::data::catalog::Catalog;
use crate::inventory::components::{Cell, GridKind, Inventory};
use crate::inventory::events::*;
use crate::inventory::systems::describe;
use crate::inventory::transfer::{DropTarget, Location};
use crate::sheet::components::{ActivityLog, Bank, Roster, Sheet, SheetRecord};
use crate::sheet::events::*;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令；sheet 是序号、名字或 uuid
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按名称 / uuid 查询
    Sheets,
    Give { sheet: String, name: String },
    Inventory { sheet: String },
    Move { sheet: String, from: Location, to: DropTarget },
    Rotate { sheet: String, at: Location },
    Discard { sheet: String, at: Location },
    Mark { sheet: String, at: Location, clear: bool },
    Condition { sheet: String, name: String },
    Rest { sheet: String },
    HandOver { from: String, at: Location, to: String },
    Deposit { sheet: String, at: Location },
    Withdraw { sheet: String, index: usize },
    Bank,
    Pips(i64),
    Load(String),
    Dump { sheet: String, path: Option<String> },
    Invalid(String),
    Unsupported(String),
}

/// CLI 会发出的所有事件
#[derive(SystemParam)]
struct SheetCommands<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    transfer: EventWriter<'w, TransferItemEvent>,
    rotate: EventWriter<'w, RotateItemEvent>,
    discard: EventWriter<'w, DiscardItemEvent>,
    mark: EventWriter<'w, MarkUsageEvent>,
    condition: EventWriter<'w, AddConditionEvent>,
    rest: EventWriter<'w, FullRestEvent>,
    hand_over: EventWriter<'w, HandOverEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    import: EventWriter<'w, ImportSheetEvent>,
    deposit: EventWriter<'w, DepositItemEvent>,
    withdraw: EventWriter<'w, WithdrawItemEvent>,
    pips: EventWriter<'w, BankPipsEvent>,
    bank: EventWriter<'w, ShowBankEvent>,
}

const HELP: &str = "命令列表:
  help                          查看帮助
  status                        查看当前状态
  exit / quit                   退出程序
  items [token]                 列出物品 / 用名称或 uuid 查询
  sheets                        列出角色卡（序号可代替名字）
  give <sheet> <name...>        按名字解析物品并放进背包
  inv <sheet>                   查看物品栏
  move <sheet> <loc> <target>   拖放，例如 move 0 ground:0 pack:0,1
  rotate <sheet> <loc>          旋转
  discard <sheet> <loc>         丢弃（销毁）
  mark / clear <sheet> <loc>    标记 / 擦除一个使用点
  condition <sheet> <name...>   获得状态
  rest <sheet>                  完整休息，清除状态
  handover <from> <loc> <to>    把物品交给另一张卡
  deposit <sheet> <loc>         寄存到银行
  withdraw <sheet> <index>      从银行取出
  bank                          查看银行
  pips <n>                      存入（负数为取出，1% 手续费）
  load <path.json>              读入角色卡存档（旧格式自动迁移）
  dump <sheet> [path.json]      导出角色卡
位置 <loc>: paw:0 / body:0 / pack:1 / ground:0
目标 <target>: paw:0,1 / pack:1,2 / ground";

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

#[allow(clippy::too_many_arguments)]
fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    mut next: ResMut<NextState<AppState>>,
    mut events: SheetCommands,
    state: Res<State<AppState>>,
    catalog: Res<Catalog>,
    roster: Res<Roster>,
    bank: Res<Bank>,
    sheets: Query<(&Sheet, &Inventory, &ActivityLog)>,
) {
    let find = |token: &str| -> Option<Entity> {
        if let Ok(i) = token.parse::<usize>() {
            return roster.0.get(i).copied();
        }
        roster
            .0
            .iter()
            .copied()
            .find(|e| sheets.get(*e).is_ok_and(|(s, ..)| s.matches(token)))
    };

    for CliLine(input) in line_reader.read() {
        let command = parse_command(input);

        // 先把名字解析成实体，找不到就报错跳过
        let token = match &command {
            Command::Give { sheet, .. }
            | Command::Inventory { sheet }
            | Command::Move { sheet, .. }
            | Command::Rotate { sheet, .. }
            | Command::Discard { sheet, .. }
            | Command::Mark { sheet, .. }
            | Command::Condition { sheet, .. }
            | Command::Rest { sheet }
            | Command::HandOver { from: sheet, .. }
            | Command::Deposit { sheet, .. }
            | Command::Withdraw { sheet, .. }
            | Command::Dump { sheet, .. } => Some(sheet.as_str()),
            _ => None,
        };
        let entity = match token.map(|t| (t, find(t))) {
            Some((t, None)) => {
                log.write(LogEvent(format!("未找到角色卡: {t}")));
                continue;
            }
            Some((_, e)) => e,
            None => None,
        };
        let sheet = entity.unwrap_or(Entity::PLACEHOLDER);

        match command {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items: {}, Spells: {}, Sheets: {}, Bank: {}p",
                    state.get(),
                    catalog.items().len(),
                    catalog.spells().len(),
                    roster.0.len(),
                    bank.pips
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                next.set(AppState::Shutdown);
                app_exit.write(AppExit::Success);
            }

            Command::Items(token) => match token {
                None => {
                    // 全部列出
                    for item in catalog.items() {
                        log.write(LogEvent(format!(
                            "{} | {}",
                            item_uuid(&item.name),
                            describe(item)
                        )));
                    }
                }
                Some(t) => {
                    let t_low = t.to_lowercase();
                    let hit = catalog
                        .find(&t)
                        .or_else(|| catalog.items().iter().find(|i| item_uuid(&i.name).to_string() == t_low));
                    match hit {
                        Some(item) => {
                            log.write(LogEvent(format!(
                                "==================================================
UUID : {}
Item : {}
Slots: {}
Info : {}
==================================================",
                                item_uuid(&item.name),
                                describe(item),
                                item.slots,
                                item.description.as_deref().unwrap_or("-")
                            )));
                        }
                        None => {
                            log.write(LogEvent("未找到匹配物品".into()));
                        }
                    }
                }
            },

            Command::Sheets => {
                for (i, e) in roster.0.iter().enumerate() {
                    if let Ok((s, inv, _)) = sheets.get(*e) {
                        log.write(LogEvent(format!(
                            "[{i}] {} | {:?} | {} | {} items{}",
                            s.name,
                            s.role,
                            s.id,
                            inv.item_count(),
                            if inv.is_encumbered() { " | encumbered" } else { "" }
                        )));
                    }
                }
                if roster.0.is_empty() {
                    log.write(LogEvent("  (no sheets)".into()));
                }
            }

            Command::Give { name, .. } => {
                events.give.write(GiveItemEvent { sheet, name });
            }

            Command::Inventory { .. } => {
                events.list.write(ListInventoryEvent { sheet });
            }

            Command::Move { from, to, .. } => {
                events.transfer.write(TransferItemEvent { sheet, from, to });
            }

            Command::Rotate { at, .. } => {
                events.rotate.write(RotateItemEvent { sheet, at });
            }

            Command::Discard { at, .. } => {
                events.discard.write(DiscardItemEvent { sheet, at });
            }

            Command::Mark { at, clear, .. } => {
                events.mark.write(MarkUsageEvent { sheet, at, clear });
            }

            Command::Condition { name, .. } => {
                events.condition.write(AddConditionEvent { sheet, name });
            }

            Command::Rest { .. } => {
                events.rest.write(FullRestEvent { sheet });
            }

            Command::HandOver { at, to, .. } => match find(&to) {
                Some(to) => {
                    events.hand_over.write(HandOverEvent { from: sheet, at, to });
                }
                None => {
                    log.write(LogEvent(format!("未找到角色卡: {to}")));
                }
            },

            Command::Deposit { at, .. } => {
                events.deposit.write(DepositItemEvent { sheet, at });
            }

            Command::Withdraw { index, .. } => {
                events.withdraw.write(WithdrawItemEvent { sheet, index });
            }

            Command::Bank => {
                events.bank.write(ShowBankEvent);
            }

            Command::Pips(amount) => {
                events.pips.write(BankPipsEvent { amount });
            }

            Command::Load(path) => match read_record(&path) {
                Ok(record) => {
                    events.import.write(ImportSheetEvent { record });
                }
                Err(err) => {
                    warn!("load failed: {err:#}");
                    log.write(LogEvent(format!("读取失败: {err:#}")));
                }
            },

            Command::Dump { path, .. } => {
                let Ok((s, inv, activity)) = sheets.get(sheet) else {
                    continue;
                };
                let record = SheetRecord::capture(s, inv, activity);
                match dump_record(&record, path.as_deref()) {
                    Ok(text) => {
                        log.write(LogEvent(text));
                    }
                    Err(err) => {
                        warn!("dump failed: {err:#}");
                        log.write(LogEvent(format!("导出失败: {err:#}")));
                    }
                }
            }

            Command::Invalid(usage) => {
                log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let args: Vec<&str> = parts.collect();
    let rest = |from: usize| args.get(from..).map(|a| a.join(" ")).unwrap_or_default();
    let sheet = || args.first().map(|s| s.to_string());
    let loc = |i: usize| args.get(i).and_then(|s| parse_location(s));

    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items((!args.is_empty()).then(|| rest(0))),
        "sheets" | "ls" => Command::Sheets,
        "give" => match sheet() {
            Some(sheet) if args.len() > 1 => Command::Give { sheet, name: rest(1) },
            _ => Command::Invalid("give <sheet> <name...>".into()),
        },
        "inventory" | "inv" => match sheet() {
            Some(sheet) => Command::Inventory { sheet },
            None => Command::Invalid("inv <sheet>".into()),
        },
        "move" | "mv" => match (sheet(), loc(1), args.get(2).and_then(|s| parse_target(s))) {
            (Some(sheet), Some(from), Some(to)) => Command::Move { sheet, from, to },
            _ => Command::Invalid("move <sheet> <loc> <target>".into()),
        },
        "rotate" | "rot" => match (sheet(), loc(1)) {
            (Some(sheet), Some(at)) => Command::Rotate { sheet, at },
            _ => Command::Invalid("rotate <sheet> <loc>".into()),
        },
        "discard" => match (sheet(), loc(1)) {
            (Some(sheet), Some(at)) => Command::Discard { sheet, at },
            _ => Command::Invalid("discard <sheet> <loc>".into()),
        },
        "mark" | "clear" => match (sheet(), loc(1)) {
            (Some(sheet), Some(at)) => Command::Mark {
                sheet,
                at,
                clear: cmd == "clear",
            },
            _ => Command::Invalid(format!("{cmd} <sheet> <loc>")),
        },
        "condition" | "cond" => match sheet() {
            Some(sheet) if args.len() > 1 => Command::Condition { sheet, name: rest(1) },
            _ => Command::Invalid("condition <sheet> <name...>".into()),
        },
        "rest" => match sheet() {
            Some(sheet) => Command::Rest { sheet },
            None => Command::Invalid("rest <sheet>".into()),
        },
        "handover" | "hand" => match (sheet(), loc(1), args.get(2)) {
            (Some(from), Some(at), Some(to)) => Command::HandOver {
                from,
                at,
                to: to.to_string(),
            },
            _ => Command::Invalid("handover <from> <loc> <to>".into()),
        },
        "deposit" => match (sheet(), loc(1)) {
            (Some(sheet), Some(at)) => Command::Deposit { sheet, at },
            _ => Command::Invalid("deposit <sheet> <loc>".into()),
        },
        "withdraw" => match (sheet(), args.get(1).and_then(|s| s.parse().ok())) {
            (Some(sheet), Some(index)) => Command::Withdraw { sheet, index },
            _ => Command::Invalid("withdraw <sheet> <index>".into()),
        },
        "bank" => Command::Bank,
        "pips" => match args.first().and_then(|s| s.parse().ok()) {
            Some(amount) => Command::Pips(amount),
            None => Command::Invalid("pips <n>".into()),
        },
        "load" => match args.first() {
            Some(path) => Command::Load(path.to_string()),
            None => Command::Invalid("load <path.json>".into()),
        },
        "dump" => match sheet() {
            Some(sheet) => Command::Dump {
                sheet,
                path: args.get(1).map(|s| s.to_string()),
            },
            None => Command::Invalid("dump <sheet> [path.json]".into()),
        },
        other => Command::Unsupported(other.into()),
    }
}

/// paw:0 / body:1 / pack:2 / ground:0
fn parse_location(token: &str) -> Option<Location> {
    let (kind, index) = token.split_once(':')?;
    let index = index.parse().ok()?;
    match kind.to_ascii_lowercase().as_str() {
        "ground" | "g" => Some(Location::Ground(index)),
        other => Some(Location::Grid(other.parse().ok()?, index)),
    }
}

/// pack:1,2 / ground
fn parse_target(token: &str) -> Option<DropTarget> {
    if token.eq_ignore_ascii_case("ground") || token.eq_ignore_ascii_case("g") {
        return Some(DropTarget::Ground);
    }
    let (kind, cell) = token.split_once(':')?;
    let kind: GridKind = kind.parse().ok()?;
    let (row, col) = cell.split_once(',')?;
    Some(DropTarget::Cell(
        kind,
        Cell::new(row.trim().parse().ok()?, col.trim().parse().ok()?),
    ))
}

fn read_record(path: &str) -> anyhow::Result<SheetRecord> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing sheet record {path}"))
}

/// 有路径就写文件并返回提示，否则返回 JSON 本身
fn dump_record(record: &SheetRecord, path: Option<&str>) -> anyhow::Result<String> {
    let json = serde_json::to_string_pretty(record).context("serializing sheet record")?;
    match path {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {path}"))?;
            Ok(format!("已导出 {} → {path}", record.name))
        }
        None => Ok(json),
    }
}

fn item_uuid(name: &str) -> Uuid {
    // 用固定 namespace + 名字生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
