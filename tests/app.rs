use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use pawprint::core::CorePlugin;
use pawprint::core::resources::{RosterEntry, SheetConfig};
use pawprint::core::states::AppState;
use pawprint::data::catalog::Catalog;
use pawprint::inventory::InventoryPlugin;
use pawprint::inventory::components::{Cell, GridKind, Inventory, Item, PlacedItem, SheetRole};
use pawprint::inventory::events::*;
use pawprint::inventory::migration::{InventoryRecord, LegacySlot};
use pawprint::inventory::transfer::{DropTarget, Location};
use pawprint::sheet::SheetPlugin;
use pawprint::sheet::components::{ActivityLog, Bank, Roster, Sheet, SheetRecord};
use pawprint::sheet::events::*;

fn entry(name: &str, role: SheetRole, loadout: &[&str]) -> RosterEntry {
    RosterEntry {
        name: name.into(),
        role,
        loadout: loadout.iter().map(|s| s.to_string()).collect(),
    }
}

/// 无窗口、无资源加载的最小应用，直接进入 InGame
fn app(roster: Vec<RosterEntry>) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(SheetConfig {
            homebrew: String::new(),
            roster,
        })
        .insert_resource(Catalog::builtin())
        .add_plugins((CorePlugin, SheetPlugin, InventoryPlugin));
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::InGame);
    app.update();
    app
}

fn sheet(app: &App, index: usize) -> Entity {
    app.world().resource::<Roster>().0[index]
}

fn inventory(app: &App, sheet: Entity) -> &Inventory {
    app.world().get::<Inventory>(sheet).unwrap()
}

fn log(app: &App, sheet: Entity) -> &[String] {
    app.world().get::<ActivityLog>(sheet).unwrap().entries()
}

fn names(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items.into_iter().collect()
}

#[test]
fn roster_spawns_with_resolved_loadouts() {
    let app = app(vec![
        entry("Ada Thistle", SheetRole::Character, &["Sword", "Spear", "Torches", "Spell: Heal"]),
        entry("Bramble", SheetRole::Hireling, &["Tent", "Rope", "Chalk", "Cheese"]),
    ]);

    let ada = sheet(&app, 0);
    assert_eq!(app.world().get::<Sheet>(ada).unwrap().name, "Ada Thistle");
    let inv = inventory(&app, ada);
    let paw = names(inv.grid(GridKind::Paw).items().iter().map(|p| p.item.name.clone()));
    let pack = names(inv.grid(GridKind::Pack).items().iter().map(|p| p.item.name.clone()));
    assert_eq!(paw, vec!["Sword", "Torches"]);
    assert_eq!(pack, vec!["Spear", "Heal"]);
    assert!(!inv.is_encumbered());

    // 雇工的背包只有 1×2
    let bramble = sheet(&app, 1);
    let inv = inventory(&app, bramble);
    assert_eq!(inv.grid(GridKind::Pack).rows(), 1);
    assert_eq!(inv.grid(GridKind::Paw).items()[0].item.name, "Tent");
    assert_eq!(inv.ground()[0].name, "Cheese");
    assert_eq!(log(&app, bramble), ["Cheese doesn't fit - placed on ground."]);
}

#[test]
fn drop_without_room_is_logged_on_the_sheet() {
    let mut app = app(vec![entry("Ada", SheetRole::Character, &["Needle"])]);
    let ada = sheet(&app, 0);

    app.world_mut().send_event(GiveItemEvent {
        sheet: ada,
        name: "Spear".into(),
    });
    app.update();
    assert_eq!(
        inventory(&app, ada).grid(GridKind::Pack).items()[0].item.name,
        "Spear"
    );

    app.world_mut().send_event(TransferItemEvent {
        sheet: ada,
        from: Location::Grid(GridKind::Pack, 0),
        to: DropTarget::Cell(GridKind::Paw, Cell::new(0, 1)),
    });
    app.update();

    let inv = inventory(&app, ada);
    assert_eq!(inv.ground()[0].name, "Spear");
    assert!(inv.grid(GridKind::Pack).is_empty());
    assert_eq!(
        log(&app, ada).last().map(String::as_str),
        Some("Spear doesn't fit there - moved to ground.")
    );
}

#[test]
fn full_rest_clears_conditions_and_logs_each() {
    let mut app = app(vec![entry("Ada", SheetRole::Character, &["Rations"])]);
    let ada = sheet(&app, 0);

    for name in ["Hungry", "Frightened"] {
        app.world_mut().send_event(AddConditionEvent {
            sheet: ada,
            name: name.into(),
        });
    }
    app.update();
    let pack = inventory(&app, ada).grid(GridKind::Pack);
    assert_eq!(pack.len(), 2);
    assert!(pack.items().iter().all(|p| p.item.is_condition()));

    app.world_mut().send_event(FullRestEvent { sheet: ada });
    app.update();

    assert!(inventory(&app, ada).grid(GridKind::Pack).is_empty());
    assert_eq!(inventory(&app, ada).item_count(), 1);
    let log = log(&app, ada);
    assert!(log.contains(&"Cleared condition: Hungry".to_string()));
    assert!(log.contains(&"Cleared condition: Frightened".to_string()));
}

#[test]
fn full_rest_clears_condition_that_fell_to_ground() {
    let mut app = app(vec![entry("Pip", SheetRole::Hireling, &["Tent", "Rope", "Chalk"])]);
    let pip = sheet(&app, 0);
    assert_eq!(inventory(&app, pip).grid(GridKind::Pack).len(), 2);

    app.world_mut().send_event(AddConditionEvent {
        sheet: pip,
        name: "Hungry".into(),
    });
    app.update();
    assert_eq!(inventory(&app, pip).ground()[0].name, "Hungry");
    assert!(inventory(&app, pip).is_encumbered());

    app.world_mut().send_event(FullRestEvent { sheet: pip });
    app.update();

    let inv = inventory(&app, pip);
    assert!(inv.ground().is_empty());
    assert!(!inv.is_encumbered());
    assert_eq!(inv.item_count(), 3);
    assert_eq!(log(&app, pip).last().map(String::as_str), Some("Cleared condition: Hungry"));
}

#[test]
fn hand_over_puts_item_on_receivers_ground() {
    let mut app = app(vec![
        entry("Ada", SheetRole::Character, &["Lantern"]),
        entry("Pip", SheetRole::Hireling, &[]),
    ]);
    let (ada, pip) = (sheet(&app, 0), sheet(&app, 1));

    app.world_mut().send_event(HandOverEvent {
        from: ada,
        at: Location::Grid(GridKind::Paw, 0),
        to: pip,
    });
    app.update();

    assert_eq!(inventory(&app, ada).item_count(), 0);
    assert_eq!(inventory(&app, pip).ground()[0].name, "Lantern");
    assert_eq!(log(&app, ada), ["Gave Lantern to Pip."]);
    assert_eq!(log(&app, pip), ["Received Lantern from Ada."]);

    // 交给自己什么也不做
    app.world_mut().send_event(HandOverEvent {
        from: pip,
        at: Location::Ground(0),
        to: pip,
    });
    app.update();
    assert_eq!(inventory(&app, pip).ground().len(), 1);
}

#[test]
fn marking_usage_reaches_depletion() {
    let mut app = app(vec![entry("Ada", SheetRole::Character, &["Torches"])]);
    let ada = sheet(&app, 0);
    let at = Location::Grid(GridKind::Paw, 0);

    for _ in 0..4 {
        app.world_mut().send_event(MarkUsageEvent {
            sheet: ada,
            at,
            clear: false,
        });
    }
    app.update();

    let torches = inventory(&app, ada).item(at).unwrap();
    assert!(torches.usage.unwrap().is_depleted());
    assert_eq!(log(&app, ada).last().map(String::as_str), Some("Torches is used up (3/3)."));
}

#[test]
fn legacy_record_is_migrated_on_import() {
    let mut app = app(vec![]);
    let record = SheetRecord {
        name: "Old Whisker".into(),
        role: SheetRole::Npc,
        log: vec!["Met at the mill.".into()],
        inventory: InventoryRecord {
            inventory: Some(vec![
                LegacySlot {
                    id: "paw-main".into(),
                    slot_type: "paw-main".into(),
                    item: Some(Item::gear("Staff").with_size(2, 1)),
                },
                LegacySlot {
                    id: "pack".into(),
                    slot_type: "pack".into(),
                    item: Some(Item::gear("Bedroll").with_size(2, 1)),
                },
                LegacySlot {
                    id: "pack".into(),
                    slot_type: "pack".into(),
                    item: Some(Item::gear("Pot")),
                },
            ]),
            ..Default::default()
        },
    };

    app.world_mut().send_event(ImportSheetEvent {
        record: record.clone(),
    });
    app.update();

    let whisker = sheet(&app, 0);
    let inv = inventory(&app, whisker);
    assert_eq!(inv.grid(GridKind::Paw).items()[0].item.name, "Staff");
    assert_eq!(inv.grid(GridKind::Pack).items()[0].item.name, "Bedroll");
    assert_eq!(inv.ground()[0].name, "Pot");
    assert_eq!(log(&app, whisker), ["Met at the mill."]);

    // 再次读入同名卡只替换内容，不新增
    app.world_mut().send_event(ImportSheetEvent { record });
    app.update();
    assert_eq!(app.world().resource::<Roster>().0.len(), 1);
}

#[test]
fn bank_keeps_deposits_and_charges_fee() {
    let mut app = app(vec![entry("Ada", SheetRole::Character, &["Lantern", "Rope"])]);
    let ada = sheet(&app, 0);

    app.world_mut().send_event(DepositItemEvent {
        sheet: ada,
        at: Location::Grid(GridKind::Paw, 1),
    });
    app.world_mut().send_event(BankPipsEvent { amount: 200 });
    app.update();
    app.world_mut().send_event(BankPipsEvent { amount: -150 });
    app.world_mut().send_event(WithdrawItemEvent { sheet: ada, index: 0 });
    app.update();

    let bank = app.world().resource::<Bank>();
    assert_eq!(bank.pips, 48);
    assert!(bank.items.is_empty());
    let inv = inventory(&app, ada);
    assert_eq!(inv.grid(GridKind::Paw).len(), 1);
    assert_eq!(inv.ground()[0].name, "Rope");
}

#[test]
fn reimport_with_new_role_updates_sheet_and_round_trips() {
    let mut app = app(vec![entry("Old Whisker", SheetRole::Npc, &["Staff"])]);
    let whisker = sheet(&app, 0);

    let record = SheetRecord {
        name: "Old Whisker".into(),
        role: SheetRole::Character,
        log: vec![],
        inventory: InventoryRecord {
            paw_grid: Some(vec![]),
            body_grid: Some(vec![]),
            pack_grid: Some(vec![PlacedItem::new(Item::gear("Bedroll"), Cell::new(1, 2))]),
            ..Default::default()
        },
    };
    app.world_mut().send_event(ImportSheetEvent { record });
    app.update();

    assert_eq!(app.world().resource::<Roster>().0.len(), 1);
    let sheet = app.world().get::<Sheet>(whisker).unwrap();
    assert_eq!(sheet.role, SheetRole::Character);
    let inv = inventory(&app, whisker);
    assert_eq!(inv.grid(GridKind::Pack).rows(), 2);

    // 导出的记录能按导出的类型重新读入
    let dumped = SheetRecord::capture(sheet, inv, app.world().get::<ActivityLog>(whisker).unwrap());
    assert_eq!(dumped.role, SheetRole::Character);
    assert!(Inventory::from_record(dumped.inventory, dumped.role).is_ok());
}
